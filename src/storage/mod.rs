//! Relational storage layer for categories and ingredients.
//!
//! Records live in SQLite, one table per entity, with `ingredient.category_id`
//! referencing `category.id`:
//!
//! ```text
//! category   (id INTEGER PK, name TEXT)
//! ingredient (id INTEGER PK, name TEXT, notes TEXT,
//!             category_id INTEGER NOT NULL -> category.id ON DELETE CASCADE)
//! ```
//!
//! ## Components
//!
//! - [`EntityStore`]: the access interface the GraphQL layer reads and writes through
//! - [`SqliteStore`]: the SQLite implementation
//! - [`migrations`]: schema migrations tracked with `PRAGMA user_version`

pub mod migrations;
mod sqlite;

pub use sqlite::SqliteStore;

use crate::error::Result;
use crate::model::{
    CategoryId, CategoryRecord, IngredientChanges, IngredientRecord, IngredientWithCategory,
    NewIngredient,
};
use std::collections::HashMap;

/// Access interface over the persisted categories and ingredients.
///
/// Every mutating method is a single atomic unit against the store. Methods
/// addressing a record by id return [`PantryError::NotFound`] when it does not
/// resolve.
///
/// [`PantryError::NotFound`]: crate::error::PantryError::NotFound
pub trait EntityStore: Send + Sync {
    fn create_category(&self, name: &str) -> Result<CategoryRecord>;

    fn get_category(&self, id: CategoryId) -> Result<CategoryRecord>;

    /// The category with exactly this name, if any.
    ///
    /// Names are not unique; more than one match is [`PantryError::Ambiguous`].
    ///
    /// [`PantryError::Ambiguous`]: crate::error::PantryError::Ambiguous
    fn find_category_by_name(&self, name: &str) -> Result<Option<CategoryRecord>>;

    fn update_category(&self, id: CategoryId, name: &str) -> Result<CategoryRecord>;

    /// Removes the category and, through the foreign key, its ingredients.
    /// Returns the category as it was before removal.
    fn delete_category(&self, id: CategoryId) -> Result<CategoryRecord>;

    /// Fails with `NotFound` naming the category when `category_id` does not resolve.
    fn create_ingredient(&self, new: &NewIngredient) -> Result<IngredientWithCategory>;

    fn get_ingredient(&self, id: i64) -> Result<IngredientWithCategory>;

    /// Every ingredient joined with its category, ordered by id, in one round-trip.
    fn list_ingredients(&self) -> Result<Vec<IngredientWithCategory>>;

    fn update_ingredient(&self, id: i64, changes: &IngredientChanges)
    -> Result<IngredientWithCategory>;

    /// Returns the ingredient as it was before removal.
    fn delete_ingredient(&self, id: i64) -> Result<IngredientWithCategory>;

    /// Ingredients of every given category in one round-trip, ordered by id.
    ///
    /// Every requested id is present in the result, with an empty list when the
    /// category has no ingredients.
    fn ingredients_for_categories(
        &self,
        category_ids: &[CategoryId],
    ) -> Result<HashMap<CategoryId, Vec<IngredientRecord>>>;
}
