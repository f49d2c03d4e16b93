//! Batched relationship loading.
//!
//! `Category.ingredients` is resolved through [`IngredientsByCategory`], so a
//! response containing many categories costs one store round-trip per batch
//! rather than one per category.

use crate::error::PantryError;
use crate::model::{CategoryId, IngredientRecord};
use crate::storage::EntityStore;
use async_graphql::dataloader::Loader;
use std::collections::HashMap;
use std::sync::Arc;

pub struct IngredientsByCategory {
    store: Arc<dyn EntityStore>,
}

impl IngredientsByCategory {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }
}

impl Loader<CategoryId> for IngredientsByCategory {
    type Value = Vec<IngredientRecord>;
    type Error = Arc<PantryError>;

    async fn load(
        &self,
        keys: &[CategoryId],
    ) -> Result<HashMap<CategoryId, Self::Value>, Self::Error> {
        tracing::debug!(keys = keys.len(), "Loading ingredients for categories");
        let keys = keys.to_vec();
        super::run_blocking(Arc::clone(&self.store), move |store| {
            store.ingredients_for_categories(&keys)
        })
        .await
        .map_err(Arc::new)
    }
}
