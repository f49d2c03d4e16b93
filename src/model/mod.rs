//! Persistence records for the pantry store.
//!
//! These are the shapes the store reads and writes. GraphQL output types live
//! in [`crate::graphql`] and are built from these records by explicit `From`
//! conversions.
//!
//! - [`CategoryRecord`]: a stored category row
//! - [`IngredientRecord`]: a stored ingredient row with its foreign key
//! - [`IngredientWithCategory`]: an ingredient joined with the category it references

mod category;
mod ingredient;

pub use category::{CategoryId, CategoryRecord};
pub use ingredient::{IngredientChanges, IngredientRecord, IngredientWithCategory, NewIngredient};
