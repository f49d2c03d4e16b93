//! GraphQL schema and resolvers for the pantry API.
//!
//! ## Usage
//!
//! ```bash
//! # Start the GraphQL server
//! pantry serve --port 4000
//!
//! # Execute a query from CLI
//! pantry query '{ allIngredients { name category { name } } }'
//!
//! # Execute a mutation from CLI
//! pantry mutate 'createCategory(name: "Dairy") { category { id } }'
//! ```
//!
//! ## Schema
//!
//! - **Queries**: `allIngredients`, `specific`, `categoryByName`
//! - **Mutations**: `createCategory`, `updateCategory`, `deleteCategory`,
//!   `createIngredients`, `updateIngredients`, `deleteIngredients`
//!
//! Errors raised by the store carry an `extensions.code` of `NOT_FOUND`,
//! `AMBIGUOUS` or `STORE_FAILURE`.
//!
//! Store calls are synchronous and run on Tokio's blocking pool, never on the
//! async workers driving request execution.

mod loaders;
mod schema;
mod server;
mod types;

pub use loaders::IngredientsByCategory;
pub use schema::{MutationRoot, PantrySchema, QueryRoot, build_schema};
pub use server::{create_router, run_server};
pub use types::*;

use crate::error::{PantryError, Result};
use crate::storage::EntityStore;
use async_graphql::ErrorExtensions;
use std::sync::Arc;

pub(crate) fn to_graphql_error(err: &PantryError) -> async_graphql::Error {
    err.extend()
}

/// Runs `op` against the store on the blocking pool.
pub(crate) async fn run_blocking<T, F>(store: Arc<dyn EntityStore>, op: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce(&dyn EntityStore) -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(move || op(store.as_ref())).await?
}
