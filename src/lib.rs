//! # Pantry - a GraphQL API over categories and ingredients
//!
//! Pantry stores recipe categories and their ingredients in SQLite and exposes
//! them through an async-graphql schema, either in-process from the CLI or over
//! HTTP.
//!
//! ## Quick Start
//!
//! ```bash
//! # Create .pantry.toml and the database
//! pantry init
//!
//! # Add a category and an ingredient
//! pantry mutate 'createCategory(name: "Dairy") { category { id } }'
//! pantry mutate 'createIngredients(name: "Milk", notes: "fresh", categoryId: 1) { ingredient { id } }'
//!
//! # Read them back
//! pantry query '{ allIngredients { name category { name } } }'
//!
//! # Serve the API with GraphiQL at /graphql
//! pantry serve --port 4000
//! ```
//!
//! ## Modules
//!
//! - [`cli`]: Command-line interface definitions and handlers
//! - [`config`]: Configuration loading and management
//! - [`error`]: Error types and result aliases
//! - [`graphql`]: GraphQL schema, resolvers and HTTP transport
//! - [`model`]: Persistence records (categories, ingredients)
//! - [`storage`]: SQLite entity store and migrations

/// Command-line interface definitions using clap.
pub mod cli;

/// Configuration loading and management.
///
/// Handles `.pantry.toml` configuration files and project discovery.
pub mod config;

/// Error types and result aliases.
///
/// Defines `PantryError` enum and `Result<T>` type alias.
pub mod error;

/// GraphQL schema and resolvers.
///
/// Provides async-graphql schema for querying and mutating the pantry.
pub mod graphql;

/// Persistence records for categories and ingredients.
pub mod model;

/// Relational storage layer.
///
/// The `EntityStore` access interface and its SQLite implementation.
pub mod storage;

pub mod logging;
