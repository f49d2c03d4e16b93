//! Command-line interface for pantry.
//!
//! - `init` - Write a default `.pantry.toml` and create the database
//! - `migrate` - Apply pending schema migrations
//! - `query` / `mutate` - Execute a GraphQL document in-process
//! - `serve` - Start the GraphQL HTTP server

mod commands;
pub mod handlers;

pub use commands::{Cli, Commands};
