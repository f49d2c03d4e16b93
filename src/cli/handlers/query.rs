use crate::graphql::build_schema;
use anyhow::Result;
use std::sync::Arc;

use super::CommandContext;

/// Execute a GraphQL document against the project database and print the response.
///
/// The response is printed even when it carries errors; the command then
/// exits with a failure status.
pub fn handle_query(ctx: CommandContext, query: String, variables: Option<String>) -> Result<()> {
    let store = ctx.open_store()?;
    let schema = build_schema(Arc::new(store));

    let vars: async_graphql::Variables = if let Some(v) = variables {
        serde_json::from_str(&v)?
    } else {
        async_graphql::Variables::default()
    };

    let request = async_graphql::Request::new(query).variables(vars);
    let response = tokio::runtime::Runtime::new()?.block_on(schema.execute(request));

    println!("{}", serde_json::to_string_pretty(&response)?);

    if response.is_err() {
        anyhow::bail!("GraphQL request failed with {} error(s)", response.errors.len());
    }
    Ok(())
}
