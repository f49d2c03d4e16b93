use crate::graphql::{build_schema, run_server};
use anyhow::Result;
use colored::Colorize;
use std::sync::Arc;

use super::CommandContext;

pub fn handle_serve(ctx: CommandContext, port: Option<u16>, host: Option<String>) -> Result<()> {
    let mut server = ctx.config.server.clone();
    if let Some(p) = port {
        server.port = p;
    }
    if let Some(h) = host {
        server.host = h;
    }

    let store = ctx.open_store()?;
    let schema = build_schema(Arc::new(store));
    let addr = server.addr();

    println!(
        "{} GraphQL server on http://{}/graphql",
        "Starting".green(),
        addr
    );
    println!("GraphiQL: http://{}/graphql", addr);

    tokio::runtime::Runtime::new()?.block_on(run_server(schema, &addr))?;
    Ok(())
}
