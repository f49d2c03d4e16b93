use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    Router,
    extract::State,
    response::{Html, IntoResponse},
    routing::get,
};
use tower_http::trace::TraceLayer;

use super::PantrySchema;
use crate::error::{PantryError, Result};

pub fn create_router(schema: PantrySchema) -> Router {
    Router::new()
        .route("/graphql", get(graphiql).post(graphql_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(schema)
}

async fn graphiql() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}

async fn graphql_handler(
    State(schema): State<PantrySchema>,
    req: GraphQLRequest,
) -> GraphQLResponse {
    schema.execute(req.into_inner()).await.into()
}

/// Serve the schema over HTTP until Ctrl-C.
pub async fn run_server(schema: PantrySchema, addr: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
        PantryError::Io(std::io::Error::new(
            e.kind(),
            format!("Bind to {} failed: {}", addr, e),
        ))
    })?;

    tracing::info!("Pantry GraphQL server listening on {}", addr);

    axum::serve(listener, create_router(schema))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
