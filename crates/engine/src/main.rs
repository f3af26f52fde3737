//! StoryGraph Engine - Main entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use storygraph_engine::api;
use storygraph_engine::infrastructure::{
    clock::SystemClock,
    config::{AppConfig, GraphBackend},
    memory::InMemoryGraph,
    neo4j::{self, Neo4jQueryExecutor},
    ports::{ClockPort, QueryExecutor},
};
use storygraph_engine::App;

/// Connection attempts before startup gives up on Neo4j.
const NEO4J_CONNECT_ATTEMPTS: u32 = 10;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root (the engine may be run from `crates/engine`).
    load_dotenv_from_repo_root();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storygraph_engine=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting StoryGraph Engine");

    let config = AppConfig::from_env()?;
    let clock: Arc<dyn ClockPort> = Arc::new(SystemClock::new());

    let executor: Arc<dyn QueryExecutor> = match config.backend {
        GraphBackend::Neo4j => {
            tracing::info!(uri = %config.neo4j.uri, "Connecting to Neo4j");
            let graph = neo4j::connect_with_retry(
                &config.neo4j.uri,
                &config.neo4j.user,
                &config.neo4j.password,
                NEO4J_CONNECT_ATTEMPTS,
            )
            .await?;

            // Ensure database schema (constraints and indexes)
            neo4j::ensure_schema(&graph).await?;
            Arc::new(Neo4jQueryExecutor::new(graph))
        }
        GraphBackend::Memory => {
            tracing::warn!("Using the in-memory graph; data is lost on exit");
            Arc::new(InMemoryGraph::new())
        }
    };

    let app = Arc::new(App::new(executor, clock));

    let mut router = api::routes()
        .with_state(app)
        .layer(TraceLayer::new_for_http());

    if let Some(cors) = build_cors_layer(config.cors_allowed_origins.as_deref()) {
        router = router.layer(cors);
    }

    // Start server
    let addr: SocketAddr = config.bind_address().parse()?;
    tracing::info!(backend = %config.backend, "Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}

/// `*` allows any origin; otherwise a comma-separated list.
fn build_cors_layer(allowed_origins: Option<&str>) -> Option<CorsLayer> {
    let allowed_origins = allowed_origins?;

    let mut cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    if allowed_origins == "*" {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .filter_map(|s| HeaderValue::from_str(s).ok())
            .collect();

        if origins.is_empty() {
            return None;
        }

        cors = cors.allow_origin(origins);
    }

    Some(cors)
}
