//! REST API server: the control surface the popup/CLI talks to.
//!
//! Provides HTTP endpoints for:
//! - Session control (start, stop, status)
//! - Capture sample ingestion (feed)

pub mod error;
pub mod routes;

use anyhow::Result;
use axum::{response::Json, routing::get, Router};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tracing::info;

pub use routes::session::{ApiCommand, CaptureFeeds, SessionApiState};

pub struct ApiServer {
    port: u16,
    session_state: SessionApiState,
}

impl ApiServer {
    pub fn new(port: u16, session_state: SessionApiState) -> Self {
        Self {
            port,
            session_state,
        }
    }

    pub async fn start(self) -> Result<()> {
        let app = Router::new()
            .route("/", get(status))
            .route("/version", get(version))
            .merge(routes::session::router(self.session_state))
            .layer(ServiceBuilder::new());

        let listener = tokio::net::TcpListener::bind(&format!("127.0.0.1:{}", self.port)).await?;

        info!("API server listening on http://127.0.0.1:{}", self.port);
        info!("Endpoints:");
        info!("  GET  /         - Service info");
        info!("  GET  /version  - Version info");
        info!("  POST /start    - Start a recording session");
        info!("  POST /stop     - Stop and process the session");
        info!("  GET  /status   - Session status");
        info!("  POST /feed     - Push captured sample blocks");

        axum::serve(listener, app).await?;

        Ok(())
    }
}

async fn status() -> Json<Value> {
    Json(json!({
        "service": "meetrec",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running"
    }))
}

async fn version() -> Json<Value> {
    Json(json!({
        "version": env!("CARGO_PKG_VERSION"),
        "name": "meetrec"
    }))
}
