//! Session control endpoints.
//!
//! Provides HTTP endpoints for:
//! - Starting a session (POST /start)
//! - Stopping a session and running the pipeline (POST /stop)
//! - Reading session status (GET /status)
//! - Feeding captured sample blocks (POST /feed)

use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::{mpsc, oneshot};
use tracing::info;

use crate::api::error::{ApiError, ApiResult};
use crate::pipeline::{PipelineError, StartOptions, StartOutcome, StopOutcome};
use crate::session::SessionStatusHandle;

/// Commands sent from API handlers to the service loop. Each carries a
/// reply channel so the handler can report the actual outcome.
pub enum ApiCommand {
    Start {
        options: StartOptions,
        reply: oneshot::Sender<Result<StartOutcome, PipelineError>>,
    },
    Stop {
        title: Option<String>,
        reply: oneshot::Sender<Result<StopOutcome, PipelineError>>,
    },
}

/// Sender halves of the capture feeds, used by external capture glue
/// pushing sample blocks over HTTP.
#[derive(Clone)]
pub struct CaptureFeeds {
    pub system: mpsc::UnboundedSender<Vec<f32>>,
    pub mic: mpsc::UnboundedSender<Vec<f32>>,
}

#[derive(Clone)]
pub struct SessionApiState {
    pub tx: mpsc::Sender<ApiCommand>,
    pub status: SessionStatusHandle,
    pub feeds: CaptureFeeds,
}

#[derive(Debug, Default, Deserialize)]
pub struct StartRequest {
    pub title: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StopRequest {
    pub title: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FeedRequest {
    pub source: FeedSource,
    pub samples: Vec<f32>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedSource {
    System,
    Mic,
}

pub fn router(state: SessionApiState) -> Router {
    Router::new()
        .route("/start", post(start_session))
        .route("/stop", post(stop_session))
        .route("/status", get(session_status))
        .route("/feed", post(feed_samples))
        .with_state(state)
}

async fn start_session(
    State(state): State<SessionApiState>,
    body: Option<Json<StartRequest>>,
) -> ApiResult<Json<Value>> {
    let title = body.and_then(|Json(req)| req.title);
    info!("Start session requested via API (title: {:?})", title);

    let (reply_tx, reply_rx) = oneshot::channel();
    state
        .tx
        .send(ApiCommand::Start {
            options: StartOptions { title },
            reply: reply_tx,
        })
        .await
        .map_err(|_| ApiError::internal("service loop unavailable"))?;

    let outcome = reply_rx
        .await
        .map_err(|_| ApiError::internal("service loop dropped the request"))??;

    Ok(Json(json!({
        "success": true,
        "session_id": outcome.session_id,
    })))
}

async fn stop_session(
    State(state): State<SessionApiState>,
    body: Option<Json<StopRequest>>,
) -> ApiResult<Json<Value>> {
    let title = body.and_then(|Json(req)| req.title);
    info!("Stop session requested via API (title: {:?})", title);

    let (reply_tx, reply_rx) = oneshot::channel();
    state
        .tx
        .send(ApiCommand::Stop {
            title,
            reply: reply_tx,
        })
        .await
        .map_err(|_| ApiError::internal("service loop unavailable"))?;

    let outcome = reply_rx
        .await
        .map_err(|_| ApiError::internal("service loop dropped the request"))??;

    Ok(Json(json!({
        "success": true,
        "session_id": outcome.session_id,
        "meeting_id": outcome.meeting_id,
        "duration_seconds": outcome.duration_seconds,
    })))
}

async fn session_status(State(state): State<SessionApiState>) -> Json<Value> {
    let session = state.status.get().await;

    Json(json!({
        "phase": session.state.as_str(),
        "recording": session.state == crate::session::SessionState::Capturing,
        "session_id": session.session_id,
        "title": session.title,
        "status": session.last_status,
        "last_error": session.last_error,
        "duration_seconds": session.duration_seconds(),
    }))
}

async fn feed_samples(
    State(state): State<SessionApiState>,
    Json(req): Json<FeedRequest>,
) -> ApiResult<Json<Value>> {
    let sender = match req.source {
        FeedSource::System => &state.feeds.system,
        FeedSource::Mic => &state.feeds.mic,
    };

    sender
        .send(req.samples)
        .map_err(|_| ApiError::internal("capture feed closed"))?;

    Ok(Json(json!({ "success": true })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_source_parses_lowercase() {
        let req: FeedRequest =
            serde_json::from_str(r#"{"source": "system", "samples": [0.1, 0.2]}"#).unwrap();
        assert!(matches!(req.source, FeedSource::System));
        assert_eq!(req.samples.len(), 2);

        let req: FeedRequest =
            serde_json::from_str(r#"{"source": "mic", "samples": []}"#).unwrap();
        assert!(matches!(req.source, FeedSource::Mic));
    }

    #[test]
    fn test_start_request_title_optional() {
        let req: StartRequest = serde_json::from_str("{}").unwrap();
        assert!(req.title.is_none());

        let req: StartRequest = serde_json::from_str(r#"{"title": "Standup"}"#).unwrap();
        assert_eq!(req.title.as_deref(), Some("Standup"));
    }
}
