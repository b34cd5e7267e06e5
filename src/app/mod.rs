use crate::api::{ApiCommand, ApiServer, CaptureFeeds, SessionApiState};
use crate::backend::BackendClient;
use crate::capture::{ChannelSource, SessionRecorder};
use crate::config::Config;
use crate::pipeline::SessionMachine;
use crate::session::SessionStatusHandle;
use crate::transcription::{AssemblyAiClient, JobPoller};
use anyhow::Result;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

pub async fn run_service() -> Result<()> {
    info!("Starting meetrec service");

    let config = Config::load()?;

    if config.transcription.api_key.is_empty() {
        warn!("No transcription api_key configured; sessions will fail at the transcription step");
    }

    let (tx, mut rx) = mpsc::channel::<ApiCommand>(10);

    let (system_source, system_tx) =
        ChannelSource::new("system", config.capture.source_sample_rate);
    let (mic_source, mic_tx) = ChannelSource::new("microphone", config.capture.source_sample_rate);

    let recorder = SessionRecorder::new(
        Box::new(system_source),
        Box::new(mic_source),
        config.capture.target_sample_rate,
        config.recordings_dir()?,
    );

    let store = BackendClient::new(
        &config.backend.base_url,
        config.backend.auth_token.clone(),
    );
    let transcriber = AssemblyAiClient::new(
        config.transcription.api_key.clone(),
        &config.transcription.base_url,
    );
    let poller = JobPoller::new(
        Duration::from_secs(config.transcription.poll_interval_seconds),
        config.transcription.max_poll_attempts,
    );

    let status_handle = SessionStatusHandle::default();
    let mut machine = SessionMachine::new(
        recorder,
        Box::new(store),
        Box::new(transcriber),
        poller,
        status_handle.clone(),
    );

    let api_server = ApiServer::new(
        config.api.port,
        SessionApiState {
            tx,
            status: status_handle,
            feeds: CaptureFeeds {
                system: system_tx,
                mic: mic_tx,
            },
        },
    );
    tokio::spawn(async move {
        if let Err(e) = api_server.start().await {
            error!("API server failed: {}", e);
        }
    });

    info!("meetrec is ready!");
    info!(
        "Start a session: curl -X POST http://127.0.0.1:{}/start",
        config.api.port
    );

    // Commands run inline here: stop executes the whole pipeline before
    // the next command is picked up, so session steps never overlap.
    while let Some(command) = rx.recv().await {
        match command {
            ApiCommand::Start { options, reply } => {
                let result = machine.start(options).await;
                match &result {
                    Ok(outcome) => info!("Session {} capturing", outcome.session_id),
                    Err(e) => error!("Failed to start session: {}", e),
                }
                let _ = reply.send(result);
            }
            ApiCommand::Stop { title, reply } => {
                let result = machine.stop(title).await;
                match &result {
                    Ok(outcome) => info!(
                        "Session finished: meeting {} ({}s)",
                        outcome.meeting_id, outcome.duration_seconds
                    ),
                    Err(e) => error!("Session failed: {}", e),
                }
                let _ = reply.send(result);
            }
        }
    }

    Ok(())
}
