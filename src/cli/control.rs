//! CLI commands that drive a running meetrec service over its local API.

use anyhow::{bail, Context, Result};
use serde_json::{json, Value};

use super::args::{StartArgs, StopArgs};
use crate::config::Config;

fn api_url(path: &str) -> Result<String> {
    let config = Config::load()?;
    Ok(format!("http://127.0.0.1:{}{}", config.api.port, path))
}

async fn print_response(response: reqwest::Response) -> Result<()> {
    let status = response.status();
    let body: Value = response
        .json()
        .await
        .context("Service returned a non-JSON response")?;

    println!("{}", serde_json::to_string_pretty(&body)?);

    if !status.is_success() {
        bail!("Service responded with {}", status);
    }
    Ok(())
}

pub async fn handle_status_command() -> Result<()> {
    let url = api_url("/status")?;
    let response = reqwest::get(&url)
        .await
        .context("Is the meetrec service running?")?;
    print_response(response).await
}

pub async fn handle_start_command(args: StartArgs) -> Result<()> {
    let url = api_url("/start")?;
    let response = reqwest::Client::new()
        .post(&url)
        .json(&json!({ "title": args.title }))
        .send()
        .await
        .context("Is the meetrec service running?")?;
    print_response(response).await
}

pub async fn handle_stop_command(args: StopArgs) -> Result<()> {
    let url = api_url("/stop")?;
    let response = reqwest::Client::new()
        .post(&url)
        .json(&json!({ "title": args.title }))
        .send()
        .await
        .context("Is the meetrec service running?")?;
    print_response(response).await
}
