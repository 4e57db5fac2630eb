//! Shared reqwest plumbing for the backend clients.

use std::time::Duration;

use reqwest::{Client, Response};
use yodash_core::{DashError, Result};

/// Builds a client. Without a timeout, a hung backend call waits indefinitely.
pub(crate) fn build_client(timeout: Option<Duration>) -> Result<Client> {
    let mut builder = Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|err| DashError::config(format!("Failed to build HTTP client: {err}")))
}

pub(crate) fn transport_error(context: &str, err: reqwest::Error) -> DashError {
    let kind = if err.is_timeout() {
        "timed out"
    } else if err.is_connect() {
        "could not connect"
    } else {
        "failed"
    };
    DashError::transport(format!("{context} {kind}: {err}"))
}

/// Maps a non-2xx response to `Backend { status, status_text }`.
pub(crate) fn check_status(response: &Response) -> Result<()> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    Err(DashError::backend(
        status.as_u16(),
        status.canonical_reason().unwrap_or_default(),
    ))
}
