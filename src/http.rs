//! HTTP helpers shared by manifest retrieval and file downloads.

use crate::config::Config;
use crate::retry::{with_retry_if, RetryConfig};
use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: StatusCode },
    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    /// Server errors, rate limiting and transport failures are worth another
    /// attempt. Other client errors, undecodable bodies and local I/O are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Status { status, .. } => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
            FetchError::Request { source, .. } => !source.is_decode(),
            FetchError::Io { .. } => false,
        }
    }
}

pub fn build_client(config: &Config) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(config.http_timeout())
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to build HTTP client")
}

async fn get_checked(client: &reqwest::Client, url: &str) -> Result<reqwest::Response, FetchError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })?;

    if !response.status().is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: response.status(),
        });
    }
    Ok(response)
}

/// GET a JSON document, retrying transient failures.
pub async fn get_json<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
    retry: &RetryConfig,
) -> Result<T, FetchError> {
    with_retry_if(
        retry,
        &format!("GET {}", url),
        || async move {
            get_checked(client, url)
                .await?
                .json::<T>()
                .await
                .map_err(|source| FetchError::Request {
                    url: url.to_string(),
                    source,
                })
        },
        FetchError::is_retryable,
    )
    .await
}

/// Download `url` to `path`, retrying transient failures.
///
/// The body is written next to the target and renamed into place, so an
/// interrupted run never leaves a truncated file at `path`.
pub async fn download_file(
    client: &reqwest::Client,
    url: &str,
    path: &Path,
    retry: &RetryConfig,
) -> Result<u64, FetchError> {
    let io_error = |source| FetchError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(io_error)?;
    }

    let body = with_retry_if(
        retry,
        &format!("Download {}", url),
        || async move {
            get_checked(client, url)
                .await?
                .bytes()
                .await
                .map_err(|source| FetchError::Request {
                    url: url.to_string(),
                    source,
                })
        },
        FetchError::is_retryable,
    )
    .await?;

    let partial = path.with_extension("part");
    tokio::fs::write(&partial, &body).await.map_err(io_error)?;
    tokio::fs::rename(&partial, path).await.map_err(io_error)?;

    Ok(body.len() as u64)
}
