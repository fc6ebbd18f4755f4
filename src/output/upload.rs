// SPDX-License-Identifier: GPL-3.0-only

//! Best-effort gallery upload
//!
//! The artifact is POSTed as a JSON body with a single `image` field
//! carrying a data URI. The upload is fire-and-forget: failures are logged
//! and swallowed, and the visible flow never waits on the outcome.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{debug, warn};

use crate::compose::CompositeArtifact;
use crate::errors::UploadError;

/// What the endpoint acknowledged
#[derive(Debug, Clone)]
pub struct UploadReceipt {
    /// Location reference returned by the gallery, when it provides one
    pub url: Option<String>,
}

/// Remote gallery collaborator
#[async_trait]
pub trait GalleryUploader: Send + Sync {
    async fn upload(&self, artifact: &CompositeArtifact) -> Result<UploadReceipt, UploadError>;
}

/// Uploader speaking plain HTTP to a configured endpoint
#[derive(Debug, Clone)]
pub struct HttpUploader {
    endpoint: String,
}

impl HttpUploader {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl GalleryUploader for HttpUploader {
    async fn upload(&self, artifact: &CompositeArtifact) -> Result<UploadReceipt, UploadError> {
        let (host, authority, path) = parse_http_endpoint(&self.endpoint)?;

        let body = serde_json::json!({ "image": artifact.to_data_uri() }).to_string();
        let request = format!(
            "POST {} HTTP/1.1\r\nHost: {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            path,
            host,
            body.len()
        );

        let mut stream = TcpStream::connect(authority.as_str()).await?;
        stream.write_all(request.as_bytes()).await?;
        stream.write_all(body.as_bytes()).await?;

        let mut response = Vec::new();
        stream.read_to_end(&mut response).await?;
        parse_response(&response)
    }
}

/// Split `http://host[:port]/path` into (host header, connect authority,
/// request path). Anything else is not an endpoint this transport speaks to.
fn parse_http_endpoint(url: &str) -> Result<(String, String, String), UploadError> {
    let rest = url
        .strip_prefix("http://")
        .ok_or_else(|| UploadError::Endpoint(format!("not a plain http endpoint: {}", url)))?;

    let (hostport, path) = match rest.split_once('/') {
        Some((h, p)) => (h, format!("/{}", p)),
        None => (rest, "/".to_string()),
    };
    if hostport.is_empty() {
        return Err(UploadError::Endpoint(format!("missing host: {}", url)));
    }

    let authority = if hostport.contains(':') {
        hostport.to_string()
    } else {
        format!("{}:80", hostport)
    };

    Ok((hostport.to_string(), authority, path))
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

fn parse_response(raw: &[u8]) -> Result<UploadReceipt, UploadError> {
    let text = String::from_utf8_lossy(raw);
    let status_line = text
        .lines()
        .next()
        .ok_or_else(|| UploadError::MalformedResponse("empty response".into()))?;
    let status: u16 = status_line
        .split_whitespace()
        .nth(1)
        .and_then(|code| code.parse().ok())
        .ok_or_else(|| UploadError::MalformedResponse(format!("bad status line: {}", status_line)))?;

    if !(200..300).contains(&status) {
        return Err(UploadError::Rejected(status));
    }

    let body = text
        .split_once("\r\n\r\n")
        .map(|(_, b)| b.trim())
        .unwrap_or("");
    let response: UploadResponse = serde_json::from_str(body)
        .map_err(|e| UploadError::MalformedResponse(e.to_string()))?;

    if !response.success {
        return Err(UploadError::Declined(
            response.error.unwrap_or_else(|| "no reason given".into()),
        ));
    }

    Ok(UploadReceipt { url: response.url })
}

/// Fire-and-forget transmission of the artifact.
///
/// The returned handle is for tests; the flow drops it. Failure never
/// surfaces to the user.
pub fn upload_background(
    uploader: Arc<dyn GalleryUploader>,
    artifact: CompositeArtifact,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        match uploader.upload(&artifact).await {
            Ok(receipt) => {
                debug!(url = receipt.url.as_deref().unwrap_or("-"), "Background upload accepted")
            }
            Err(e) => warn!(error = %e, "Background upload failed"),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_parsing_splits_host_and_path() {
        let (host, authority, path) =
            parse_http_endpoint("http://gallery.example:8080/upload.php").unwrap();
        assert_eq!(host, "gallery.example:8080");
        assert_eq!(authority, "gallery.example:8080");
        assert_eq!(path, "/upload.php");

        let (_, authority, path) = parse_http_endpoint("http://gallery.example").unwrap();
        assert_eq!(authority, "gallery.example:80");
        assert_eq!(path, "/");
    }

    #[test]
    fn https_is_not_spoken_here() {
        assert!(matches!(
            parse_http_endpoint("https://gallery.example/upload"),
            Err(UploadError::Endpoint(_))
        ));
    }

    #[test]
    fn rejection_and_decline_are_distinct() {
        let raw = b"HTTP/1.1 500 Internal Server Error\r\n\r\n";
        assert!(matches!(parse_response(raw), Err(UploadError::Rejected(500))));

        let raw = b"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\n\r\n{\"success\":false,\"error\":\"disk full\"}";
        assert!(matches!(parse_response(raw), Err(UploadError::Declined(_))));
    }

    #[test]
    fn success_carries_the_location() {
        let raw = b"HTTP/1.1 200 OK\r\n\r\n{\"success\":true,\"url\":\"http://g/x.png\"}";
        let receipt = parse_response(raw).unwrap();
        assert_eq!(receipt.url.as_deref(), Some("http://g/x.png"));
    }
}
