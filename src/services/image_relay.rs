/// Image relay
///
/// Fetches third-party images server-side with browser-like headers and
/// re-serves them from this origin. Two trust tiers exist:
/// - general hosts: streamed through, cached by clients for a year
/// - the pinned source: requires its own referer/origin, fully buffered so
///   `Content-Length` can be set, cached for a day
///
/// Failures are reported once; there are no retries.
use std::time::Duration;

use axum::{
    body::{Body, Bytes},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
};
use reqwest::{Client as HttpClient, Url};

use crate::error::{AppError, AppResult};

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
const BROWSER_ACCEPT: &str = "image/webp,image/apng,image/*,*/*;q=0.8";
const BROWSER_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";
const DEFAULT_CONTENT_TYPE: &str = "image/jpeg";

/// How the upstream body is handed back to the client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayMode {
    Stream,
    /// Read fully, then reply with an explicit `Content-Length`
    Buffer,
}

/// Per-tier relay behavior
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayProfile {
    pub name: &'static str,
    pub mode: RelayMode,
    pub cache_control: &'static str,
    /// Sent as both `Referer` (with trailing slash) and `Origin`
    pub pinned_origin: Option<String>,
}

impl RelayProfile {
    /// General third-party image hosts
    pub fn general() -> Self {
        Self {
            name: "general",
            mode: RelayMode::Stream,
            cache_control: "public, max-age=31536000",
            pinned_origin: None,
        }
    }

    /// The high-volume source whose edge rejects requests without referer/origin
    pub fn pinned(origin: &str) -> Self {
        Self {
            name: "pinned",
            mode: RelayMode::Buffer,
            cache_control: "public, max-age=86400",
            pinned_origin: Some(origin.trim_end_matches('/').to_string()),
        }
    }
}

/// Relayed image body
pub enum RelayBody {
    Stream(reqwest::Response),
    Buffered(Bytes),
}

/// An upstream image ready to be written back to the client
pub struct RelayedImage {
    pub content_type: String,
    pub cache_control: &'static str,
    pub body: RelayBody,
}

impl IntoResponse for RelayedImage {
    fn into_response(self) -> Response {
        let content_type = HeaderValue::from_str(&self.content_type)
            .unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_CONTENT_TYPE));
        let cache_control = HeaderValue::from_static(self.cache_control);

        match self.body {
            RelayBody::Stream(upstream) => (
                [
                    (header::CONTENT_TYPE, content_type),
                    (header::CACHE_CONTROL, cache_control),
                ],
                Body::from_stream(upstream.bytes_stream()),
            )
                .into_response(),
            RelayBody::Buffered(bytes) => (
                [
                    (header::CONTENT_TYPE, content_type),
                    (header::CACHE_CONTROL, cache_control),
                    (header::CONTENT_LENGTH, HeaderValue::from(bytes.len())),
                ],
                bytes,
            )
                .into_response(),
        }
    }
}

#[derive(Clone)]
pub struct ImageRelay {
    http_client: HttpClient,
}

impl ImageRelay {
    /// Creates a relay whose fetches, body included, are bounded by `timeout`
    pub fn new(timeout: Duration) -> AppResult<Self> {
        let http_client = HttpClient::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .user_agent(BROWSER_USER_AGENT)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { http_client })
    }

    /// Fetches `url` according to `profile`
    pub async fn fetch(&self, url: &str, profile: &RelayProfile) -> AppResult<RelayedImage> {
        let url = parse_image_url(url)?;

        tracing::info!(url = %url, profile = profile.name, "Relaying image");

        let mut request = self
            .http_client
            .get(url.clone())
            .header(header::ACCEPT, BROWSER_ACCEPT)
            .header(header::ACCEPT_LANGUAGE, BROWSER_ACCEPT_LANGUAGE);

        if let Some(origin) = &profile.pinned_origin {
            request = request
                .header(header::REFERER, format!("{}/", origin))
                .header(header::ORIGIN, origin.as_str());
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::UpstreamFetch(format!("{}: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(AppError::UpstreamFetch(format!(
                "{} returned status {}",
                url,
                response.status()
            )));
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();

        let body = match profile.mode {
            RelayMode::Stream => RelayBody::Stream(response),
            RelayMode::Buffer => {
                let bytes = response
                    .bytes()
                    .await
                    .map_err(|e| AppError::UpstreamFetch(format!("{}: {}", url, e)))?;
                tracing::debug!(url = %url, bytes = bytes.len(), "Buffered image");
                RelayBody::Buffered(bytes)
            }
        };

        Ok(RelayedImage {
            content_type,
            cache_control: profile.cache_control,
            body,
        })
    }
}

/// Accepts only absolute http(s) URLs
fn parse_image_url(raw: &str) -> AppResult<Url> {
    let url = Url::parse(raw.trim())
        .map_err(|_| AppError::InvalidInput("URL parameter must be an absolute URL".to_string()))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(AppError::InvalidInput(format!(
            "Unsupported URL scheme: {}",
            other
        ))),
    }
}
