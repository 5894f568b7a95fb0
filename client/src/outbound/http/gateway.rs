//! Reqwest transport shared by every clinic API adapter.
//!
//! This module owns request dispatch only: bearer injection, timeout and HTTP
//! error mapping, and JSON decoding. The per-port `impl` blocks live in the
//! sibling modules and call the helpers below.

use std::sync::Arc;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::dto::ErrorBodyDto;
use crate::domain::Upload;
use crate::domain::ports::{GatewayError, TokenStore};

/// Clinic API adapter implementing every gateway port over one HTTP client.
#[derive(Clone)]
pub struct ApiGateway {
    client: Client,
    base_url: Url,
    tokens: Arc<dyn TokenStore>,
}

impl ApiGateway {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    ///
    /// Paths are resolved against `base_url`; a missing trailing `/` is added
    /// so `http://host/prefix` keeps its prefix.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        base_url: Url,
        timeout: Duration,
        tokens: Arc<dyn TokenStore>,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: normalise_base(base_url),
            tokens,
        })
    }

    /// Base URL requests are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(super) fn endpoint(&self, path: &str) -> Result<Url, GatewayError> {
        self.base_url
            .join(path)
            .map_err(|err| GatewayError::transport(format!("invalid API path `{path}`: {err}")))
    }

    pub(super) async fn request(
        &self,
        method: Method,
        path: &str,
    ) -> Result<RequestBuilder, GatewayError> {
        let url = self.endpoint(path)?;
        debug!(%method, path, "dispatching API request");
        let builder = self
            .client
            .request(method, url)
            .header(reqwest::header::ACCEPT, "application/json");
        Ok(self.authorise(builder).await)
    }

    async fn authorise(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.tokens.load().await {
            Ok(Some(session)) => builder.bearer_auth(session.token().expose()),
            Ok(None) => builder,
            Err(err) => {
                warn!(error = %err, "token store unreadable; sending request unauthenticated");
                builder
            }
        }
    }

    /// Send `builder` and return the body of a successful response.
    pub(super) async fn execute(&self, builder: RequestBuilder) -> Result<Vec<u8>, GatewayError> {
        let response = builder.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        Ok(body.to_vec())
    }

    pub(super) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, GatewayError> {
        let builder = self.request(Method::GET, path).await?;
        decode(&self.execute(builder).await?)
    }

    pub(super) async fn send_json<B, T>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, GatewayError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let builder = self.request(method, path).await?.json(body);
        decode(&self.execute(builder).await?)
    }

    /// Send a JSON body and ignore whatever comes back.
    pub(super) async fn send_json_unit<B>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<(), GatewayError>
    where
        B: Serialize + ?Sized + Sync,
    {
        let builder = self.request(method, path).await?.json(body);
        self.execute(builder).await.map(drop)
    }

    pub(super) async fn delete_path(&self, path: &str) -> Result<(), GatewayError> {
        let builder = self.request(Method::DELETE, path).await?;
        self.execute(builder).await.map(drop)
    }

    pub(super) async fn post_multipart(
        &self,
        path: &str,
        form: Form,
    ) -> Result<Vec<u8>, GatewayError> {
        let builder = self.request(Method::POST, path).await?.multipart(form);
        self.execute(builder).await
    }

    pub(super) async fn get_bytes(&self, path: &str) -> Result<Vec<u8>, GatewayError> {
        let builder = self.request(Method::GET, path).await?;
        self.execute(builder).await
    }
}

fn normalise_base(mut base_url: Url) -> Url {
    if !base_url.path().ends_with('/') {
        let path = format!("{}/", base_url.path());
        base_url.set_path(&path);
    }
    base_url
}

/// Wrap an upload as a multipart file part.
pub(super) fn file_part(upload: &Upload) -> Result<Part, GatewayError> {
    Part::bytes(upload.bytes.clone())
        .file_name(upload.file_name.clone())
        .mime_str(&upload.content_type)
        .map_err(|err| {
            GatewayError::transport(format!(
                "invalid content type `{}`: {err}",
                upload.content_type
            ))
        })
}

pub(super) fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, GatewayError> {
    serde_json::from_slice(body)
        .map_err(|err| GatewayError::decode(format!("invalid API JSON payload: {err}")))
}

/// Decode a body that may be empty or `null`.
pub(super) fn decode_optional<T: DeserializeOwned>(body: &[u8]) -> Result<Option<T>, GatewayError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    decode(body)
}

fn map_transport_error(error: reqwest::Error) -> GatewayError {
    if error.is_timeout() {
        GatewayError::timeout(error.to_string())
    } else {
        GatewayError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> GatewayError {
    let explained = server_message(body);
    let message = explained.clone().unwrap_or_else(|| {
        let preview = body_preview(body);
        if preview.is_empty() || preview.starts_with('<') {
            format!("status {}", status.as_u16())
        } else {
            format!("status {}: {preview}", status.as_u16())
        }
    });

    match status {
        StatusCode::UNAUTHORIZED => GatewayError::unauthorized(message),
        StatusCode::FORBIDDEN => GatewayError::forbidden(message),
        StatusCode::NOT_FOUND => GatewayError::not_found(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            GatewayError::timeout(message)
        }
        _ if explained.is_some() => GatewayError::rejected(status.as_u16(), message),
        _ => GatewayError::unexplained(status.as_u16(), message),
    }
}

/// The `msg` field of an error body, when present and non-blank.
fn server_message(body: &[u8]) -> Option<String> {
    let decoded: ErrorBodyDto = serde_json::from_slice(body).ok()?;
    decoded
        .msg
        .map(|msg| msg.trim().to_owned())
        .filter(|msg| !msg.is_empty())
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
