pub mod config;

use std::borrow::Cow;
use std::time::Duration;
use std::{fs, io};

use anyhow::{bail, Context, Result};
use bytes::Bytes;
use log::debug;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Certificate, StatusCode, Url};
use thiserror::Error;

use crate::types::credentials::Credentials;
use crate::types::token::{TokenRequest, TokenResponse};

const MIME_JSON: &str = "application/json";

/// Errors returned by a token exchange.
#[derive(Error, Debug)]
pub enum AuthError {
    /// The server rejected the basic auth credentials (403).
    #[error("invalid username or password")]
    InvalidCredentials,

    /// Any status other than 201 and 403. `body` holds the response bytes
    /// exactly as received, without any charset decoding; the message shows
    /// them through [`AuthError::body_text`].
    #[error("unexpected server response: {code}: {}", String::from_utf8_lossy(.body))]
    UnexpectedStatus { code: u16, body: Bytes },

    #[error("server returned invalid token json: {0}")]
    MalformedResponse(#[source] serde_json::Error),

    #[error("server returned success but no usable token")]
    ProtocolViolation,

    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    #[error(transparent)]
    Encode(serde_json::Error),
}

impl AuthError {
    /// Whether a caller may reasonably try the exchange again later. The
    /// client itself never retries.
    pub fn is_retryable(&self) -> bool {
        match self {
            AuthError::Transport(err) => err.is_connect() || err.is_timeout(),
            AuthError::UnexpectedStatus { code, .. } => (500..600).contains(code),
            _ => false,
        }
    }

    /// The body of an [`AuthError::UnexpectedStatus`] as text. Invalid UTF-8
    /// is replaced with U+FFFD, use the `body` field for the exact bytes.
    pub fn body_text(&self) -> Option<Cow<'_, str>> {
        match self {
            AuthError::UnexpectedStatus { body, .. } => Some(String::from_utf8_lossy(body)),
            _ => None,
        }
    }
}

/// Supplies the base URL the token exchange is sent to.
pub trait Endpoint {
    fn endpoint(&self) -> &str;
}

impl Endpoint for str {
    fn endpoint(&self) -> &str {
        self
    }
}

impl Endpoint for String {
    fn endpoint(&self) -> &str {
        self.as_str()
    }
}

/// Exchanges credentials for API tokens.
///
/// The client holds no per-call state, every method takes `&self` and it can
/// be cloned freely and shared between tasks. Each call to
/// [`Client::authenticate`] or [`Client::request_token`] sends exactly one
/// request.
#[derive(Debug, Clone)]
pub struct Client {
    url: String,
    client: reqwest::Client,
}

impl Client {
    /// Path of the token exchange, relative to the endpoint.
    pub const AUTH_PATH: &'static str = "auth";

    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Creates a new client for the given endpoint.
    ///
    /// # Arguments
    /// * `endpoint` - Base URL of the server, may contain a path prefix
    /// * `cert_path` - PEM root certificate for HTTPS endpoints, ignored when
    ///   empty or missing
    /// * `timeout` - Request timeout applied by the transport
    pub fn new<E>(endpoint: &E, cert_path: &str, timeout: Duration) -> Result<Self>
    where
        E: Endpoint + ?Sized,
    {
        let url = endpoint.endpoint().trim_end_matches('/');
        let parsed = match Url::parse(url) {
            Ok(url) => url,
            Err(_) => bail!("invalid server url '{url}'"),
        };
        match parsed.scheme() {
            "http" | "https" => {}
            _ => bail!(
                "invalid url scheme, expect 'http' or 'https', not '{}'",
                parsed.scheme()
            ),
        }
        if parsed.query().is_some() || parsed.fragment().is_some() {
            bail!("invalid server url '{url}', query and fragment are not allowed");
        }

        let mut builder = reqwest::Client::builder().timeout(timeout);
        if !cert_path.is_empty() && parsed.scheme() == "https" {
            match fs::read(cert_path) {
                Ok(data) => {
                    let cert = Certificate::from_pem(&data).context("load cert file")?;
                    builder = builder.add_root_certificate(cert);
                }
                Err(err) if err.kind() == io::ErrorKind::NotFound => {
                    debug!("Cert file '{cert_path}' not found, using system roots");
                }
                Err(err) => return Err(err).context("read cert file"),
            }
        }
        let client = builder.build().context("build http client")?;

        Ok(Self {
            url: url.to_string(),
            client,
        })
    }

    /// Exchange username and password for a token, letting the server pick
    /// the token lifetime.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
        usage: &str,
    ) -> Result<TokenResponse, AuthError> {
        let creds = Credentials::new(username, password);
        self.request_token(&creds, &TokenRequest::new(usage)).await
    }

    /// Exchange credentials for a token described by `req`.
    pub async fn request_token(
        &self,
        creds: &Credentials,
        req: &TokenRequest,
    ) -> Result<TokenResponse, AuthError> {
        let body = serde_json::to_vec(req).map_err(AuthError::Encode)?;

        let url = format!("{}/{}", self.url, Self::AUTH_PATH);
        debug!("Requesting token from '{url}', usage '{}'", req.usage);

        let resp = self
            .client
            .post(&url)
            .basic_auth(&creds.username, Some(&creds.password))
            .header(CONTENT_TYPE, MIME_JSON)
            .header(ACCEPT, MIME_JSON)
            .body(body)
            .send()
            .await?;

        // The response owns the connection, every return below drops it.
        let status = resp.status();
        debug!("Token server responded with {status}");
        match status {
            StatusCode::CREATED => {}
            StatusCode::FORBIDDEN => return Err(AuthError::InvalidCredentials),
            _ => {
                let body = resp.bytes().await?;
                return Err(AuthError::UnexpectedStatus {
                    code: status.as_u16(),
                    body,
                });
            }
        }

        let data = resp.bytes().await?;
        let token_resp: TokenResponse =
            serde_json::from_slice(&data).map_err(AuthError::MalformedResponse)?;

        if !token_resp.token.is_usable() {
            return Err(AuthError::ProtocolViolation);
        }

        Ok(token_resp)
    }
}

impl Endpoint for Client {
    fn endpoint(&self) -> &str {
        &self.url
    }
}
