//! The session-aware HTTP client

use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, error, warn};
use url::Url;

use clinic_session::{Session, TokenPair};

use crate::{
    config::HttpConfig,
    error::{normalize_message, HttpError, Result},
    loading::LoadingGauge,
    request::{build_form, Body, Request},
};

/// Object-safe transport seam
///
/// Endpoint layers depend on this trait instead of the concrete client, so
/// unit tests can substitute a canned transport.
#[async_trait]
pub trait ApiTransport: Send + Sync {
    /// Dispatch a request and return the parsed response body
    async fn dispatch(&self, request: Request) -> Result<serde_json::Value>;
}

/// HTTP client wrapping the clinic backend
///
/// Performs calls on behalf of the application, transparently recovering
/// from an expired access credential exactly once per logical call, and
/// normalizing all failures into one reportable error value plus a loading
/// flag.
pub struct SessionHttpClient {
    inner: reqwest::Client,
    config: HttpConfig,
    session: Session,
    loading: LoadingGauge,
    last_error: RwLock<Option<String>>,
    // serializes refresh exchanges; see refresh_session
    refresh_gate: tokio::sync::Mutex<()>,
}

impl SessionHttpClient {
    /// Create a client with its own connection pool
    pub fn new(config: HttpConfig, session: Session) -> Result<Self> {
        let inner = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| HttpError::Build(e.to_string()))?;

        Ok(Self::with_client(inner, config, session))
    }

    /// Create a client reusing an existing `reqwest` client
    pub fn with_client(inner: reqwest::Client, config: HttpConfig, session: Session) -> Self {
        Self {
            inner,
            config,
            session,
            loading: LoadingGauge::new(),
            last_error: RwLock::new(None),
            refresh_gate: tokio::sync::Mutex::new(()),
        }
    }

    /// Get configuration
    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    /// The session this client authenticates with
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// True while any call issued through this client is outstanding
    pub fn is_loading(&self) -> bool {
        self.loading.is_loading()
    }

    /// Number of calls currently outstanding
    pub fn active_requests(&self) -> usize {
        self.loading.active()
    }

    /// Message of the most recent failure, cleared when a new call starts
    pub fn last_error(&self) -> Option<String> {
        self.last_error.read().clone()
    }

    /// Send a request and deserialize the response body
    pub async fn send<T: DeserializeOwned>(&self, request: Request) -> Result<T> {
        let value = self.send_value(request).await?;
        serde_json::from_value(value).map_err(|e| {
            let err = HttpError::Decode(e.to_string());
            *self.last_error.write() = Some(err.message());
            err
        })
    }

    /// Send a request and return the parsed but untyped response body
    ///
    /// An empty 2xx body parses to JSON `null`.
    pub async fn send_value(&self, request: Request) -> Result<serde_json::Value> {
        let _guard = self.loading.start();
        *self.last_error.write() = None;

        match self.run(&request).await {
            Ok(value) => Ok(value),
            Err(err) => {
                error!(path = %request.path, "request failed: {err}");
                // the failure is observable and re-raised; never swallowed
                *self.last_error.write() = Some(err.message());
                Err(err)
            }
        }
    }

    /// One logical call: original attempt, then at most one
    /// refresh-and-replay cycle.
    async fn run(&self, request: &Request) -> Result<serde_json::Value> {
        let observed = self.session.generation();

        let response = self.execute(request).await?;
        let status = response.status();
        if status.is_success() {
            return Self::parse_success(response).await;
        }
        if !is_auth_failure(status) {
            return Err(Self::failure(response).await);
        }

        // an auth failure on the refresh exchange itself is terminal
        if request.path == self.config.refresh_path {
            let failure = Self::failure(response).await;
            warn!("refresh exchange rejected, dropping session");
            self.session.logout();
            return Err(failure);
        }

        let original = Self::failure(response).await;
        debug!(path = %request.path, "authentication failure, refreshing session");
        if let Err(refresh_err) = self.refresh_session(observed).await {
            warn!("session refresh failed: {refresh_err}");
            self.session.logout();
            // the caller sees the failure that started the cycle
            return Err(original);
        }

        debug!(path = %request.path, "replaying request with refreshed credentials");
        let replay = self.execute(request).await?;
        let status = replay.status();
        if status.is_success() {
            return Self::parse_success(replay).await;
        }
        // one refresh per logical call; whatever the replay got is final
        Err(Self::failure(replay).await)
    }

    /// Issue one attempt over the wire
    ///
    /// The bearer header is read from the session here, at send time, so a
    /// replay picks up credentials refreshed since the original attempt —
    /// including by a concurrent call.
    async fn execute(&self, request: &Request) -> Result<Response> {
        let url = self.endpoint(&request.path)?;
        let mut builder = self.inner.request(request.method.clone(), url);

        let access = self.session.access_token();
        if !access.is_empty() {
            builder = builder.bearer_auth(access);
        }

        builder = match &request.body {
            Body::Empty => builder,
            Body::Json(value) => builder.json(value),
            Body::Multipart(parts) => builder.multipart(build_form(parts)?),
        };

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        Ok(builder.send().await?)
    }

    /// Exchange the refresh credential for a new token pair
    ///
    /// Coalesces concurrent attempts: the exchange runs under an async
    /// mutex, and a waiter that acquires the gate after the session
    /// generation moved past the one it observed at failure time skips the
    /// duplicate exchange and replays with the fresh credential.
    async fn refresh_session(&self, observed: u64) -> Result<()> {
        let _gate = self.refresh_gate.lock().await;
        if self.session.generation() != observed {
            debug!("session already refreshed by a concurrent call");
            return Ok(());
        }

        let url = self.endpoint(&self.config.refresh_path)?;
        debug!("refreshing session credentials");
        let response = self
            .inner
            .get(url)
            .bearer_auth(self.session.refresh_token())
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(Self::failure(response).await);
        }

        let tokens: TokenPair = response
            .json()
            .await
            .map_err(|e| HttpError::Decode(e.to_string()))?;
        self.session.set_tokens(tokens);
        Ok(())
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        let raw = format!("{}{}", self.config.base_url, path);
        raw.parse::<Url>()
            .map_err(|e| HttpError::InvalidUrl(format!("{raw}: {e}")))
    }

    async fn parse_success(response: Response) -> Result<serde_json::Value> {
        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| HttpError::Decode(e.to_string()))
    }

    async fn failure(response: Response) -> HttpError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = normalize_message(&body);
        if is_auth_failure(status) {
            HttpError::Auth { status, message }
        } else if status.is_server_error() {
            HttpError::Server { status, message }
        } else {
            HttpError::Status { status, message }
        }
    }
}

#[async_trait]
impl ApiTransport for SessionHttpClient {
    async fn dispatch(&self, request: Request) -> Result<serde_json::Value> {
        self.send_value(request).await
    }
}

fn is_auth_failure(status: StatusCode) -> bool {
    status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN
}
