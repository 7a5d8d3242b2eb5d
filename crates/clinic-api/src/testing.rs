//! Canned transport for unit tests

use async_trait::async_trait;
use parking_lot::Mutex;

use clinic_http::{ApiTransport, HttpError, Request, StatusCode};

/// Transport stub recording every request and answering with a canned body
pub struct StubTransport {
    reply: Option<serde_json::Value>,
    seen: Mutex<Vec<Request>>,
}

impl StubTransport {
    /// Stub answering every request with a clone of `value`
    pub fn replying(value: serde_json::Value) -> Self {
        Self {
            reply: Some(value),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Stub failing every request with a server error
    pub fn failing() -> Self {
        Self {
            reply: None,
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Requests dispatched so far
    pub fn requests(&self) -> Vec<Request> {
        self.seen.lock().clone()
    }
}

#[async_trait]
impl ApiTransport for StubTransport {
    async fn dispatch(&self, request: Request) -> clinic_http::Result<serde_json::Value> {
        self.seen.lock().push(request);
        match &self.reply {
            Some(value) => Ok(value.clone()),
            None => Err(HttpError::Server {
                status: StatusCode::BAD_GATEWAY,
                message: clinic_http::GENERIC_ERROR.to_string(),
            }),
        }
    }
}
