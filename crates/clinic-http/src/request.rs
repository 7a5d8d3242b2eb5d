//! Outbound request descriptor
//!
//! A [`Request`] is a plain value: target path, method, body and extra
//! headers, constructed fresh per call and never persisted. Bodies are kept
//! as owned data so the descriptor can be dispatched more than once — the
//! refresh protocol needs to rebuild the wire body for its single replay.

use reqwest::multipart;
use reqwest::Method;
use serde::Serialize;

use crate::error::{HttpError, Result};

/// Request payload
#[derive(Debug, Clone, Default)]
pub enum Body {
    #[default]
    Empty,
    /// Serialized as JSON with `Content-Type: application/json`
    Json(serde_json::Value),
    /// Sent as `multipart/form-data`; never receives a JSON content type
    Multipart(Vec<Part>),
}

impl Body {
    pub fn is_multipart(&self) -> bool {
        matches!(self, Body::Multipart(_))
    }
}

/// One field of a multipart body
#[derive(Debug, Clone)]
pub struct Part {
    pub name: String,
    pub kind: PartKind,
}

#[derive(Debug, Clone)]
pub enum PartKind {
    Text(String),
    Bytes {
        data: Vec<u8>,
        file_name: String,
        mime: String,
    },
}

/// A logical outbound call
#[derive(Debug, Clone)]
pub struct Request {
    /// Path resolved against the configured base URL, query string included
    pub path: String,
    pub method: Method,
    pub body: Body,
    pub headers: Vec<(String, String)>,
}

impl Request {
    /// Create a request; the method defaults to GET
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method: Method::GET,
            body: Body::Empty,
            headers: Vec::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(path).method(Method::POST)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(path).method(Method::PUT)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(path).method(Method::DELETE)
    }

    /// Override the HTTP method
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Attach a JSON body
    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self> {
        let value = serde_json::to_value(body).map_err(|e| HttpError::Decode(e.to_string()))?;
        self.body = Body::Json(value);
        Ok(self)
    }

    /// Add a text field to a multipart body
    pub fn text_part(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.push_part(Part {
            name: name.into(),
            kind: PartKind::Text(value.into()),
        });
        self
    }

    /// Add a file field to a multipart body
    pub fn file_part(
        mut self,
        name: impl Into<String>,
        data: Vec<u8>,
        file_name: impl Into<String>,
        mime: impl Into<String>,
    ) -> Self {
        self.push_part(Part {
            name: name.into(),
            kind: PartKind::Bytes {
                data,
                file_name: file_name.into(),
                mime: mime.into(),
            },
        });
        self
    }

    /// Add an extra header
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    fn push_part(&mut self, part: Part) {
        match &mut self.body {
            Body::Multipart(parts) => parts.push(part),
            _ => self.body = Body::Multipart(vec![part]),
        }
    }
}

/// Build the wire form for a multipart body
///
/// Called once per attempt; a `reqwest` form is consumed on send, so the
/// replay gets a freshly built one.
pub(crate) fn build_form(parts: &[Part]) -> Result<multipart::Form> {
    let mut form = multipart::Form::new();
    for part in parts {
        form = match &part.kind {
            PartKind::Text(value) => form.text(part.name.clone(), value.clone()),
            PartKind::Bytes {
                data,
                file_name,
                mime,
            } => {
                let field = multipart::Part::bytes(data.clone())
                    .file_name(file_name.clone())
                    .mime_str(mime)
                    .map_err(|e| HttpError::Build(format!("invalid mime type {mime}: {e}")))?;
                form.part(part.name.clone(), field)
            }
        };
    }
    Ok(form)
}
