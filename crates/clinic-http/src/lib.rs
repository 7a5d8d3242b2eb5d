//! Session-aware HTTP client for the clinic backend
//!
//! Wraps outbound calls with credential attachment, unified error
//! normalization, and a one-shot transparent refresh-and-replay cycle when
//! the access credential has expired.
//!
//! ## Features
//!
//! - **Injected session**: the [`Session`](clinic_session::Session) is an
//!   explicit dependency, so tests run independent sessions side by side
//! - **Per-call credentials**: the bearer header is read from the session at
//!   send time, for the original request and for the replay
//! - **At-most-one retry**: a 401/403 triggers a single refresh exchange and
//!   a single replay; concurrent failures share one in-flight refresh
//! - **Replayable bodies**: JSON and multipart bodies are kept as data and
//!   rebuilt per attempt
//! - **Observables**: a shared loading gauge and a last-error slot, reset on
//!   every exit path
//! - **Testing support**: mockable via [`ApiTransport`], exercised with
//!   `wiremock`

pub mod client;
pub mod config;
pub mod error;
pub mod loading;
pub mod request;

pub use client::{ApiTransport, SessionHttpClient};
pub use config::HttpConfig;
pub use error::{normalize_message, HttpError, Result, GENERIC_ERROR};
pub use loading::{LoadingGauge, LoadingGuard};
pub use request::{Body, Part, PartKind, Request};

/// Re-export commonly used types
pub use reqwest::{Method, StatusCode};
