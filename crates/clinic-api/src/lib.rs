//! Typed endpoint layer for the clinic administration backend
//!
//! Thin, typed wrappers over the gateway's REST surface: authentication,
//! patient records, administrative documents, and room management. Every
//! group talks through the [`ApiTransport`](clinic_http::ApiTransport)
//! seam, so the session-refresh protocol applies uniformly and unit tests
//! can substitute a canned transport.

pub mod auth;
pub mod documents;
pub mod error;
pub mod models;
pub mod patients;
pub mod query;
pub mod rooms;

#[cfg(test)]
mod testing;

pub use auth::AuthApi;
pub use documents::DocumentsApi;
pub use error::{ApiError, Result};
pub use models::{
    Admission, ApiMessage, Credentials, DocumentKind, DocumentRecord, LoginOutcome, Paginated,
    PatientPayload, PatientRecord, PatientSummary, Room, Service, UserInfo,
};
pub use patients::PatientsApi;
pub use query::{PageQuery, SearchQuery, SortOrder};
pub use rooms::RoomsApi;
