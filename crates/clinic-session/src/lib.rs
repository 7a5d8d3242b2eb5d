//! Session state for the clinic client
//!
//! Holds the access/refresh credential pair and the user's role, and keeps
//! them in sync with an optional persistence backend.
//!
//! ## Features
//!
//! - **Explicit dependency**: a [`Session`] is a clonable handle passed into
//!   whatever needs it; there is no global session
//! - **Generation counter**: every credential change bumps a monotonic
//!   generation, so concurrent readers can detect a refresh they missed
//! - **Events**: logout and token refresh are surfaced through an observer
//!   callback instead of hard-wired navigation
//! - **Persistence**: credentials and the color-scheme preference round-trip
//!   through a pluggable [`CredentialStore`]

pub mod error;
pub mod preferences;
pub mod session;
pub mod store;

pub use error::{Result, SessionError};
pub use preferences::ColorScheme;
pub use session::{Session, SessionEvent, SessionState, TokenPair};
pub use store::{CredentialStore, JsonFileStore, MemoryStore, PersistedSession};
