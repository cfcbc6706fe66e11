//! Application-state core for the DOCO document viewer.
//!
//! [`AppCoordinator`] gates everything behind the auth session, owns the
//! document registry and view state while a user is signed in, and publishes
//! a consistent [`Snapshot`] after every accepted intent.

pub mod auth;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod intent;
pub mod registry;
pub mod snapshot;
pub mod source;
pub mod view;

pub use auth::{AuthProvider, AuthSession, CheckToken, StaticAuthProvider};
pub use config::{CoreConfig, DEFAULT_RECENT_LIMIT, UiDefaults};
pub use coordinator::AppCoordinator;
pub use error::{ConfigError, SourceError, StateError};
pub use intent::Intent;
pub use registry::{DocumentRegistry, RemovedDocument};
pub use snapshot::{Content, Screen, Snapshot};
pub use source::{DocumentSource, StaticDocumentSource};
pub use view::{UiState, ViewState};
