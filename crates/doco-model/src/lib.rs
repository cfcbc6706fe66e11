//! Data types shared by the DOCO application-state core.

pub mod document;
pub mod error;
pub mod ids;
pub mod ui;
pub mod user;

pub use document::Document;
pub use error::{AuthFailure, ModelError};
pub use ids::{DocumentId, UserId};
pub use ui::UiFlag;
pub use user::{AuthStatus, User};
