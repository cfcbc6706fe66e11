//! CLI library components for the DOCO state core.

pub mod logging;
pub mod replay;
pub mod report;
pub mod script;
