//! Command handlers.
//!
//! Each handler receives the vault and password for this invocation
//! explicitly; there is no shared process-wide state.

pub mod get;
pub mod pass;
pub mod set;
