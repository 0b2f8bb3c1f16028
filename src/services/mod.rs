//! Verification strategies and the service layer around them.
//!
//! Each login protocol is a [`LoginVerifier`] strategy; [`LoginService`] adds
//! audit logging and metrics on top of whichever one is configured.

pub mod login;
pub mod metrics;
pub mod payload;
pub mod verifier;
pub mod widget;

pub use login::*;
pub use metrics::*;
pub use payload::PayloadVerifier;
pub use verifier::*;
pub use widget::*;
