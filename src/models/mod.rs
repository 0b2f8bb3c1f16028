//! Data models for login verification.
//!
//! This module contains the untrusted identity data callers present, the
//! decoded payload format, the response envelope, and audit types.

pub mod audit;
pub mod claim;
pub mod payload;
pub mod response;

pub use audit::*;
pub use claim::*;
pub use payload::*;
pub use response::*;
