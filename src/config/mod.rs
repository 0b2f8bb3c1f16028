//! Configuration structures and loading utilities.
//!
//! Login verification is configured once, from environment variables or any
//! serde source, and is immutable afterwards.

pub mod login;

pub use login::*;
