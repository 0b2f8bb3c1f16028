//! Utility functions and helper modules.
//!
//! Hashing primitives, canonicalization, bot token handling and request URL
//! parsing used by the verifiers.

pub mod canonical;
pub mod credential;
pub mod hmac;
pub mod query;

pub use canonical::data_check_string;
pub use credential::BotToken;
