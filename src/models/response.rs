//! Response envelope returned to callers of the login service.

use serde::{Deserialize, Serialize};

use crate::error::VerifyError;

/// Accept/reject decision in the `{ isSuccess, data, message }` shape.
///
/// On success `data` holds the trusted identity; on failure `message` holds
/// one of the codes from [`crate::error::codes`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResponse<T> {
    pub is_success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> CommandResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            is_success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn failure(error: &VerifyError) -> Self {
        Self {
            is_success: false,
            data: None,
            message: Some(error.code().to_string()),
        }
    }
}

impl<T> From<Result<T, VerifyError>> for CommandResponse<T> {
    fn from(result: Result<T, VerifyError>) -> Self {
        match result {
            Ok(data) => Self::success(data),
            Err(error) => Self::failure(&error),
        }
    }
}
