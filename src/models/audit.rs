//! Audit logging data structures and types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Kinds of login verification recorded in the audit log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoginEventType {
    WidgetLogin,
    PayloadLogin,
}

/// Outcomes of login verification events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoginEventOutcome {
    Success,
    Failure,
}

/// Structured audit log entry for one verification attempt.
///
/// Holds only verified identity fields and the failure code and description;
/// credentials and hashes are never part of it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginAuditEvent {
    pub event_type: LoginEventType,
    pub outcome: LoginEventOutcome,
    pub timestamp: DateTime<Utc>,
    pub user_id: Option<i64>,
    pub username: Option<String>,
    pub failure_code: Option<String>,
    pub detail: Option<String>,
}

impl LoginAuditEvent {
    /// Create a new audit event with basic information
    pub fn new(event_type: LoginEventType, outcome: LoginEventOutcome) -> Self {
        Self {
            event_type,
            outcome,
            timestamp: Utc::now(),
            user_id: None,
            username: None,
            failure_code: None,
            detail: None,
        }
    }

    pub fn with_user_id(mut self, user_id: Option<i64>) -> Self {
        self.user_id = user_id;
        self
    }

    pub fn with_username(mut self, username: Option<String>) -> Self {
        self.username = username;
        self
    }

    pub fn with_failure_code(mut self, code: Option<&str>) -> Self {
        self.failure_code = code.map(str::to_string);
        self
    }

    /// Add a human-readable failure description
    pub fn with_detail(mut self, detail: Option<String>) -> Self {
        self.detail = detail;
        self
    }

    /// Log the audit event using structured logging
    pub fn log(&self) {
        match self.outcome {
            LoginEventOutcome::Success => info!(
                target: "login_audit",
                event_type = ?self.event_type,
                outcome = ?self.outcome,
                timestamp = %self.timestamp,
                user_id = ?self.user_id,
                username = ?self.username,
                "Login verification audit event"
            ),
            LoginEventOutcome::Failure => warn!(
                target: "login_audit",
                event_type = ?self.event_type,
                outcome = ?self.outcome,
                timestamp = %self.timestamp,
                user_id = ?self.user_id,
                username = ?self.username,
                failure_code = ?self.failure_code,
                detail = ?self.detail,
                "Login verification audit event"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_and_serialization() {
        let event = LoginAuditEvent::new(LoginEventType::WidgetLogin, LoginEventOutcome::Failure)
            .with_user_id(Some(42))
            .with_username(Some("reacty".to_string()))
            .with_failure_code(Some("INVALID_HASH"));

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event_type"], "widget_login");
        assert_eq!(json["outcome"], "failure");
        assert_eq!(json["user_id"], 42);
        assert_eq!(json["failure_code"], "INVALID_HASH");

        // Logging without a subscriber is a no-op
        event.log();
    }
}
