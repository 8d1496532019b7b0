use std::fmt;
use thiserror::Error;

pub type SyncResult<T> = Result<T, SyncError>;

/// Which side of a Goal<->Todo link a write targeted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Goal,
    Todo,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Goal => write!(f, "goal"),
            Side::Todo => write!(f, "todo"),
        }
    }
}

/// Errors surfaced by the accessor and the reconciliation core.
///
/// Transient conditions (rate limiting, connection drops) are retried inside
/// the HTTP accessor; by the time one of these reaches a caller it is
/// terminal for that operation.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("rejected by remote schema: {0}")]
    Validation(String),

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("rate limited: retry after {retry_after_seconds}s")]
    RateLimited { retry_after_seconds: u64 },

    #[error("connection error: {0}")]
    Connection(String),

    #[error("remote API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// One side of a bidirectional link was written and the other was not.
    /// This must reach the operator report; it is never success.
    #[error("link {goal_id} <-> {todo_id} partially applied: {side} side not written: {source}")]
    PartialLink {
        goal_id: String,
        todo_id: String,
        side: Side,
        #[source]
        source: Box<SyncError>,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("malformed document: {0}")]
    Malformed(String),
}

impl SyncError {
    /// True when the referenced document simply does not exist remotely.
    pub fn is_not_found(&self) -> bool {
        matches!(self, SyncError::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_link_names_the_failed_side() {
        let err = SyncError::PartialLink {
            goal_id: "g-1".to_string(),
            todo_id: "t-1".to_string(),
            side: Side::Goal,
            source: Box::new(SyncError::Connection("reset by peer".to_string())),
        };
        let message = err.to_string();
        assert!(message.contains("g-1"));
        assert!(message.contains("t-1"));
        assert!(message.contains("goal side not written"));
    }

    #[test]
    fn not_found_predicate() {
        assert!(SyncError::NotFound("x".to_string()).is_not_found());
        assert!(!SyncError::Auth("x".to_string()).is_not_found());
    }
}
