use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Remote store returned {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Serialization error")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid recurrence: {0}")]
    InvalidRecurrence(String),

    #[error("Event not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Ambiguous short ID. Did you mean one of these?")]
    AmbiguousId(Vec<(String, String)>), // Vec of (ID, Title)
}

impl CoreError {
    /// Whether this error came from talking to the remote store.
    ///
    /// Transport errors are turned into notices by the sync coordinator;
    /// everything else is a caller bug and is returned as-is.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            CoreError::Http(_)
                | CoreError::Status { .. }
                | CoreError::Transport(_)
                | CoreError::Serialization(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_classification() {
        assert!(CoreError::Transport("connection reset".to_string()).is_transport());
        assert!(CoreError::Status { status: 404, url: "/api/events/1".to_string() }.is_transport());
        assert!(!CoreError::InvalidRecurrence("interval must be positive".to_string()).is_transport());
        assert!(!CoreError::NotFound("abc".to_string()).is_transport());
    }
}
