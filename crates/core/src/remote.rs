use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Source tags the remote protocol prepends to failure messages.
pub const REMOTE_ERROR_PREFIXES: &[&str] = &["remote error: ", "GraphQL error: "];

/// Failure returned by a remote mutation or query.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct RemoteError {
    message: String,
}

impl RemoteError {
    /// Creates a remote error carrying the raw protocol message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the message exactly as the remote side reported it.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Returns the message with a leading protocol source tag removed.
    #[must_use]
    pub fn user_message(&self) -> &str {
        let message = self.message.trim_start();
        REMOTE_ERROR_PREFIXES
            .iter()
            .find_map(|prefix| message.strip_prefix(prefix))
            .unwrap_or(message)
            .trim()
    }
}

#[cfg(test)]
mod tests {
    use super::RemoteError;

    #[test]
    fn user_message_strips_remote_prefix() {
        let error = RemoteError::new("remote error: duplicate email");
        assert_eq!(error.user_message(), "duplicate email");
        assert_eq!(error.message(), "remote error: duplicate email");
    }

    #[test]
    fn user_message_strips_legacy_graphql_prefix() {
        let error = RemoteError::new("GraphQL error: client already exists");
        assert_eq!(error.user_message(), "client already exists");
    }

    #[test]
    fn user_message_keeps_untagged_messages() {
        let error = RemoteError::new("connection reset");
        assert_eq!(error.user_message(), "connection reset");
    }

    #[test]
    fn only_a_leading_prefix_is_stripped() {
        let error = RemoteError::new("upstream said remote error: nope");
        assert_eq!(error.user_message(), "upstream said remote error: nope");
    }
}
