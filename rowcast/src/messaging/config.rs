use serde::{Deserialize, Serialize};

/// Messaging configuration, threaded into every [`Messenger`](super::Messenger).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagingConfig {
    /// Check every built-in message against its code's scope and payload
    /// shape when it is emitted. A mismatch is a programmer error and panics.
    #[serde(default)]
    pub validate_messages: bool,
}

impl MessagingConfig {
    pub fn validating() -> Self {
        Self {
            validate_messages: true,
        }
    }
}
