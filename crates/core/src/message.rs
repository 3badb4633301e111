//! Message domain types.
//!
//! A chat request is rendered into an ordered sequence of `Message`s before
//! dispatch: zero or more `System` messages (the fixed instruction, then an
//! optional retrieved-context block) followed by exactly one terminal `User`
//! message carrying the question. Providers translate this sequence into
//! their own wire shape.

use serde::{Deserialize, Serialize};

/// The role of a message in the provider-agnostic request payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructions and retrieved context.
    System,
    /// The user's question.
    User,
}

/// A single message in the request payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Who this message speaks as.
    pub role: Role,

    /// The text content.
    pub content: String,
}

impl Message {
    /// Create a new system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Create a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_user_message() {
        let msg = Message::user("What is in the report?");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.content, "What is in the report?");
    }

    #[test]
    fn create_system_message() {
        let msg = Message::system("You are a helpful AI assistant.");
        assert_eq!(msg.role, Role::System);
    }

    #[test]
    fn message_serialization_roundtrip() {
        let msg = Message::user("Test message");
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"user\""));
        let back: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(back, msg);
    }
}
