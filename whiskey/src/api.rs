//! Models the messages a chat platform delivers to a bot.
//!
//! Identifiers are opaque strings. The platform decides what they look like,
//! the framework only compares and prints them.

use std::fmt;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

macro_rules! id_type {
    ( $(#[$meta:meta])* $name:ident ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl ToString) -> Self {
                Self(id.to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

id_type!(
    /// Identifies a channel (or room, or chat) messages are sent in.
    ChannelId
);

id_type!(
    /// Identifies a single message within its channel.
    MessageId
);

id_type!(
    /// Identifies the author of a message.
    UserId
);

/// A message as delivered by the chat platform.
///
/// The same type is used for incoming messages and for the handles returned
/// when the bot sends or edits something, so a sent message can later be
/// edited or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// The channel the message was sent in.
    pub channel: ChannelId,
    /// The platform's id of the message.
    pub id: MessageId,
    /// Who sent the message.
    pub author: UserId,
    /// The raw text of the message.
    pub content: String,
    /// When the platform received the message.
    pub time: Timestamp,
}

impl Message {
    pub fn new(
        channel: impl Into<ChannelId>,
        id: impl Into<MessageId>,
        author: impl Into<UserId>,
        content: impl ToString,
    ) -> Self {
        Self {
            channel: channel.into(),
            id: id.into(),
            author: author.into(),
            content: content.to_string(),
            time: Timestamp::now(),
        }
    }
}
