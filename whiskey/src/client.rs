//! The outbound half of a chat platform connection.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    api::{ChannelId, Message},
    Result,
};

/// Everything the framework needs to talk back to the chat platform.
///
/// Implementations wrap whatever platform client the bot runs on. Incoming
/// messages do not go through this trait, the embedding application feeds
/// them to the bot directly.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Send a message to a channel and return the message as stored by the
    /// platform.
    async fn send_message(&self, channel: &ChannelId, content: &str) -> Result<Message>;

    /// Replace the content of a previously sent message.
    async fn edit_message(&self, msg: &Message, content: &str) -> Result<Message>;

    /// Delete a message.
    async fn delete_message(&self, msg: &Message) -> Result<()>;
}

#[async_trait]
impl<C> ChatClient for Arc<C>
where
    C: ChatClient + ?Sized,
{
    async fn send_message(&self, channel: &ChannelId, content: &str) -> Result<Message> {
        (**self).send_message(channel, content).await
    }

    async fn edit_message(&self, msg: &Message, content: &str) -> Result<Message> {
        (**self).edit_message(msg, content).await
    }

    async fn delete_message(&self, msg: &Message) -> Result<()> {
        (**self).delete_message(msg).await
    }
}
