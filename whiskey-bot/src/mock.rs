//! An in-memory chat client for tests.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use whiskey::{
    api::{ChannelId, Message, MessageId},
    client::ChatClient,
    Error, Result,
};

#[derive(Default)]
struct State {
    next_id: usize,
    sent: Vec<Message>,
    edited: Vec<Message>,
    deleted: Vec<MessageId>,
    fail_sends: bool,
    fail_deletes: bool,
}

/// Records everything sent through it.
#[derive(Default)]
pub struct MockClient(Mutex<State>);

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn fail_sends(&self, fail: bool) {
        self.state().fail_sends = fail;
    }

    pub fn fail_deletes(&self, fail: bool) {
        self.state().fail_deletes = fail;
    }

    pub fn sent(&self) -> Vec<Message> {
        self.state().sent.clone()
    }

    pub fn sent_contents(&self) -> Vec<String> {
        self.state().sent.iter().map(|m| m.content.clone()).collect()
    }

    pub fn edited_contents(&self) -> Vec<String> {
        self.state().edited.iter().map(|m| m.content.clone()).collect()
    }

    pub fn deleted(&self) -> Vec<MessageId> {
        self.state().deleted.clone()
    }
}

#[async_trait]
impl ChatClient for MockClient {
    async fn send_message(&self, channel: &ChannelId, content: &str) -> Result<Message> {
        let mut state = self.state();
        if state.fail_sends {
            return Err(Error::client("send failed"));
        }

        state.next_id += 1;
        let msg = Message::new(channel.clone(), format!("m{}", state.next_id), "bot", content);
        state.sent.push(msg.clone());
        Ok(msg)
    }

    async fn edit_message(&self, msg: &Message, content: &str) -> Result<Message> {
        let mut state = self.state();
        if state.fail_sends {
            return Err(Error::client("edit failed"));
        }

        let mut edited = msg.clone();
        edited.content = content.to_string();
        state.edited.push(edited.clone());
        Ok(edited)
    }

    async fn delete_message(&self, msg: &Message) -> Result<()> {
        let mut state = self.state();
        if state.fail_deletes {
            return Err(Error::client("delete failed"));
        }

        state.deleted.push(msg.id.clone());
        Ok(())
    }
}
