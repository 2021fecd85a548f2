use std::{fmt, sync::Arc};

use jiff::Timestamp;
use log::error;
use tokio::task::JoinHandle;
use whiskey::{api::Message, client::ChatClient, collect::CollectionManager};

use crate::{command::Commands, config::BotConfig, context::Context};

#[non_exhaustive]
pub struct Bot<E = whiskey::Error> {
    pub config: Arc<BotConfig>,
    pub client: Arc<dyn ChatClient>,
    pub commands: Arc<Commands<E>>,
    pub collectors: CollectionManager,
    pub start_time: Timestamp,
}

impl<E> Bot<E> {
    pub fn new(
        config: BotConfig,
        client: impl ChatClient + 'static,
        commands: Commands<E>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            client: Arc::new(client),
            commands: Arc::new(commands),
            collectors: CollectionManager::new(),
            start_time: Timestamp::now(),
        }
    }
}

impl<E> Bot<E>
where
    E: fmt::Display + Send + Sync + 'static,
{
    /// Handle a message that arrived on the chat platform.
    ///
    /// The message is offered to the active collectors right away, so messages
    /// of a channel reach its collectors in the order this function is called.
    /// Commands are run on a separate task. If a command fails, the error is
    /// reported via [`Context::send_error`].
    pub fn handle_message(&self, msg: Message) -> JoinHandle<()> {
        self.collectors.dispatch(&msg);

        let ctx = Context::new(self.clone(), msg);
        tokio::task::spawn(async move {
            let msg = ctx.msg.clone();
            if let Err(err) = ctx.bot.commands.on_message(&msg, &ctx).await {
                error!("while handling message {} in {}: {err}", msg.id, msg.channel);
                ctx.send_error(&err).await;
            }
        })
    }
}

impl<E> Clone for Bot<E> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            client: self.client.clone(),
            commands: self.commands.clone(),
            collectors: self.collectors.clone(),
            start_time: self.start_time,
        }
    }
}

impl<E> fmt::Debug for Bot<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bot")
            .field("config", &self.config)
            .field("collectors", &self.collectors)
            .field("start_time", &self.start_time)
            .finish_non_exhaustive()
    }
}
