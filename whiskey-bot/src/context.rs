use std::{
    backtrace::Backtrace,
    fmt,
    sync::{Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use jiff::Timestamp;
use log::{error, warn};
use whiskey::{
    api::{ChannelId, Message},
    collect::Collector,
    Error, Result,
};

use crate::bot::Bot;

/// The outcome of [`Context::prompt`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Accepted,
    Denied,
    TimedOut,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Render a prompt window like `10 seconds` or `0.5 seconds`.
fn format_window(window: Duration) -> String {
    if window == Duration::from_secs(1) {
        "1 second".to_string()
    } else {
        format!("{} seconds", window.as_secs_f64())
    }
}

/// Everything a command needs to react to a single message.
#[non_exhaustive]
pub struct Context<E = Error> {
    pub bot: Bot<E>,
    /// The message that is being handled.
    pub msg: Message,
    /// When handling of the message started.
    pub start_time: Timestamp,

    command: Mutex<Option<String>>,
    last_sent: Mutex<Option<Message>>,
}

impl<E> Context<E> {
    pub fn new(bot: Bot<E>, msg: Message) -> Self {
        Self {
            bot,
            msg,
            start_time: Timestamp::now(),
            command: Mutex::new(None),
            last_sent: Mutex::new(None),
        }
    }

    /// The channel the handled message came from.
    pub fn channel(&self) -> &ChannelId {
        &self.msg.channel
    }

    /// Name of the command currently handling the message, if known.
    pub fn command_name(&self) -> Option<String> {
        lock(&self.command).clone()
    }

    pub fn set_command_name(&self, name: impl ToString) {
        *lock(&self.command) = Some(name.to_string());
    }

    /// The message most recently sent or edited through this context.
    pub fn last_sent(&self) -> Option<Message> {
        lock(&self.last_sent).clone()
    }

    /// Send a message to the channel the handled message came from.
    pub async fn send(&self, content: impl ToString) -> Result<Message> {
        let sent = self
            .bot
            .client
            .send_message(&self.msg.channel, &content.to_string())
            .await?;
        *lock(&self.last_sent) = Some(sent.clone());
        Ok(sent)
    }

    /// Like [`Self::send`], but delete the message again after `delay`.
    ///
    /// The deletion happens in the background and failing to delete the
    /// message is only logged.
    pub async fn send_with_delete(
        &self,
        content: impl ToString,
        delay: Duration,
    ) -> Result<Message> {
        let sent = self.send(content).await?;

        let client = self.bot.client.clone();
        let msg = sent.clone();
        tokio::task::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(err) = client.delete_message(&msg).await {
                warn!("failed to delete message {} in {}: {err}", msg.id, msg.channel);
            }
        });

        Ok(sent)
    }

    /// Edit the last sent message.
    pub async fn edit(&self, content: impl ToString) -> Result<Message> {
        let last = self.last_sent().ok_or(Error::NoMessage)?;
        let edited = self
            .bot
            .client
            .edit_message(&last, &content.to_string())
            .await?;
        *lock(&self.last_sent) = Some(edited.clone());
        Ok(edited)
    }

    /// Delete the last sent message.
    pub async fn delete(&self) -> Result<()> {
        let last = self.last_sent().ok_or(Error::NoMessage)?;
        self.delete_message(&last).await
    }

    /// Delete any message.
    pub async fn delete_message(&self, msg: &Message) -> Result<()> {
        self.bot.client.delete_message(msg).await
    }

    /// Wait for [`BotConfig::cleanup_delay`](crate::BotConfig::cleanup_delay),
    /// then delete the last sent message if there is one.
    ///
    /// Failing to delete the message is only logged.
    pub async fn clean_up(&self) {
        if self.last_sent().is_none() {
            return;
        }

        tokio::time::sleep(self.bot.config.cleanup_delay).await;

        // Something else might have been sent in the meantime
        if let Some(last) = self.last_sent() {
            if let Err(err) = self.delete_message(&last).await {
                warn!("failed to clean up message {} in {}: {err}", last.id, last.channel);
            }
        }
    }

    /// Collect messages in the channel the handled message came from.
    ///
    /// See [`CollectionManager::new_collector`](whiskey::collect::CollectionManager::new_collector).
    pub fn collect(&self, duration: Duration, limit: usize) -> Result<Collector> {
        self.bot
            .collectors
            .new_collector(self.msg.channel.clone(), duration, limit)
    }

    /// Ask for confirmation with a yes/no prompt.
    ///
    /// The prompt message is deleted once the answer window is over. Replies
    /// are trimmed and compared case-insensitively, and the first reply that
    /// is exactly `y` or `n` decides the outcome. If there is none, the prompt
    /// times out.
    ///
    /// Fails with [`Error::UnboundedCollector`] before sending anything if the
    /// configured prompt window is zero.
    pub async fn prompt(&self, prompt: impl fmt::Display) -> Result<Confirmation> {
        let timeout = self.bot.config.prompt_timeout;

        // Listen before asking so no answer is missed
        let collector = if self.bot.config.prompt_author_only {
            let author = self.msg.author.clone();
            self.bot.collectors.new_collector_with_filter(
                self.msg.channel.clone(),
                timeout,
                0,
                move |m| m.author == author,
            )?
        } else {
            self.collect(timeout, 0)?
        };

        let sent = self
            .send(format!(
                "{prompt} This action will cancel in {}. [y/N]",
                format_window(timeout)
            ))
            .await?;

        let replies = collector.collect_all().await;
        let answer = replies
            .iter()
            .find_map(|m| match m.content.trim().to_lowercase().as_str() {
                "y" => Some(Confirmation::Accepted),
                "n" => Some(Confirmation::Denied),
                _ => None,
            })
            .unwrap_or(Confirmation::TimedOut);

        self.delete_message(&sent).await?;

        match answer {
            Confirmation::Accepted => {}
            Confirmation::Denied => {
                self.send("Cancelling purge.").await?;
            }
            Confirmation::TimedOut => {
                self.send("Timed out.").await?;
            }
        }

        Ok(answer)
    }

    /// Report an error to the user and, if configured, to the log channel.
    ///
    /// Reporting is best-effort. Failures to send the report are only logged.
    pub async fn send_error(&self, err: &(dyn fmt::Display + Sync)) {
        let name = self.command_name().unwrap_or_else(|| "N/A".to_string());
        let text = format!(
            ":rotating_light: An error occurred while handling the command `{name}`:\n```{err}```"
        );

        let reply = format!("{text}\nThe error has been reported");
        if let Err(send_err) = self.bot.client.send_message(&self.msg.channel, &reply).await {
            error!("failed to report error to {}: {send_err}", self.msg.channel);
        }

        let Some(log_channel) = &self.bot.config.log_channel else {
            return;
        };

        let trace = Backtrace::force_capture().to_string();
        error!("An error occurred while handling the command {name}:\n{err}\n{trace}");

        let report = format!("{text}\n\n**Stacktrace**\n```{trace}```");
        if let Err(send_err) = self.bot.client.send_message(log_channel, &report).await {
            error!("failed to report error to log channel {log_channel}: {send_err}");
        }
    }
}
