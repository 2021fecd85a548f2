use std::time::Duration;

use whiskey::api::ChannelId;

#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct BotConfig {
    /// Prefix that [`Named`](crate::named::Named) commands use unless they
    /// override it.
    pub prefix: String,
    /// Channel that [`Context::send_error`](crate::Context::send_error) posts
    /// full error reports to.
    pub log_channel: Option<ChannelId>,
    /// How long [`Context::prompt`](crate::Context::prompt) waits for an
    /// answer.
    pub prompt_timeout: Duration,
    /// Whether only the author of the prompting message may answer a prompt.
    pub prompt_author_only: bool,
    /// How long [`Context::clean_up`](crate::Context::clean_up) waits before
    /// deleting the last sent message.
    pub cleanup_delay: Duration,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            prefix: "!".to_string(),
            log_channel: None,
            prompt_timeout: Duration::from_secs(10),
            prompt_author_only: false,
            cleanup_delay: Duration::from_secs(10),
        }
    }
}

impl BotConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefix(mut self, prefix: impl ToString) -> Self {
        self.prefix = prefix.to_string();
        self
    }

    pub fn with_log_channel(mut self, channel: impl Into<ChannelId>) -> Self {
        self.log_channel = Some(channel.into());
        self
    }

    pub fn with_prompt_timeout(mut self, timeout: Duration) -> Self {
        self.prompt_timeout = timeout;
        self
    }

    pub fn with_prompt_author_only(mut self, author_only: bool) -> Self {
        self.prompt_author_only = author_only;
        self
    }

    pub fn with_cleanup_delay(mut self, delay: Duration) -> Self {
        self.cleanup_delay = delay;
        self
    }
}
