//! Prefix-initiated `!name` commands with aliases.

use async_trait::async_trait;
use whiskey::{api::Message, text};

use crate::context::Context;

use super::{Command, Info, Propagate};

/// Parse leading whitespace followed by a prefix-initiated command.
///
/// Returns the command name and the remaining text with one leading whitespace
/// removed. The remaining text may be the empty string.
pub fn parse_prefix_initiated<'a>(text: &'a str, prefix: &str) -> Option<(&'a str, &'a str)> {
    let text = text.trim_start();
    let text = text.strip_prefix(prefix)?;
    let (name, rest) = text.split_once(char::is_whitespace).unwrap_or((text, ""));
    if name.is_empty() {
        return None;
    }
    Some((name, rest))
}

/// A command triggered by `{prefix}{name}` or `{prefix}{alias}`.
///
/// Names are compared case-insensitively. The prefix defaults to
/// [`BotConfig::prefix`](crate::BotConfig::prefix). Running the inner command
/// records the name in the [`Context`] so errors can be attributed to it.
pub struct Named<C> {
    prefix: Option<String>,
    name: String,
    aliases: Vec<String>,
    inner: C,
}

impl<C> Named<C> {
    pub fn new<S: ToString>(name: S, inner: C) -> Self {
        Self {
            prefix: None,
            name: name.to_string(),
            aliases: vec![],
            inner,
        }
    }

    pub fn with_prefix<S: ToString>(mut self, prefix: S) -> Self {
        self.prefix = Some(prefix.to_string());
        self
    }

    pub fn with_alias<S: ToString>(mut self, alias: S) -> Self {
        self.aliases.push(alias.to_string());
        self
    }

    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        self.aliases
            .extend(aliases.into_iter().map(|a| a.to_string()));
        self
    }

    fn prefix<'a, E>(&'a self, ctx: &'a Context<E>) -> &'a str {
        self.prefix.as_deref().unwrap_or(&ctx.bot.config.prefix)
    }

    fn matches(&self, name: &str) -> bool {
        text::same(name, &self.name) || self.aliases.iter().any(|a| text::same(name, a))
    }
}

#[async_trait]
impl<E, C> Command<E> for Named<C>
where
    C: Command<E> + Sync,
{
    fn info(&self, ctx: &Context<E>) -> Info {
        let prefix = self.prefix(ctx);
        let mut info = self
            .inner
            .info(ctx)
            .with_prepended_trigger(format!("{prefix}{}", self.name));
        info.aliases
            .extend(self.aliases.iter().map(|a| format!("{prefix}{a}")));
        info
    }

    async fn execute(&self, arg: &str, msg: &Message, ctx: &Context<E>) -> Result<Propagate, E> {
        let Some((name, rest)) = parse_prefix_initiated(arg, self.prefix(ctx)) else {
            return Ok(Propagate::Yes);
        };

        if !self.matches(name) {
            return Ok(Propagate::Yes);
        }

        ctx.set_command_name(&self.name);
        self.inner.execute(rest, msg, ctx).await
    }
}
