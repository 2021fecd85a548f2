use async_trait::async_trait;
use whiskey::api::Message;

use crate::{
    command::{Command, Info, Propagate},
    context::Context,
};

/// List every command that has a trigger.
#[derive(Default)]
pub struct Help {
    pub before: String,
    pub after: String,
}

impl Help {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_before(mut self, before: impl ToString) -> Self {
        self.before = before.to_string();
        self
    }

    pub fn with_after(mut self, after: impl ToString) -> Self {
        self.after = after.to_string();
        self
    }

    fn formulate_reply<E>(&self, ctx: &Context<E>) -> String {
        let mut result = String::new();

        if !self.before.is_empty() {
            result.push_str(&self.before);
            result.push('\n');
        }

        for info in ctx.bot.commands.infos(ctx) {
            let Some(trigger) = &info.trigger else {
                continue;
            };

            result.push_str(trigger);
            if !info.aliases.is_empty() {
                result.push_str(" (");
                result.push_str(&info.aliases.join(", "));
                result.push(')');
            }
            if let Some(description) = &info.description {
                result.push_str(" - ");
                result.push_str(description);
            }
            result.push('\n');
        }

        if !self.after.is_empty() {
            result.push_str(&self.after);
            result.push('\n');
        }

        result
    }
}

#[async_trait]
impl<E> Command<E> for Help
where
    E: From<whiskey::Error>,
{
    fn info(&self, _ctx: &Context<E>) -> Info {
        Info::new().with_description("show this help")
    }

    async fn execute(&self, arg: &str, _msg: &Message, ctx: &Context<E>) -> Result<Propagate, E> {
        if arg.trim().is_empty() {
            let reply = self.formulate_reply(ctx);
            ctx.send(reply).await?;
            Ok(Propagate::No)
        } else {
            Ok(Propagate::Yes)
        }
    }
}
