use async_trait::async_trait;
use whiskey::api::Message;

use crate::{
    command::{Command, Info, Propagate},
    context::Context,
};

pub struct Ping(pub String);

impl Ping {
    pub fn new<S: ToString>(reply: S) -> Self {
        Self(reply.to_string())
    }
}

impl Default for Ping {
    fn default() -> Self {
        Self::new("Pong!")
    }
}

#[async_trait]
impl<E> Command<E> for Ping
where
    E: From<whiskey::Error>,
{
    fn info(&self, _ctx: &Context<E>) -> Info {
        Info::new().with_description("trigger a short reply")
    }

    async fn execute(&self, arg: &str, _msg: &Message, ctx: &Context<E>) -> Result<Propagate, E> {
        if arg.trim().is_empty() {
            ctx.send(&self.0).await?;
            Ok(Propagate::No)
        } else {
            Ok(Propagate::Yes)
        }
    }
}
