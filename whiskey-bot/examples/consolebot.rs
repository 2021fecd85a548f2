//! A bot that talks to you on the terminal.
//!
//! Every line you type is a message in the channel `console`. Try `!help`,
//! `!purge` or `!collect`.

use std::{
    sync::atomic::{AtomicUsize, Ordering},
    time::Duration,
};

use async_trait::async_trait;
use tokio::io::{self, AsyncBufReadExt, BufReader};
use whiskey::{
    api::{ChannelId, Message},
    client::ChatClient,
};
use whiskey_bot::{
    basic::Described,
    builtin::{Help, HttpCat, Ping, Uptime},
    named::Named,
    Bot, BotConfig, Command, Commands, Confirmation, Context, Propagate,
};

#[derive(Default)]
struct ConsoleClient {
    last_id: AtomicUsize,
}

#[async_trait]
impl ChatClient for ConsoleClient {
    async fn send_message(&self, channel: &ChannelId, content: &str) -> whiskey::Result<Message> {
        let id = self.last_id.fetch_add(1, Ordering::Relaxed) + 1;
        println!("[{channel}] bot: {content}");
        Ok(Message::new(channel.clone(), format!("bot-{id}"), "bot", content))
    }

    async fn edit_message(&self, msg: &Message, content: &str) -> whiskey::Result<Message> {
        println!("[{}] bot (edited {}): {content}", msg.channel, msg.id);
        let mut edited = msg.clone();
        edited.content = content.to_string();
        Ok(edited)
    }

    async fn delete_message(&self, msg: &Message) -> whiskey::Result<()> {
        println!("[{}] bot deleted {}", msg.channel, msg.id);
        Ok(())
    }
}

struct Purge;

#[async_trait]
impl Command for Purge {
    fn info(&self, _ctx: &Context) -> whiskey_bot::Info {
        whiskey_bot::Info::new().with_description("pretend to purge the channel")
    }

    async fn execute(
        &self,
        _arg: &str,
        _msg: &Message,
        ctx: &Context,
    ) -> whiskey::Result<Propagate> {
        if ctx.prompt("Really purge this channel?").await? == Confirmation::Accepted {
            ctx.send("Purged. (not really)").await?;
        }
        Ok(Propagate::No)
    }
}

struct Collect;

#[async_trait]
impl Command for Collect {
    fn info(&self, _ctx: &Context) -> whiskey_bot::Info {
        whiskey_bot::Info::new().with_description("echo your next three messages")
    }

    async fn execute(
        &self,
        _arg: &str,
        _msg: &Message,
        ctx: &Context,
    ) -> whiskey::Result<Propagate> {
        ctx.send("Say three things within 30 seconds.").await?;
        let said = ctx.collect(Duration::from_secs(30), 3)?.collect_all().await;
        let said = said.iter().map(|m| m.content.as_str()).collect::<Vec<_>>();
        ctx.send(format!("You said: {}", said.join(" | "))).await?;
        Ok(Propagate::No)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = Commands::new()
        .then(Named::new(
            "help",
            Help::new().with_after("Created using whiskey."),
        ))
        .then(Described::hidden(Named::new("ping", Ping::default())))
        .then(Named::new("uptime", Uptime))
        .then(Named::new("httpcat", HttpCat).with_aliases(["cat", "http"]))
        .then(Named::new("purge", Purge))
        .then(Named::new("collect", Collect));

    let config = BotConfig::new().with_log_channel("console-errors");
    let bot = Bot::new(config, ConsoleClient::default(), commands);

    let mut lines = BufReader::new(io::stdin()).lines();
    let mut next_id = 0_usize;
    while let Some(line) = lines.next_line().await? {
        next_id += 1;
        bot.handle_message(Message::new("console", format!("you-{next_id}"), "you", line));
    }

    Ok(())
}
