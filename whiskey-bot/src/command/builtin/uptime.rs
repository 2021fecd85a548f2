use async_trait::async_trait;
use jiff::{SignedDuration, Timestamp};
use whiskey::api::Message;

use crate::{
    command::{Command, Info, Propagate},
    context::Context,
};

pub fn format_time(t: Timestamp) -> String {
    t.strftime("%Y-%m-%d %H:%M:%S UTC").to_string()
}

pub fn format_duration(d: SignedDuration) -> String {
    let total = d.as_secs().abs();
    let secs = total % 60;
    let mins = (total / 60) % 60;
    let hours = (total / 60 / 60) % 24;
    let days = total / 60 / 60 / 24;

    let mut segments = vec![];
    if days > 0 {
        segments.push(format!("{days}d"));
    }
    if hours > 0 {
        segments.push(format!("{hours}h"));
    }
    if mins > 0 {
        segments.push(format!("{mins}m"));
    }
    if secs > 0 {
        segments.push(format!("{secs}s"));
    }
    if segments.is_empty() {
        segments.push("0s".to_string());
    }

    let segments = segments.join(" ");
    if d.is_negative() {
        format!("-{segments}")
    } else {
        segments
    }
}

/// Show how long the bot has been online.
pub struct Uptime;

impl Uptime {
    fn formulate_reply<E>(&self, ctx: &Context<E>) -> String {
        let start = ctx.bot.start_time;
        let now = Timestamp::now();
        format!(
            "/me has been up since {} ({} ago)",
            format_time(start),
            format_duration(now.duration_since(start)),
        )
    }
}

#[async_trait]
impl<E> Command<E> for Uptime
where
    E: From<whiskey::Error>,
{
    fn info(&self, _ctx: &Context<E>) -> Info {
        Info::new().with_description("show how long the bot has been online")
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

#[cfg(test)]
mod test {
    use jiff::{SignedDuration, Timestamp};

    use super::{format_duration, format_time};

    #[test]
    fn formats_durations() {
        assert_eq!(format_duration(SignedDuration::ZERO), "0s");
        assert_eq!(format_duration(SignedDuration::from_secs(59)), "59s");
        assert_eq!(format_duration(SignedDuration::from_secs(3600)), "1h");
        assert_eq!(
            format_duration(SignedDuration::from_secs(2 * 86400 + 3 * 3600 + 4 * 60 + 5)),
            "2d 3h 4m 5s"
        );
        assert_eq!(format_duration(SignedDuration::from_secs(-90)), "-1m 30s");
    }

    #[test]
    fn formats_times() {
        let t = Timestamp::from_second(0).unwrap();
        assert_eq!(format_time(t), "1970-01-01 00:00:00 UTC");
    }
}
