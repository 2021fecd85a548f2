use async_trait::async_trait;
use rand::{seq::SliceRandom, Rng};
use whiskey::api::Message;

use crate::{
    command::{Command, Info, Propagate},
    context::Context,
};

pub const STATUS_CODES: &[&str] = &[
    "100", "101", "102", //
    "200", "201", "202", "203", "204", "205", "206", "207", //
    "300", "301", "302", "303", "304", "305", "306", "307", //
    "400", "401", "402", "403", "404", "405", "406", "408", "409", //
    "410", "411", "412", "413", "414", "415", "416", "417", "418", //
    "420", "421", "422", "423", "424", "425", "426", "429", //
    "431", "444", "450", "451", "499", //
    "500", "501", "502", "503", "504", "505", "506", "507", "508", "509", //
    "510", "511", "599",
];

pub fn httpcat_url(code: &str) -> String {
    format!("https://http.cat/{code}")
}

/// Grab a httpcat :3
///
/// Without arguments, a random status code is picked. Otherwise the first
/// argument is used if it is a known status code, then the first known status
/// code among all arguments. Everything else gets a 404.
pub struct HttpCat;

impl HttpCat {
    pub fn reply(args: &[&str], rng: &mut impl Rng) -> String {
        let Some(&first) = args.first() else {
            let code = STATUS_CODES.choose(rng).copied().unwrap_or("404");
            return httpcat_url(code);
        };

        if STATUS_CODES.contains(&first) {
            return httpcat_url(first);
        }

        if let Some(code) = STATUS_CODES.iter().find(|&&code| args.contains(&code)) {
            return httpcat_url(code);
        }

        match first {
            "itjk" => "https://piapiac.org/trash/floppa.webm".to_string(),
            "zorbyte" => "https://piapiac.org/trash/SPEEN.webm".to_string(),
            _ => httpcat_url("404"),
        }
    }
}

#[async_trait]
impl<E> Command<E> for HttpCat
where
    E: From<whiskey::Error>,
{
    fn info(&self, _ctx: &Context<E>) -> Info {
        Info::new()
            .with_trigger("[code]")
            .with_description("grab a httpcat :3")
    }

    async fn execute(&self, arg: &str, _msg: &Message, ctx: &Context<E>) -> Result<Propagate, E> {
        let reply = {
            let args = arg.split_whitespace().collect::<Vec<_>>();
            Self::reply(&args, &mut rand::thread_rng())
        };
        ctx.send(reply).await?;
        Ok(Propagate::No)
    }
}
