//! A few general purpose commands.

mod help;
mod httpcat;
mod ping;
mod uptime;

pub use self::{help::*, httpcat::*, ping::*, uptime::*};
