//! A command framework on top of [`whiskey`].
//!
//! A [`Bot`] owns a chat client, a [`CollectionManager`] and an ordered list
//! of [`Command`]s. Every incoming message is first offered to the active
//! collectors and then run through the commands on its own task.
//!
//! [`CollectionManager`]: whiskey::collect::CollectionManager

pub mod bot;
pub mod command;
pub mod config;
mod context;
#[cfg(test)]
mod mock;

pub use self::{
    bot::Bot,
    command::{basic, builtin, named, Command, Commands, Info, Propagate},
    config::BotConfig,
    context::*,
};
