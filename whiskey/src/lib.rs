//! Core types for the whiskey bot framework.
//!
//! This crate knows nothing about commands. It models the messages a chat
//! platform delivers, the [`ChatClient`](client::ChatClient) a bot talks back
//! through, and the [`collect`] machinery that lets a running command wait for
//! replies.

pub mod api;
pub mod client;
pub mod collect;
mod error;
pub mod text;

pub use crate::error::*;
