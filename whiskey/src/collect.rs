//! Collecting incoming messages for a running command.
//!
//! A [`Collector`] watches a single channel and accepts the messages arriving
//! there until either its time window has elapsed or it has accepted a fixed
//! number of messages. The accepted messages can be consumed as a
//! [`CollectorStream`], which ends as soon as the collector closes.
//!
//! Collectors are created by and registered with a [`CollectionManager`],
//! which routes every incoming message to the collectors watching its
//! channel. A bot should create exactly one manager at startup and hand clones
//! of it to everything that wants to collect messages.

mod collector;
mod manager;

pub use self::{collector::*, manager::*};
