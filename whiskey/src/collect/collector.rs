use std::{
    fmt,
    pin::Pin,
    sync::{Arc, Mutex, MutexGuard, PoisonError, Weak},
    task::{Context, Poll},
    time::Duration,
};

use log::debug;
use tokio::{sync::mpsc, task::JoinHandle};
use tokio_stream::{wrappers::UnboundedReceiverStream, Stream, StreamExt};

use crate::api::{ChannelId, Message};

use super::manager::Registry;

/// An additional predicate a message must satisfy to be collected.
pub type Filter = Box<dyn Fn(&Message) -> bool + Send + Sync>;

/// Why a collector stopped accepting messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// The collector's time window elapsed.
    Expired,
    /// The collector accepted as many messages as it was allowed to.
    LimitReached,
    /// The collector was closed manually or all owners dropped it.
    Cancelled,
}

pub(super) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

struct State {
    /// Dropping the sender ends the stream.
    tx: Option<mpsc::UnboundedSender<Message>>,
    received: usize,
    closed: Option<CloseReason>,
    timer: Option<JoinHandle<()>>,
}

pub(super) struct Shared {
    id: u64,
    channel: ChannelId,
    limit: usize,
    filter: Option<Filter>,
    registry: Weak<Mutex<Registry>>,
    state: Mutex<State>,
}

impl Shared {
    pub(super) fn new(
        id: u64,
        channel: ChannelId,
        limit: usize,
        filter: Option<Filter>,
        registry: Weak<Mutex<Registry>>,
    ) -> (Arc<Self>, mpsc::UnboundedReceiver<Message>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let shared = Self {
            id,
            channel,
            limit,
            filter,
            registry,
            state: Mutex::new(State {
                tx: Some(tx),
                received: 0,
                closed: None,
                timer: None,
            }),
        };
        (Arc::new(shared), rx)
    }

    pub(super) fn id(&self) -> u64 {
        self.id
    }

    pub(super) fn channel(&self) -> &ChannelId {
        &self.channel
    }

    /// Schedule the deadline. Must be called at most once.
    pub(super) fn start_timer(self: &Arc<Self>, duration: Duration) {
        let mut state = lock(&self.state);
        if state.closed.is_some() {
            // The limit was reached before we even got here.
            return;
        }

        let shared = self.clone();
        state.timer = Some(tokio::task::spawn(async move {
            tokio::time::sleep(duration).await;
            shared.close(CloseReason::Expired);
        }));
    }

    /// Returns whether the message was accepted.
    pub(super) fn offer(&self, msg: &Message) -> bool {
        if msg.channel != self.channel {
            return false;
        }

        if let Some(filter) = &self.filter {
            if !filter(msg) {
                return false;
            }
        }

        let mut state = lock(&self.state);
        if state.closed.is_some() {
            return false;
        }

        state.received += 1;
        if let Some(tx) = &state.tx {
            // The receiving end may be gone already, in which case nobody
            // cares about the message.
            let _ = tx.send(msg.clone());
        }

        if self.limit > 0 && state.received >= self.limit {
            self.close_locked(&mut state, CloseReason::LimitReached);
        }

        true
    }

    /// Returns whether this call performed the closed transition.
    pub(super) fn close(&self, reason: CloseReason) -> bool {
        let mut state = lock(&self.state);
        self.close_locked(&mut state, reason)
    }

    fn close_locked(&self, state: &mut State, reason: CloseReason) -> bool {
        if state.closed.is_some() {
            return false;
        }

        state.closed = Some(reason);
        state.tx = None;

        if let Some(timer) = state.timer.take() {
            // When expiring, we are running inside the timer task itself.
            if reason != CloseReason::Expired {
                timer.abort();
            }
        }

        // Deregister while still holding the state lock. Anyone dispatching
        // from an older snapshot of the registry will see the collector as
        // closed.
        if let Some(registry) = self.registry.upgrade() {
            lock(&registry).remove(&self.channel, self.id);
        }

        debug!(
            "collector {} in {}: closed ({reason:?}) after {} message(s)",
            self.id, self.channel, state.received
        );

        true
    }

    fn is_closed(&self) -> bool {
        lock(&self.state).closed.is_some()
    }

    fn close_reason(&self) -> Option<CloseReason> {
        lock(&self.state).closed
    }

    fn received(&self) -> usize {
        lock(&self.state).received
    }
}

impl fmt::Debug for Shared {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collector")
            .field("id", &self.id)
            .field("channel", &self.channel)
            .field("limit", &self.limit)
            .finish_non_exhaustive()
    }
}

/// A cheap, clonable reference to a collector.
///
/// Unlike [`Collector`] and [`CollectorStream`], dropping a handle does not
/// close the collector.
#[derive(Debug, Clone)]
pub struct CollectorHandle(Arc<Shared>);

impl CollectorHandle {
    /// Unique id of the collector within its [`CollectionManager`](super::CollectionManager).
    pub fn id(&self) -> u64 {
        self.0.id
    }

    /// The channel the collector watches.
    pub fn channel(&self) -> &ChannelId {
        &self.0.channel
    }

    /// The maximum amount of messages to accept, or 0 if unbounded.
    pub fn limit(&self) -> usize {
        self.0.limit
    }

    pub fn is_closed(&self) -> bool {
        self.0.is_closed()
    }

    /// Why the collector was closed, or [`None`] if it is still open.
    pub fn close_reason(&self) -> Option<CloseReason> {
        self.0.close_reason()
    }

    /// How many messages the collector has accepted so far.
    pub fn received_count(&self) -> usize {
        self.0.received()
    }

    /// Stop accepting messages and end the stream.
    ///
    /// Closing an already closed collector does nothing.
    pub fn close(&self) {
        self.0.close(CloseReason::Cancelled);
    }
}

/// Closes the collector once its owner is gone.
#[derive(Debug)]
struct Owner(CollectorHandle);

impl Drop for Owner {
    fn drop(&mut self) {
        (self.0).0.close(CloseReason::Cancelled);
    }
}

/// A time- or count-bounded collector of messages in a single channel.
///
/// Created via [`CollectionManager::new_collector`](super::CollectionManager::new_collector).
/// Dropping the collector (or the stream it was turned into) closes it.
#[derive(Debug)]
pub struct Collector {
    owner: Owner,
    rx: mpsc::UnboundedReceiver<Message>,
}

impl Collector {
    pub(super) fn new(shared: Arc<Shared>, rx: mpsc::UnboundedReceiver<Message>) -> Self {
        Self {
            owner: Owner(CollectorHandle(shared)),
            rx,
        }
    }

    pub fn handle(&self) -> &CollectorHandle {
        &self.owner.0
    }

    pub fn close(&self) {
        self.owner.0.close();
    }

    /// Turn the collector into a stream of the messages it accepts.
    ///
    /// The stream ends when the collector closes. Messages accepted before
    /// this call are not lost.
    pub fn into_stream(self) -> CollectorStream {
        CollectorStream {
            owner: self.owner,
            rx: UnboundedReceiverStream::new(self.rx),
        }
    }

    /// Wait until the collector closes and return every accepted message.
    pub async fn collect_all(self) -> Vec<Message> {
        self.into_stream().collect().await
    }
}

/// The messages accepted by a [`Collector`], in the order they arrived.
#[derive(Debug)]
pub struct CollectorStream {
    owner: Owner,
    rx: UnboundedReceiverStream<Message>,
}

impl CollectorStream {
    pub fn handle(&self) -> &CollectorHandle {
        &self.owner.0
    }

    pub fn close(&self) {
        self.owner.0.close();
    }
}

impl Stream for CollectorStream {
    type Item = Message;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.rx).poll_next(cx)
    }
}
