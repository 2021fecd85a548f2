use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, Mutex},
    time::Duration,
};

use log::debug;

use crate::{
    api::{ChannelId, Message},
    Error, Result,
};

use super::collector::{lock, Collector, Filter, Shared};

#[derive(Debug, Default)]
pub(super) struct Registry {
    next_id: u64,
    channels: HashMap<ChannelId, Vec<Arc<Shared>>>,
}

impl Registry {
    fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    fn insert(&mut self, shared: Arc<Shared>) {
        self.channels
            .entry(shared.channel().clone())
            .or_default()
            .push(shared);
    }

    pub(super) fn remove(&mut self, channel: &ChannelId, id: u64) {
        if let Some(collectors) = self.channels.get_mut(channel) {
            collectors.retain(|c| c.id() != id);
            if collectors.is_empty() {
                self.channels.remove(channel);
            }
        }
    }

    fn snapshot(&self, channel: &ChannelId) -> Vec<Arc<Shared>> {
        self.channels.get(channel).cloned().unwrap_or_default()
    }
}

/// Routes incoming messages to the [`Collector`]s watching their channel.
///
/// Cloning a manager is cheap, all clones share the same set of collectors.
#[derive(Clone, Default)]
pub struct CollectionManager {
    registry: Arc<Mutex<Registry>>,
}

impl fmt::Debug for CollectionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = lock(&self.registry);
        f.debug_struct("CollectionManager")
            .field("channels", &registry.channels.len())
            .finish_non_exhaustive()
    }
}

impl CollectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start collecting messages in a channel.
    ///
    /// The collector closes after `duration` has elapsed or after `limit`
    /// messages were collected, whichever happens first. A zero `duration`
    /// means no time bound and a zero `limit` means no count bound, but at
    /// least one bound is required. Otherwise, [`Error::UnboundedCollector`]
    /// is returned and nothing is registered.
    ///
    /// Must be called from within a tokio runtime if `duration` is nonzero.
    pub fn new_collector(
        &self,
        channel: impl Into<ChannelId>,
        duration: Duration,
        limit: usize,
    ) -> Result<Collector> {
        self.create(channel.into(), duration, limit, None)
    }

    /// Like [`Self::new_collector`], but only messages matching `filter` are
    /// collected. Rejected messages do not count towards the limit.
    pub fn new_collector_with_filter<F>(
        &self,
        channel: impl Into<ChannelId>,
        duration: Duration,
        limit: usize,
        filter: F,
    ) -> Result<Collector>
    where
        F: Fn(&Message) -> bool + Send + Sync + 'static,
    {
        self.create(channel.into(), duration, limit, Some(Box::new(filter)))
    }

    fn create(
        &self,
        channel: ChannelId,
        duration: Duration,
        limit: usize,
        filter: Option<Filter>,
    ) -> Result<Collector> {
        if duration.is_zero() && limit == 0 {
            return Err(Error::UnboundedCollector);
        }

        let (shared, rx) = {
            let mut registry = lock(&self.registry);
            let id = registry.next_id();
            let (shared, rx) =
                Shared::new(id, channel, limit, filter, Arc::downgrade(&self.registry));
            registry.insert(shared.clone());
            (shared, rx)
        };

        debug!(
            "collector {} in {}: collecting for {duration:?}, limit {limit}",
            shared.id(),
            shared.channel(),
        );

        if !duration.is_zero() {
            shared.start_timer(duration);
        }

        Ok(Collector::new(shared, rx))
    }

    /// Offer a message to every collector watching its channel.
    ///
    /// This never waits for consumers. Returns how many collectors accepted
    /// the message.
    pub fn dispatch(&self, msg: &Message) -> usize {
        // Offering happens outside the registry lock, since closing a
        // collector needs to lock the registry again.
        let collectors = lock(&self.registry).snapshot(&msg.channel);
        collectors.iter().filter(|c| c.offer(msg)).count()
    }

    /// How many collectors are currently watching a channel.
    pub fn active_count(&self, channel: &ChannelId) -> usize {
        lock(&self.registry)
            .channels
            .get(channel)
            .map(|c| c.len())
            .unwrap_or(0)
    }

    /// Whether no collectors are active at all.
    pub fn is_empty(&self) -> bool {
        lock(&self.registry).channels.is_empty()
    }
}

#[cfg(test)]
mod test {
    use std::time::Duration;

    use tokio::time::Instant;
    use tokio_stream::StreamExt;

    use crate::{
        api::{ChannelId, Message},
        collect::CloseReason,
        Error,
    };

    use super::CollectionManager;

    fn msg(channel: &str, id: &str, content: &str) -> Message {
        Message::new(channel, id, "alice", content)
    }

    #[tokio::test(start_paused = true)]
    async fn rejects_unbounded_collector() {
        let manager = CollectionManager::new();
        let result = manager.new_collector("general", Duration::ZERO, 0);
        assert_eq!(result.err(), Some(Error::UnboundedCollector));
        assert!(manager.is_empty());
        assert_eq!(manager.dispatch(&msg("general", "1", "hi")), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn time_bounded_stream_ends_at_deadline() {
        let manager = CollectionManager::new();
        let collector = manager
            .new_collector("general", Duration::from_secs(10), 0)
            .unwrap();
        let handle = collector.handle().clone();

        let sender = manager.clone();
        tokio::spawn(async move {
            sender.dispatch(&msg("general", "1", "one"));
            tokio::time::sleep(Duration::from_secs(5)).await;
            sender.dispatch(&msg("general", "2", "two"));
            tokio::time::sleep(Duration::from_secs(6)).await;
            sender.dispatch(&msg("general", "3", "three"));
        });

        let start = Instant::now();
        let received = collector.collect_all().await;
        let elapsed = start.elapsed();

        assert!(elapsed >= Duration::from_secs(10), "{elapsed:?}");
        assert!(elapsed < Duration::from_secs(11), "{elapsed:?}");
        let contents = received.iter().map(|m| m.content.as_str()).collect::<Vec<_>>();
        assert_eq!(contents, vec!["one", "two"]);
        assert_eq!(handle.close_reason(), Some(CloseReason::Expired));
        assert!(manager.is_empty());

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(handle.received_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn count_bounded_stream_ends_after_limit() {
        let manager = CollectionManager::new();
        let collector = manager.new_collector("general", Duration::ZERO, 2).unwrap();
        let handle = collector.handle().clone();

        assert_eq!(manager.dispatch(&msg("general", "1", "one")), 1);
        assert!(!handle.is_closed());
        assert_eq!(manager.dispatch(&msg("general", "2", "two")), 1);
        assert!(handle.is_closed());
        assert_eq!(manager.dispatch(&msg("general", "3", "three")), 0);

        let received = collector.collect_all().await;
        assert_eq!(received.len(), 2);
        assert_eq!(received[1].content, "two");
        assert_eq!(handle.close_reason(), Some(CloseReason::LimitReached));
        assert_eq!(manager.active_count(&ChannelId::new("general")), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn limit_closes_before_deadline() {
        let manager = CollectionManager::new();
        let collector = manager
            .new_collector("general", Duration::from_secs(10), 1)
            .unwrap();
        let handle = collector.handle().clone();

        manager.dispatch(&msg("general", "1", "one"));
        let start = Instant::now();
        let received = collector.collect_all().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
        assert_eq!(received.len(), 1);

        // The timer must not fire a second close
        tokio::time::sleep(Duration::from_secs(20)).await;
        assert_eq!(handle.close_reason(), Some(CloseReason::LimitReached));
    }

    #[tokio::test(start_paused = true)]
    async fn close_is_idempotent() {
        let manager = CollectionManager::new();
        let collector = manager
            .new_collector("general", Duration::from_secs(10), 0)
            .unwrap();
        manager.dispatch(&msg("general", "1", "one"));

        collector.close();
        collector.close();
        assert_eq!(
            collector.handle().close_reason(),
            Some(CloseReason::Cancelled)
        );
        assert_eq!(manager.dispatch(&msg("general", "2", "two")), 0);

        let handle = collector.handle().clone();
        let mut stream = collector.into_stream();
        assert_eq!(stream.next().await.map(|m| m.content), Some("one".into()));
        assert_eq!(stream.next().await, None);
        assert_eq!(stream.next().await, None);

        tokio::time::sleep(Duration::from_secs(20)).await;
        assert_eq!(handle.close_reason(), Some(CloseReason::Cancelled));
        assert_eq!(handle.received_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn dispatch_routes_by_channel() {
        let manager = CollectionManager::new();
        let first = manager.new_collector("general", Duration::ZERO, 5).unwrap();
        let second = manager.new_collector("general", Duration::ZERO, 5).unwrap();
        let other = manager.new_collector("random", Duration::ZERO, 5).unwrap();
        assert_eq!(manager.active_count(&ChannelId::new("general")), 2);

        assert_eq!(manager.dispatch(&msg("general", "1", "hello")), 2);
        first.close();
        second.close();
        other.close();

        assert_eq!(first.collect_all().await.len(), 1);
        assert_eq!(second.collect_all().await.len(), 1);
        assert!(other.collect_all().await.is_empty());
        assert!(manager.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn delivered_messages_are_identical() {
        let manager = CollectionManager::new();
        let collector = manager.new_collector("general", Duration::ZERO, 1).unwrap();
        let sent = Message::new("general", "42", "bob", "  some *content* \n");
        manager.dispatch(&sent);
        assert_eq!(collector.collect_all().await, vec![sent]);
    }

    #[tokio::test(start_paused = true)]
    async fn filtered_messages_do_not_count() {
        let manager = CollectionManager::new();
        let collector = manager
            .new_collector_with_filter("general", Duration::ZERO, 1, |m| {
                m.author.as_str() == "bob"
            })
            .unwrap();

        assert_eq!(manager.dispatch(&msg("general", "1", "from alice")), 0);
        assert!(!collector.handle().is_closed());
        let from_bob = Message::new("general", "2", "bob", "from bob");
        assert_eq!(manager.dispatch(&from_bob), 1);
        assert_eq!(collector.collect_all().await, vec![from_bob]);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_collector_deregisters_it() {
        let manager = CollectionManager::new();
        let collector = manager
            .new_collector("general", Duration::from_secs(10), 0)
            .unwrap();
        let handle = collector.handle().clone();
        drop(collector);

        assert!(manager.is_empty());
        assert_eq!(handle.close_reason(), Some(CloseReason::Cancelled));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_dispatch_respects_limit() {
        let manager = CollectionManager::new();
        let collector = manager.new_collector("general", Duration::ZERO, 10).unwrap();

        let tasks = (0..100)
            .map(|i| {
                let manager = manager.clone();
                tokio::spawn(async move {
                    manager.dispatch(&msg("general", &i.to_string(), "spam"));
                })
            })
            .collect::<Vec<_>>();
        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(collector.collect_all().await.len(), 10);
        assert!(manager.is_empty());
    }
}
