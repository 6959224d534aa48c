use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tracing::{debug, warn};

/// One full, ordered result set. Shared between subscribers, never mutated.
pub type Snapshot<T> = Arc<Vec<T>>;

/// Fan-out point for one live query.
///
/// Each subscriber owns an unbounded queue, so `publish` never waits on a
/// slow reader. Callers must publish while holding the store lock; that is
/// what keeps every queue in commit order.
pub(crate) struct Registry<T> {
    name: &'static str,
    next_id: AtomicU64,
    senders: Mutex<Vec<(u64, Sender<Snapshot<T>>)>>,
}

impl<T> Registry<T> {
    pub(crate) fn new(name: &'static str) -> Arc<Self> {
        Arc::new(Self {
            name,
            next_id: AtomicU64::new(1),
            senders: Mutex::new(Vec::new()),
        })
    }

    /// Register a subscriber whose queue starts with `initial`.
    pub(crate) fn subscribe(self: &Arc<Self>, initial: Vec<T>) -> Subscription<T> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = unbounded();
        // The receiver is alive, so this cannot fail.
        let _ = tx.send(Arc::new(initial));
        self.senders.lock().push((id, tx));
        debug!(query = self.name, id, "subscribed");
        Subscription {
            id,
            rx,
            registry: Arc::downgrade(self),
        }
    }

    pub(crate) fn publish(&self, snapshot: Vec<T>) {
        let snapshot = Arc::new(snapshot);
        let mut senders = self.senders.lock();
        senders.retain(|(id, tx)| {
            if tx.send(Arc::clone(&snapshot)).is_ok() {
                true
            } else {
                warn!(query = self.name, id, "dropping disconnected subscriber");
                false
            }
        });
        debug!(
            query = self.name,
            rows = snapshot.len(),
            subscribers = senders.len(),
            "published snapshot"
        );
    }

    fn unsubscribe(&self, id: u64) {
        self.senders.lock().retain(|(sid, _)| *sid != id);
        debug!(query = self.name, id, "unsubscribed");
    }

    pub(crate) fn len(&self) -> usize {
        self.senders.lock().len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.senders.lock().is_empty()
    }
}

/// A live view of one query. The first snapshot is the state at subscription
/// time; another arrives after every committed change.
///
/// Dropping the subscription stops delivery. Snapshots already queued stay
/// readable until then.
pub struct Subscription<T> {
    id: u64,
    rx: Receiver<Snapshot<T>>,
    registry: Weak<Registry<T>>,
}

impl<T> Subscription<T> {
    /// Block until the next snapshot. `None` once the store is gone.
    pub fn recv(&self) -> Option<Snapshot<T>> {
        self.rx.recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<Snapshot<T>> {
        self.rx.recv_timeout(timeout).ok()
    }

    pub fn try_recv(&self) -> Option<Snapshot<T>> {
        self.rx.try_recv().ok()
    }

    /// Skip to the newest queued snapshot, if any.
    pub fn latest(&self) -> Option<Snapshot<T>> {
        self.rx.try_iter().last()
    }

    /// Snapshots waiting to be read.
    pub fn pending(&self) -> usize {
        self.rx.len()
    }

    /// The underlying queue, for waiting on several subscriptions with
    /// `crossbeam_channel::select!`.
    pub fn receiver(&self) -> &Receiver<Snapshot<T>> {
        &self.rx
    }

    pub fn cancel(self) {}
}

impl<T> Iterator for Subscription<T> {
    type Item = Snapshot<T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.recv()
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.unsubscribe(self.id);
        }
    }
}

impl<T> std::fmt::Debug for Subscription<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("pending", &self.rx.len())
            .finish()
    }
}
