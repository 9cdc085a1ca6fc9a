//! Keyed data resource with last-request-wins ordering.
#![allow(clippy::future_not_send)]

use std::cell::{Cell, RefCell};
use std::fmt;

use futures::future::LocalBoxFuture;
use reelview_api::catalog::ApiResult;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::snapshot::Snapshot;

/// Produces the value for a key.
type Producer<K, T> = Box<dyn Fn(&K) -> LocalBoxFuture<'static, ApiResult<T>>>;

/// One fetched value bound to a dependency key.
///
/// Every fetch takes a ticket from a generation counter; a response is only
/// applied if its ticket is still the latest when it arrives. Responses for a
/// superseded key or an overtaken refetch are dropped.
pub struct Resource<K, T> {
    /// Name used in log fields.
    name: &'static str,
    /// Current dependency key.
    key: RefCell<K>,
    /// Ticket of the most recent fetch.
    generation: Cell<u64>,
    /// Fetch function.
    producer: Producer<K, T>,
    /// Published snapshot.
    state: watch::Sender<Snapshot<T>>,
}

impl<K: fmt::Debug, T: fmt::Debug> fmt::Debug for Resource<K, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("name", &self.name)
            .field("key", &self.key)
            .field("generation", &self.generation)
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

impl<K, T> Resource<K, T>
where
    K: Clone + PartialEq + fmt::Debug,
    T: Clone,
{
    /// Creates an idle resource. Nothing is fetched until [`Self::refetch`]
    /// or [`Self::set_key`] is called.
    pub fn new<F>(name: &'static str, key: K, producer: F) -> Self
    where
        F: Fn(&K) -> LocalBoxFuture<'static, ApiResult<T>> + 'static,
    {
        Self {
            name,
            key: RefCell::new(key),
            generation: Cell::new(0),
            producer: Box::new(producer),
            state: watch::Sender::new(Snapshot::default()),
        }
    }

    /// Returns the current dependency key.
    pub fn key(&self) -> K {
        self.key.borrow().clone()
    }

    /// Returns a copy of the current snapshot.
    pub fn snapshot(&self) -> Snapshot<T> {
        self.state.borrow().clone()
    }

    /// Returns the current data, if any.
    pub fn data(&self) -> Option<T> {
        self.state.borrow().data.clone()
    }

    /// Subscribes to snapshot changes.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot<T>> {
        self.state.subscribe()
    }

    /// Fetches again with the current key, keeping the current data visible
    /// while the request is in flight.
    pub async fn refetch(&self) {
        let key = self.key();
        self.fetch(key).await;
    }

    /// Re-keys the resource and fetches for the new key.
    ///
    /// An equal key is a no-op. A different key empties the snapshot first,
    /// since the old data belongs to another key.
    pub async fn set_key(&self, key: K) {
        if *self.key.borrow() == key {
            return;
        }
        debug!(resource = self.name, key = ?key, "resource re-keyed");
        self.key.replace(key.clone());
        self.state.send_replace(Snapshot::default());
        self.fetch(key).await;
    }

    async fn fetch(&self, key: K) {
        let ticket = self.generation.get().wrapping_add(1);
        self.generation.set(ticket);
        self.state.send_modify(Snapshot::begin);
        let _pending = Pending {
            state: &self.state,
            generation: &self.generation,
            ticket,
        };

        let result = (self.producer)(&key).await;

        if self.generation.get() != ticket {
            debug!(resource = self.name, key = ?key, ticket, "discarding stale response");
            return;
        }
        if let Err(err) = &result {
            warn!(resource = self.name, key = ?key, error = %err, "resource fetch failed");
        }
        self.state.send_modify(|snapshot| snapshot.complete(result));
    }
}

/// Clears `loading` if the latest fetch is dropped before it completes.
struct Pending<'a, T> {
    state: &'a watch::Sender<Snapshot<T>>,
    generation: &'a Cell<u64>,
    ticket: u64,
}

impl<T> Drop for Pending<'_, T> {
    fn drop(&mut self) {
        if self.generation.get() == self.ticket {
            self.state
                .send_if_modified(|snapshot| std::mem::replace(&mut snapshot.loading, false));
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::collections::HashMap;
    use std::rc::Rc;

    use futures::FutureExt;
    use reelview_api::catalog::ApiError;
    use tokio::sync::oneshot;

    use super::*;

    /// Resource whose fetch for each key completes when its gate is released.
    fn gated(
        gates: HashMap<u32, oneshot::Receiver<ApiResult<String>>>,
    ) -> Resource<u32, String> {
        let gates = Rc::new(RefCell::new(gates));
        Resource::new("gated", 0, move |key: &u32| {
            let gate = gates.borrow_mut().remove(key);
            let key = *key;
            async move {
                match gate {
                    Some(rx) => rx
                        .await
                        .unwrap_or_else(|_| Err(ApiError::validation("gate dropped"))),
                    None => Ok(format!("instant-{key}")),
                }
            }
            .boxed_local()
        })
    }

    /// Resource counting producer calls and returning the call number.
    fn counting(calls: &Rc<Cell<u32>>) -> Resource<&'static str, u32> {
        let calls = Rc::clone(calls);
        Resource::new("counting", "a", move |_key: &&'static str| {
            calls.set(calls.get() + 1);
            let n = calls.get();
            async move { Ok(n) }.boxed_local()
        })
    }

    #[tokio::test]
    async fn test_no_fetch_on_construction() {
        // Arrange
        let calls = Rc::new(Cell::new(0));

        // Act
        let resource = counting(&calls);

        // Assert
        assert_eq!(calls.get(), 0);
        assert_eq!(resource.snapshot(), Snapshot::default());
    }

    #[tokio::test]
    async fn test_stale_key_response_is_discarded_when_it_resolves_last() {
        // Arrange
        let (tx1, rx1) = oneshot::channel();
        let (tx2, rx2) = oneshot::channel();
        let resource = gated(HashMap::from([(1, rx1), (2, rx2)]));

        // Act
        let release = async {
            tx2.send(Ok(String::from("two"))).unwrap();
            tokio::task::yield_now().await;
            tx1.send(Ok(String::from("one"))).unwrap();
        };
        futures::join!(resource.set_key(1), resource.set_key(2), release);

        // Assert
        let snapshot = resource.snapshot();
        assert_eq!(resource.key(), 2);
        assert_eq!(snapshot.data.as_deref(), Some("two"));
        assert!(!snapshot.loading);
    }

    #[tokio::test]
    async fn test_stale_key_response_is_discarded_when_it_resolves_first() {
        // Arrange
        let (tx1, rx1) = oneshot::channel();
        let (tx2, rx2) = oneshot::channel();
        let resource = gated(HashMap::from([(1, rx1), (2, rx2)]));
        let mut rx = resource.subscribe();

        // Act
        let release = async {
            tx1.send(Ok(String::from("one"))).unwrap();
            tokio::task::yield_now().await;
            // The stale response has been dropped; the newer fetch is still pending.
            assert!(rx.borrow_and_update().loading);
            assert!(rx.borrow().data.is_none());
            tx2.send(Ok(String::from("two"))).unwrap();
        };
        futures::join!(resource.set_key(1), resource.set_key(2), release);

        // Assert
        assert_eq!(resource.snapshot().data.as_deref(), Some("two"));
    }

    #[tokio::test]
    async fn test_stale_failure_does_not_overwrite() {
        // Arrange
        let (tx1, rx1) = oneshot::channel();
        let (tx2, rx2) = oneshot::channel();
        let resource = gated(HashMap::from([(1, rx1), (2, rx2)]));

        // Act
        let release = async {
            tx2.send(Ok(String::from("two"))).unwrap();
            tokio::task::yield_now().await;
            tx1.send(Err(ApiError::Timeout {
                path: String::from("/api/content/genre/one"),
            }))
            .unwrap();
        };
        futures::join!(resource.set_key(1), resource.set_key(2), release);

        // Assert
        let snapshot = resource.snapshot();
        assert_eq!(snapshot.data.as_deref(), Some("two"));
        assert!(snapshot.error.is_none());
    }

    #[tokio::test]
    async fn test_refetch_failure_keeps_data() {
        // Arrange
        let fail = Rc::new(Cell::new(false));
        let flag = Rc::clone(&fail);
        let resource = Resource::new("flaky", (), move |(): &()| {
            let fail = flag.get();
            async move {
                if fail {
                    Err(ApiError::Network {
                        path: String::from("/api/content/popular"),
                        message: String::from("connection reset"),
                    })
                } else {
                    Ok(vec![1, 2, 3])
                }
            }
            .boxed_local()
        });
        resource.refetch().await;

        // Act
        fail.set(true);
        resource.refetch().await;

        // Assert
        let snapshot = resource.snapshot();
        assert_eq!(snapshot.data, Some(vec![1, 2, 3]));
        assert!(!snapshot.loading);
        assert!(matches!(snapshot.error, Some(ApiError::Network { .. })));
    }

    #[tokio::test]
    async fn test_refetch_keeps_data_while_loading() {
        // Arrange
        let slot: Rc<RefCell<Option<oneshot::Receiver<ApiResult<String>>>>> =
            Rc::new(RefCell::new(None));
        let gate = Rc::clone(&slot);
        let resource = Resource::new("slow", (), move |(): &()| {
            let pending = gate.borrow_mut().take();
            async move {
                match pending {
                    Some(rx) => rx
                        .await
                        .unwrap_or_else(|_| Err(ApiError::validation("gate dropped"))),
                    None => Ok(String::from("first")),
                }
            }
            .boxed_local()
        });
        resource.refetch().await;
        let (tx, rx) = oneshot::channel();
        slot.replace(Some(rx));
        let mut watcher = resource.subscribe();

        // Act
        let observe = async {
            tokio::task::yield_now().await;
            let during = watcher.borrow_and_update().clone();
            tx.send(Ok(String::from("second"))).unwrap();
            during
        };
        let ((), during) = futures::join!(resource.refetch(), observe);

        // Assert
        assert!(during.loading);
        assert_eq!(during.data.as_deref(), Some("first"));
        assert_eq!(resource.data().as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn test_set_key_equal_is_noop() {
        // Arrange
        let calls = Rc::new(Cell::new(0));
        let resource = counting(&calls);

        // Act
        resource.set_key("a").await;

        // Assert
        assert_eq!(calls.get(), 0);
        assert!(resource.snapshot().data.is_none());
    }

    #[tokio::test]
    async fn test_set_key_new_key_fetches() {
        // Arrange
        let calls = Rc::new(Cell::new(0));
        let resource = counting(&calls);
        resource.refetch().await;

        // Act
        resource.set_key("b").await;

        // Assert
        assert_eq!(calls.get(), 2);
        assert_eq!(resource.key(), "b");
        assert_eq!(resource.data(), Some(2));
    }

    #[tokio::test]
    async fn test_set_key_clears_previous_key_data() {
        // Arrange
        let (tx, rx) = oneshot::channel();
        let resource = gated(HashMap::from([(9, rx)]));
        resource.refetch().await;
        assert_eq!(resource.data().as_deref(), Some("instant-0"));
        let mut watcher = resource.subscribe();

        // Act
        let observe = async {
            tokio::task::yield_now().await;
            let during = watcher.borrow_and_update().clone();
            tx.send(Ok(String::from("nine"))).unwrap();
            during
        };
        let ((), during) = futures::join!(resource.set_key(9), observe);

        // Assert
        assert!(during.loading);
        assert!(during.data.is_none());
        assert_eq!(resource.data().as_deref(), Some("nine"));
    }

    #[tokio::test]
    async fn test_subscribers_are_notified() {
        // Arrange
        let calls = Rc::new(Cell::new(0));
        let resource = counting(&calls);
        let mut rx = resource.subscribe();

        // Act
        resource.refetch().await;

        // Assert
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().data, Some(1));
    }

    #[tokio::test]
    async fn test_cancelled_fetch_clears_loading() {
        // Arrange
        let (tx, rx) = oneshot::channel();
        let resource = gated(HashMap::from([(0, rx)]));

        // Act
        let outcome =
            tokio::time::timeout(std::time::Duration::from_millis(20), resource.refetch()).await;

        // Assert
        assert!(outcome.is_err());
        let snapshot = resource.snapshot();
        assert!(!snapshot.loading);
        assert!(snapshot.data.is_none());
        drop(tx);
    }

    #[tokio::test]
    async fn test_cancelled_stale_fetch_leaves_newer_loading() {
        // Arrange
        let (_tx1, rx1) = oneshot::channel();
        let (tx2, rx2) = oneshot::channel();
        let resource = gated(HashMap::from([(1, rx1), (2, rx2)]));

        // Act
        let abandoned =
            tokio::time::timeout(std::time::Duration::from_millis(20), resource.set_key(1));
        let newer = async {
            tokio::task::yield_now().await;
            resource.set_key(2).await;
        };
        let release = async {
            tokio::time::sleep(std::time::Duration::from_millis(40)).await;
            let during = resource.snapshot();
            tx2.send(Ok(String::from("two"))).unwrap();
            during
        };
        let (outcome, (), during) = futures::join!(abandoned, newer, release);

        // Assert
        assert!(outcome.is_err());
        assert!(during.loading);
        assert_eq!(resource.data().as_deref(), Some("two"));
        assert!(!resource.snapshot().loading);
    }
}
