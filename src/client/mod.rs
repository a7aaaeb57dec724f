// Tagged resource client: a registry of named operations over one transport,
// with a response cache keyed by (operation, canonical args) and tag-based
// invalidation tying writes to the reads they affect.
pub mod cache;
pub mod descriptor;
pub mod tags;

pub use cache::{CacheKey, FetchStatus, QuerySnapshot};
pub use descriptor::{OperationDescriptor, OperationKind};
pub use tags::Tag;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use chrono::Utc;
use serde_json::Value;
use tokio::sync::watch;

use crate::client::cache::{CacheEntry, CacheState};
use crate::error::{ClientError, TransportError};
use crate::transport::{HttpTransport, Transport};

struct ClientInner {
    transport: Arc<dyn Transport>,
    registry: RwLock<HashMap<String, Arc<OperationDescriptor>>>,
    cache: Mutex<CacheState>,
}

/// Client instance operations are registered against. Cheap to clone; clones
/// share the registry and cache.
///
/// Registration is incremental: each feature module registers its own
/// operations against an explicitly passed client, there is no central
/// operation list and no module-level singleton.
#[derive(Clone)]
pub struct ResourceClient {
    inner: Arc<ClientInner>,
}

impl ResourceClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                transport,
                registry: RwLock::new(HashMap::new()),
                cache: Mutex::new(CacheState::default()),
            }),
        }
    }

    /// Client over an [`HttpTransport`] built from the global config
    pub fn from_config() -> Result<Self, ClientError> {
        let transport = HttpTransport::from_config()?;
        Ok(Self::new(Arc::new(transport)))
    }

    /// Register one operation. Names are unique per client instance.
    pub fn register(&self, descriptor: OperationDescriptor) -> Result<(), ClientError> {
        let mut registry = self.inner.registry.write().expect("registry lock poisoned");
        if registry.contains_key(descriptor.name()) {
            return Err(ClientError::DuplicateOperation(descriptor.name().to_string()));
        }
        tracing::debug!(
            operation = descriptor.name(),
            kind = descriptor.kind().as_str(),
            "registered operation"
        );
        registry.insert(descriptor.name().to_string(), Arc::new(descriptor));
        Ok(())
    }

    fn descriptor(
        &self,
        name: &str,
        kind: OperationKind,
    ) -> Result<Arc<OperationDescriptor>, ClientError> {
        let registry = self.inner.registry.read().expect("registry lock poisoned");
        let descriptor = registry
            .get(name)
            .cloned()
            .ok_or_else(|| ClientError::UnknownOperation(name.to_string()))?;
        if descriptor.kind() != kind {
            return Err(ClientError::KindMismatch {
                name: name.to_string(),
                expected: kind.as_str(),
                actual: descriptor.kind().as_str(),
            });
        }
        Ok(descriptor)
    }

    /// Subscribe to a query. Returns a handle immediately; the snapshot
    /// resolves asynchronously through the handle's watch channel.
    ///
    /// Subscribers to the same (operation, args) pair share one cache entry
    /// and one in-flight request. Must be called within a tokio runtime.
    pub fn subscribe(&self, operation: &str, args: Value) -> Result<QuerySubscription, ClientError> {
        let descriptor = self.descriptor(operation, OperationKind::Query)?;
        let key = CacheKey::new(descriptor.name(), &args);

        let mut cache = self.inner.cache.lock().expect("cache lock poisoned");

        if let Some(entry) = cache.entries.get_mut(&key) {
            entry.subscribers += 1;
            let receiver = entry.snapshot.subscribe();
            return Ok(QuerySubscription {
                inner: self.inner.clone(),
                key,
                receiver,
            });
        }

        let provides = descriptor.tags_for(&args);
        let (sender, receiver) = watch::channel(QuerySnapshot::pending());
        cache.entries.insert(
            key.clone(),
            CacheEntry {
                snapshot: sender,
                subscribers: 1,
                provides: provides.clone(),
                descriptor: descriptor.clone(),
                args: args.clone(),
                inflight: true,
                stale: false,
            },
        );
        cache.index_tags(&key, &provides);
        drop(cache);

        spawn_fetch(self.inner.clone(), descriptor, key.clone(), args);

        Ok(QuerySubscription {
            inner: self.inner.clone(),
            key,
            receiver,
        })
    }

    /// Handle for triggering a mutation and observing its state
    pub fn mutation(&self, operation: &str) -> Result<MutationHandle, ClientError> {
        let descriptor = self.descriptor(operation, OperationKind::Mutation)?;
        let (state, _) = watch::channel(MutationSnapshot::idle());
        Ok(MutationHandle {
            inner: self.inner.clone(),
            descriptor,
            state,
        })
    }

    /// Manually invalidate cached reads by tag, outside any mutation
    pub fn invalidate_tags(&self, tags: &[Tag]) {
        invalidate(&self.inner, tags);
    }
}

/// Kick off the network call for a cache entry. The completing task updates
/// the entry; if every subscriber left in the meantime the result is dropped.
fn spawn_fetch(
    inner: Arc<ClientInner>,
    descriptor: Arc<OperationDescriptor>,
    key: CacheKey,
    args: Value,
) {
    tokio::spawn(async move {
        let request = descriptor.build_request(&args);
        tracing::debug!(operation = %key.operation, path = %request.path, "dispatching query");
        let result = inner.transport.send(&request).await;
        finish_fetch(&inner, &key, result);
    });
}

fn finish_fetch(inner: &Arc<ClientInner>, key: &CacheKey, result: Result<Value, TransportError>) {
    let mut cache = inner.cache.lock().expect("cache lock poisoned");

    let Some(entry) = cache.entries.get_mut(key) else {
        // last subscriber unsubscribed while the request was in flight
        tracing::debug!(operation = %key.operation, "dropping result for evicted entry");
        return;
    };

    entry.inflight = false;
    match result {
        Ok(data) => {
            entry.snapshot.send_modify(|snapshot| {
                snapshot.status = FetchStatus::Fulfilled;
                snapshot.data = Some(data);
                snapshot.error = None;
                snapshot.fetched_at = Some(Utc::now());
            });
        }
        Err(err) => {
            tracing::warn!(operation = %key.operation, error = %err, "query failed");
            // prior data, if any, stays visible alongside the error
            entry.snapshot.send_modify(|snapshot| {
                snapshot.status = FetchStatus::Rejected;
                snapshot.error = Some(err);
            });
        }
    }

    // A write invalidated this key mid-flight; the response may predate it
    let refetch = if entry.stale && entry.subscribers > 0 {
        entry.stale = false;
        entry.inflight = true;
        entry
            .snapshot
            .send_modify(|snapshot| snapshot.status = FetchStatus::Pending);
        Some((entry.descriptor.clone(), entry.args.clone()))
    } else {
        entry.stale = false;
        None
    };
    drop(cache);

    if let Some((descriptor, args)) = refetch {
        spawn_fetch(inner.clone(), descriptor, key.clone(), args);
    }
}

fn invalidate(inner: &Arc<ClientInner>, tags: &[Tag]) {
    if tags.is_empty() {
        return;
    }

    let mut cache = inner.cache.lock().expect("cache lock poisoned");
    let keys = cache.keys_invalidated_by(tags);
    if keys.is_empty() {
        return;
    }
    tracing::debug!(count = keys.len(), "invalidating cached reads");

    let mut refetches = Vec::new();
    for key in keys {
        enum Action {
            Evict,
            Refetch(Arc<OperationDescriptor>, Value),
            Skip,
        }

        let action = match cache.entries.get_mut(&key) {
            None => Action::Skip,
            // no observers: drop so the next subscription fetches fresh
            Some(entry) if entry.subscribers == 0 => Action::Evict,
            // request already in flight: refetch after it completes
            Some(entry) if entry.inflight => {
                entry.stale = true;
                Action::Skip
            }
            Some(entry) => {
                entry.inflight = true;
                entry
                    .snapshot
                    .send_modify(|snapshot| snapshot.status = FetchStatus::Pending);
                Action::Refetch(entry.descriptor.clone(), entry.args.clone())
            }
        };

        match action {
            Action::Evict => {
                tracing::debug!(operation = %key.operation, "evicting unobserved cache entry");
                cache.remove_entry(&key);
            }
            Action::Refetch(descriptor, args) => refetches.push((key, descriptor, args)),
            Action::Skip => {}
        }
    }
    drop(cache);

    for (key, descriptor, args) in refetches {
        spawn_fetch(inner.clone(), descriptor, key, args);
    }
}

/// Live interest in one cached query. Dropping the subscription decrements
/// the entry's subscriber count; the last drop evicts the entry.
///
/// Eviction is soft disinterest: an in-flight request is not aborted, its
/// result is simply discarded when it completes.
pub struct QuerySubscription {
    inner: Arc<ClientInner>,
    key: CacheKey,
    receiver: watch::Receiver<QuerySnapshot>,
}

impl QuerySubscription {
    pub fn key(&self) -> &CacheKey {
        &self.key
    }

    /// Current result state
    pub fn snapshot(&self) -> QuerySnapshot {
        self.receiver.borrow().clone()
    }

    /// Wait until the query settles (fulfilled or rejected) and return the
    /// settled snapshot
    pub async fn ready(&mut self) -> QuerySnapshot {
        loop {
            let snapshot = self.receiver.borrow_and_update().clone();
            if snapshot.status != FetchStatus::Pending {
                return snapshot;
            }
            if self.receiver.changed().await.is_err() {
                // entry evicted under us; report the last state we saw
                return snapshot;
            }
        }
    }

    /// Explicitly re-trigger the fetch. No-op while a request is in flight.
    pub fn refetch(&self) {
        let mut cache = self.inner.cache.lock().expect("cache lock poisoned");
        let job = match cache.entries.get_mut(&self.key) {
            Some(entry) if !entry.inflight => {
                entry.inflight = true;
                entry
                    .snapshot
                    .send_modify(|snapshot| snapshot.status = FetchStatus::Pending);
                Some((entry.descriptor.clone(), entry.args.clone()))
            }
            _ => None,
        };
        drop(cache);

        if let Some((descriptor, args)) = job {
            spawn_fetch(self.inner.clone(), descriptor, self.key.clone(), args);
        }
    }
}

impl Drop for QuerySubscription {
    fn drop(&mut self) {
        let Ok(mut cache) = self.inner.cache.lock() else {
            return;
        };
        let evict = match cache.entries.get_mut(&self.key) {
            Some(entry) => {
                entry.subscribers = entry.subscribers.saturating_sub(1);
                entry.subscribers == 0
            }
            None => false,
        };
        if evict {
            cache.remove_entry(&self.key);
        }
    }
}

/// Observable result state of a mutation
#[derive(Debug, Clone)]
pub struct MutationSnapshot {
    pub status: FetchStatus,
    pub data: Option<Value>,
    pub error: Option<TransportError>,
}

impl MutationSnapshot {
    pub(crate) fn idle() -> Self {
        Self {
            status: FetchStatus::Uninitialized,
            data: None,
            error: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.status == FetchStatus::Pending
    }
}

/// Handle for one registered mutation.
///
/// State machine: idle until triggered, loading while the request runs, then
/// success or error. Only [`reset`](Self::reset) returns it to idle;
/// re-triggering re-enters loading directly.
pub struct MutationHandle {
    inner: Arc<ClientInner>,
    descriptor: Arc<OperationDescriptor>,
    state: watch::Sender<MutationSnapshot>,
}

impl MutationHandle {
    /// Run the write. Errors come back as values, never panics; the same
    /// outcome is published to [`watch`](Self::watch) observers.
    ///
    /// On success every cached read whose provided tags intersect this
    /// mutation's invalidated tags is refetched (with subscribers) or dropped
    /// (without). Refetches are fire-and-forget relative to this call's
    /// completion. A failed write invalidates nothing.
    pub async fn trigger(&self, args: Value) -> Result<Value, TransportError> {
        self.state.send_replace(MutationSnapshot {
            status: FetchStatus::Pending,
            data: None,
            error: None,
        });

        let request = self.descriptor.build_request(&args);
        tracing::debug!(
            operation = self.descriptor.name(),
            path = %request.path,
            "dispatching mutation"
        );
        let result = self.inner.transport.send(&request).await;

        match &result {
            Ok(data) => {
                self.state.send_replace(MutationSnapshot {
                    status: FetchStatus::Fulfilled,
                    data: Some(data.clone()),
                    error: None,
                });
                invalidate(&self.inner, &self.descriptor.tags_for(&args));
            }
            Err(err) => {
                tracing::warn!(
                    operation = self.descriptor.name(),
                    error = %err,
                    "mutation failed"
                );
                self.state.send_replace(MutationSnapshot {
                    status: FetchStatus::Rejected,
                    data: None,
                    error: Some(err.clone()),
                });
            }
        }

        result
    }

    pub fn name(&self) -> &str {
        self.descriptor.name()
    }

    pub fn snapshot(&self) -> MutationSnapshot {
        self.state.borrow().clone()
    }

    /// Observe state transitions without holding the handle
    pub fn watch(&self) -> watch::Receiver<MutationSnapshot> {
        self.state.subscribe()
    }

    /// Return to idle; the next trigger starts a fresh cycle
    pub fn reset(&self) {
        self.state.send_replace(MutationSnapshot::idle());
    }
}
