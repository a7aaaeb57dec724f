use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::watch;

use crate::client::descriptor::OperationDescriptor;
use crate::client::tags::Tag;
use crate::error::TransportError;

/// Lifecycle of one operation invocation.
/// Queries move pending -> fulfilled | rejected and re-enter pending on
/// refetch; mutations start uninitialized and return there only on reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FetchStatus {
    Uninitialized,
    Pending,
    Fulfilled,
    Rejected,
}

/// Composite cache key: operation name plus canonicalized arguments.
/// serde_json keeps object keys sorted, so equal argument values serialize
/// identically regardless of construction order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub operation: String,
    pub args: String,
}

impl CacheKey {
    pub fn new(operation: &str, args: &Value) -> Self {
        Self {
            operation: operation.to_string(),
            args: args.to_string(),
        }
    }
}

/// Observable result state of a cached query
#[derive(Debug, Clone)]
pub struct QuerySnapshot {
    pub status: FetchStatus,
    pub data: Option<Value>,
    pub error: Option<TransportError>,
    pub fetched_at: Option<DateTime<Utc>>,
}

impl QuerySnapshot {
    pub(crate) fn pending() -> Self {
        Self {
            status: FetchStatus::Pending,
            data: None,
            error: None,
            fetched_at: None,
        }
    }

    /// First load: fetching with nothing to show yet
    pub fn is_loading(&self) -> bool {
        self.status == FetchStatus::Pending && self.data.is_none()
    }

    /// Any in-flight fetch, including refetches that keep prior data visible
    pub fn is_fetching(&self) -> bool {
        self.status == FetchStatus::Pending
    }
}

/// One cached read: last-known response, fetch status, subscriber count, and
/// everything needed to refetch it after invalidation
pub(crate) struct CacheEntry {
    pub snapshot: watch::Sender<QuerySnapshot>,
    pub subscribers: usize,
    pub provides: Vec<Tag>,
    pub descriptor: Arc<OperationDescriptor>,
    pub args: Value,
    /// At most one outstanding request per key
    pub inflight: bool,
    /// Invalidated while a request was in flight; refetch once it completes
    pub stale: bool,
}

/// Entries plus the tag index consulted on every completed write.
/// The index maps tag kind to interested keys; the per-entry provided tags
/// decide identifier-level matches.
#[derive(Default)]
pub(crate) struct CacheState {
    pub entries: HashMap<CacheKey, CacheEntry>,
    pub tag_index: HashMap<String, HashSet<CacheKey>>,
}

impl CacheState {
    pub fn index_tags(&mut self, key: &CacheKey, provides: &[Tag]) {
        for tag in provides {
            self.tag_index
                .entry(tag.kind.clone())
                .or_default()
                .insert(key.clone());
        }
    }

    /// Drop an entry and clean its index memberships
    pub fn remove_entry(&mut self, key: &CacheKey) {
        if let Some(entry) = self.entries.remove(key) {
            for tag in &entry.provides {
                if let Some(keys) = self.tag_index.get_mut(&tag.kind) {
                    keys.remove(key);
                    if keys.is_empty() {
                        self.tag_index.remove(&tag.kind);
                    }
                }
            }
        }
    }

    /// Keys whose provided tags intersect the invalidated set
    pub fn keys_invalidated_by(&self, invalidated: &[Tag]) -> Vec<CacheKey> {
        let mut seen = HashSet::new();
        let mut matched = Vec::new();

        for tag in invalidated {
            let Some(keys) = self.tag_index.get(&tag.kind) else {
                continue;
            };
            for key in keys {
                if seen.contains(key) {
                    continue;
                }
                let Some(entry) = self.entries.get(key) else {
                    continue;
                };
                if entry.provides.iter().any(|provided| provided.invalidated_by(tag)) {
                    seen.insert(key.clone());
                    matched.push(key.clone());
                }
            }
        }

        matched
    }
}
