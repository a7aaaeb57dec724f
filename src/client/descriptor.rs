use serde_json::Value;

use crate::client::tags::Tag;
use crate::transport::RequestDescriptor;

/// Pure mapping from call-time arguments to a transport request.
/// Arguments are passed through unvalidated; malformed arguments surface as
/// a transport-layer error.
pub type RequestFn = dyn Fn(&Value) -> RequestDescriptor + Send + Sync;

/// Tags an operation provides (queries) or invalidates (mutations), derived
/// from its arguments
pub type TagsFn = dyn Fn(&Value) -> Vec<Tag> + Send + Sync;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    /// Idempotent, cacheable read
    Query,
    /// Side-effecting write
    Mutation,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Query => "query",
            OperationKind::Mutation => "mutation",
        }
    }
}

/// Declarative specification of one remote operation: a unique name, a
/// request builder, and the cache tags it participates in
pub struct OperationDescriptor {
    name: String,
    kind: OperationKind,
    request: Box<RequestFn>,
    tags: Box<TagsFn>,
}

impl OperationDescriptor {
    pub fn query(
        name: impl Into<String>,
        request: impl Fn(&Value) -> RequestDescriptor + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            kind: OperationKind::Query,
            request: Box::new(request),
            tags: Box::new(|_| Vec::new()),
        }
    }

    pub fn mutation(
        name: impl Into<String>,
        request: impl Fn(&Value) -> RequestDescriptor + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            kind: OperationKind::Mutation,
            request: Box::new(request),
            tags: Box::new(|_| Vec::new()),
        }
    }

    /// Attach the tag function: provided tags for a query, invalidated tags
    /// for a mutation
    pub fn with_tags(
        mut self,
        tags: impl Fn(&Value) -> Vec<Tag> + Send + Sync + 'static,
    ) -> Self {
        self.tags = Box::new(tags);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    pub fn build_request(&self, args: &Value) -> RequestDescriptor {
        (self.request)(args)
    }

    pub fn tags_for(&self, args: &Value) -> Vec<Tag> {
        (self.tags)(args)
    }
}
