use serde::{Deserialize, Serialize};

/// Cache tag linking writes to the reads they may have changed.
///
/// A tag is either blanket (`kind` only) or qualified by an identifier.
/// Queries declare the tags they provide; mutations declare the tags they
/// invalidate. This is the sole cache-coherence mechanism: a write that
/// semantically affects a read must list a tag intersecting that read's
/// provided tags.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub kind: String,
    pub id: Option<String>,
}

impl Tag {
    /// Blanket tag: matches every provided tag of this kind
    pub fn of(kind: impl Into<String>) -> Self {
        Self { kind: kind.into(), id: None }
    }

    /// Tag qualified by a single resource identifier
    pub fn item(kind: impl Into<String>, id: impl ToString) -> Self {
        Self {
            kind: kind.into(),
            id: Some(id.to_string()),
        }
    }

    /// Conventional list-level tag, invalidated by writes that change membership
    pub fn list(kind: impl Into<String>) -> Self {
        Self::item(kind, "LIST")
    }

    /// Whether this provided tag is matched by an invalidated tag.
    ///
    /// A blanket invalidation matches any provided tag of the same kind; an
    /// id-qualified invalidation matches only the exact same identifier.
    pub fn invalidated_by(&self, invalidated: &Tag) -> bool {
        if self.kind != invalidated.kind {
            return false;
        }
        match &invalidated.id {
            None => true,
            Some(id) => self.id.as_deref() == Some(id.as_str()),
        }
    }
}
