use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// HTTP header carrying the idempotency key of a mutating request.
pub const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";

/// Idempotency key of one pending mutation.
///
/// Generated once per user action; a retried request carries the same key so
/// the store can recognise it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MutationKey(pub Uuid);

impl MutationKey {
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for MutationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One element of the `POST /{collection}/reorder` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortOrderEntry<Id> {
    pub id: Id,
    pub sort_order: u32,
}

impl<Id: Clone> SortOrderEntry<Id> {
    /// Dense `1..N` entries for ids given in their new order.
    pub fn dense(ids: &[Id]) -> Vec<Self> {
        ids.iter()
            .enumerate()
            .map(|(index, id)| Self {
                id: id.clone(),
                sort_order: index as u32 + 1,
            })
            .collect()
    }
}
