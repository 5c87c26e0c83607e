//! Remote Store Gateway: typed CRUD access to one collection endpoint.

mod http;
mod memory;

pub use http::HttpGateway;
pub use memory::MemoryGateway;

use async_trait::async_trait;
use contracts::domain::common::{Entity, MutationKey};
use contracts::shared::errors::{StoreError, ValidationError};

use super::patch::Patch;

/// Gateway operation, used for logging and for scripting test failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatewayOp {
    List,
    Create,
    Update,
    Delete,
    Reorder,
}

/// CRUD contract of a remote collection.
///
/// Implementations hold no collection state of their own beyond transport
/// configuration, so one instance can serve any number of controllers of
/// the same kind. Every error reaches the caller as a [`StoreError`]; raw
/// transport errors never escape.
#[async_trait(?Send)]
pub trait Gateway<E: Entity> {
    async fn list(&self) -> Result<Vec<E>, StoreError>;

    /// Creates `entity` (its id, if any, is not transmitted) and returns the
    /// stored entity with its assigned id.
    async fn create(&self, entity: &E, key: MutationKey) -> Result<E, StoreError>;

    async fn update(&self, id: &E::Id, patch: &Patch, key: MutationKey) -> Result<E, StoreError>;

    async fn delete(&self, id: &E::Id, key: MutationKey) -> Result<(), StoreError>;

    /// Persists `ids_in_order` as sort orders `1..N`.
    async fn reorder(&self, ids_in_order: &[E::Id], key: MutationKey) -> Result<(), StoreError>;
}

/// Pre-flight check of a create body.
pub fn check_create<E: Entity>(entity: &E) -> Result<(), ValidationError> {
    entity.validate()
}

/// Pre-flight check of an update patch: non-empty, and no required field
/// blanked out.
pub fn check_update<E: Entity>(patch: &Patch) -> Result<(), ValidationError> {
    if patch.is_empty() {
        return Err(ValidationError::field("patch"));
    }
    let blanked: Vec<&str> = E::required_fields()
        .iter()
        .copied()
        .filter(|field| match patch.get(*field) {
            Some(serde_json::Value::Null) => true,
            Some(serde_json::Value::String(s)) => s.trim().is_empty(),
            Some(serde_json::Value::Array(items)) => items.is_empty(),
            _ => false,
        })
        .collect();
    if blanked.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::fields(blanked))
    }
}

/// Pre-flight check of a reorder request: no duplicates, no temporary ids.
pub fn check_reorder<E: Entity>(ids: &[E::Id]) -> Result<(), ValidationError> {
    use contracts::domain::common::EntityId;

    let mut seen = std::collections::HashSet::with_capacity(ids.len());
    let valid = ids.iter().all(|id| !id.is_temporary() && seen.insert(id));
    if valid {
        Ok(())
    } else {
        Err(ValidationError::field("order"))
    }
}
