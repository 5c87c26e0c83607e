use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet, VecDeque};

use async_trait::async_trait;
use contracts::domain::common::{Entity, EntityId, MutationKey};
use contracts::shared::errors::{GatewayError, StoreError};

use super::{check_create, check_reorder, check_update, Gateway, GatewayOp};
use crate::shared::patch::{self, Patch};

/// In-process gateway over an in-memory collection.
///
/// Behaves like the CRUD server (auto-assigned ids, 404 as `conflict`,
/// idempotent creates) and yields once per call so concurrent controller
/// operations interleave the way they would over the network. Failures can be
/// scripted per operation with [`MemoryGateway::fail_next`].
pub struct MemoryGateway<E: Entity> {
    rows: RefCell<Vec<E>>,
    next_seq: Cell<u64>,
    failures: RefCell<HashMap<GatewayOp, VecDeque<GatewayError>>>,
    calls: RefCell<Vec<GatewayOp>>,
    seen_keys: RefCell<HashMap<MutationKey, E>>,
}

impl<E: Entity> MemoryGateway<E> {
    pub fn new() -> Self {
        Self::seeded(Vec::new())
    }

    /// Starts with `rows`; rows without an id get the next sequence id.
    pub fn seeded(rows: Vec<E>) -> Self {
        let gateway = Self {
            rows: RefCell::new(Vec::new()),
            next_seq: Cell::new(1),
            failures: RefCell::new(HashMap::new()),
            calls: RefCell::new(Vec::new()),
            seen_keys: RefCell::new(HashMap::new()),
        };
        for mut row in rows {
            if row.id().is_none() {
                row.set_id(Some(gateway.next_id()));
            }
            gateway.rows.borrow_mut().push(row);
        }
        gateway
    }

    /// Makes the next call of `op` fail with `error`.
    pub fn fail_next(&self, op: GatewayOp, error: GatewayError) {
        self.failures
            .borrow_mut()
            .entry(op)
            .or_default()
            .push_back(error);
    }

    /// Current server-side rows.
    pub fn rows(&self) -> Vec<E> {
        self.rows.borrow().clone()
    }

    /// Every call received so far, in order.
    pub fn calls(&self) -> Vec<GatewayOp> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self, op: GatewayOp) -> usize {
        self.calls.borrow().iter().filter(|c| **c == op).count()
    }

    /// Next sequence id not already taken by a seeded row.
    fn next_id(&self) -> E::Id {
        loop {
            let seq = self.next_seq.get();
            self.next_seq.set(seq + 1);
            let id = E::Id::from_sequence(seq);
            if self.position(&id).is_none() {
                return id;
            }
        }
    }

    /// Records the call, suspends once, then pops a scripted failure if any.
    async fn enter(&self, op: GatewayOp) -> Result<(), GatewayError> {
        self.calls.borrow_mut().push(op);
        tokio::task::yield_now().await;
        let scripted = self
            .failures
            .borrow_mut()
            .get_mut(&op)
            .and_then(VecDeque::pop_front);
        match scripted {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn position(&self, id: &E::Id) -> Option<usize> {
        self.rows.borrow().iter().position(|row| row.id() == Some(id))
    }

    fn not_found(id: &E::Id) -> GatewayError {
        GatewayError::from_status(404, format!("{} {} not found", E::element_name(), id))
    }
}

impl<E: Entity> Default for MemoryGateway<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait(?Send)]
impl<E: Entity> Gateway<E> for MemoryGateway<E> {
    async fn list(&self) -> Result<Vec<E>, StoreError> {
        self.enter(GatewayOp::List).await?;
        Ok(self.rows())
    }

    async fn create(&self, entity: &E, key: MutationKey) -> Result<E, StoreError> {
        check_create(entity)?;
        self.enter(GatewayOp::Create).await?;

        if let Some(previous) = self.seen_keys.borrow().get(&key) {
            return Ok(previous.clone());
        }
        let mut stored = entity.clone();
        stored.set_id(Some(self.next_id()));
        self.rows.borrow_mut().push(stored.clone());
        self.seen_keys.borrow_mut().insert(key, stored.clone());
        Ok(stored)
    }

    async fn update(&self, id: &E::Id, patch: &Patch, _key: MutationKey) -> Result<E, StoreError> {
        check_update::<E>(patch)?;
        self.enter(GatewayOp::Update).await?;

        let index = self.position(id).ok_or_else(|| Self::not_found(id))?;
        let current = self.rows.borrow()[index].clone();
        let updated = patch::apply(&current, patch)?;
        updated.validate()?;
        self.rows.borrow_mut()[index] = updated.clone();
        Ok(updated)
    }

    async fn delete(&self, id: &E::Id, _key: MutationKey) -> Result<(), StoreError> {
        self.enter(GatewayOp::Delete).await?;

        let index = self.position(id).ok_or_else(|| Self::not_found(id))?;
        self.rows.borrow_mut().remove(index);
        Ok(())
    }

    async fn reorder(&self, ids_in_order: &[E::Id], _key: MutationKey) -> Result<(), StoreError> {
        check_reorder::<E>(ids_in_order)?;
        self.enter(GatewayOp::Reorder).await?;

        let mut rows = self.rows.borrow_mut();
        if let Some(missing) = ids_in_order
            .iter()
            .find(|id| !rows.iter().any(|row| row.id() == Some(*id)))
        {
            return Err(Self::not_found(missing).into());
        }

        let listed: HashSet<&E::Id> = ids_in_order.iter().collect();
        let mut reordered = Vec::with_capacity(rows.len());
        for (index, id) in ids_in_order.iter().enumerate() {
            if let Some(row) = rows.iter().find(|row| row.id() == Some(id)) {
                let mut row = row.clone();
                row.set_sort_order(index as u32 + 1);
                reordered.push(row);
            }
        }
        reordered.extend(
            rows.iter()
                .filter(|row| row.id().map_or(true, |id| !listed.contains(id)))
                .cloned(),
        );
        *rows = reordered;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a001_product::Product;
    use contracts::shared::errors::GatewayErrorKind;

    #[tokio::test]
    async fn test_create_assigns_sequence_ids() {
        let gateway = MemoryGateway::seeded(vec![Product::new("Corn snake", 60.0)]);
        let created = gateway
            .create(&Product::new("Ball python", 120.0), MutationKey::new_v4())
            .await
            .unwrap();
        assert_eq!(created.id, Some(2));
        assert_eq!(gateway.rows().len(), 2);
    }

    #[tokio::test]
    async fn test_create_skips_seeded_ids() {
        let mut seeded = Product::new("Corn snake", 60.0);
        seeded.id = Some(1);
        let gateway = MemoryGateway::seeded(vec![seeded]);
        let created = gateway
            .create(&Product::new("Ball python", 120.0), MutationKey::new_v4())
            .await
            .unwrap();
        assert_eq!(created.id, Some(2));
    }

    #[tokio::test]
    async fn test_create_is_idempotent_per_key() {
        let gateway = MemoryGateway::<Product>::new();
        let key = MutationKey::new_v4();
        let first = gateway.create(&Product::new("Tegu", 400.0), key).await.unwrap();
        let retry = gateway.create(&Product::new("Tegu", 400.0), key).await.unwrap();
        assert_eq!(first, retry);
        assert_eq!(gateway.rows().len(), 1);
    }

    #[tokio::test]
    async fn test_validation_fails_without_a_call() {
        let gateway = MemoryGateway::<Product>::new();
        let err = gateway
            .create(&Product::new("", 10.0), MutationKey::new_v4())
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert!(gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn test_missing_id_is_conflict() {
        let gateway = MemoryGateway::<Product>::new();
        let err = gateway.delete(&9, MutationKey::new_v4()).await.unwrap_err();
        assert_eq!(err.gateway_kind(), Some(GatewayErrorKind::Conflict));
    }

    #[tokio::test]
    async fn test_scripted_failure_is_consumed_once() {
        let gateway = MemoryGateway::<Product>::new();
        gateway.fail_next(GatewayOp::List, GatewayError::timeout("slow"));
        assert_eq!(
            gateway.list().await.unwrap_err().gateway_kind(),
            Some(GatewayErrorKind::Timeout)
        );
        assert!(gateway.list().await.is_ok());
        assert_eq!(gateway.call_count(GatewayOp::List), 2);
    }
}
