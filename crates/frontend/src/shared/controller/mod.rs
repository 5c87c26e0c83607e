//! Entity Collection Controller.
//!
//! Owns the in-memory collection of one entity kind for the lifetime of a
//! management page. Every write goes through a named operation that
//!
//! 1. waits for earlier mutations of the same id (FIFO),
//! 2. applies the change locally and synchronously,
//! 3. suspends once at the gateway call,
//! 4. merges the confirmed entity or restores the snapshot taken in step 2.
//!
//! Readers only ever see a fully applied or fully rolled back collection.

mod locks;
mod pending;
#[cfg(test)]
mod tests;

pub use locks::ConcurrencyError;
pub use pending::{MutationKind, PendingMutation};

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use contracts::domain::common::{Entity, EntityId, MutationKey};
use contracts::shared::errors::{GatewayError, StoreError, ValidationError};
use futures::future::{FutureExt, LocalBoxFuture, Shared};
use serde_json::Value;
use tokio::sync::watch;

use self::locks::{MutationGuard, MutationLocks};
use super::gateway::Gateway;
use super::patch::{self, Patch};

type LoadRequest<E> = Shared<LocalBoxFuture<'static, Result<Vec<E>, StoreError>>>;

/// A write the store confirmed while a load was in flight. Its list may
/// predate the write, so these are replayed over it.
enum Confirmed<E: Entity> {
    Stored(E),
    Removed(E::Id),
}

/// Relation of the local collection to the last known server state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionStatus {
    /// Matches the last confirmed server state
    Clean,
    /// Optimistic edits are applied locally and await confirmation
    Dirty,
    /// A `load` is replacing the collection
    Reconciling,
}

pub struct Controller<E: Entity> {
    gateway: Rc<dyn Gateway<E>>,
    items: RefCell<Vec<E>>,
    locks: MutationLocks<E::Id>,
    /// Temporary id -> store id, for mutations queued behind a create
    aliases: RefCell<HashMap<E::Id, E::Id>>,
    pending: RefCell<Vec<PendingMutation<E::Id>>>,
    loading: RefCell<Option<LoadRequest<E>>>,
    confirmed_during_load: RefCell<Vec<Confirmed<E>>>,
    /// Bumped whenever a load replaces the collection
    load_generation: Cell<u64>,
    temp_seq: Cell<u64>,
    revision: watch::Sender<u64>,
    last_error: RefCell<Option<StoreError>>,
}

impl<E: Entity> Controller<E> {
    pub fn new(gateway: Rc<dyn Gateway<E>>) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            gateway,
            items: RefCell::new(Vec::new()),
            locks: MutationLocks::new(),
            aliases: RefCell::new(HashMap::new()),
            pending: RefCell::new(Vec::new()),
            loading: RefCell::new(None),
            confirmed_during_load: RefCell::new(Vec::new()),
            load_generation: Cell::new(0),
            temp_seq: Cell::new(0),
            revision,
            last_error: RefCell::new(None),
        }
    }

    // ========================================================================
    // Read side
    // ========================================================================

    pub fn snapshot(&self) -> Vec<E> {
        self.items.borrow().clone()
    }

    pub fn get(&self, id: &E::Id) -> Option<E> {
        let id = self.resolve(id);
        self.items
            .borrow()
            .iter()
            .find(|item| item.id() == Some(&id))
            .cloned()
    }

    pub fn contains(&self, id: &E::Id) -> bool {
        self.position_of(&self.resolve(id)).is_some()
    }

    pub fn ids(&self) -> Vec<E::Id> {
        self.items
            .borrow()
            .iter()
            .filter_map(|item| item.id().cloned())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    pub fn status(&self) -> CollectionStatus {
        if self.loading.borrow().is_some() {
            CollectionStatus::Reconciling
        } else if !self.pending.borrow().is_empty() {
            CollectionStatus::Dirty
        } else {
            CollectionStatus::Clean
        }
    }

    /// Mutations currently awaiting the gateway.
    pub fn pending(&self) -> Vec<PendingMutation<E::Id>> {
        self.pending.borrow().clone()
    }

    /// Ticks on every local change; subscribers re-read [`snapshot`](Self::snapshot).
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    /// Most recent failure, kept for display until cleared.
    pub fn last_error(&self) -> Option<StoreError> {
        self.last_error.borrow().clone()
    }

    pub fn clear_error(&self) {
        self.last_error.borrow_mut().take();
    }

    // ========================================================================
    // Load
    // ========================================================================

    /// Replaces the collection with the store's list.
    ///
    /// Calls made while a load is in flight share its request and result.
    pub async fn load(&self) -> Result<(), StoreError> {
        let request = self.begin_load();
        let result = request.clone().await;

        let owner = {
            let mut loading = self.loading.borrow_mut();
            match loading.as_ref() {
                Some(current) if current.ptr_eq(&request) => {
                    loading.take();
                    true
                }
                _ => false,
            }
        };
        if owner {
            let confirmed = self.confirmed_during_load.take();
            match &result {
                Ok(items) => {
                    let mut items = items.clone();
                    for write in confirmed {
                        apply_confirmed(&mut items, write);
                    }
                    log::debug!("loaded {} {}", items.len(), E::collection_name());
                    self.replace_all(items);
                    self.load_generation.set(self.load_generation.get() + 1);
                }
                Err(e) => self.record_error(e),
            }
            self.touch();
        }
        result.map(|_| ())
    }

    /// Re-fetch after writes; same contract as [`load`](Self::load).
    pub async fn reload(&self) -> Result<(), StoreError> {
        self.load().await
    }

    fn begin_load(&self) -> LoadRequest<E> {
        let mut loading = self.loading.borrow_mut();
        if let Some(request) = loading.as_ref() {
            log::debug!("joining in-flight load of {}", E::collection_name());
            return request.clone();
        }

        let gateway = Rc::clone(&self.gateway);
        let request = async move { gateway.list().await }.boxed_local().shared();
        *loading = Some(request.clone());
        drop(loading);
        self.confirmed_during_load.borrow_mut().clear();
        self.touch();
        request
    }

    fn replace_all(&self, mut items: Vec<E>) {
        let mut seen = HashSet::with_capacity(items.len());
        items.retain(|item| match item.id() {
            Some(id) => {
                let fresh = seen.insert(id.clone());
                if !fresh {
                    log::warn!("dropping duplicate {} {} from list", E::element_name(), id);
                }
                fresh
            }
            None => {
                log::warn!("dropping {} without id from list", E::element_name());
                false
            }
        });
        if items.iter().all(|item| item.sort_order().is_some()) {
            items.sort_by_key(|item| item.sort_order());
        }
        *self.items.borrow_mut() = items;
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Inserts `draft` at the tail under a temporary id, then swaps in the
    /// stored entity.
    pub async fn create(&self, draft: E) -> Result<E, StoreError> {
        if let Err(e) = draft.validate() {
            return self.fail(e.into());
        }

        let temp = self.next_temporary_id();
        let mut optimistic = draft;
        optimistic.set_id(Some(temp.clone()));

        let _guard = self.locks.acquire(std::slice::from_ref(&temp)).await;
        let key = self.begin_mutation(MutationKind::Create, vec![temp.clone()]);
        self.items.borrow_mut().push(optimistic.clone());
        self.touch();

        let result = self.gateway.create(&optimistic, key).await;
        self.end_mutation(key);

        let created = match result {
            Ok(created) => created,
            Err(e) => {
                self.remove_local(&temp);
                self.touch();
                log::warn!("create of {} rolled back: {}", E::element_name(), e);
                return self.fail(e);
            }
        };
        let Some(id) = created.id().cloned() else {
            self.remove_local(&temp);
            self.touch();
            return self.fail(GatewayError::server("Created entity has no id").into());
        };

        self.aliases.borrow_mut().insert(temp.clone(), id.clone());
        self.remember(Confirmed::Stored(created.clone()));
        {
            let mut items = self.items.borrow_mut();
            match position(&items, &temp) {
                Some(index) => {
                    items[index] = created.clone();
                    // a load that finished meanwhile may already list it
                    let mut first = true;
                    items.retain(|item| {
                        if item.id() != Some(&id) {
                            return true;
                        }
                        std::mem::replace(&mut first, false)
                    });
                }
                None => match position(&items, &id) {
                    Some(index) => items[index] = created.clone(),
                    None => items.push(created.clone()),
                },
            }
        }
        self.touch();
        log::info!("created {} {}", E::element_name(), id);
        Ok(created)
    }

    /// Merges `patch` locally, then persists it.
    pub async fn update(&self, id: &E::Id, patch: Patch) -> Result<E, StoreError> {
        let (_guard, id) = self.lock_entity(id).await;
        self.update_locked(&id, patch).await
    }

    /// Flips a boolean field such as `isActive` or `isPublished`.
    pub async fn toggle(&self, id: &E::Id, field: &str) -> Result<E, StoreError> {
        let (_guard, id) = self.lock_entity(id).await;
        let Some(current) = self.local(&id) else {
            return self.fail(self.missing(&id));
        };
        let Some(value) = patch::read_bool(&current, field) else {
            return self.fail(ValidationError::field(field).into());
        };

        let mut flip = Patch::new();
        flip.insert(field.to_string(), Value::Bool(!value));
        self.update_locked(&id, flip).await
    }

    /// Removes the entity locally, then deletes it in the store.
    ///
    /// On failure the entity goes back to the index it was removed from.
    pub async fn delete(&self, id: &E::Id) -> Result<(), StoreError> {
        let (_guard, id) = self.lock_entity(id).await;
        let Some(index) = self.position_of(&id) else {
            return self.fail(self.missing(&id));
        };

        let key = self.begin_mutation(MutationKind::Delete, vec![id.clone()]);
        let removed = self.items.borrow_mut().remove(index);
        self.touch();
        let generation = self.load_generation.get();

        let result = self.gateway.delete(&id, key).await;
        self.end_mutation(key);

        match result {
            Ok(()) => {
                // a load may have listed it again while the delete was in flight
                self.remove_local(&id);
                self.remember(Confirmed::Removed(id.clone()));
                self.aliases.borrow_mut().retain(|_, target| *target != id);
                self.touch();
                log::info!("deleted {} {}", E::element_name(), id);
                Ok(())
            }
            Err(e) => {
                if self.load_generation.get() == generation {
                    let mut items = self.items.borrow_mut();
                    if position(&items, &id).is_none() {
                        let at = index.min(items.len());
                        items.insert(at, removed);
                    }
                }
                self.touch();
                log::warn!("delete of {} {} rolled back: {}", E::element_name(), id, e);
                self.fail(e)
            }
        }
    }

    /// Puts the collection in `new_order` with sort orders `1..N`.
    ///
    /// `new_order` must list every saved entity exactly once. Entities still
    /// awaiting their create stay at the tail.
    pub async fn reorder(&self, new_order: &[E::Id]) -> Result<(), StoreError> {
        let order: Vec<E::Id> = new_order.iter().map(|id| self.resolve(id)).collect();
        if let Err(e) = self.check_permutation(&order) {
            return self.fail(e.into());
        }

        let _guard = self.locks.acquire(&order).await;
        if self.check_permutation(&order).is_err() {
            return self.fail(
                GatewayError::conflict("The collection changed while the reorder was queued").into(),
            );
        }

        let previous = self.snapshot();
        let listed: HashSet<E::Id> = order.iter().cloned().collect();
        let unlisted = |items: &[E]| -> Vec<E> {
            items
                .iter()
                .filter(|item| item.id().map_or(true, |id| !listed.contains(id)))
                .cloned()
                .collect()
        };
        let mut reordered: Vec<E> = order
            .iter()
            .enumerate()
            .filter_map(|(index, id)| {
                let mut item = previous.iter().find(|item| item.id() == Some(id))?.clone();
                item.set_sort_order(index as u32 + 1);
                Some(item)
            })
            .collect();
        let confirmed = reordered.clone();
        reordered.extend(unlisted(previous.as_slice()));

        let key = self.begin_mutation(MutationKind::Reorder, order.clone());
        *self.items.borrow_mut() = reordered;
        self.touch();
        let generation = self.load_generation.get();

        let result = self.gateway.reorder(&order, key).await;
        self.end_mutation(key);

        match result {
            Ok(()) => {
                if self.load_generation.get() != generation {
                    let mut items = self.snapshot();
                    for item in &confirmed {
                        if let Some(index) = item.id().and_then(|id| position(&items, id)) {
                            items[index] = item.clone();
                        }
                    }
                    self.replace_all(items);
                    self.touch();
                }
                for item in confirmed {
                    self.remember(Confirmed::Stored(item));
                }
                Ok(())
            }
            Err(e) => {
                if self.load_generation.get() == generation {
                    let mut items = self.items.borrow_mut();
                    let mut restored: Vec<E> = previous
                        .into_iter()
                        .filter(|item| item.id().map_or(false, |id| listed.contains(id)))
                        .collect();
                    restored.extend(unlisted(items.as_slice()));
                    *items = restored;
                }
                self.touch();
                log::warn!("reorder of {} rolled back: {}", E::collection_name(), e);
                self.fail(e)
            }
        }
    }

    // ========================================================================
    // Internals
    // ========================================================================

    /// Update body shared by `update` and `toggle`; the id lock is held.
    async fn update_locked(&self, id: &E::Id, patch: Patch) -> Result<E, StoreError> {
        let Some(index) = self.position_of(id) else {
            return self.fail(self.missing(id));
        };
        let snapshot = self.items.borrow()[index].clone();
        let patched = match patch::apply(&snapshot, &patch).and_then(|p| p.validate().map(|_| p)) {
            Ok(patched) => patched,
            Err(e) => return self.fail(e.into()),
        };

        let key = self.begin_mutation(MutationKind::Update, vec![id.clone()]);
        self.items.borrow_mut()[index] = patched;
        self.touch();
        let generation = self.load_generation.get();

        let result = self.gateway.update(id, &patch, key).await;
        self.end_mutation(key);

        match result {
            Ok(mut stored) => {
                if stored.id().is_none() {
                    stored.set_id(Some(id.clone()));
                }
                if let Some(index) = self.position_of(id) {
                    self.items.borrow_mut()[index] = stored.clone();
                }
                self.remember(Confirmed::Stored(stored.clone()));
                self.touch();
                Ok(stored)
            }
            Err(e) => {
                // a load that landed meanwhile already shows the store's value
                if self.load_generation.get() == generation {
                    if let Some(index) = self.position_of(id) {
                        self.items.borrow_mut()[index] = snapshot;
                    }
                }
                self.touch();
                log::warn!("update of {} {} rolled back: {}", E::element_name(), id, e);
                self.fail(e)
            }
        }
    }

    /// Locks `id`, following it to its store id if a create resolved while
    /// this caller was queued.
    async fn lock_entity(&self, id: &E::Id) -> (MutationGuard<E::Id>, E::Id) {
        let mut id = self.resolve(id);
        let mut guard = self.locks.acquire(std::slice::from_ref(&id)).await;
        loop {
            let resolved = self.resolve(&id);
            if resolved == id {
                return (guard, id);
            }
            // keep the old lock until queued on the new one
            guard = self.locks.acquire(std::slice::from_ref(&resolved)).await;
            id = resolved;
        }
    }

    fn resolve(&self, id: &E::Id) -> E::Id {
        let aliases = self.aliases.borrow();
        let mut current = id;
        while let Some(next) = aliases.get(current) {
            current = next;
        }
        current.clone()
    }

    /// `order` must be a permutation of the saved ids.
    fn check_permutation(&self, order: &[E::Id]) -> Result<(), ValidationError> {
        let items = self.items.borrow();
        let saved = items
            .iter()
            .filter(|item| item.id().map_or(false, |id| !id.is_temporary()))
            .count();
        let mut seen = HashSet::with_capacity(order.len());
        let valid = order.len() == saved
            && order.iter().all(|id| {
                !id.is_temporary() && seen.insert(id) && position(&items, id).is_some()
            });
        if valid {
            Ok(())
        } else {
            Err(ValidationError::field("order"))
        }
    }

    fn next_temporary_id(&self) -> E::Id {
        let seq = self.temp_seq.get();
        self.temp_seq.set(seq + 1);
        E::Id::temporary(seq)
    }

    fn begin_mutation(&self, kind: MutationKind, ids: Vec<E::Id>) -> MutationKey {
        let key = MutationKey::new_v4();
        self.pending
            .borrow_mut()
            .push(PendingMutation { key, kind, ids });
        key
    }

    fn end_mutation(&self, key: MutationKey) {
        self.pending.borrow_mut().retain(|m| m.key != key);
    }

    fn local(&self, id: &E::Id) -> Option<E> {
        self.items
            .borrow()
            .iter()
            .find(|item| item.id() == Some(id))
            .cloned()
    }

    fn position_of(&self, id: &E::Id) -> Option<usize> {
        position(&self.items.borrow(), id)
    }

    fn remove_local(&self, id: &E::Id) {
        self.items.borrow_mut().retain(|item| item.id() != Some(id));
    }

    fn missing(&self, id: &E::Id) -> StoreError {
        GatewayError::conflict(format!("{} {} is not in the collection", E::element_name(), id)).into()
    }

    fn record_error(&self, error: &StoreError) {
        log::warn!("{}: {}", E::collection_name(), error);
        *self.last_error.borrow_mut() = Some(error.clone());
    }

    fn fail<T>(&self, error: StoreError) -> Result<T, StoreError> {
        self.record_error(&error);
        Err(error)
    }

    fn remember(&self, write: Confirmed<E>) {
        if self.loading.borrow().is_some() {
            self.confirmed_during_load.borrow_mut().push(write);
        }
    }

    fn touch(&self) {
        self.revision.send_modify(|revision| *revision += 1);
    }
}

fn position<E: Entity>(items: &[E], id: &E::Id) -> Option<usize> {
    items.iter().position(|item| item.id() == Some(id))
}

fn apply_confirmed<E: Entity>(items: &mut Vec<E>, write: Confirmed<E>) {
    match write {
        Confirmed::Removed(id) => items.retain(|item| item.id() != Some(&id)),
        Confirmed::Stored(entity) => {
            let Some(id) = entity.id().cloned() else {
                return;
            };
            match position(items, &id) {
                Some(index) => items[index] = entity,
                None => items.push(entity),
            }
        }
    }
}
