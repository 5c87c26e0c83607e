//! Per-entity mutation locks.
//!
//! Each id owns a FIFO mutex: a mutation waits for every earlier mutation of
//! the same id to resolve before it touches local state or the gateway.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;
use std::rc::Rc;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Two holders of the same id lock at once. Never expected at runtime.
#[derive(Debug, Error)]
#[error("mutation lock for {id} is already held")]
pub struct ConcurrencyError {
    pub id: String,
}

pub(crate) struct MutationLocks<Id> {
    locks: RefCell<HashMap<Id, Arc<Mutex<()>>>>,
    held: Rc<RefCell<HashSet<Id>>>,
}

impl<Id: Clone + Eq + Hash + Ord + Debug> MutationLocks<Id> {
    pub(crate) fn new() -> Self {
        Self {
            locks: RefCell::new(HashMap::new()),
            held: Rc::new(RefCell::new(HashSet::new())),
        }
    }

    /// Waits until this caller is first in line for every id.
    ///
    /// Ids are locked in sorted order, so two multi-id requests cannot
    /// deadlock each other.
    pub(crate) async fn acquire(&self, ids: &[Id]) -> MutationGuard<Id> {
        self.prune();

        let mut unique: Vec<Id> = ids.to_vec();
        unique.sort();
        unique.dedup();

        let mut guards = Vec::with_capacity(unique.len());
        for id in &unique {
            let lock = self
                .locks
                .borrow_mut()
                .entry(id.clone())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone();
            guards.push(lock.lock_owned().await);

            let inserted = self.held.borrow_mut().insert(id.clone());
            if !inserted {
                log::error!("{}", ConcurrencyError { id: format!("{:?}", id) });
            }
            debug_assert!(inserted, "mutation lock for {:?} is already held", id);
        }

        MutationGuard {
            ids: unique,
            guards,
            held: Rc::clone(&self.held),
        }
    }

    /// Drops map entries nobody holds or waits for.
    pub(crate) fn prune(&self) {
        self.locks
            .borrow_mut()
            .retain(|_, lock| Arc::strong_count(lock) > 1);
    }

    #[cfg(test)]
    pub(crate) fn tracked(&self) -> usize {
        self.locks.borrow().len()
    }
}

/// Held locks; released on drop.
pub(crate) struct MutationGuard<Id: Eq + Hash> {
    ids: Vec<Id>,
    guards: Vec<OwnedMutexGuard<()>>,
    held: Rc<RefCell<HashSet<Id>>>,
}

impl<Id: Eq + Hash> Drop for MutationGuard<Id> {
    fn drop(&mut self) {
        let mut held = self.held.borrow_mut();
        for id in &self.ids {
            held.remove(id);
        }
        self.guards.clear();
    }
}
