//! Two-step delete: pick a target, then confirm or cancel.

use contracts::domain::common::Entity;
use contracts::shared::errors::StoreError;

use super::controller::Controller;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmState<Id> {
    Idle,
    /// Awaiting confirmation to delete this id
    Pending(Id),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfirmOutcome<Id> {
    NothingPending,
    Deleted(Id),
    Failed(Id, StoreError),
}

/// Delete confirmation of one list page.
#[derive(Debug, Clone)]
pub struct DeleteConfirmation<Id> {
    state: ConfirmState<Id>,
}

impl<Id: Clone + PartialEq> DeleteConfirmation<Id> {
    pub fn new() -> Self {
        Self {
            state: ConfirmState::Idle,
        }
    }

    pub fn state(&self) -> &ConfirmState<Id> {
        &self.state
    }

    pub fn pending_id(&self) -> Option<&Id> {
        match &self.state {
            ConfirmState::Pending(id) => Some(id),
            ConfirmState::Idle => None,
        }
    }

    pub fn is_pending(&self, id: &Id) -> bool {
        self.pending_id() == Some(id)
    }

    /// Targets `id`, replacing any earlier target.
    pub fn request_delete(&mut self, id: Id) {
        self.state = ConfirmState::Pending(id);
    }

    pub fn cancel(&mut self) {
        self.state = ConfirmState::Idle;
    }

    /// Deletes the pending target through `controller`.
    ///
    /// Returns to `Idle` whatever the outcome.
    pub async fn confirm<E>(&mut self, controller: &Controller<E>) -> ConfirmOutcome<Id>
    where
        E: Entity<Id = Id>,
    {
        let id = match std::mem::replace(&mut self.state, ConfirmState::Idle) {
            ConfirmState::Pending(id) => id,
            ConfirmState::Idle => return ConfirmOutcome::NothingPending,
        };
        match controller.delete(&id).await {
            Ok(()) => ConfirmOutcome::Deleted(id),
            Err(e) => ConfirmOutcome::Failed(id, e),
        }
    }
}

impl<Id: Clone + PartialEq> Default for DeleteConfirmation<Id> {
    fn default() -> Self {
        Self::new()
    }
}
