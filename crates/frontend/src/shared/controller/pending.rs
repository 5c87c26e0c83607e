use contracts::domain::common::MutationKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    Create,
    Update,
    Delete,
    Reorder,
}

/// A mutation that has been applied locally and sent to the gateway but not
/// yet confirmed or rolled back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMutation<Id> {
    /// Idempotency key sent with the request
    pub key: MutationKey,
    pub kind: MutationKind,
    pub ids: Vec<Id>,
}

impl<Id: PartialEq> PendingMutation<Id> {
    pub fn targets(&self, id: &Id) -> bool {
        self.ids.contains(id)
    }
}
