//! Common types and traits for all admin-managed entities

pub mod entity;
pub mod entity_id;
pub mod mutation;

// Re-exports
pub use entity::Entity;
pub use entity_id::EntityId;
pub use mutation::{MutationKey, SortOrderEntry, IDEMPOTENCY_KEY_HEADER};
