use chrono::NaiveDate;
use serde::{de::DeserializeOwned, Serialize};
use std::fmt::Debug;

use super::EntityId;
use crate::shared::errors::ValidationError;

/// Трейт для сущностей, редактируемых в админке
///
/// The client state layer is generic over this trait: apart from the id it
/// treats an entity as an opaque camelCase JSON object.
pub trait Entity: Clone + Debug + PartialEq + Serialize + DeserializeOwned + 'static {
    /// Тип идентификатора сущности
    type Id: EntityId;

    // ============================================================================
    // Instance data
    // ============================================================================

    /// `None` until the store has assigned one.
    fn id(&self) -> Option<&Self::Id>;

    fn set_id(&mut self, id: Option<Self::Id>);

    /// Position in an explicitly ordered collection.
    fn sort_order(&self) -> Option<u32> {
        None
    }

    /// No-op for kinds without a `sortOrder` field.
    fn set_sort_order(&mut self, _order: u32) {}

    /// Checks required fields and cross-field rules.
    fn validate(&self) -> Result<(), ValidationError>;

    // ============================================================================
    // Kind metadata
    // ============================================================================

    /// Path segment of the collection endpoint (`/api/{collection}`)
    fn collection_name() -> &'static str;

    /// Имя элемента для UI (единственное число)
    fn element_name() -> &'static str;

    /// Top-level fields that may never be blank.
    fn required_fields() -> &'static [&'static str];

    /// Defaults for a new entity created on `today`.
    fn template(today: NaiveDate) -> Self;
}
