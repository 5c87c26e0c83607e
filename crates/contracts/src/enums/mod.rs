pub mod entity_kind;
