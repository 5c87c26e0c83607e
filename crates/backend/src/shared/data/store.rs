//! In-memory storage of every managed collection.
//!
//! Rows are kept as camelCase JSON objects, already normalized by the typed
//! entity of their kind, so handlers never deal with concrete entity types.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use contracts::domain::common::SortOrderEntry;
use contracts::enums::entity_kind::{EntityKind, IdStrategy};
use serde_json::{Map, Value};
use thiserror::Error;
use tokio::sync::RwLock;

const ID_FIELD: &str = "id";
const SORT_ORDER_FIELD: &str = "sortOrder";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreFailure {
    #[error("unknown collection '{0}'")]
    UnknownCollection(String),
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: String },
    #[error("{kind} {id} already exists")]
    Duplicate { kind: &'static str, id: String },
    #[error("validation failed: {}", .0.join(", "))]
    Invalid(Vec<String>),
}

#[derive(Debug, Default)]
struct Collection {
    rows: Vec<Map<String, Value>>,
    next_id: i64,
    /// Idempotency key -> row returned for it
    replies: HashMap<String, Value>,
}

impl Collection {
    fn position(&self, id: &str) -> Option<usize> {
        self.rows
            .iter()
            .position(|row| row.get(ID_FIELD).map_or(false, |v| id_matches(v, id)))
    }

    fn next_sort_order(&self) -> u64 {
        self.rows
            .iter()
            .filter_map(|row| row.get(SORT_ORDER_FIELD).and_then(Value::as_u64))
            .max()
            .unwrap_or(0)
            + 1
    }
}

/// Хранилище всех коллекций витрины
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<EntityKind, Collection>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from `{ "<collection>": [rows...] }`.
    ///
    /// Seed rows go through the same validation as created ones.
    pub async fn from_seed(seed: Map<String, Value>) -> Result<Self, StoreFailure> {
        let store = Self::new();
        for (collection, rows) in seed {
            let kind = kind_of(&collection)?;
            let rows = match rows {
                Value::Array(rows) => rows,
                _ => return Err(StoreFailure::Invalid(vec![collection])),
            };
            for row in rows {
                store.insert(kind, row).await?;
            }
        }
        Ok(store)
    }

    /// Reads a JSON seed file.
    pub async fn from_seed_file(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let seed: Map<String, Value> = serde_json::from_str(&contents)?;
        let store = Self::from_seed(seed).await?;
        for kind in EntityKind::all() {
            let count = store.list(kind).await.len();
            if count > 0 {
                tracing::info!("Seeded {} {} from {}", count, kind.collection(), path.display());
            }
        }
        Ok(store)
    }

    pub async fn list(&self, kind: EntityKind) -> Vec<Value> {
        let collections = self.collections.read().await;
        collections
            .get(&kind)
            .map(|c| c.rows.iter().cloned().map(Value::Object).collect())
            .unwrap_or_default()
    }

    /// Creates a row. A repeated `idempotency_key` returns the first reply.
    pub async fn create(
        &self,
        kind: EntityKind,
        body: Value,
        idempotency_key: Option<&str>,
    ) -> Result<Value, StoreFailure> {
        let mut body = body;
        if let Value::Object(map) = &mut body {
            map.remove(ID_FIELD);
        }

        // the replay check and the insert share one write guard
        let mut collections = self.collections.write().await;
        let collection = collections.entry(kind).or_default();
        if let Some(key) = idempotency_key {
            if let Some(reply) = collection.replies.get(key) {
                tracing::debug!("Replaying create of {} for key {}", kind.collection(), key);
                return Ok(reply.clone());
            }
        }

        let created = collection.insert(kind, normalize(kind, body)?)?;
        if let Some(key) = idempotency_key {
            collection.replies.insert(key.to_string(), created.clone());
        }
        Ok(created)
    }

    pub async fn update(&self, kind: EntityKind, id: &str, patch: Value) -> Result<Value, StoreFailure> {
        let Value::Object(patch) = patch else {
            return Err(StoreFailure::Invalid(vec!["patch".into()]));
        };
        if patch.is_empty() {
            return Err(StoreFailure::Invalid(vec!["patch".into()]));
        }

        let mut collections = self.collections.write().await;
        let collection = collections.entry(kind).or_default();
        let index = collection.position(id).ok_or_else(|| not_found(kind, id))?;
        let current = &collection.rows[index];

        let mut locked = vec![ID_FIELD];
        if let IdStrategy::NaturalKey(field) = kind.id_strategy() {
            locked.push(field);
        }
        let changed_keys: Vec<String> = locked
            .into_iter()
            .filter(|field| patch.get(*field).map_or(false, |v| Some(v) != current.get(*field)))
            .map(str::to_string)
            .collect();
        if !changed_keys.is_empty() {
            return Err(StoreFailure::Invalid(changed_keys));
        }

        let mut merged = current.clone();
        let id_value = merged.remove(ID_FIELD).unwrap_or(Value::Null);
        for (field, value) in patch {
            merged.insert(field, value);
        }
        let mut normalized = normalize(kind, Value::Object(merged))?;
        normalized.insert(ID_FIELD.to_string(), id_value);

        collection.rows[index] = normalized.clone();
        Ok(Value::Object(normalized))
    }

    pub async fn delete(&self, kind: EntityKind, id: &str) -> Result<(), StoreFailure> {
        let mut collections = self.collections.write().await;
        let collection = collections.entry(kind).or_default();
        let index = collection.position(id).ok_or_else(|| not_found(kind, id))?;
        collection.rows.remove(index);
        Ok(())
    }

    /// Applies `entries` as sort orders; listed rows move to the front in
    /// the given order.
    pub async fn reorder(
        &self,
        kind: EntityKind,
        entries: Vec<SortOrderEntry<Value>>,
    ) -> Result<(), StoreFailure> {
        let ids: Vec<String> = entries.iter().map(|e| id_key(&e.id)).collect();
        let mut seen = HashSet::with_capacity(ids.len());
        if !ids.iter().all(|id| seen.insert(id.as_str())) {
            return Err(StoreFailure::Invalid(vec!["order".into()]));
        }

        let mut collections = self.collections.write().await;
        let collection = collections.entry(kind).or_default();
        let mut indices = Vec::with_capacity(ids.len());
        for id in &ids {
            indices.push(collection.position(id).ok_or_else(|| not_found(kind, id))?);
        }

        let mut rest: Vec<Option<Map<String, Value>>> =
            std::mem::take(&mut collection.rows).into_iter().map(Some).collect();
        let mut reordered = Vec::with_capacity(rest.len());
        for (entry, index) in entries.iter().zip(indices) {
            if let Some(mut row) = rest[index].take() {
                row.insert(SORT_ORDER_FIELD.to_string(), Value::from(entry.sort_order));
                reordered.push(row);
            }
        }
        reordered.extend(rest.into_iter().flatten());
        collection.rows = reordered;
        Ok(())
    }

    /// Validates `body`, assigns its id and appends it.
    async fn insert(&self, kind: EntityKind, body: Value) -> Result<Value, StoreFailure> {
        let row = normalize(kind, body)?;
        let mut collections = self.collections.write().await;
        collections.entry(kind).or_default().insert(kind, row)
    }
}

impl Collection {
    /// Assigns the id of an already normalized row and appends it.
    fn insert(&mut self, kind: EntityKind, mut row: Map<String, Value>) -> Result<Value, StoreFailure> {
        let id = match kind.id_strategy() {
            IdStrategy::AutoIncrement => match row.get(ID_FIELD).and_then(Value::as_i64) {
                // seed rows may carry their own ids
                Some(id) => {
                    self.next_id = self.next_id.max(id);
                    Value::from(id)
                }
                None => {
                    self.next_id += 1;
                    Value::from(self.next_id)
                }
            },
            IdStrategy::NaturalKey(field) => row
                .get(field)
                .cloned()
                .ok_or_else(|| StoreFailure::Invalid(vec![field.to_string()]))?,
        };
        if self.position(&id_key(&id)).is_some() {
            return Err(StoreFailure::Duplicate {
                kind: kind.display_name(),
                id: id_key(&id),
            });
        }

        if row.get(SORT_ORDER_FIELD).and_then(Value::as_u64) == Some(0) {
            row.insert(SORT_ORDER_FIELD.to_string(), Value::from(self.next_sort_order()));
        }
        row.insert(ID_FIELD.to_string(), id.clone());
        self.rows.push(row.clone());
        tracing::info!("Created {} {}", kind.display_name(), id_key(&id));
        Ok(Value::Object(row))
    }
}

/// Resolves a collection path segment.
pub fn kind_of(collection: &str) -> Result<EntityKind, StoreFailure> {
    EntityKind::from_collection(collection)
        .ok_or_else(|| StoreFailure::UnknownCollection(collection.to_string()))
}

fn normalize(kind: EntityKind, body: Value) -> Result<Map<String, Value>, StoreFailure> {
    match kind.validate_json(body).map_err(StoreFailure::Invalid)? {
        Value::Object(map) => Ok(map),
        _ => Err(StoreFailure::Invalid(vec!["body".into()])),
    }
}

fn not_found(kind: EntityKind, id: &str) -> StoreFailure {
    StoreFailure::NotFound {
        kind: kind.display_name(),
        id: id.to_string(),
    }
}

/// Id as it appears in a URL path.
fn id_key(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn id_matches(value: &Value, id: &str) -> bool {
    id_key(value) == id
}
