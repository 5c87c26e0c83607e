//! JSON-level editing of entities.
//!
//! The controller and the draft buffer are generic over entity shape, so
//! partial updates travel as camelCase JSON objects and are merged into the
//! serialized entity before it is read back into its typed form.

use contracts::domain::common::Entity;
use contracts::shared::errors::ValidationError;
use serde_json::{Map, Value};

/// Partial update: top-level camelCase field -> new value
pub type Patch = Map<String, Value>;

const ID_FIELD: &str = "id";

/// Returns `entity` with `patch` merged in.
///
/// A patch may not change the id. Values that do not fit their field are
/// reported by field name.
pub fn apply<E: Entity>(entity: &E, patch: &Patch) -> Result<E, ValidationError> {
    let base = to_object(entity)?;

    if let Some(new_id) = patch.get(ID_FIELD) {
        if base.get(ID_FIELD).unwrap_or(&Value::Null) != new_id {
            return Err(ValidationError::field(ID_FIELD));
        }
    }

    let mut merged = base.clone();
    for (field, value) in patch {
        merged.insert(field.clone(), value.clone());
    }

    serde_json::from_value(Value::Object(merged)).map_err(|_| {
        // Re-try field by field to name the offenders.
        let mut bad: Vec<String> = patch
            .iter()
            .filter(|(field, value)| {
                let mut single = base.clone();
                single.insert((*field).clone(), (*value).clone());
                serde_json::from_value::<E>(Value::Object(single)).is_err()
            })
            .map(|(field, _)| field.clone())
            .collect();
        if bad.is_empty() {
            bad = patch.keys().cloned().collect();
        }
        ValidationError { fields: bad }
    })
}

/// Top-level fields whose values differ between `before` and `after`.
pub fn diff<E: Entity>(before: &E, after: &E) -> Result<Patch, ValidationError> {
    let before = to_object(before)?;
    let after = to_object(after)?;

    let mut patch = Patch::new();
    for (field, value) in &after {
        if before.get(field) != Some(value) {
            patch.insert(field.clone(), value.clone());
        }
    }
    for field in before.keys() {
        if !after.contains_key(field) {
            patch.insert(field.clone(), Value::Null);
        }
    }
    patch.remove(ID_FIELD);
    Ok(patch)
}

/// Current value of a boolean top-level field.
pub fn read_bool<E: Entity>(entity: &E, field: &str) -> Option<bool> {
    to_object(entity).ok()?.get(field)?.as_bool()
}

/// Sets the value at a dot path (`options.0.label`) inside `target`.
///
/// Every segment but the last must already exist; the last one may add a
/// key to an object but never grows an array.
pub fn set_path(target: &mut Value, path: &str, value: Value) -> Result<(), ValidationError> {
    let invalid = || ValidationError::field(path);
    let segments: Vec<&str> = path.split('.').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(invalid());
    }

    let (last, parents) = segments.split_last().ok_or_else(invalid)?;
    let mut cursor = target;
    for segment in parents {
        cursor = match cursor {
            Value::Object(map) => map.get_mut(*segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get_mut(i)),
            _ => None,
        }
        .ok_or_else(invalid)?;
    }

    match cursor {
        Value::Object(map) => {
            map.insert(last.to_string(), value);
            Ok(())
        }
        Value::Array(items) => {
            let slot = last
                .parse::<usize>()
                .ok()
                .and_then(|i| items.get_mut(i))
                .ok_or_else(invalid)?;
            *slot = value;
            Ok(())
        }
        _ => Err(invalid()),
    }
}

fn to_object<E: Entity>(entity: &E) -> Result<Map<String, Value>, ValidationError> {
    match serde_json::to_value(entity) {
        Ok(Value::Object(map)) => Ok(map),
        _ => Err(ValidationError::field(E::element_name())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a001_product::Product;
    use serde_json::json;

    fn gecko() -> Product {
        let mut p = Product::new("Leopard gecko", 89.0);
        p.id = Some(1);
        p
    }

    fn patch(value: Value) -> Patch {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_apply_merges_only_given_fields() {
        let updated = apply(&gecko(), &patch(json!({"price": 79.5}))).unwrap();
        assert_eq!(updated.price, 79.5);
        assert_eq!(updated.name, "Leopard gecko");
        assert_eq!(updated.id, Some(1));
    }

    #[test]
    fn test_apply_rejects_id_change() {
        let err = apply(&gecko(), &patch(json!({"id": 2}))).unwrap_err();
        assert_eq!(err.fields, vec!["id"]);
        assert!(apply(&gecko(), &patch(json!({"id": 1}))).is_ok());
    }

    #[test]
    fn test_apply_names_mistyped_fields() {
        let err = apply(
            &gecko(),
            &patch(json!({"price": "cheap", "name": "Gecko", "isActive": 3})),
        )
        .unwrap_err();
        assert_eq!(err.fields, vec!["isActive", "price"]);
    }

    #[test]
    fn test_diff_skips_unchanged_and_id() {
        let before = gecko();
        let mut after = gecko();
        after.rating = 4.95;
        after.is_available = false;
        let p = diff(&before, &after).unwrap();
        assert_eq!(p, patch(json!({"rating": 4.95, "isAvailable": false})));
    }

    #[test]
    fn test_read_bool() {
        assert_eq!(read_bool(&gecko(), "isActive"), Some(true));
        assert_eq!(read_bool(&gecko(), "name"), None);
        assert_eq!(read_bool(&gecko(), "missing"), None);
    }

    #[test]
    fn test_set_path_nested() {
        let mut value = json!({"name": "Habitat", "options": [{"label": "Desert"}]});
        set_path(&mut value, "options.0.label", json!("Arid")).unwrap();
        assert_eq!(value["options"][0]["label"], "Arid");

        assert!(set_path(&mut value, "options.3.label", json!("x")).is_err());
        assert!(set_path(&mut value, "options.0", json!({"label": "Rainforest"})).is_ok());
        assert!(set_path(&mut value, "", json!(1)).is_err());
        assert!(set_path(&mut value, "name.first", json!(1)).is_err());
    }
}
