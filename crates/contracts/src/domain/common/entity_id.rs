use serde::{de::DeserializeOwned, Serialize};
use std::fmt;
use std::hash::Hash;

/// Prefix of locally assigned ids for string-keyed collections.
const TEMPORARY_PREFIX: &str = "tmp-";

/// Identifier of an entity inside its collection.
///
/// Ids are assigned by the store on create. Until the store answers, the
/// client keeps the entity under a *temporary* id that can never collide
/// with a store-assigned one.
pub trait EntityId:
    Clone + PartialEq + Eq + Hash + Ord + Serialize + DeserializeOwned + fmt::Debug + fmt::Display + 'static
{
    /// Преобразовать ID в строку (URL path segment)
    fn as_string(&self) -> String {
        self.to_string()
    }

    /// Создать ID из строки
    fn from_string(s: &str) -> Result<Self, String>;

    /// Local placeholder for the `seq`-th optimistic create.
    fn temporary(seq: u64) -> Self;

    /// `true` for ids produced by [`EntityId::temporary`].
    fn is_temporary(&self) -> bool;

    /// Store-side id for the `seq`-th insert into a collection (starting at 1).
    fn from_sequence(seq: u64) -> Self;
}

// Store ids for integer collections are positive auto-increment values,
// so the negative range is free for temporaries.
impl EntityId for i64 {
    fn from_string(s: &str) -> Result<Self, String> {
        s.parse::<i64>().map_err(|e| format!("Invalid i64: {}", e))
    }

    fn temporary(seq: u64) -> Self {
        -(seq as i64) - 1
    }

    fn is_temporary(&self) -> bool {
        *self < 0
    }

    fn from_sequence(seq: u64) -> Self {
        seq as i64
    }
}

impl EntityId for String {
    fn from_string(s: &str) -> Result<Self, String> {
        if s.trim().is_empty() {
            return Err("Empty id".to_string());
        }
        Ok(s.to_string())
    }

    fn temporary(seq: u64) -> Self {
        format!("{}{}", TEMPORARY_PREFIX, seq)
    }

    fn is_temporary(&self) -> bool {
        self.starts_with(TEMPORARY_PREFIX)
    }

    fn from_sequence(seq: u64) -> Self {
        seq.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_temporaries_never_collide_with_store_ids() {
        for seq in 0..100 {
            let tmp = i64::temporary(seq);
            assert!(tmp.is_temporary());
            assert!(!i64::from_sequence(seq + 1).is_temporary());
        }
        assert_ne!(i64::temporary(0), i64::temporary(1));
    }

    #[test]
    fn test_string_temporaries() {
        let tmp = String::temporary(3);
        assert_eq!(tmp, "tmp-3");
        assert!(tmp.is_temporary());
        assert!(!"about-us".to_string().is_temporary());
    }

    #[test]
    fn test_from_string() {
        assert_eq!(i64::from_string("42"), Ok(42));
        assert!(i64::from_string("abc").is_err());
        assert!(String::from_string("  ").is_err());
        assert_eq!(String::from_string("faq"), Ok("faq".to_string()));
    }
}
