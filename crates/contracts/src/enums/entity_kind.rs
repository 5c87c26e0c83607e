use serde::{Deserialize, Serialize};

use crate::domain::a001_product::Product;
use crate::domain::a002_supply::Supply;
use crate::domain::a003_offer::Offer;
use crate::domain::a004_policy::Policy;
use crate::domain::a005_filter_group::FilterGroup;
use crate::domain::a006_service::Service;
use crate::domain::a007_page_content::PageContent;
use crate::domain::a008_hero_slide::HeroSlide;
use crate::domain::common::Entity;

/// Виды управляемых коллекций
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Product,
    Supply,
    Offer,
    Policy,
    FilterGroup,
    Service,
    PageContent,
    HeroSlide,
}

/// How the store assigns ids on create.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdStrategy {
    /// Next value of a per-collection counter
    AutoIncrement,
    /// Copy of a natural-key field of the created entity
    NaturalKey(&'static str),
}

impl EntityKind {
    /// Path segment of the collection endpoint
    pub fn collection(&self) -> &'static str {
        match self {
            EntityKind::Product => Product::collection_name(),
            EntityKind::Supply => Supply::collection_name(),
            EntityKind::Offer => Offer::collection_name(),
            EntityKind::Policy => Policy::collection_name(),
            EntityKind::FilterGroup => FilterGroup::collection_name(),
            EntityKind::Service => Service::collection_name(),
            EntityKind::PageContent => PageContent::collection_name(),
            EntityKind::HeroSlide => HeroSlide::collection_name(),
        }
    }

    /// Получить человекочитаемое название
    pub fn display_name(&self) -> &'static str {
        match self {
            EntityKind::Product => Product::element_name(),
            EntityKind::Supply => Supply::element_name(),
            EntityKind::Offer => Offer::element_name(),
            EntityKind::Policy => Policy::element_name(),
            EntityKind::FilterGroup => FilterGroup::element_name(),
            EntityKind::Service => Service::element_name(),
            EntityKind::PageContent => PageContent::element_name(),
            EntityKind::HeroSlide => HeroSlide::element_name(),
        }
    }

    pub fn id_strategy(&self) -> IdStrategy {
        match self {
            EntityKind::PageContent => IdStrategy::NaturalKey("pageKey"),
            _ => IdStrategy::AutoIncrement,
        }
    }

    /// Получить все виды коллекций
    pub fn all() -> Vec<EntityKind> {
        vec![
            EntityKind::Product,
            EntityKind::Supply,
            EntityKind::Offer,
            EntityKind::Policy,
            EntityKind::FilterGroup,
            EntityKind::Service,
            EntityKind::PageContent,
            EntityKind::HeroSlide,
        ]
    }

    /// Парсинг из сегмента URL
    pub fn from_collection(collection: &str) -> Option<Self> {
        Self::all()
            .into_iter()
            .find(|kind| kind.collection() == collection)
    }

    /// Round-trips a JSON body through the typed entity and checks it.
    ///
    /// Returns the normalized body (defaults filled in) or the violated fields.
    pub fn validate_json(&self, body: serde_json::Value) -> Result<serde_json::Value, Vec<String>> {
        match self {
            EntityKind::Product => validate_as::<Product>(body),
            EntityKind::Supply => validate_as::<Supply>(body),
            EntityKind::Offer => validate_as::<Offer>(body),
            EntityKind::Policy => validate_as::<Policy>(body),
            EntityKind::FilterGroup => validate_as::<FilterGroup>(body),
            EntityKind::Service => validate_as::<Service>(body),
            EntityKind::PageContent => validate_as::<PageContent>(body),
            EntityKind::HeroSlide => validate_as::<HeroSlide>(body),
        }
    }
}

fn validate_as<E: Entity>(body: serde_json::Value) -> Result<serde_json::Value, Vec<String>> {
    let entity: E = serde_json::from_value(body).map_err(|e| vec![format!("body: {}", e)])?;
    entity.validate().map_err(|e| e.fields)?;
    serde_json::to_value(&entity).map_err(|e| vec![format!("body: {}", e)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_collection_round_trip() {
        for kind in EntityKind::all() {
            assert_eq!(EntityKind::from_collection(kind.collection()), Some(kind));
        }
        assert_eq!(EntityKind::from_collection("orders"), None);
    }

    #[test]
    fn test_validate_json_fills_defaults() {
        let value = EntityKind::Product
            .validate_json(json!({"name": "Crested gecko", "price": 75.0}))
            .unwrap();
        assert_eq!(value["isAvailable"], true);
        assert_eq!(value["rating"], 0.0);
    }

    #[test]
    fn test_validate_json_reports_fields() {
        let fields = EntityKind::Service
            .validate_json(json!({"title": "Boarding"}))
            .unwrap_err();
        assert_eq!(fields, vec!["imageUrl"]);
    }

    #[test]
    fn test_page_content_uses_natural_key() {
        assert_eq!(
            EntityKind::PageContent.id_strategy(),
            IdStrategy::NaturalKey("pageKey")
        );
        assert_eq!(EntityKind::Offer.id_strategy(), IdStrategy::AutoIncrement);
    }
}
