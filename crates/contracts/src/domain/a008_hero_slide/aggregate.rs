use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::common::Entity;
use crate::shared::errors::ValidationError;
use crate::shared::validation::RequiredFields;

/// Слайд главного баннера
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroSlide {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub link_url: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub sort_order: u32,
}

impl Entity for HeroSlide {
    type Id = i64;

    fn id(&self) -> Option<&i64> {
        self.id.as_ref()
    }

    fn set_id(&mut self, id: Option<i64>) {
        self.id = id;
    }

    fn sort_order(&self) -> Option<u32> {
        Some(self.sort_order)
    }

    fn set_sort_order(&mut self, order: u32) {
        self.sort_order = order;
    }

    fn validate(&self) -> Result<(), ValidationError> {
        RequiredFields::new()
            .text("title", &self.title)
            .text("imageUrl", &self.image_url)
            .finish()
    }

    fn collection_name() -> &'static str {
        "hero-slides"
    }

    fn element_name() -> &'static str {
        "Hero slide"
    }

    fn required_fields() -> &'static [&'static str] {
        &["title", "imageUrl"]
    }

    fn template(_today: NaiveDate) -> Self {
        Self {
            id: None,
            title: String::new(),
            subtitle: String::new(),
            image_url: String::new(),
            link_url: None,
            is_active: true,
            sort_order: 0,
        }
    }
}
