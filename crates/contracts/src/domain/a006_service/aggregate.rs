use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::common::Entity;
use crate::shared::errors::ValidationError;
use crate::shared::validation::RequiredFields;

/// Услуга магазина (boarding, enclosure setup, vet referral)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub sort_order: u32,
}

impl Entity for Service {
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
            .check(
                "price",
                self.price.map_or(true, |p| p.is_finite() && p >= 0.0),
            )
            .finish()
    }

    fn collection_name() -> &'static str {
        "services"
    }

    fn element_name() -> &'static str {
        "Service"
    }

    fn required_fields() -> &'static [&'static str] {
        &["title", "imageUrl"]
    }

    fn template(_today: NaiveDate) -> Self {
        Self {
            id: None,
            title: String::new(),
            description: String::new(),
            image_url: String::new(),
            price: None,
            is_active: true,
            sort_order: 0,
        }
    }
}
