use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::common::Entity;
use crate::shared::errors::ValidationError;
use crate::shared::validation::RequiredFields;

/// Товар каталога (animal listing)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    /// Latin or common species name shown under the title
    #[serde(default)]
    pub species: Option<String>,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    /// Average customer rating, 0.0..=5.0
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default = "default_true")]
    pub is_available: bool,
}

fn default_true() -> bool {
    true
}

impl Product {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            id: None,
            name: name.into(),
            species: None,
            description: String::new(),
            price,
            rating: 0.0,
            image_url: None,
            is_active: true,
            is_available: true,
        }
    }
}

impl Entity for Product {
    type Id = i64;

    fn id(&self) -> Option<&i64> {
        self.id.as_ref()
    }

    fn set_id(&mut self, id: Option<i64>) {
        self.id = id;
    }

    fn validate(&self) -> Result<(), ValidationError> {
        RequiredFields::new()
            .text("name", &self.name)
            .non_negative("price", self.price)
            .finish()
    }

    fn collection_name() -> &'static str {
        "products"
    }

    fn element_name() -> &'static str {
        "Product"
    }

    fn required_fields() -> &'static [&'static str] {
        &["name", "price"]
    }

    fn template(_today: NaiveDate) -> Self {
        Self::new("", 0.0)
    }
}
