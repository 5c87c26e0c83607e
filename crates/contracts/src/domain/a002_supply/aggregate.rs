use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::common::Entity;
use crate::shared::errors::ValidationError;
use crate::shared::validation::RequiredFields;

/// Зоотовар (terrarium, lamp, substrate, feeder...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Supply {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_available: bool,
}

impl Entity for Supply {
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
            .text("category", &self.category)
            .non_negative("price", self.price)
            .finish()
    }

    fn collection_name() -> &'static str {
        "supplies"
    }

    fn element_name() -> &'static str {
        "Supply"
    }

    fn required_fields() -> &'static [&'static str] {
        &["name", "category"]
    }

    fn template(_today: NaiveDate) -> Self {
        Self {
            id: None,
            name: String::new(),
            category: String::new(),
            price: 0.0,
            image_url: None,
            is_active: true,
            is_available: true,
        }
    }
}
