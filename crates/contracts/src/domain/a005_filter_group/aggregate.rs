use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::common::Entity;
use crate::shared::errors::ValidationError;
use crate::shared::validation::RequiredFields;

/// Группа фильтров каталога (e.g. "Habitat": desert, tropical, aquatic)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub options: Vec<FilterOption>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub sort_order: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOption {
    pub label: String,
    #[serde(default)]
    pub value: String,
}

impl Entity for FilterGroup {
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
        let mut check = RequiredFields::new()
            .text("name", &self.name)
            .check("options", !self.options.is_empty());
        for (index, option) in self.options.iter().enumerate() {
            check = check.text(&format!("options.{}.label", index), &option.label);
        }
        check.finish()
    }

    fn collection_name() -> &'static str {
        "filters"
    }

    fn element_name() -> &'static str {
        "Filter group"
    }

    fn required_fields() -> &'static [&'static str] {
        &["name", "options"]
    }

    fn template(_today: NaiveDate) -> Self {
        Self {
            id: None,
            name: String::new(),
            options: Vec::new(),
            is_active: true,
            sort_order: 0,
        }
    }
}
