use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::common::Entity;
use crate::shared::errors::ValidationError;
use crate::shared::validation::RequiredFields;

/// Store policy page (shipping, live arrival guarantee, returns)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Policy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub title: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub is_published: bool,
}

impl Entity for Policy {
    type Id = i64;

    fn id(&self) -> Option<&i64> {
        self.id.as_ref()
    }

    fn set_id(&mut self, id: Option<i64>) {
        self.id = id;
    }

    fn validate(&self) -> Result<(), ValidationError> {
        RequiredFields::new()
            .text("title", &self.title)
            .text("content", &self.content)
            .finish()
    }

    fn collection_name() -> &'static str {
        "policies"
    }

    fn element_name() -> &'static str {
        "Policy"
    }

    fn required_fields() -> &'static [&'static str] {
        &["title", "content"]
    }

    fn template(_today: NaiveDate) -> Self {
        Self {
            id: None,
            title: String::new(),
            slug: String::new(),
            content: String::new(),
            is_published: false,
        }
    }
}
