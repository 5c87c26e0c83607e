use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::common::Entity;
use crate::shared::errors::ValidationError;
use crate::shared::validation::RequiredFields;

/// Editable storefront page block ("about", "care-guides", "faq").
///
/// Keyed by a string id; the store uses `pageKey` as the id on create.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub page_key: String,
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub is_published: bool,
}

impl Entity for PageContent {
    type Id = String;

    fn id(&self) -> Option<&String> {
        self.id.as_ref()
    }

    fn set_id(&mut self, id: Option<String>) {
        self.id = id;
    }

    fn validate(&self) -> Result<(), ValidationError> {
        RequiredFields::new()
            .text("pageKey", &self.page_key)
            .check(
                "pageKey",
                self.page_key
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'),
            )
            .text("title", &self.title)
            .text("body", &self.body)
            .finish()
    }

    fn collection_name() -> &'static str {
        "page-content"
    }

    fn element_name() -> &'static str {
        "Page content"
    }

    fn required_fields() -> &'static [&'static str] {
        &["pageKey", "title", "body"]
    }

    fn template(_today: NaiveDate) -> Self {
        Self {
            id: None,
            page_key: String::new(),
            title: String::new(),
            body: String::new(),
            is_published: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_key_must_be_url_safe() {
        let mut page = PageContent::template(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
        page.title = "About us".into();
        page.body = "Family-run since 2009.".into();
        page.page_key = "about us".into();
        assert!(page.validate().unwrap_err().contains("pageKey"));
        page.page_key = "about-us".into();
        assert!(page.validate().is_ok());
    }
}
