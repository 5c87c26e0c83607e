use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::common::Entity;
use crate::shared::errors::ValidationError;
use crate::shared::validation::RequiredFields;

/// Default length of a new promotion.
const DEFAULT_OFFER_DAYS: u64 = 30;

/// Акция / promotional offer shown on the storefront banner strip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub discount_percent: Option<u8>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub sort_order: u32,
}

impl Offer {
    /// Whether the offer window contains `day`.
    pub fn runs_on(&self, day: NaiveDate) -> bool {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => start <= day && day <= end,
            _ => false,
        }
    }
}

impl Entity for Offer {
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
            .present("startDate", &self.start_date)
            .present("endDate", &self.end_date)
            .date_range("endDate", self.start_date, self.end_date)
            .check(
                "discountPercent",
                self.discount_percent.map_or(true, |p| p <= 100),
            )
            .finish()
    }

    fn collection_name() -> &'static str {
        "offers"
    }

    fn element_name() -> &'static str {
        "Offer"
    }

    fn required_fields() -> &'static [&'static str] {
        &["title", "imageUrl", "startDate", "endDate"]
    }

    fn template(today: NaiveDate) -> Self {
        Self {
            id: None,
            title: String::new(),
            description: String::new(),
            image_url: String::new(),
            discount_percent: None,
            start_date: Some(today),
            end_date: today.checked_add_days(Days::new(DEFAULT_OFFER_DAYS)),
            is_active: true,
            sort_order: 0,
        }
    }
}
