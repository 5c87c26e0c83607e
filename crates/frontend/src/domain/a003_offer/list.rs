use std::cmp::Ordering;

use contracts::domain::a003_offer::Offer;

use crate::shared::list_utils::{compare_text, ListTab, Listable, Searchable, Sortable};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfferTab {
    All,
    Active,
    Inactive,
}

impl ListTab for OfferTab {
    type Item = Offer;
    const ALL: Self = OfferTab::All;

    fn all_tabs() -> &'static [Self] {
        &[OfferTab::All, OfferTab::Active, OfferTab::Inactive]
    }

    fn matches(&self, item: &Offer) -> bool {
        match self {
            OfferTab::All => true,
            OfferTab::Active => item.is_active,
            OfferTab::Inactive => !item.is_active,
        }
    }

    fn key(&self) -> &'static str {
        match self {
            OfferTab::All => "all",
            OfferTab::Active => "active",
            OfferTab::Inactive => "inactive",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            OfferTab::All => "All",
            OfferTab::Active => "Active",
            OfferTab::Inactive => "Inactive",
        }
    }
}

impl Searchable for Offer {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.description.as_str()]
    }
}

impl Sortable for Offer {
    fn compare_by_field(&self, other: &Self, field: &str) -> Ordering {
        match field {
            "title" => compare_text(&self.title, &other.title),
            "startDate" => self.start_date.cmp(&other.start_date),
            "endDate" => self.end_date.cmp(&other.end_date),
            "sortOrder" => self.sort_order.cmp(&other.sort_order),
            _ => Ordering::Equal,
        }
    }
}

impl Listable for Offer {
    type Tab = OfferTab;
}
