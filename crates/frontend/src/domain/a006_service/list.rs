use std::cmp::Ordering;

use contracts::domain::a006_service::Service;

use crate::shared::list_utils::{compare_f64, compare_text, ListTab, Listable, Searchable, Sortable};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceTab {
    All,
    Active,
    Inactive,
}

impl ListTab for ServiceTab {
    type Item = Service;
    const ALL: Self = ServiceTab::All;

    fn all_tabs() -> &'static [Self] {
        &[ServiceTab::All, ServiceTab::Active, ServiceTab::Inactive]
    }

    fn matches(&self, item: &Service) -> bool {
        match self {
            ServiceTab::All => true,
            ServiceTab::Active => item.is_active,
            ServiceTab::Inactive => !item.is_active,
        }
    }

    fn key(&self) -> &'static str {
        match self {
            ServiceTab::All => "all",
            ServiceTab::Active => "active",
            ServiceTab::Inactive => "inactive",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            ServiceTab::All => "All",
            ServiceTab::Active => "Active",
            ServiceTab::Inactive => "Inactive",
        }
    }
}

impl Searchable for Service {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.description.as_str()]
    }
}

impl Sortable for Service {
    fn compare_by_field(&self, other: &Self, field: &str) -> Ordering {
        match field {
            "title" => compare_text(&self.title, &other.title),
            // unpriced services ("on request") sort last
            "price" => match (self.price, other.price) {
                (Some(a), Some(b)) => compare_f64(a, b),
                (a, b) => a.is_none().cmp(&b.is_none()),
            },
            "sortOrder" => self.sort_order.cmp(&other.sort_order),
            _ => Ordering::Equal,
        }
    }
}

impl Listable for Service {
    type Tab = ServiceTab;
}
