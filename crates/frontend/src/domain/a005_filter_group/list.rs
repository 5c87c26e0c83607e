use std::cmp::Ordering;

use contracts::domain::a005_filter_group::FilterGroup;

use crate::shared::list_utils::{compare_text, ListTab, Listable, Searchable, Sortable};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterGroupTab {
    All,
    Active,
    Inactive,
}

impl ListTab for FilterGroupTab {
    type Item = FilterGroup;
    const ALL: Self = FilterGroupTab::All;

    fn all_tabs() -> &'static [Self] {
        &[FilterGroupTab::All, FilterGroupTab::Active, FilterGroupTab::Inactive]
    }

    fn matches(&self, item: &FilterGroup) -> bool {
        match self {
            FilterGroupTab::All => true,
            FilterGroupTab::Active => item.is_active,
            FilterGroupTab::Inactive => !item.is_active,
        }
    }

    fn key(&self) -> &'static str {
        match self {
            FilterGroupTab::All => "all",
            FilterGroupTab::Active => "active",
            FilterGroupTab::Inactive => "inactive",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            FilterGroupTab::All => "All",
            FilterGroupTab::Active => "Active",
            FilterGroupTab::Inactive => "Inactive",
        }
    }
}

/// The group name and every option label are searchable.
impl Searchable for FilterGroup {
    fn search_fields(&self) -> Vec<&str> {
        std::iter::once(self.name.as_str())
            .chain(self.options.iter().map(|o| o.label.as_str()))
            .collect()
    }
}

impl Sortable for FilterGroup {
    fn compare_by_field(&self, other: &Self, field: &str) -> Ordering {
        match field {
            "name" => compare_text(&self.name, &other.name),
            "options" => self.options.len().cmp(&other.options.len()),
            "sortOrder" => self.sort_order.cmp(&other.sort_order),
            _ => Ordering::Equal,
        }
    }
}

impl Listable for FilterGroup {
    type Tab = FilterGroupTab;
}
