use std::cmp::Ordering;

use contracts::domain::a002_supply::Supply;

use crate::shared::list_utils::{compare_f64, compare_text, ListTab, Listable, Searchable, Sortable};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupplyTab {
    All,
    InStock,
    OutOfStock,
}

impl ListTab for SupplyTab {
    type Item = Supply;
    const ALL: Self = SupplyTab::All;

    fn all_tabs() -> &'static [Self] {
        &[SupplyTab::All, SupplyTab::InStock, SupplyTab::OutOfStock]
    }

    fn matches(&self, item: &Supply) -> bool {
        match self {
            SupplyTab::All => true,
            SupplyTab::InStock => item.is_available,
            SupplyTab::OutOfStock => !item.is_available,
        }
    }

    fn key(&self) -> &'static str {
        match self {
            SupplyTab::All => "all",
            SupplyTab::InStock => "in_stock",
            SupplyTab::OutOfStock => "out_of_stock",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            SupplyTab::All => "All",
            SupplyTab::InStock => "In stock",
            SupplyTab::OutOfStock => "Out of stock",
        }
    }
}

impl Searchable for Supply {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.category.as_str()]
    }
}

impl Sortable for Supply {
    fn compare_by_field(&self, other: &Self, field: &str) -> Ordering {
        match field {
            "name" => compare_text(&self.name, &other.name),
            "category" => compare_text(&self.category, &other.category)
                .then_with(|| compare_text(&self.name, &other.name)),
            "price" => compare_f64(self.price, other.price),
            _ => Ordering::Equal,
        }
    }
}

impl Listable for Supply {
    type Tab = SupplyTab;
}
