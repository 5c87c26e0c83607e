use std::cmp::Ordering;

use contracts::domain::a001_product::Product;

use crate::shared::list_utils::{compare_f64, compare_text, ListTab, Listable, Searchable, Sortable};

/// Rating at which a product shows up under "Featured"
pub const FEATURED_RATING: f64 = 4.9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductTab {
    All,
    Featured,
    OutOfStock,
}

impl ListTab for ProductTab {
    type Item = Product;
    const ALL: Self = ProductTab::All;

    fn all_tabs() -> &'static [Self] {
        &[ProductTab::All, ProductTab::Featured, ProductTab::OutOfStock]
    }

    fn matches(&self, item: &Product) -> bool {
        match self {
            ProductTab::All => true,
            ProductTab::Featured => item.rating >= FEATURED_RATING,
            ProductTab::OutOfStock => !item.is_available,
        }
    }

    fn key(&self) -> &'static str {
        match self {
            ProductTab::All => "all",
            ProductTab::Featured => "featured",
            ProductTab::OutOfStock => "out_of_stock",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            ProductTab::All => "All",
            ProductTab::Featured => "Featured",
            ProductTab::OutOfStock => "Out of stock",
        }
    }
}

impl Searchable for Product {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str()];
        if let Some(species) = &self.species {
            fields.push(species.as_str());
        }
        fields
    }
}

impl Sortable for Product {
    fn compare_by_field(&self, other: &Self, field: &str) -> Ordering {
        match field {
            "name" => compare_text(&self.name, &other.name),
            "price" => compare_f64(self.price, other.price),
            "rating" => compare_f64(self.rating, other.rating),
            "isAvailable" => self.is_available.cmp(&other.is_available),
            _ => Ordering::Equal,
        }
    }
}

impl Listable for Product {
    type Tab = ProductTab;
}
