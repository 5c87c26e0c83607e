use std::cmp::Ordering;

use contracts::domain::a008_hero_slide::HeroSlide;

use crate::shared::list_utils::{compare_text, ListTab, Listable, Searchable, Sortable};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeroSlideTab {
    All,
    Active,
    Inactive,
}

impl ListTab for HeroSlideTab {
    type Item = HeroSlide;
    const ALL: Self = HeroSlideTab::All;

    fn all_tabs() -> &'static [Self] {
        &[HeroSlideTab::All, HeroSlideTab::Active, HeroSlideTab::Inactive]
    }

    fn matches(&self, item: &HeroSlide) -> bool {
        match self {
            HeroSlideTab::All => true,
            HeroSlideTab::Active => item.is_active,
            HeroSlideTab::Inactive => !item.is_active,
        }
    }

    fn key(&self) -> &'static str {
        match self {
            HeroSlideTab::All => "all",
            HeroSlideTab::Active => "active",
            HeroSlideTab::Inactive => "inactive",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            HeroSlideTab::All => "All",
            HeroSlideTab::Active => "Active",
            HeroSlideTab::Inactive => "Inactive",
        }
    }
}

impl Searchable for HeroSlide {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.subtitle.as_str()]
    }
}

impl Sortable for HeroSlide {
    fn compare_by_field(&self, other: &Self, field: &str) -> Ordering {
        match field {
            "title" => compare_text(&self.title, &other.title),
            "sortOrder" => self.sort_order.cmp(&other.sort_order),
            _ => Ordering::Equal,
        }
    }
}

impl Listable for HeroSlide {
    type Tab = HeroSlideTab;
}
