use std::cmp::Ordering;

use contracts::domain::a007_page_content::PageContent;

use crate::shared::list_utils::{compare_text, ListTab, Listable, Searchable, Sortable};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageContentTab {
    All,
    Published,
    Unpublished,
}

impl ListTab for PageContentTab {
    type Item = PageContent;
    const ALL: Self = PageContentTab::All;

    fn all_tabs() -> &'static [Self] {
        &[PageContentTab::All, PageContentTab::Published, PageContentTab::Unpublished]
    }

    fn matches(&self, item: &PageContent) -> bool {
        match self {
            PageContentTab::All => true,
            PageContentTab::Published => item.is_published,
            PageContentTab::Unpublished => !item.is_published,
        }
    }

    fn key(&self) -> &'static str {
        match self {
            PageContentTab::All => "all",
            PageContentTab::Published => "published",
            PageContentTab::Unpublished => "unpublished",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            PageContentTab::All => "All",
            PageContentTab::Published => "Published",
            PageContentTab::Unpublished => "Unpublished",
        }
    }
}

impl Searchable for PageContent {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.page_key.as_str()]
    }
}

impl Sortable for PageContent {
    fn compare_by_field(&self, other: &Self, field: &str) -> Ordering {
        match field {
            "title" => compare_text(&self.title, &other.title),
            "pageKey" => self.page_key.cmp(&other.page_key),
            _ => Ordering::Equal,
        }
    }
}

impl Listable for PageContent {
    type Tab = PageContentTab;
}
