use std::cmp::Ordering;

use contracts::domain::a004_policy::Policy;

use crate::shared::list_utils::{compare_text, ListTab, Listable, Searchable, Sortable};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyTab {
    All,
    Published,
    Draft,
}

impl ListTab for PolicyTab {
    type Item = Policy;
    const ALL: Self = PolicyTab::All;

    fn all_tabs() -> &'static [Self] {
        &[PolicyTab::All, PolicyTab::Published, PolicyTab::Draft]
    }

    fn matches(&self, item: &Policy) -> bool {
        match self {
            PolicyTab::All => true,
            PolicyTab::Published => item.is_published,
            PolicyTab::Draft => !item.is_published,
        }
    }

    fn key(&self) -> &'static str {
        match self {
            PolicyTab::All => "all",
            PolicyTab::Published => "published",
            PolicyTab::Draft => "draft",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            PolicyTab::All => "All",
            PolicyTab::Published => "Published",
            PolicyTab::Draft => "Draft",
        }
    }
}

impl Searchable for Policy {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.slug.as_str()]
    }
}

impl Sortable for Policy {
    fn compare_by_field(&self, other: &Self, field: &str) -> Ordering {
        match field {
            "title" => compare_text(&self.title, &other.title),
            "slug" => self.slug.cmp(&other.slug),
            _ => Ordering::Equal,
        }
    }
}

impl Listable for Policy {
    type Tab = PolicyTab;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::list_utils::{tab_counts, FilterView};

    fn policy(title: &str, slug: &str, published: bool) -> Policy {
        Policy {
            id: None,
            title: title.into(),
            slug: slug.into(),
            content: "text".into(),
            is_published: published,
        }
    }

    #[test]
    fn test_slug_is_searchable() {
        let items = vec![
            policy("Returns", "returns-policy", true),
            policy("Live animal arrival guarantee", "doa", false),
        ];
        let view = FilterView::new(PolicyTab::Draft, "DOA");
        assert_eq!(view.apply(&items).len(), 1);
        assert_eq!(
            tab_counts(&items),
            vec![(PolicyTab::All, 2), (PolicyTab::Published, 1), (PolicyTab::Draft, 1)]
        );
    }
}
