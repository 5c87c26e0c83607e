//! Утилиты для списков: вкладки, поиск, сортировка.
//!
//! Everything here is a pure function of a collection snapshot; nothing
//! mutates the collection it reads.

use std::cmp::Ordering;
use std::fmt::Debug;

/// Trait для типов, поддерживающих поиск
pub trait Searchable {
    /// Values of the fields the search box looks at.
    fn search_fields(&self) -> Vec<&str>;

    /// Case-insensitive substring match on any search field.
    /// A blank filter matches everything.
    fn matches_filter(&self, filter: &str) -> bool {
        let filter = filter.trim();
        if filter.is_empty() {
            return true;
        }
        let f = filter.to_lowercase();
        self.search_fields()
            .iter()
            .any(|value| value.to_lowercase().contains(&f))
    }
}

/// Trait для типов, поддерживающих сортировку
pub trait Sortable {
    fn compare_by_field(&self, other: &Self, field: &str) -> Ordering;
}

/// A list tab: one boolean predicate over the entities of a kind.
pub trait ListTab: Copy + Eq + Debug + 'static {
    type Item;

    /// The identity tab
    const ALL: Self;

    /// Tabs in display order, `ALL` first.
    fn all_tabs() -> &'static [Self];

    fn matches(&self, item: &Self::Item) -> bool;

    /// Stable key, used in URLs
    fn key(&self) -> &'static str;

    fn label(&self) -> &'static str;

    fn from_key(key: &str) -> Option<Self> {
        Self::all_tabs().iter().copied().find(|tab| tab.key() == key)
    }
}

/// An entity that appears in a management list.
pub trait Listable: Searchable + Clone + Sized {
    type Tab: ListTab<Item = Self>;
}

/// Сортирует список по указанному полю
pub fn sort_list<T: Sortable>(items: &mut [T], field: &str, ascending: bool) {
    items.sort_by(|a, b| {
        let cmp = a.compare_by_field(b, field);
        if ascending {
            cmp
        } else {
            cmp.reverse()
        }
    });
}

/// Фильтрует список по поисковому запросу
pub fn filter_list<T: Searchable + Clone>(items: &[T], filter: &str) -> Vec<T> {
    items
        .iter()
        .filter(|item| item.matches_filter(filter))
        .cloned()
        .collect()
}

/// Entities in `tab` that match `query`, in collection order.
pub fn apply_view<T: Listable>(items: &[T], tab: T::Tab, query: &str) -> Vec<T> {
    items
        .iter()
        .filter(|item| tab.matches(item) && item.matches_filter(query))
        .cloned()
        .collect()
}

/// Badge count of every tab over the full collection. The search query never
/// affects these.
pub fn tab_counts<T: Listable>(items: &[T]) -> Vec<(T::Tab, usize)> {
    T::Tab::all_tabs()
        .iter()
        .map(|tab| (*tab, items.iter().filter(|item| tab.matches(item)).count()))
        .collect()
}

/// Active tab plus search text of one list page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterView<Tab> {
    pub tab: Tab,
    pub query: String,
}

impl<Tab: ListTab> FilterView<Tab> {
    pub fn new(tab: Tab, query: impl Into<String>) -> Self {
        Self {
            tab,
            query: query.into(),
        }
    }

    pub fn is_filtered(&self) -> bool {
        self.tab != Tab::ALL || !self.query.trim().is_empty()
    }

    pub fn apply<T: Listable<Tab = Tab>>(&self, items: &[T]) -> Vec<T> {
        apply_view(items, self.tab, &self.query)
    }
}

impl<Tab: ListTab> Default for FilterView<Tab> {
    fn default() -> Self {
        Self::new(Tab::ALL, "")
    }
}

/// Case-insensitive text comparison for sortable string columns.
pub fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// Total order for `f64` columns; NaN sorts last.
pub fn compare_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or_else(|| a.is_nan().cmp(&b.is_nan()))
}
