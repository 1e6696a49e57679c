use serde::{Deserialize, Serialize};

use crate::config::PagingConfig;

/// Query parameters accepted by paged list endpoints
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PageRequest {
    pub page: i32,
    pub page_size: usize,
    /// 0 ascending, 1 descending (newest first)
    pub sort: i32,
    pub tag: Option<String>,
}

impl PageRequest {
    pub fn sort_descending(&self) -> bool {
        self.sort == 1
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page_number: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub sort_descending: bool,
}

/// An item with its 1-based chronological display number
#[derive(Debug, Clone, Serialize)]
pub struct Numbered<T> {
    pub number: usize,
    #[serde(flatten)]
    pub item: T,
}

impl<T> From<T> for Numbered<T> {
    fn from(item: T) -> Self {
        Self { number: 0, item }
    }
}

impl PagingConfig {
    /// 0 selects the default; anything above the maximum is capped
    pub fn page_size(&self, requested: usize) -> usize {
        let size = if requested == 0 { self.default_page_size } else { requested };
        size.clamp(1, self.max_page_size.max(1))
    }
}

/// `items` must already be sorted oldest first. Items are numbered
/// 1..=n in that order, reversed when `sort_descending`, then the
/// requested page is cut out. Page indexes below 1 read as 1.
pub fn page_of<T>(
    mut items: Vec<T>,
    page_index: i32,
    page_size: usize,
    sort_descending: bool,
    mut number_assigner: impl FnMut(&mut T, usize),
) -> Page<T> {
    let page_size = page_size.max(1);
    let page_number = page_index.max(1) as usize;
    let total_items = items.len();

    for (i, item) in items.iter_mut().enumerate() {
        number_assigner(item, i + 1);
    }
    if sort_descending {
        items.reverse();
    }

    let items: Vec<T> = items.into_iter().skip((page_number - 1) * page_size).take(page_size).collect();

    Page {
        items,
        page_number,
        total_pages: total_items.div_ceil(page_size),
        total_items,
        sort_descending,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(n: usize) -> Vec<Numbered<usize>> {
        (1..=n).map(Numbered::from).collect()
    }

    #[test]
    fn second_page_ascending() {
        let page = page_of(numbered(25), 2, 10, false, |item, n| item.number = n);
        let items: Vec<usize> = page.items.iter().map(|i| i.item).collect();
        let numbers: Vec<usize> = page.items.iter().map(|i| i.number).collect();
        assert_eq!(items, (11..=20).collect::<Vec<_>>());
        assert_eq!(numbers, items);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.total_items, 25);
    }

    #[test]
    fn second_page_descending_keeps_chronological_numbers() {
        let page = page_of(numbered(25), 2, 10, true, |item, n| item.number = n);
        let items: Vec<usize> = page.items.iter().map(|i| i.item).collect();
        assert_eq!(items, (6..=15).rev().collect::<Vec<_>>());
        assert!(page.items.iter().all(|i| i.number == i.item));
    }

    #[test]
    fn page_index_below_one_reads_as_first_page() {
        let page = page_of(numbered(5), 0, 2, false, |item, n| item.number = n);
        assert_eq!(page.page_number, 1);
        assert_eq!(page.items.len(), 2);
        let past_end = page_of(numbered(5), 9, 2, false, |_, _| {});
        assert!(past_end.items.is_empty());
    }

    #[test]
    fn page_size_defaults_and_caps() {
        let config = PagingConfig { default_page_size: 8, max_page_size: 50 };
        assert_eq!(config.page_size(0), 8);
        assert_eq!(config.page_size(10), 10);
        assert_eq!(config.page_size(500), 50);
    }
}
