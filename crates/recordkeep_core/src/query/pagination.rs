//! Page-number strip for paginated list views.
//!
//! Shows the first and last page, pages within one of the current page, and
//! a single ellipsis for each gap. The strip is built from at most seven
//! candidate pages, so its cost does not grow with `total_pages`.

use serde::Serialize;
use std::collections::BTreeSet;

/// One entry of the page-number strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "page", rename_all = "snake_case")]
pub enum PageItem {
    Page(u64),
    Ellipsis,
}

/// Display model for a pagination control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationWindow {
    pub items: Vec<PageItem>,
    pub has_previous: bool,
    pub has_next: bool,
}

impl PaginationWindow {
    /// Whether the control should be rendered at all.
    pub fn is_visible(&self) -> bool {
        !self.items.is_empty()
    }
}

/// Builds the strip for `current` out of `total_pages`.
///
/// Returns an empty strip when there is at most one page.
pub fn pagination_window(current: u64, total_pages: u64) -> PaginationWindow {
    if total_pages <= 1 {
        return PaginationWindow {
            items: Vec::new(),
            has_previous: false,
            has_next: false,
        };
    }

    let mut candidates = BTreeSet::from([1, total_pages]);
    for page in current.saturating_sub(2)..=current.saturating_add(2) {
        if (1..=total_pages).contains(&page) {
            candidates.insert(page);
        }
    }

    let items = candidates
        .into_iter()
        .filter_map(|page| {
            let near_current =
                page.saturating_add(1) >= current && page <= current.saturating_add(1);
            if page == 1 || page == total_pages || near_current {
                Some(PageItem::Page(page))
            } else if page.saturating_add(2) == current || page == current.saturating_add(2) {
                Some(PageItem::Ellipsis)
            } else {
                None
            }
        })
        .collect();

    PaginationWindow {
        items,
        has_previous: current > 1,
        has_next: current < total_pages,
    }
}

#[cfg(test)]
mod tests {
    use super::{pagination_window, PageItem};

    fn render(current: u64, total: u64) -> String {
        pagination_window(current, total)
            .items
            .iter()
            .map(|item| match item {
                PageItem::Page(page) => page.to_string(),
                PageItem::Ellipsis => "...".to_string(),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn hidden_for_single_page() {
        assert!(!pagination_window(1, 1).is_visible());
        assert!(!pagination_window(1, 0).is_visible());
    }

    #[test]
    fn small_page_counts_show_every_page() {
        assert_eq!(render(1, 2), "1 2");
        assert_eq!(render(2, 3), "1 2 3");
    }

    #[test]
    fn first_page_collapses_tail() {
        assert_eq!(render(1, 10), "1 2 ... 10");
    }

    #[test]
    fn middle_page_collapses_both_sides() {
        assert_eq!(render(10, 20), "1 ... 9 10 11 ... 20");
    }

    #[test]
    fn gap_of_one_page_still_renders_an_ellipsis() {
        assert_eq!(render(4, 7), "1 ... 3 4 5 ... 7");
    }

    #[test]
    fn last_page_collapses_head() {
        assert_eq!(render(20, 20), "1 ... 19 20");
    }

    #[test]
    fn previous_and_next_flags() {
        let first = pagination_window(1, 3);
        assert!(!first.has_previous);
        assert!(first.has_next);

        let last = pagination_window(3, 3);
        assert!(last.has_previous);
        assert!(!last.has_next);
    }
}
