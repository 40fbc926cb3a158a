//! Page-number pagination for the index listing.
//!
//! Pages are 1-based. The listing is re-queried on every request with `LIMIT`/`OFFSET`, so a
//! page reflects the table as it is at request time.

use serde::Serialize;

/// Pages always shown at the start and end of the link bar
const EDGE_PAGES: i64 = 2;
/// Pages shown before the current one
const PAGES_BEFORE_CURRENT: i64 = 2;
/// Pages shown from the current one onwards, current included
const PAGES_FROM_CURRENT: i64 = 5;

/// One page of the listing, with everything the template needs to draw the link bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    /// Current page number, 1-based
    pub page: i64,
    pub per_page: i64,
    /// Total rows across all pages
    pub total: i64,
    /// Number of pages; zero for an empty table
    pub pages: i64,
    pub prev_num: Option<i64>,
    pub next_num: Option<i64>,
    /// Page numbers for the link bar, `None` marking an elided run
    pub links: Vec<Option<i64>>,
}

impl Page {
    /// The requested page, or `None` when it doesn't exist: below 1, or past the last page
    /// unless it is page 1 of an empty table.
    pub fn new(page: i64, per_page: i64, total: i64) -> Option<Self> {
        let per_page = per_page.max(1);
        let pages = total_pages(total, per_page);

        if page < 1 || (page > pages && page != 1) {
            return None;
        }

        Some(Self {
            page,
            per_page,
            total,
            pages,
            prev_num: (page > 1).then(|| page - 1),
            next_num: (page < pages).then(|| page + 1),
            links: iter_pages(page, pages),
        })
    }

    /// Rows to skip to reach this page
    pub fn skip(&self) -> i64 {
        (self.page - 1) * self.per_page
    }

    pub fn has_prev(&self) -> bool {
        self.prev_num.is_some()
    }

    pub fn has_next(&self) -> bool {
        self.next_num.is_some()
    }
}

pub fn total_pages(total: i64, per_page: i64) -> i64 {
    if total <= 0 {
        0
    } else {
        (total + per_page - 1) / per_page
    }
}

/// Page numbers around the edges and around `current`, with a `None` wherever numbers are
/// skipped.
fn iter_pages(current: i64, pages: i64) -> Vec<Option<i64>> {
    let mut links = Vec::new();
    let mut last = 0;

    for num in 1..=pages {
        let near_edge = num <= EDGE_PAGES || num > pages - EDGE_PAGES;
        let near_current = num > current - PAGES_BEFORE_CURRENT - 1 && num < current + PAGES_FROM_CURRENT;

        if near_edge || near_current {
            if last + 1 != num {
                links.push(None);
            }
            links.push(Some(num));
            last = num;
        }
    }

    links
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 300), 0);
        assert_eq!(total_pages(1, 300), 1);
        assert_eq!(total_pages(300, 300), 1);
        assert_eq!(total_pages(301, 300), 2);
        assert_eq!(total_pages(1000, 300), 4);
    }

    #[test]
    fn test_out_of_range_pages() {
        assert!(Page::new(0, 300, 1000).is_none());
        assert!(Page::new(-3, 300, 1000).is_none());
        assert!(Page::new(5, 300, 1000).is_none());
        assert!(Page::new(4, 300, 1000).is_some());
    }

    #[test]
    fn test_first_page_of_empty_table_exists() {
        let page = Page::new(1, 300, 0).expect("page 1 always renders");
        assert_eq!(page.pages, 0);
        assert!(!page.has_prev());
        assert!(!page.has_next());
        assert!(page.links.is_empty());
        assert!(Page::new(2, 300, 0).is_none());
    }

    #[test]
    fn test_skip_and_neighbours() {
        let page = Page::new(3, 300, 1000).unwrap();
        assert_eq!(page.skip(), 600);
        assert_eq!(page.prev_num, Some(2));
        assert_eq!(page.next_num, Some(4));

        let last = Page::new(4, 300, 1000).unwrap();
        assert_eq!(last.next_num, None);
    }

    #[test]
    fn test_short_link_bar_has_no_gaps() {
        let page = Page::new(2, 300, 1000).unwrap();
        assert_eq!(page.links, vec![Some(1), Some(2), Some(3), Some(4)]);
    }

    #[test]
    fn test_long_link_bar_elides_runs() {
        // 5000 rows at 100 a page: 50 pages, sitting on page 20
        let page = Page::new(20, 100, 5000).unwrap();
        let mut expected = vec![Some(1), Some(2), None];
        expected.extend((18..=24).map(Some));
        expected.extend([None, Some(49), Some(50)]);
        assert_eq!(page.links, expected);
    }

    #[test]
    fn test_link_bar_on_first_page() {
        let page = Page::new(1, 100, 5000).unwrap();
        let mut expected: Vec<Option<i64>> = (1..=5).map(Some).collect();
        expected.extend([None, Some(49), Some(50)]);
        assert_eq!(page.links, expected);
    }
}
