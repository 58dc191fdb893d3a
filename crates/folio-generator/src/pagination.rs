//! Blog index pagination.
//!
//! Page one lives at the base URL (`/blog/`), later pages at
//! `/blog/2/`, `/blog/3/` and so on.

/// One page of a paginated listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager<'a, T> {
    /// 1-based page number.
    pub number: usize,

    /// Total number of pages.
    pub total: usize,

    /// Items on this page.
    pub items: &'a [T],

    base: &'a str,
}

impl<'a, T> Pager<'a, T> {
    /// URL of this page.
    pub fn url(&self) -> String {
        page_url(self.base, self.number)
    }

    /// URL of the page with newer items, if any.
    pub fn newer_url(&self) -> Option<String> {
        (self.number > 1).then(|| page_url(self.base, self.number - 1))
    }

    /// URL of the page with older items, if any.
    pub fn older_url(&self) -> Option<String> {
        (self.number < self.total).then(|| page_url(self.base, self.number + 1))
    }

    /// Whether this is the first page.
    pub fn is_first(&self) -> bool {
        self.number == 1
    }
}

/// URL of page `number` under `base`.
pub fn page_url(base: &str, number: usize) -> String {
    let base = base.trim_end_matches('/');
    if number <= 1 {
        format!("{base}/")
    } else {
        format!("{base}/{number}/")
    }
}

/// Split `items` into pages of `per_page`.
///
/// Always yields at least one page so an empty blog still gets an index.
/// A `per_page` of zero is treated as one.
pub fn paginate<'a, T>(items: &'a [T], per_page: usize, base: &'a str) -> Vec<Pager<'a, T>> {
    let per_page = per_page.max(1);
    let total = items.len().div_ceil(per_page).max(1);

    if items.is_empty() {
        return vec![Pager {
            number: 1,
            total,
            items,
            base,
        }];
    }

    items
        .chunks(per_page)
        .enumerate()
        .map(|(i, chunk)| Pager {
            number: i + 1,
            total,
            items: chunk,
            base,
        })
        .collect()
}

/// "Newer Posts" / "Older Posts" navigation, or `None` for a single page.
pub fn pagination_html<T>(pager: &Pager<'_, T>) -> Option<String> {
    if pager.total <= 1 {
        return None;
    }

    let mut html = String::from(r#"<ul class="pagination">"#);
    if let Some(url) = pager.newer_url() {
        html.push_str(&format!(
            r#"<li class="pagination-newer"><a href="{url}" rel="prev">Newer Posts</a></li>"#
        ));
    }
    if let Some(url) = pager.older_url() {
        html.push_str(&format!(
            r#"<li class="pagination-older"><a href="{url}" rel="next">Older Posts</a></li>"#
        ));
    }
    html.push_str("</ul>");
    Some(html)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_url() {
        assert_eq!(page_url("/blog/", 1), "/blog/");
        assert_eq!(page_url("/blog", 2), "/blog/2/");
        assert_eq!(page_url("/blog/", 10), "/blog/10/");
    }

    #[test]
    fn test_paginate() {
        let items: Vec<u32> = (1..=7).collect();
        let pages = paginate(&items, 3, "/blog/");

        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0].items, &[1, 2, 3]);
        assert_eq!(pages[2].items, &[7]);
        assert!(pages.iter().all(|p| p.total == 3));
        assert_eq!(pages[1].url(), "/blog/2/");
    }

    #[test]
    fn test_paginate_empty() {
        let items: Vec<u32> = Vec::new();
        let pages = paginate(&items, 10, "/blog/");

        assert_eq!(pages.len(), 1);
        assert!(pages[0].items.is_empty());
        assert!(pages[0].newer_url().is_none());
        assert!(pages[0].older_url().is_none());
    }

    #[test]
    fn test_neighbor_urls() {
        let items: Vec<u32> = (1..=5).collect();
        let pages = paginate(&items, 2, "/blog/");

        assert_eq!(pages[0].newer_url(), None);
        assert_eq!(pages[0].older_url().as_deref(), Some("/blog/2/"));
        assert_eq!(pages[1].newer_url().as_deref(), Some("/blog/"));
        assert_eq!(pages[2].older_url(), None);
    }

    #[test]
    fn test_pagination_html() {
        let items: Vec<u32> = (1..=4).collect();
        let pages = paginate(&items, 2, "/blog/");

        let first = pagination_html(&pages[0]).unwrap();
        assert!(!first.contains("Newer Posts"));
        assert!(first.contains(r#"<a href="/blog/2/" rel="next">Older Posts</a>"#));

        let last = pagination_html(&pages[1]).unwrap();
        assert!(last.contains(r#"<a href="/blog/" rel="prev">Newer Posts</a>"#));
        assert!(!last.contains("Older Posts"));

        let single = paginate(&items, 10, "/blog/");
        assert!(pagination_html(&single[0]).is_none());
    }
}
