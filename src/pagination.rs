use serde::Serialize;

/// Page numbers to show, with `None` marking an elided gap.
fn page_links(
    total_pages: usize,
    current_page: usize,
    edge: usize,
    around_current: usize,
) -> Vec<Option<usize>> {
    if total_pages == 0 {
        return vec![];
    }

    let mut pages = Vec::new();

    let head_end = (1 + edge).min(total_pages + 1);
    pages.extend((1..head_end).map(Some));

    let mid_start = head_end.max(current_page.saturating_sub(around_current));
    let mid_end = (current_page + around_current + 1).min(total_pages + 1);
    if mid_start > head_end {
        pages.push(None);
    }
    pages.extend((mid_start..mid_end).map(Some));

    let tail_start = mid_end.max(total_pages.saturating_sub(edge) + 1);
    if tail_start > mid_end {
        pages.push(None);
    }
    pages.extend((tail_start..=total_pages).map(Some));

    pages
}

/// Pager state for a paginated payments response.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Pager {
    /// One-based current page.
    pub page: usize,
    pub total_pages: usize,
    pub links: Vec<Option<usize>>,
}

impl Pager {
    pub fn new(page: usize, total_items: usize, page_size: usize) -> Self {
        let page = page.max(1);
        let total_pages = total_items.div_ceil(page_size.max(1));
        Self {
            page,
            total_pages,
            links: page_links(total_pages, page, 2, 2),
        }
    }
}
