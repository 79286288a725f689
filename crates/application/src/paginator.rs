use skmis_core::{AppError, AppResult};

/// Number of page buttons shown around the current page.
pub const PAGE_BUTTON_WINDOW: usize = 5;

/// Returns the page count for `total_items`; an empty list still has one page.
#[must_use]
pub fn total_pages(total_items: usize, items_per_page: usize) -> usize {
    total_items.div_ceil(items_per_page.max(1)).max(1)
}

/// One page of a filtered view.
#[derive(Debug, PartialEq, Eq)]
pub struct PageSlice<'a, T> {
    /// Items on the page.
    pub items: &'a [T],
    /// One-based page number after clamping.
    pub page: usize,
    /// Total number of pages.
    pub total_pages: usize,
}

/// Slices `items` into the requested page, clamping the page into range.
#[must_use]
pub fn paginate<T>(items: &[T], page: usize, items_per_page: usize) -> PageSlice<'_, T> {
    let items_per_page = items_per_page.max(1);
    let total_pages = total_pages(items.len(), items_per_page);
    let page = page.clamp(1, total_pages);
    let start = ((page - 1) * items_per_page).min(items.len());
    let end = (start + items_per_page).min(items.len());

    PageSlice {
        items: &items[start..end],
        page,
        total_pages,
    }
}

/// Current page and page size of one list screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationState {
    current_page: usize,
    items_per_page: usize,
}

impl PaginationState {
    /// Creates pagination state positioned on the first page.
    pub fn new(items_per_page: usize) -> AppResult<Self> {
        if items_per_page == 0 {
            return Err(AppError::Validation(
                "items per page must be greater than zero".to_owned(),
            ));
        }

        Ok(Self {
            current_page: 1,
            items_per_page,
        })
    }

    /// Returns the one-based current page.
    #[must_use]
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Returns the page size.
    #[must_use]
    pub fn items_per_page(&self) -> usize {
        self.items_per_page
    }

    /// Returns the page count for `total_items`.
    #[must_use]
    pub fn total_pages(&self, total_items: usize) -> usize {
        total_pages(total_items, self.items_per_page)
    }

    /// Moves back to the first page.
    pub fn reset(&mut self) {
        self.current_page = 1;
    }

    /// Moves to `page`, clamped into `1..=total_pages`; returns the resulting page.
    pub fn go_to(&mut self, page: usize, total_items: usize) -> usize {
        self.current_page = page.clamp(1, self.total_pages(total_items));
        self.current_page
    }

    /// Re-clamps the current page after the item count changed.
    pub fn clamp(&mut self, total_items: usize) {
        self.go_to(self.current_page, total_items);
    }

    /// Changes the page size and clamps the current page.
    pub fn set_items_per_page(&mut self, items_per_page: usize, total_items: usize) -> AppResult<()> {
        if items_per_page == 0 {
            return Err(AppError::Validation(
                "items per page must be greater than zero".to_owned(),
            ));
        }

        self.items_per_page = items_per_page;
        self.clamp(total_items);
        Ok(())
    }
}

/// One rendered pagination control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageButton {
    /// Button for a concrete page.
    Page(usize),
    /// Gap between non-adjacent page buttons.
    Ellipsis,
}

/// Derives the windowed page buttons with first and last pages pinned.
#[must_use]
pub fn page_buttons(current_page: usize, total_pages: usize) -> Vec<PageButton> {
    let total_pages = total_pages.max(1);
    let current_page = current_page.clamp(1, total_pages);

    if total_pages <= PAGE_BUTTON_WINDOW + 2 {
        return (1..=total_pages).map(PageButton::Page).collect();
    }

    let half = PAGE_BUTTON_WINDOW / 2;
    let last_inner = total_pages - 1;
    let mut start = current_page.saturating_sub(half).max(2);
    let mut end = start + PAGE_BUTTON_WINDOW - 1;
    if end > last_inner {
        end = last_inner;
        start = end + 1 - PAGE_BUTTON_WINDOW;
    }

    let mut buttons = vec![PageButton::Page(1)];
    if start > 2 {
        buttons.push(PageButton::Ellipsis);
    }
    buttons.extend((start..=end).map(PageButton::Page));
    if end < last_inner {
        buttons.push(PageButton::Ellipsis);
    }
    buttons.push(PageButton::Page(total_pages));
    buttons
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::{PageButton, PaginationState, page_buttons, paginate, total_pages};

    #[test]
    fn empty_list_has_one_page() {
        assert_eq!(total_pages(0, 10), 1);
        let page = paginate::<u8>(&[], 3, 10);
        assert_eq!(page.page, 1);
        assert!(page.items.is_empty());
    }

    #[test]
    fn second_page_of_single_item_pages() {
        let filtered = [1, 3];
        let page = paginate(&filtered, 2, 1);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.items, &[3]);
    }

    #[test]
    fn out_of_range_page_is_clamped_to_last() {
        let items: Vec<u32> = (1..=25).collect();
        let page = paginate(&items, 9, 10);
        assert_eq!(page.page, 3);
        assert_eq!(page.items, &[21, 22, 23, 24, 25]);
    }

    #[test]
    fn zero_page_size_is_rejected() {
        assert!(PaginationState::new(0).is_err());
        let Ok(mut state) = PaginationState::new(5) else {
            panic!("valid page size");
        };
        assert!(state.set_items_per_page(0, 10).is_err());
        assert_eq!(state.items_per_page(), 5);
    }

    #[test]
    fn growing_page_size_clamps_current_page() {
        let Ok(mut state) = PaginationState::new(5) else {
            panic!("valid page size");
        };
        assert_eq!(state.go_to(4, 20), 4);
        assert!(state.set_items_per_page(10, 20).is_ok());
        assert_eq!(state.current_page(), 2);
    }

    #[test]
    fn small_page_counts_show_every_button() {
        assert_eq!(page_buttons(1, 1), vec![PageButton::Page(1)]);
        assert_eq!(
            page_buttons(2, 3),
            vec![PageButton::Page(1), PageButton::Page(2), PageButton::Page(3)]
        );
    }

    #[test]
    fn large_page_counts_use_window_with_ellipses() {
        assert_eq!(
            page_buttons(10, 20),
            vec![
                PageButton::Page(1),
                PageButton::Ellipsis,
                PageButton::Page(8),
                PageButton::Page(9),
                PageButton::Page(10),
                PageButton::Page(11),
                PageButton::Page(12),
                PageButton::Ellipsis,
                PageButton::Page(20),
            ]
        );
        assert_eq!(
            page_buttons(1, 20),
            vec![
                PageButton::Page(1),
                PageButton::Page(2),
                PageButton::Page(3),
                PageButton::Page(4),
                PageButton::Page(5),
                PageButton::Page(6),
                PageButton::Ellipsis,
                PageButton::Page(20),
            ]
        );
    }

    proptest! {
        #[test]
        fn pages_partition_the_filtered_list(len in 0_usize..200, size in 1_usize..25) {
            let items: Vec<usize> = (0..len).collect();
            let pages = total_pages(len, size);
            let mut seen = Vec::new();
            for page in 1..=pages {
                let slice = paginate(&items, page, size);
                prop_assert!(slice.items.len() <= size);
                seen.extend_from_slice(slice.items);
            }
            prop_assert_eq!(seen, items);
        }

        #[test]
        fn paginate_is_idempotent(len in 0_usize..100, size in 1_usize..20, page in 0_usize..30) {
            let items: Vec<usize> = (0..len).collect();
            let first = paginate(&items, page, size);
            let second = paginate(&items, first.page, size);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn buttons_pin_ends_and_contain_current(total in 2_usize..60, current in 1_usize..60) {
            let current = current.min(total);
            let buttons = page_buttons(current, total);
            prop_assert_eq!(buttons.first(), Some(&PageButton::Page(1)));
            prop_assert_eq!(buttons.last(), Some(&PageButton::Page(total)));
            prop_assert!(buttons.contains(&PageButton::Page(current)));
        }
    }
}
