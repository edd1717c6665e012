//! Offset/limit pagination math.
//!
//! The catalog pages with `skip`/`limit`. Everything here is pure: the
//! listing controllers use it to build requests and to render page controls.
//!
//! ```rust
//! use job_discovery::pagination::{page_window, to_offset, total_pages};
//!
//! assert_eq!(total_pages(47, 20), 3);
//! assert_eq!(to_offset(3, 20), 40);
//! assert_eq!(page_window(6, 10, 5), vec![4, 5, 6, 7, 8]);
//! ```

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const DEFAULT_WINDOW_SIZE: u32 = 5;

// ============================================================================
// Requests
// ============================================================================

/// Server-side addressing of one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub offset: u64,
    pub limit: u32,
}

impl PageRequest {
    /// Page numbers are 1-based; 0 is treated as 1.
    pub fn new(page: u32, page_size: u32) -> Self {
        PageRequest {
            offset: to_offset(page, page_size),
            limit: page_size,
        }
    }
}

/// `(page - 1) * page_size`
pub fn to_offset(page: u32, page_size: u32) -> u64 {
    u64::from(page.max(1) - 1) * u64::from(page_size)
}

/// `ceil(total / page_size)`, never less than 1.
pub fn total_pages(total: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 1;
    }
    let pages = total.div_ceil(u64::from(page_size));
    u32::try_from(pages).unwrap_or(u32::MAX).max(1)
}

/// Number of items the given page holds out of `total`.
pub fn items_on_page(total: u64, page: u32, page_size: u32) -> u64 {
    let offset = to_offset(page, page_size);
    total.saturating_sub(offset).min(u64::from(page_size))
}

// ============================================================================
// Page controls
// ============================================================================

/// Contiguous page numbers to render around `current`.
///
/// Keeps `current` centred except near either end. Returns
/// `min(window_size, total_pages)` pages, all within `1..=total_pages`.
pub fn page_window(current: u32, total_pages: u32, window_size: u32) -> Vec<u32> {
    let total_pages = total_pages.max(1);
    let window_size = window_size.max(1);

    if total_pages <= window_size {
        return (1..=total_pages).collect();
    }

    let current = current.clamp(1, total_pages);
    let before = (window_size - 1) / 2;
    let after = window_size - 1 - before;

    let start = if current <= before + 1 {
        1
    } else if current + after >= total_pages {
        total_pages - window_size + 1
    } else {
        current - before
    };

    (start..start + window_size).collect()
}

/// Whether `page` can be navigated to. Out-of-range targets are no-ops.
pub fn is_navigable(page: u32, total_pages: u32) -> bool {
    (1..=total_pages.max(1)).contains(&page)
}

/// State of the previous/next buttons for the current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageControls {
    pub has_previous: bool,
    pub has_next: bool,
}

impl PageControls {
    pub fn new(current: u32, total_pages: u32) -> Self {
        PageControls {
            has_previous: current > 1,
            has_next: current < total_pages.max(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn forty_seven_jobs_in_pages_of_twenty() {
        assert_eq!(total_pages(47, 20), 3);
        assert_eq!(to_offset(1, 20), 0);
        assert_eq!(to_offset(2, 20), 20);
        assert_eq!(to_offset(3, 20), 40);
        assert_eq!(items_on_page(47, 3, 20), 7);
        assert_eq!(items_on_page(47, 4, 20), 0);
    }

    #[test]
    fn empty_result_still_has_one_page() {
        assert_eq!(total_pages(0, 20), 1);
        assert_eq!(page_window(1, 1, 5), vec![1]);
    }

    #[test]
    fn page_request_treats_zero_as_first_page() {
        assert_eq!(PageRequest::new(0, 20), PageRequest { offset: 0, limit: 20 });
        assert_eq!(PageRequest::new(4, 10), PageRequest { offset: 30, limit: 10 });
    }

    #[test]
    fn window_rules() {
        assert_eq!(page_window(2, 4, 5), vec![1, 2, 3, 4]);
        assert_eq!(page_window(1, 10, 5), vec![1, 2, 3, 4, 5]);
        assert_eq!(page_window(3, 10, 5), vec![1, 2, 3, 4, 5]);
        assert_eq!(page_window(4, 10, 5), vec![2, 3, 4, 5, 6]);
        assert_eq!(page_window(8, 10, 5), vec![6, 7, 8, 9, 10]);
        assert_eq!(page_window(10, 10, 5), vec![6, 7, 8, 9, 10]);
        assert_eq!(page_window(7, 10, 5), vec![5, 6, 7, 8, 9]);
    }

    #[test]
    fn navigation_bounds() {
        assert!(!is_navigable(0, 3));
        assert!(is_navigable(1, 3));
        assert!(is_navigable(3, 3));
        assert!(!is_navigable(4, 3));

        let controls = PageControls::new(1, 3);
        assert!(!controls.has_previous);
        assert!(controls.has_next);
        let controls = PageControls::new(3, 3);
        assert!(controls.has_previous);
        assert!(!controls.has_next);
    }

    proptest! {
        #[test]
        fn total_pages_is_ceiling(total in 0u64..100_000, page_size in 1u32..500) {
            let pages = total_pages(total, page_size);
            let expected = ((total + u64::from(page_size) - 1) / u64::from(page_size)).max(1);
            prop_assert_eq!(u64::from(pages), expected);
            prop_assert_eq!(to_offset(1, page_size), 0);
        }

        #[test]
        fn window_is_contiguous_and_in_range(
            total in 1u32..200,
            current in 0u32..220,
            window in 1u32..12,
        ) {
            let pages = page_window(current, total, window);
            prop_assert_eq!(pages.len() as u32, window.min(total));
            prop_assert!(pages.windows(2).all(|w| w[1] == w[0] + 1));
            prop_assert!(pages.iter().all(|p| (1..=total).contains(p)));
            let clamped = current.clamp(1, total);
            prop_assert!(pages.contains(&clamped));
        }
    }
}
