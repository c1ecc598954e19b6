/// The "show N, then show more" slice of a list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Page<'a, T> {
    pub visible: &'a [T],
    pub has_more: bool,
}

/// Everything already shown plus one more page. The caller bumps `shown` by
/// `page_size` on "Show More" and windows the same list again.
pub fn window<T>(list: &[T], shown: usize, page_size: usize) -> Page<'_, T> {
    let limit = shown.saturating_add(page_size);
    Page {
        visible: &list[..limit.min(list.len())],
        has_more: list.len() > limit,
    }
}
