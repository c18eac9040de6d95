//! Fixed-size pagination.
//!
//! Pages are 1-based. Clamping an out-of-range page number is the caller's
//! job ([`clamp_page`]); [`paginate`] itself just returns an empty slice.

/// Number of pages needed for `len` items; never less than 1.
pub fn total_pages(len: usize, page_size: usize) -> usize {
    len.div_ceil(page_size.max(1)).max(1)
}

/// Clamp a requested page number into `1..=total_pages`.
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

/// Slice out page `page` of `items`, plus the total page count.
pub fn paginate<T>(items: &[T], page_size: usize, page: usize) -> (&[T], usize) {
    let size = page_size.max(1);
    let total = total_pages(items.len(), size);
    if page == 0 {
        return (&items[..0], total);
    }
    let start = (page - 1).saturating_mul(size).min(items.len());
    let end = start.saturating_add(size).min(items.len());
    (&items[start..end], total)
}
