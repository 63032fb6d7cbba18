/// Indices of one page of an endless feed over `len` items.
///
/// Pages wrap around the list, so any page of a non-empty list is full.
pub fn feed_window(len: usize, page: usize, per_page: usize) -> impl Iterator<Item = usize> {
    let start = if len == 0 {
        0
    } else {
        (page % len) * (per_page % len) % len
    };
    let count = if len == 0 { 0 } else { per_page };
    (0..count).map(move |i| (start + i % len) % len)
}
