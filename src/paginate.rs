//! Offset-token pagination for inline query answers.
//!
//! Telegram sends back the `next_offset` of the previous answer when the
//! user scrolls. The token here is the decimal index of the first result
//! on the page.
//!
//! The next token is always numeric, even past the end of the list: a
//! client reaches the end when it receives an empty page, not when the
//! token is empty.

/// Maximum results per inline query answer (Telegram's limit).
pub const PAGE_SIZE: usize = 50;

/// One page of results plus the token for the following page.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub results: Vec<T>,
    pub next_offset: String,
}

/// Parse an offset token.
///
/// Only plain ASCII digit strings are offsets; anything else (empty,
/// signed, non-numeric) is `None`. Values too large for `usize` saturate.
pub fn parse_offset(token: &str) -> Option<usize> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(token.parse().unwrap_or(usize::MAX))
}

/// Slice `results` into the page addressed by `offset`.
///
/// An unparseable token addresses the first page. The next token is
/// `start + PAGE_SIZE`; when `start` saturated at `usize::MAX` the next
/// token is `usize::MAX` as well, and the page is empty.
pub fn paginate<T: Clone>(results: &[T], offset: &str) -> Page<T> {
    let start = parse_offset(offset).unwrap_or(0);
    let end = start.saturating_add(PAGE_SIZE);

    let page = results
        .get(start.min(results.len())..end.min(results.len()))
        .unwrap_or(&[])
        .to_vec();

    Page {
        results: page,
        next_offset: end.to_string(),
    }
}
