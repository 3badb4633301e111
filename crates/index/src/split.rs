//! Sliding-window text splitter.
//!
//! Cuts a text block into fixed-size overlapping character windows. The cut
//! is a plain character count, not sentence-aware; the overlap keeps
//! sentences that straddle a boundary retrievable from at least one window.

/// Split `text` into windows of `window` characters advancing by
/// `window - overlap` characters each step.
///
/// Cuts always land on char boundaries, so multi-byte content is safe.
/// Empty input yields no windows; input shorter than one window yields a
/// single window holding the whole text.
pub fn split_text(text: &str, window: usize, overlap: usize) -> Vec<String> {
    if text.is_empty() || window == 0 {
        return Vec::new();
    }

    // Config validation keeps overlap < window; the clamp is a local guard.
    let stride = window.saturating_sub(overlap).max(1);

    // Byte offset of every char boundary, including the end of the text.
    let mut bounds: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
    bounds.push(text.len());
    let char_count = bounds.len() - 1;

    let mut windows = Vec::new();
    let mut start = 0usize;
    loop {
        let end = (start + window).min(char_count);
        windows.push(text[bounds[start]..bounds[end]].to_string());
        if end == char_count {
            break;
        }
        start += stride;
    }

    windows
}
