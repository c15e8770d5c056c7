//! Context excerpts around a match.
//!
//! The radius is counted in characters, never bytes, so multi-byte text is
//! never split. `...` marks a side where the excerpt stops short of the
//! snapshot boundary.

const ELLIPSIS: &str = "...";

/// Excerpt of `source` around `[position, position + len)` with `radius`
/// characters of context on each side.
///
/// `position` and `len` are byte quantities; both are clamped to `source`
/// and floored to character boundaries.
pub fn extract_snippet(source: &str, position: usize, len: usize, radius: usize) -> String {
    let begin = floor_char_boundary(source, position);
    let finish = floor_char_boundary(source, position.saturating_add(len)).max(begin);

    let start = source[..begin]
        .char_indices()
        .rev()
        .take(radius)
        .last()
        .map_or(begin, |(index, _)| index);
    let end = source[finish..]
        .char_indices()
        .nth(radius)
        .map_or(source.len(), |(index, _)| finish + index);

    let mut snippet = String::with_capacity(end - start + 2 * ELLIPSIS.len());
    if start > 0 {
        snippet.push_str(ELLIPSIS);
    }
    snippet.push_str(&source[start..end]);
    if end < source.len() {
        snippet.push_str(ELLIPSIS);
    }
    snippet
}

fn floor_char_boundary(text: &str, mut index: usize) -> usize {
    if index >= text.len() {
        return text.len();
    }
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}
