use std::time::Instant;

use canonical::Token;

use crate::algorithm::{self, Edit};
use crate::types::{DiffError, DiffEvent, DiffSpan, DiffSummary, Side};
use crate::view::NormalizedView;


/// Compare two token streams and return the ordered spans that turn the old
/// snapshot into the new one.
///
/// Both streams are rendered as normalized views (token texts joined by single
/// spaces) and aligned character by character. Spans come out in a single
/// left-to-right walk with adjacent runs of the same event merged, so
/// concatenating `deleted` + `unchanged` texts rebuilds the old view and
/// `inserted` + `unchanged` the new one.
///
/// Offsets follow the owning snapshot: `deleted` and `unchanged` spans point
/// into `old_text`, `inserted` spans into `new_text`.
///
/// # Errors
///
/// [`DiffError::MalformedInput`] when a token range is out of bounds, not on
/// character boundaries, overlapping, or out of order. Empty streams are not
/// errors.
pub fn detect(
    old_tokens: &[Token],
    old_text: &str,
    new_tokens: &[Token],
    new_text: &str,
) -> Result<Vec<DiffSpan>, DiffError> {
    let started = Instant::now();

    let old_view = NormalizedView::build(old_tokens, old_text, Side::Old)?;
    let new_view = NormalizedView::build(new_tokens, new_text, Side::New)?;

    let edits = algorithm::diff(old_view.chars(), new_view.chars());
    let spans = walk(&edits, &old_view, &new_view);

    let summary = DiffSummary::from_spans(&spans);
    tracing::debug!(
        old_chars = old_view.len(),
        new_chars = new_view.len(),
        spans = spans.len(),
        inserted = summary.inserted_spans,
        deleted = summary.deleted_spans,
        elapsed_micros = started.elapsed().as_micros(),
        "diff_detected"
    );
    Ok(spans)
}

/// Walk the edit script with one cursor per view, anchoring each run in the
/// snapshot that owns it.
fn walk(edits: &[Edit], old_view: &NormalizedView, new_view: &NormalizedView) -> Vec<DiffSpan> {
    let mut spans: Vec<DiffSpan> = Vec::with_capacity(edits.len());
    let mut old_cursor = 0usize;
    let mut new_cursor = 0usize;

    for edit in edits.iter().filter(|edit| !edit.text.is_empty()) {
        let len = edit.text.len();
        let anchors = match edit.event {
            DiffEvent::Inserted => new_view.origins(new_cursor..new_cursor + len),
            DiffEvent::Deleted | DiffEvent::Unchanged => {
                old_view.origins(old_cursor..old_cursor + len)
            }
        };
        let offset = match edit.event {
            DiffEvent::Inserted => new_view.origin(new_cursor),
            DiffEvent::Deleted | DiffEvent::Unchanged => old_view.origin(old_cursor),
        };

        match spans.last_mut() {
            Some(last) if last.event == edit.event => {
                last.extend(edit.text.iter().copied(), anchors)
            }
            _ => spans.push(DiffSpan::anchored(
                edit.event,
                edit.text.iter().collect::<String>(),
                offset,
                anchors.to_vec(),
            )),
        }

        match edit.event {
            DiffEvent::Inserted => new_cursor += len,
            DiffEvent::Deleted => old_cursor += len,
            DiffEvent::Unchanged => {
                old_cursor += len;
                new_cursor += len;
            }
        }
    }

    spans
}
