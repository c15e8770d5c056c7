//! Pagewatch difference detection.
//!
//! Given two token streams produced by the `canonical` tokenizer (each with
//! byte offsets into its own snapshot text), [`detect`] returns the ordered
//! [`DiffSpan`]s that turn the older snapshot into the newer one.
//!
//! ## How it works
//!
//! - Each stream is rendered as a *normalized view*: token texts joined by a
//!   single space, with a per-character map back to original offsets. Layout
//!   noise removed by normalization therefore never shows up as a change.
//! - The views are aligned with Myers' middle-snake bisection, then cleaned up
//!   semantically so the script prefers long unchanged runs and word
//!   boundaries.
//! - One walk over the script emits spans, merging adjacent runs of the same
//!   event.
//!
//! ## Invariants worth knowing
//!
//! - `deleted` and `unchanged` offsets index the old text; `inserted` offsets
//!   index the new text.
//! - `deleted` + `unchanged` span texts rebuild the old view; `inserted` +
//!   `unchanged` rebuild the new view.
//! - Same input, same spans. No clocks, no randomness.
//!
//! ```rust
//! use canonical::{tokenize, TokenizeOptions};
//! use diff::{detect, DiffEvent};
//!
//! let opts = TokenizeOptions::default();
//! let old = "Zeus rules Olympus.";
//! let new = "Zeus rules Olympus and Crete.";
//! let spans = detect(
//!     &tokenize(old, &opts).unwrap(), old,
//!     &tokenize(new, &opts).unwrap(), new,
//! ).unwrap();
//!
//! let inserted: Vec<_> = spans.iter().filter(|s| s.event == DiffEvent::Inserted).collect();
//! assert_eq!(inserted.len(), 1);
//! assert_eq!(inserted[0].text, " and crete");
//! ```

mod algorithm;
mod detector;
mod types;
mod view;

pub use crate::detector::detect;
pub use crate::types::{DiffError, DiffEvent, DiffSpan, DiffSummary, Side};
