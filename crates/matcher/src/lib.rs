//! # Pagewatch Matcher (`matcher`)
//!
//! ## Purpose
//!
//! `matcher` sits on top of the difference detector (`diff`). Given the spans
//! of one comparison and a subscriber's keywords, it reports which keywords
//! appear in inserted or deleted content, with a snippet of surrounding
//! context cut from the full snapshot text.
//!
//! ## Core Types
//!
//! - [`Keyword`]: a phrase normalized with the same tokenizer options as
//!   document text.
//! - [`MatchFilter`] / [`MatchOptions`]: event filter and snippet radius
//!   (default 50 characters).
//! - [`Match`]: keyword + event + span text, plus a snippet that is not part of
//!   its identity.
//! - [`MatchSet`]: ordered set of matches; set semantics are the only dedup.
//! - [`MatchRecord`]: the serialized notification line for one match.
//! - [`DifferenceMatcher`]: the scanner itself.
//!
//! ## Matching rule
//!
//! A keyword matches a span when its token sequence appears contiguously, in
//! order, in the span's token sequence. Span text is already normalized, so its
//! tokens are its space-separated words. `unchanged` spans never match.
//!
//! ## Example Usage
//!
//! ```rust
//! use canonical::{Parser, TokenizeOptions};
//! use diff::{DiffEvent, DiffSpan};
//! use matcher::{DifferenceMatcher, MatchOptions};
//!
//! let parser = Parser::new();
//! let options = TokenizeOptions::default();
//! let matcher = DifferenceMatcher::new(&parser, &options);
//! let keyword = matcher.build_keyword("Norse mythology").unwrap();
//!
//! let new_text = "Giants of Norse mythology";
//! let spans = vec![DiffSpan::new(DiffEvent::Inserted, "giants of norse mythology", 0)];
//! let matches = matcher.find_matches(&spans, &[keyword], &MatchOptions::default(), "", new_text);
//!
//! assert_eq!(matches.len(), 1);
//! assert_eq!(matches.iter().next().unwrap().snippet, "Giants of Norse mythology");
//! ```
//!
//! ## Observability
//!
//! Install a [`MatchMetrics`] implementation via [`set_match_metrics`] to record
//! per-call latency and match counts. This is typically done once during
//! startup so all calls through [`DifferenceMatcher`] share the same metrics
//! backend.

pub mod engine;
pub mod metrics;
pub mod snippet;
pub mod types;

pub use crate::engine::DifferenceMatcher;
pub use crate::metrics::{set_match_metrics, MatchMetrics};
pub use crate::snippet::extract_snippet;
pub use crate::types::{Keyword, Match, MatchError, MatchFilter, MatchOptions, MatchRecord, MatchSet};
