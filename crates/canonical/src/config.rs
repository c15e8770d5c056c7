//! Configuration types for the tokenizer adapter.
//!
//! [`TokenizeOptions`] is the flat option struct every tokenization call
//! receives. The same options must be used for document snapshots and for
//! keyword phrases, otherwise keyword tokens will never line up with document
//! tokens.
//!
//! # Examples
//!
//! ```rust
//! use canonical::TokenizeOptions;
//!
//! let options = TokenizeOptions::default();
//! assert!(options.ignore_case);
//! assert!(!options.filter_stopwords);
//! assert!(!options.enable_stemming);
//! assert!(options.language_hint.is_none());
//! ```
//!
//! ## Full normalization for English documents
//!
//! ```rust
//! use canonical::TokenizeOptions;
//!
//! let options = TokenizeOptions {
//!     filter_stopwords: true,
//!     enable_stemming: true,
//!     ..Default::default()
//! }
//! .with_language_hint("en");
//! assert_eq!(options.language_hint.as_deref(), Some("en"));
//! ```

use serde::{Deserialize, Serialize};

use crate::error::CanonicalError;

/// Options for a single tokenization call.
///
/// The struct is cheap to clone and serde-friendly so it can be embedded in
/// subscription records and YAML configuration.
///
/// ```json
/// {
///   "ignore_case": true,
///   "filter_stopwords": false,
///   "enable_stemming": false,
///   "language_hint": null,
///   "normalize_unicode": true
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct TokenizeOptions {
    /// Fold case before comparison.
    ///
    /// Folding uses Unicode lowercasing, which is locale-free and identical on
    /// every platform.
    #[serde(default = "default_true")]
    pub ignore_case: bool,

    /// Drop language-specific stopword tokens.
    ///
    /// Stopwords are matched against the lowercase form of each word, so a
    /// capitalised "The" at the start of a sentence is still dropped when
    /// `ignore_case` is off.
    #[serde(default)]
    pub filter_stopwords: bool,

    /// Reduce tokens to their Snowball stems.
    #[serde(default)]
    pub enable_stemming: bool,

    /// Language code (`"en"`, `"de"`, ...) that skips auto-detection.
    ///
    /// Only consulted when stopword filtering or stemming is enabled.
    #[serde(default)]
    pub language_hint: Option<String>,

    /// Apply Unicode NFKC normalization to each word before the other steps.
    #[serde(default = "default_true")]
    pub normalize_unicode: bool,
}

fn default_true() -> bool {
    true
}

impl Default for TokenizeOptions {
    fn default() -> Self {
        Self {
            ignore_case: true,
            filter_stopwords: false,
            enable_stemming: false,
            language_hint: None,
            normalize_unicode: true,
        }
    }
}

impl TokenizeOptions {
    /// Set the language hint, skipping auto-detection.
    pub fn with_language_hint(mut self, code: impl Into<String>) -> Self {
        self.language_hint = Some(code.into());
        self
    }

    /// Whether tokenization needs a resolved language at all.
    pub fn needs_language(&self) -> bool {
        self.filter_stopwords || self.enable_stemming
    }

    /// Reject hints that are blank rather than silently falling back to
    /// detection.
    pub fn validate(&self) -> Result<(), CanonicalError> {
        if let Some(hint) = &self.language_hint {
            if hint.trim().is_empty() {
                return Err(CanonicalError::InvalidConfig(
                    "language_hint must not be blank".into(),
                ));
            }
        }
        Ok(())
    }
}
