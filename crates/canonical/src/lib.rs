//! Pagewatch tokenizer layer.
//!
//! Turns raw document text into normalized, offset-annotated tokens that the
//! diff and matcher crates build on.
//!
//! ## What we do
//!
//! - UAX #29 word segmentation (`unicode-segmentation`)
//! - NFKC normalization and case folding
//! - Stopword removal and Snowball stemming for a registry of languages
//! - Byte offsets into the untouched input for every surviving token
//! - A bounded [`ParserPool`] so stemmers are built once and shared
//!
//! ## Invariants worth knowing
//!
//! - `Token::start`/`Token::end` always index the original text, never the
//!   normalized form
//! - Token order follows text order; ranges never overlap
//! - Keywords and document text must go through the *same*
//!   [`TokenizeOptions`] or they will not line up
//!
//! ```rust
//! use canonical::{tokenize, token_texts, TokenizeOptions};
//!
//! let tokens = tokenize("Greek   Mythology!", &TokenizeOptions::default()).unwrap();
//! assert_eq!(token_texts(&tokens), vec!["greek", "mythology"]);
//! assert_eq!((tokens[1].start, tokens[1].end), (8, 17));
//! ```

mod config;
mod error;
mod hash;
mod language;
mod parser;
mod pool;
mod token;
mod whitespace;

pub use crate::config::TokenizeOptions;
pub use crate::error::CanonicalError;
pub use crate::hash::hash_text;
pub use crate::language::{Language, LanguageProfile, LanguageRegistry};
pub use crate::parser::{tokenize, Parser, Tokenizer};
pub use crate::pool::{ParserPool, PooledParser};
pub use crate::token::{token_texts, Token};
pub use crate::whitespace::collapse_whitespace;
