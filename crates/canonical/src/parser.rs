use std::borrow::Cow;
use std::sync::Arc;

use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

use crate::config::TokenizeOptions;
use crate::error::CanonicalError;
use crate::language::{LanguageProfile, LanguageRegistry};
use crate::token::Token;

/// Anything that can turn raw text into offset-annotated tokens.
///
/// Implementations must return tokens whose `[start, end)` ranges are
/// non-overlapping, strictly increasing, and index the untouched `text`.
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str, options: &TokenizeOptions)
        -> Result<Vec<Token>, CanonicalError>;
}

/// The standard tokenizer: UAX #29 word segmentation followed by NFKC, case
/// folding, stopword removal, and Snowball stemming.
///
/// Building a parser constructs a stemmer for every registered language, so
/// parsers are meant to be pooled (see [`ParserPool`](crate::ParserPool)) and
/// reused across cycles.
#[derive(Debug, Clone)]
pub struct Parser {
    registry: Arc<LanguageRegistry>,
}

impl Parser {
    pub fn new() -> Self {
        Self::with_registry(Arc::new(LanguageRegistry::standard()))
    }

    pub fn with_registry(registry: Arc<LanguageRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &LanguageRegistry {
        &self.registry
    }

    /// Resolve the language profile `options` ask for: the hinted code when
    /// present, otherwise detection over `text`.
    pub fn resolve_language(
        &self,
        text: &str,
        options: &TokenizeOptions,
    ) -> Result<&LanguageProfile, CanonicalError> {
        if let Some(hint) = options.language_hint.as_deref() {
            return self.registry.lookup(hint);
        }
        let lowered: Vec<String> = text
            .unicode_words()
            .map(|word| word.to_lowercase())
            .collect();
        self.registry
            .detect(lowered.iter().map(String::as_str))
            .ok_or_else(|| CanonicalError::UnsupportedLanguage("auto".into()))
    }

    /// Copy of `options` with the language resolved against `text` written in
    /// as the hint, so every later call with the returned options uses one
    /// stemmer and one stopword list whatever text it is given.
    ///
    /// Options that need no language, or already carry a hint, come back
    /// unchanged.
    pub fn pin_language(
        &self,
        text: &str,
        options: &TokenizeOptions,
    ) -> Result<TokenizeOptions, CanonicalError> {
        if !options.needs_language() || options.language_hint.is_some() {
            return Ok(options.clone());
        }
        let profile = self.resolve_language(text, options)?;
        Ok(options.clone().with_language_hint(profile.language().code()))
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer for Parser {
    fn tokenize(
        &self,
        text: &str,
        options: &TokenizeOptions,
    ) -> Result<Vec<Token>, CanonicalError> {
        options.validate()?;

        let profile = if options.needs_language() {
            Some(self.resolve_language(text, options)?)
        } else {
            None
        };

        let mut tokens = Vec::with_capacity(text.len() / 5 + 1);
        for (start, word) in text.unicode_word_indices() {
            let end = start + word.len();
            if let Some(normalized) = normalize_word(word, options, profile) {
                tokens.push(Token {
                    text: normalized,
                    start,
                    end,
                });
            }
        }

        tracing::trace!(
            tokens = tokens.len(),
            language = ?profile.map(|p| p.language()),
            "tokenized"
        );
        Ok(tokens)
    }
}

/// Run one word through the normalization steps. `None` means the word was
/// filtered out.
fn normalize_word(
    word: &str,
    options: &TokenizeOptions,
    profile: Option<&LanguageProfile>,
) -> Option<String> {
    let normalized: Cow<str> = if options.normalize_unicode {
        Cow::Owned(word.nfkc().collect())
    } else {
        Cow::Borrowed(word)
    };

    let folded: Cow<str> = if options.ignore_case {
        Cow::Owned(normalized.to_lowercase())
    } else {
        normalized
    };

    if let Some(profile) = profile {
        if options.filter_stopwords {
            let lower = folded.to_lowercase();
            if profile.is_stopword(&lower) {
                return None;
            }
        }
    }

    let text = match profile {
        Some(profile) if options.enable_stemming => profile.stem(&folded),
        _ => folded.into_owned(),
    };

    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Tokenize with a throwaway [`Parser`]. Convenient for tests and one-off
/// calls; long-running callers should pool parsers instead.
pub fn tokenize(text: &str, options: &TokenizeOptions) -> Result<Vec<Token>, CanonicalError> {
    Parser::new().tokenize(text, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::token_texts;

    #[test]
    fn offsets_index_original_text() {
        let text = "is the of the 100-eyed giant in Greek mythology.";
        let tokens = tokenize(text, &TokenizeOptions::default()).expect("tokenize");

        assert_eq!(
            token_texts(&tokens),
            vec!["is", "the", "of", "the", "100", "eyed", "giant", "in", "greek", "mythology"]
        );
        let greek = &tokens[8];
        assert_eq!((greek.start, greek.end), (32, 37));
        assert_eq!(greek.source(text), Some("Greek"));
    }

    #[test]
    fn offsets_strictly_increasing() {
        let text = "  Hello,   wonderful\nworld!  It's 100% fun. ";
        let tokens = tokenize(text, &TokenizeOptions::default()).expect("tokenize");
        for pair in tokens.windows(2) {
            assert!(pair[0].start < pair[1].start);
            assert!(pair[0].end <= pair[1].start);
        }
        assert!(tokens.iter().all(|t| t.source(text).is_some()));
    }

    #[test]
    fn case_preserved_when_not_folding() {
        let options = TokenizeOptions {
            ignore_case: false,
            ..Default::default()
        };
        let tokens = tokenize("Argus Panoptes", &options).expect("tokenize");
        assert_eq!(token_texts(&tokens), vec!["Argus", "Panoptes"]);
    }

    #[test]
    fn stopwords_filtered_for_detected_language() {
        let options = TokenizeOptions {
            filter_stopwords: true,
            ..Default::default()
        };
        let tokens = tokenize("The name of the giant", &options).expect("tokenize");
        assert_eq!(token_texts(&tokens), vec!["name", "giant"]);
        assert_eq!(tokens[0].start, 4);
    }

    #[test]
    fn stopwords_use_lowercase_form_even_without_folding() {
        let options = TokenizeOptions {
            ignore_case: false,
            filter_stopwords: true,
            ..Default::default()
        }
        .with_language_hint("en");
        let tokens = tokenize("The Giant", &options).expect("tokenize");
        assert_eq!(token_texts(&tokens), vec!["Giant"]);
    }

    #[test]
    fn stemming_with_language_hint() {
        let options = TokenizeOptions {
            enable_stemming: true,
            ..Default::default()
        }
        .with_language_hint("en");
        let tokens = tokenize("Giants running", &options).expect("tokenize");
        assert_eq!(token_texts(&tokens), vec!["giant", "run"]);
        assert_eq!((tokens[1].start, tokens[1].end), (7, 14));
    }

    #[test]
    fn unsupported_hint_is_an_error() {
        let options = TokenizeOptions {
            enable_stemming: true,
            ..Default::default()
        }
        .with_language_hint("xx");
        let err = tokenize("anything", &options).expect_err("unsupported");
        assert_eq!(err, CanonicalError::UnsupportedLanguage("xx".into()));
    }

    #[test]
    fn hint_ignored_when_no_language_step_enabled() {
        let options = TokenizeOptions::default().with_language_hint("xx");
        assert!(tokenize("anything goes", &options).is_ok());
    }

    #[test]
    fn nfkc_folds_compatibility_forms() {
        let tokens = tokenize("ﬁle Ｒｕｓｔ", &TokenizeOptions::default()).expect("tokenize");
        assert_eq!(token_texts(&tokens), vec!["file", "rust"]);
        assert_eq!(tokens[1].start, "ﬁle ".len());
    }

    #[test]
    fn pinned_language_follows_the_document() {
        let parser = Parser::new();
        let options = TokenizeOptions {
            enable_stemming: true,
            ..Default::default()
        };
        let document = "Die Stadt ist alt und die Häuser sind nicht neu.";
        let pinned = parser.pin_language(document, &options).expect("pin");
        assert_eq!(pinned.language_hint.as_deref(), Some("de"));

        // On its own the keyword has no stopwords and falls back to English.
        let alone = parser.tokenize("Häuser", &options).expect("tokenize");
        let with_document = parser.tokenize("Häuser", &pinned).expect("tokenize");
        let in_document = parser.tokenize(document, &pinned).expect("tokenize");
        assert_ne!(token_texts(&alone), token_texts(&with_document));
        assert!(token_texts(&in_document).contains(&with_document[0].text.as_str()));
    }

    #[test]
    fn pinning_keeps_explicit_hints_and_plain_options() {
        let parser = Parser::new();
        let hinted = TokenizeOptions {
            filter_stopwords: true,
            ..Default::default()
        }
        .with_language_hint("fr");
        assert_eq!(
            parser.pin_language("the giant", &hinted).expect("pin"),
            hinted
        );

        let plain = TokenizeOptions::default();
        assert_eq!(parser.pin_language("die Stadt", &plain).expect("pin"), plain);
    }

    #[test]
    fn empty_and_punctuation_only_inputs_yield_no_tokens() {
        let options = TokenizeOptions::default();
        assert!(tokenize("", &options).expect("tokenize").is_empty());
        assert!(tokenize(" ... !!! ", &options).expect("tokenize").is_empty());
    }
}
