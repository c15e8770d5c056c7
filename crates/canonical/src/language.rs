//! Language registry: language code -> stopword list + stemmer.
//!
//! The registry is populated once at startup and looked up by code. An unknown
//! code yields [`CanonicalError::UnsupportedLanguage`]; there is no dynamic
//! discovery of stemmers.
//!
//! ```rust
//! use canonical::{Language, LanguageRegistry};
//!
//! let registry = LanguageRegistry::standard();
//! let profile = registry.lookup("de").unwrap();
//! assert_eq!(profile.language(), Language::German);
//! assert!(profile.is_stopword("und"));
//! assert!(registry.lookup("xx").is_err());
//! ```

use std::fmt;

use fxhash::{FxHashMap, FxHashSet};
use rust_stemmers::{Algorithm, Stemmer};
use serde::{Deserialize, Serialize};

use crate::error::CanonicalError;

/// Languages shipped with the standard registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    English,
    German,
    French,
    Spanish,
    Italian,
    Portuguese,
    Dutch,
}

impl Language {
    /// Detection order; earlier languages win ties.
    pub const ALL: [Language; 7] = [
        Language::English,
        Language::German,
        Language::French,
        Language::Spanish,
        Language::Italian,
        Language::Portuguese,
        Language::Dutch,
    ];

    /// ISO 639-1 code.
    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::German => "de",
            Language::French => "fr",
            Language::Spanish => "es",
            Language::Italian => "it",
            Language::Portuguese => "pt",
            Language::Dutch => "nl",
        }
    }

    fn algorithm(self) -> Algorithm {
        match self {
            Language::English => Algorithm::English,
            Language::German => Algorithm::German,
            Language::French => Algorithm::French,
            Language::Spanish => Algorithm::Spanish,
            Language::Italian => Algorithm::Italian,
            Language::Portuguese => Algorithm::Portuguese,
            Language::Dutch => Algorithm::Dutch,
        }
    }

    fn stopwords(self) -> &'static [&'static str] {
        match self {
            Language::English => ENGLISH_STOPWORDS,
            Language::German => GERMAN_STOPWORDS,
            Language::French => FRENCH_STOPWORDS,
            Language::Spanish => SPANISH_STOPWORDS,
            Language::Italian => ITALIAN_STOPWORDS,
            Language::Portuguese => PORTUGUESE_STOPWORDS,
            Language::Dutch => DUTCH_STOPWORDS,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Normalization resources for one language.
pub struct LanguageProfile {
    language: Language,
    stopwords: FxHashSet<&'static str>,
    stemmer: Stemmer,
}

impl LanguageProfile {
    /// Build the profile for a shipped language. Stemmer construction is the
    /// expensive part, which is why parsers are pooled.
    pub fn new(language: Language) -> Self {
        Self {
            language,
            stopwords: language.stopwords().iter().copied().collect(),
            stemmer: Stemmer::create(language.algorithm()),
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// `word` must already be lowercase.
    pub fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(word)
    }

    pub fn stem(&self, word: &str) -> String {
        self.stemmer.stem(word).into_owned()
    }
}

impl fmt::Debug for LanguageProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LanguageProfile")
            .field("language", &self.language)
            .field("stopwords", &self.stopwords.len())
            .finish_non_exhaustive()
    }
}

/// Explicit mapping from language code to [`LanguageProfile`].
#[derive(Debug, Default)]
pub struct LanguageRegistry {
    profiles: FxHashMap<&'static str, LanguageProfile>,
}

impl LanguageRegistry {
    /// Empty registry; every lookup fails until languages are registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every shipped language.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        for language in Language::ALL {
            registry.register(LanguageProfile::new(language));
        }
        registry
    }

    /// Register (or replace) the profile for its language code.
    pub fn register(&mut self, profile: LanguageProfile) {
        self.profiles.insert(profile.language.code(), profile);
    }

    /// Look up a profile by code. Codes are matched case-insensitively and
    /// region suffixes (`en-US`, `pt_BR`) are ignored.
    pub fn lookup(&self, code: &str) -> Result<&LanguageProfile, CanonicalError> {
        let primary = code
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        self.profiles
            .get(primary.as_str())
            .ok_or_else(|| CanonicalError::UnsupportedLanguage(code.to_string()))
    }

    pub fn get(&self, language: Language) -> Option<&LanguageProfile> {
        self.profiles.get(language.code())
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Pick the registered language whose stopwords occur most often among
    /// `words` (lowercase). Ties go to the earlier language in
    /// [`Language::ALL`]; no hits at all falls back to English when it is
    /// registered.
    pub fn detect<'w, I>(&self, words: I) -> Option<&LanguageProfile>
    where
        I: IntoIterator<Item = &'w str>,
    {
        let candidates: Vec<&LanguageProfile> = Language::ALL
            .iter()
            .filter_map(|language| self.get(*language))
            .collect();
        if candidates.is_empty() {
            return None;
        }

        let mut hits = vec![0usize; candidates.len()];
        for word in words {
            for (slot, profile) in candidates.iter().enumerate() {
                if profile.is_stopword(word) {
                    hits[slot] += 1;
                }
            }
        }

        let mut best = 0;
        for slot in 1..candidates.len() {
            if hits[slot] > hits[best] {
                best = slot;
            }
        }
        if hits[best] == 0 {
            return self.get(Language::English).or(Some(candidates[0]));
        }
        Some(candidates[best])
    }
}

const ENGLISH_STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
    "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "few", "for",
    "from", "further", "had", "has", "have", "having", "he", "her", "here", "hers", "him", "his",
    "how", "i", "if", "in", "into", "is", "it", "its", "itself", "just", "me", "more", "most",
    "my", "no", "nor", "not", "now", "of", "off", "on", "once", "only", "or", "other", "our",
    "ours", "out", "over", "own", "same", "she", "should", "so", "some", "such", "than", "that",
    "the", "their", "theirs", "them", "then", "there", "these", "they", "this", "those",
    "through", "to", "too", "under", "until", "up", "very", "was", "we", "were", "what", "when",
    "where", "which", "while", "who", "whom", "why", "will", "with", "would", "you", "your",
    "yours",
];

const GERMAN_STOPWORDS: &[&str] = &[
    "aber", "alle", "als", "also", "am", "an", "auch", "auf", "aus", "bei", "bin", "bis", "da",
    "das", "dass", "dem", "den", "der", "des", "die", "doch", "du", "ein", "eine", "einem",
    "einen", "einer", "es", "für", "hat", "ich", "ihr", "im", "in", "ist", "ja", "kein", "mit",
    "nach", "nicht", "noch", "nur", "oder", "sich", "sie", "sind", "so", "über", "um", "und",
    "uns", "von", "vor", "war", "wie", "wir", "wird", "zu", "zum", "zur",
];

const FRENCH_STOPWORDS: &[&str] = &[
    "au", "aux", "avec", "ce", "ces", "dans", "de", "des", "du", "elle", "en", "est", "et", "eux",
    "il", "je", "la", "le", "les", "leur", "lui", "ma", "mais", "me", "même", "mes", "moi", "mon",
    "ne", "nos", "notre", "nous", "on", "ou", "par", "pas", "pour", "qu", "que", "qui", "sa",
    "se", "ses", "son", "sont", "sur", "ta", "te", "tes", "toi", "ton", "tu", "un", "une", "vos",
    "votre", "vous",
];

const SPANISH_STOPWORDS: &[&str] = &[
    "al", "algo", "como", "con", "de", "del", "el", "ella", "en", "entre", "es", "esta", "este",
    "hay", "la", "las", "le", "les", "lo", "los", "más", "me", "mi", "muy", "no", "nos", "o",
    "para", "pero", "por", "que", "se", "si", "sin", "sobre", "son", "su", "sus", "también",
    "te", "tu", "un", "una", "uno", "y", "ya", "yo",
];

const ITALIAN_STOPWORDS: &[&str] = &[
    "a", "ai", "al", "alla", "anche", "che", "chi", "ci", "come", "con", "da", "dal", "degli",
    "dei", "del", "della", "delle", "di", "e", "è", "gli", "ha", "i", "il", "in", "io", "la",
    "le", "lo", "ma", "mi", "ne", "nel", "nella", "non", "per", "più", "se", "si", "sono", "su",
    "sul", "tra", "un", "una", "uno",
];

const PORTUGUESE_STOPWORDS: &[&str] = &[
    "a", "ao", "aos", "as", "com", "como", "da", "das", "de", "do", "dos", "e", "é", "ela", "ele",
    "em", "entre", "eu", "foi", "há", "isso", "já", "mais", "mas", "na", "nas", "não", "no",
    "nos", "o", "os", "ou", "para", "pela", "pelo", "por", "que", "se", "sem", "seu", "sua",
    "são", "também", "um", "uma",
];

const DUTCH_STOPWORDS: &[&str] = &[
    "aan", "al", "als", "bij", "dat", "de", "die", "dit", "door", "een", "en", "er", "had",
    "heb", "heeft", "het", "hij", "hoe", "ik", "in", "is", "je", "kan", "maar", "met", "mij",
    "naar", "niet", "nog", "of", "om", "ook", "op", "over", "te", "tot", "uit", "van", "voor",
    "was", "wat", "we", "wel", "wij", "zal", "ze", "zich", "zijn", "zo",
];
