//! Content-type readers: fetched body -> plain text.
//!
//! Readers are registered explicitly by content type. Looking up a type with
//! no registered reader is a typed [`ReaderError::NotSupported`].

use std::collections::HashMap;
use std::sync::Arc;

use canonical::collapse_whitespace;
use once_cell::sync::OnceCell;
use regex::Regex;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReaderError {
    #[error("no reader registered for content type `{0}`")]
    NotSupported(String),
    #[error("document body contains no text")]
    Empty,
}

/// Extracts the human-visible text of a document body.
pub trait Reader: Send + Sync {
    fn read(&self, body: &str) -> Result<String, ReaderError>;
}

/// `text/plain`: the body is the text.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextReader;

impl Reader for PlainTextReader {
    fn read(&self, body: &str) -> Result<String, ReaderError> {
        if body.trim().is_empty() {
            return Err(ReaderError::Empty);
        }
        Ok(body.to_string())
    }
}

/// `text/html`: drops scripts, styles, comments and tags, decodes entities,
/// and collapses layout whitespace.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlReader;

fn hidden_blocks() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| {
        Regex::new(r"(?is)<script\b.*?</script\s*>|<style\b.*?</style\s*>|<!--.*?-->")
            .unwrap_or_else(|err| unreachable!("hidden block pattern is valid: {err}"))
    })
}

fn tags() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)</?[A-Za-z!][^>]*>")
            .unwrap_or_else(|err| unreachable!("tag pattern is valid: {err}"))
    })
}

impl Reader for HtmlReader {
    fn read(&self, body: &str) -> Result<String, ReaderError> {
        let visible = hidden_blocks().replace_all(body, " ");
        // Tags become spaces so adjacent block elements do not fuse words.
        let stripped = tags().replace_all(&visible, " ");
        let decoded = html_escape::decode_html_entities(&stripped);
        let text = collapse_whitespace(&decoded);
        if text.is_empty() {
            return Err(ReaderError::Empty);
        }
        Ok(text)
    }
}

/// Explicit mapping from content type to [`Reader`].
#[derive(Clone, Default)]
pub struct ReaderRegistry {
    readers: HashMap<String, Arc<dyn Reader>>,
}

impl ReaderRegistry {
    /// Empty registry; every lookup is `NotSupported` until readers are added.
    pub fn new() -> Self {
        Self::default()
    }

    /// `text/plain` and `text/html`.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register("text/plain", Arc::new(PlainTextReader));
        registry.register("text/html", Arc::new(HtmlReader));
        registry
    }

    pub fn register(&mut self, content_type: &str, reader: Arc<dyn Reader>) {
        self.readers.insert(essence(content_type), reader);
    }

    /// Find the reader for `content_type`. Parameters such as `charset` and
    /// letter case are ignored.
    pub fn get(&self, content_type: &str) -> Result<&dyn Reader, ReaderError> {
        self.readers
            .get(&essence(content_type))
            .map(|reader| reader.as_ref())
            .ok_or_else(|| ReaderError::NotSupported(content_type.to_string()))
    }

    pub fn read(&self, content_type: &str, body: &str) -> Result<String, ReaderError> {
        self.get(content_type)?.read(body)
    }

    pub fn content_types(&self) -> impl Iterator<Item = &str> {
        self.readers.keys().map(String::as_str)
    }
}

impl std::fmt::Debug for ReaderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut types: Vec<&str> = self.content_types().collect();
        types.sort_unstable();
        f.debug_struct("ReaderRegistry")
            .field("content_types", &types)
            .finish()
    }
}

/// `Text/HTML; charset=utf-8` -> `text/html`.
fn essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}
