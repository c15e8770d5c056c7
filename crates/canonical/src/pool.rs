//! Bounded pool of [`Parser`] instances.
//!
//! Stemmer construction is the expensive part of a parser, so a fixed number
//! of parsers is built up front and handed out for the duration of one
//! detection cycle. [`ParserPool::acquire`] blocks until a parser is free or
//! the timeout elapses; the returned [`PooledParser`] puts the parser back when
//! it is dropped, on every exit path.
//!
//! ```rust
//! use std::time::Duration;
//! use canonical::{ParserPool, Tokenizer, TokenizeOptions};
//!
//! let pool = ParserPool::new(2).unwrap();
//! {
//!     let parser = pool.acquire(Duration::from_millis(10)).unwrap();
//!     let tokens = parser.tokenize("Hello world", &TokenizeOptions::default()).unwrap();
//!     assert_eq!(tokens.len(), 2);
//!     assert_eq!(pool.available(), 1);
//! }
//! assert_eq!(pool.available(), 2);
//! ```

use std::ops::Deref;
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use crate::error::CanonicalError;
use crate::language::LanguageRegistry;
use crate::parser::Parser;

#[derive(Debug)]
pub struct ParserPool {
    idle: Mutex<Vec<Parser>>,
    released: Condvar,
    capacity: usize,
}

impl ParserPool {
    /// Build `capacity` parsers sharing one standard language registry.
    pub fn new(capacity: usize) -> Result<Self, CanonicalError> {
        Self::with_registry(capacity, Arc::new(LanguageRegistry::standard()))
    }

    pub fn with_registry(
        capacity: usize,
        registry: Arc<LanguageRegistry>,
    ) -> Result<Self, CanonicalError> {
        if capacity == 0 {
            return Err(CanonicalError::InvalidConfig(
                "parser pool capacity must be >= 1".into(),
            ));
        }
        let idle = (0..capacity)
            .map(|_| Parser::with_registry(Arc::clone(&registry)))
            .collect();
        Ok(Self {
            idle: Mutex::new(idle),
            released: Condvar::new(),
            capacity,
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Parsers currently idle.
    pub fn available(&self) -> usize {
        self.lock().len()
    }

    /// Block until a parser is free, or fail with
    /// [`CanonicalError::PoolExhausted`] once `timeout` has elapsed.
    pub fn acquire(&self, timeout: Duration) -> Result<PooledParser<'_>, CanonicalError> {
        let started = Instant::now();
        let deadline = started + timeout;
        let mut idle = self.lock();
        loop {
            if let Some(parser) = idle.pop() {
                return Ok(PooledParser {
                    parser: Some(parser),
                    pool: self,
                });
            }
            let now = Instant::now();
            if now >= deadline {
                tracing::warn!(
                    capacity = self.capacity,
                    waited_micros = started.elapsed().as_micros(),
                    "parser_pool_exhausted"
                );
                return Err(CanonicalError::PoolExhausted {
                    waited: started.elapsed(),
                    capacity: self.capacity,
                });
            }
            idle = match self.released.wait_timeout(idle, deadline - now) {
                Ok((guard, _)) => guard,
                Err(poisoned) => poisoned.into_inner().0,
            };
        }
    }

    /// Non-blocking variant of [`acquire`](Self::acquire).
    pub fn try_acquire(&self) -> Option<PooledParser<'_>> {
        self.lock().pop().map(|parser| PooledParser {
            parser: Some(parser),
            pool: self,
        })
    }

    fn release(&self, parser: Parser) {
        self.lock().push(parser);
        self.released.notify_one();
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Parser>> {
        self.idle
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// A parser checked out of a [`ParserPool`]; returned to the pool on drop.
#[derive(Debug)]
pub struct PooledParser<'a> {
    parser: Option<Parser>,
    pool: &'a ParserPool,
}

impl Deref for PooledParser<'_> {
    type Target = Parser;

    fn deref(&self) -> &Parser {
        // Only `Drop` takes the parser out.
        self.parser
            .as_ref()
            .unwrap_or_else(|| unreachable!("pooled parser used after release"))
    }
}

impl Drop for PooledParser<'_> {
    fn drop(&mut self) {
        if let Some(parser) = self.parser.take() {
            self.pool.release(parser);
        }
    }
}
