//! Error kinds surfaced by sequence evaluation.
//!
//! Every fallible public function returns [`anyhow::Result`]; library failures are
//! carried as a [`StreamError`] inside the `anyhow::Error`, so callers that care about the
//! kind can recover it:
//!
//! ```
//! use ironstream::*;
//!
//! let s = from_vec(vec![1, 2, 3]);
//! let again = s.clone();
//! assert_eq!(s.count().unwrap(), 3);
//!
//! let err = again.count().unwrap_err();
//! assert!(matches!(err.downcast_ref::<StreamError>(), Some(StreamError::Exhausted)));
//! ```
//!
//! Empty results (`min` of nothing, `reduce` of nothing, ...) are never errors; they are
//! reported as `None`.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StreamError {
    /// A single-pass sequence (or a chain derived from it) was consumed a second time.
    #[error("sequence has already been consumed")]
    Exhausted,

    /// `to_map` saw the same key twice.
    #[error("duplicate key `{key}` while collecting into a map")]
    DuplicateKey { key: String },

    /// Natural ordering was requested for elements that are not totally ordered.
    #[error("elements cannot be ordered: {detail}")]
    Unordered { detail: String },

    /// A source could not open or read its underlying resource.
    #[error("resource error ({what}): {source}")]
    Resource {
        what: String,
        #[source]
        source: io::Error,
    },

    #[error("invalid split pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

impl StreamError {
    pub(crate) fn resource(what: impl Into<String>, source: io::Error) -> Self {
        Self::Resource { what: what.into(), source }
    }

    pub(crate) fn duplicate_key(key: &impl std::fmt::Debug) -> Self {
        Self::DuplicateKey { key: format!("{key:?}") }
    }
}

/// True when `err` wraps the given kind of [`StreamError`]. Handy in tests.
///
/// ```
/// use ironstream::{error::is_kind, StreamError};
/// let e = anyhow::Error::new(StreamError::Exhausted);
/// assert!(is_kind(&e, |k| matches!(k, StreamError::Exhausted)));
/// ```
pub fn is_kind(err: &anyhow::Error, pred: impl Fn(&StreamError) -> bool) -> bool {
    err.chain()
        .filter_map(|e| e.downcast_ref::<StreamError>())
        .any(pred)
}
