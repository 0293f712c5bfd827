//! Error types for book replay.
//!
//! A [`BookError`] means the feed disagrees with the reconstructed book.
//! The book is left untouched whenever one is returned, so the driver may
//! skip the event and carry on.

use thiserror::Error;

use crate::types::Side;

/// Result type alias for book operations.
pub type Result<T> = std::result::Result<T, BookError>;

/// Stream-consistency violations reported by [`crate::OrderBook`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BookError {
    /// Add for an id that is already resting
    #[error("duplicate order id {id}")]
    DuplicateOrder { id: u64 },

    /// Modify / trade / remove for an id that is not resting
    #[error("unknown order id {id}")]
    UnknownOrder { id: u64 },

    /// Event side disagrees with the resting order
    #[error("side mismatch for order {id}: book has {expected}, event has {actual}")]
    SideMismatch { id: u64, expected: Side, actual: Side },

    /// Event price disagrees with the resting order
    #[error("price mismatch for order {id}: book has {expected}, event has {actual}")]
    PriceMismatch { id: u64, expected: u64, actual: u64 },

    /// Add with nothing to rest
    #[error("zero size for new order {id}")]
    ZeroSize { id: u64 },

    /// Resting size at the level would exceed `u64::MAX`
    #[error("size overflow for order {id} at level {price}")]
    SizeOverflow { id: u64, price: u64 },

    /// Internal invariant violation found by a validation pass
    #[error("book inconsistency: {0}")]
    Inconsistent(String),
}

impl BookError {
    /// Order id the error refers to, if any
    pub fn order_id(&self) -> Option<u64> {
        match self {
            BookError::DuplicateOrder { id }
            | BookError::UnknownOrder { id }
            | BookError::SideMismatch { id, .. }
            | BookError::PriceMismatch { id, .. }
            | BookError::ZeroSize { id }
            | BookError::SizeOverflow { id, .. } => Some(*id),
            BookError::Inconsistent(_) => None,
        }
    }
}

/// Failures while reading the historical feed.
#[derive(Error, Debug)]
pub enum SourceError {
    /// Underlying reader failed
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A record could not be decoded
    #[error("parse error at line {line}: {msg}")]
    Parse { line: u64, msg: String },

    /// A price could not be converted to fixed-point ticks
    #[error("invalid price at line {line}: {value}")]
    InvalidPrice { line: u64, value: String },

    /// The source cannot reposition to the requested cursor
    #[error("cannot seek to cursor {cursor}")]
    SeekUnsupported { cursor: u64 },
}

/// Errors surfaced by [`crate::replay::ReplayDriver`].
#[derive(Error, Debug)]
pub enum ReplayError {
    /// The book rejected the event at `cursor`
    #[error("event {cursor} rejected: {source}")]
    Book {
        cursor: u64,
        #[source]
        source: BookError,
    },

    /// The feed failed
    #[error("source failed: {0}")]
    Source(#[from] SourceError),
}
