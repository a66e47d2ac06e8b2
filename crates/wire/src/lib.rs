//! Wire/boundary support for the report API feed.
//!
//! This crate provides **wire models** for the payload returned by the external report API
//! and the parsing helpers that turn feed text into those models:
//! - the `{"reports": [...]}` envelope
//! - raw report records with optional, possibly `null` fields
//! - lab element entries whose numbers may arrive as JSON numbers or numeric strings
//!
//! Parsing is lenient below the envelope: a field of the wrong type reads as absent instead
//! of failing the feed. Only unreadable files and invalid JSON are errors.
//!
//! It does not apply display defaults. Resolving absent fields into the canonical report shape
//! is the job of the normaliser in `medwell-core`.

pub mod feed;

pub use feed::{RawElement, RawElements, RawFeed, RawId, RawNumber, RawReport, RawReportDetail, ReportFeed};

/// Errors returned by the `medwell-wire` boundary crate.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Type alias for Results that can fail with a [`WireError`].
pub type WireResult<T> = Result<T, WireError>;
