use std::{io, result};

use thiserror::Error;

pub type Result<T, E = Error> = result::Result<T, E>;

/// Error types for `pagedfile` operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },

    #[error("requested {requested} bytes but only {available} remain in the file")]
    Underflow { requested: u64, available: u64 },

    #[error("failed to query file length")]
    IoSize(#[source] io::Error),

    #[error("failed to map region")]
    IoMap(#[source] io::Error),

    #[error("flush or unmap failed: {0}")]
    IoFlushOrUnmap(String),

    #[error("region-local offset {offset} does not fit the mapping's addressing width")]
    RegionOverflow { offset: u64 },

    #[error("internal invariant violated: {0}")]
    InvariantViolation(String),
}
