//! Error type for the lexicon codec.
//!
//! Decoding never fails: malformed records are skipped and a malformed file
//! decodes to an empty list, because real lexicons accumulate deleted and
//! legacy records that must not block operation. Only the write path errors.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LexError {
    /// An error originating from I/O operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The rebuilt image could not replace the lexicon file.
    #[error("failed to replace {}: {source}", .path.display())]
    Persist {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, LexError>;
