//! Error taxonomy for the ceremony core (spec §7).
//!
//! Every fallible operation in this crate returns `Result<_, CoreError>`. The
//! participant engine and driver treat every variant as fatal: the caller is
//! responsible for zeroing the secret and exiting non-zero (see `secret.rs`
//! and `driver.rs`).

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("transcript file {path:?} is malformed: {reason}")]
    FormatError { path: PathBuf, reason: String },

    #[error("checksum mismatch in {path:?}")]
    ChecksumMismatch { path: PathBuf },

    #[error("point at {context} is not on the curve or is the point at infinity")]
    InvalidPoint { context: String },

    #[error("transcript was not derived from the previous transcript")]
    ChainBroken,

    #[error("G1 power sequence failed the same-ratio check")]
    G1PowerSequenceInvalid,

    #[error("G2 power sequence failed the same-ratio check")]
    G2PowerSequenceInvalid,

    #[error("manifest invalid: {reason}")]
    ManifestInvalid { reason: String },

    #[error("ceremony set is incomplete: {reason}")]
    SetIncomplete { reason: String },

    #[error("range verification set is invalid")]
    RangeSetInvalid,

    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CoreError::Io {
            path: path.into(),
            source,
        }
    }
}
