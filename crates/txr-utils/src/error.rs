use std::path::PathBuf;

use thiserror::Error;

/// A path-carrying I/O error: attaches the path a plain `std::io::Error`
/// would otherwise drop.
#[derive(Debug, Error)]
#[error("io error: {source} ({path})")]
pub struct TxrIoError {
    pub path: PathBuf,
    pub source: std::io::Error,
}
