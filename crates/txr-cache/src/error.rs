use thiserror::Error;

/// Crate-boundary error taxonomy for the cache store. `load`/`save`/
/// `is_negative`/`add_negative` never actually return this — every I/O and
/// parse failure is logged and folded into an absent/no-op result rather
/// than propagated — but it names the failure kinds for anything built on
/// top later.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error(transparent)]
    Io(#[from] txr_utils::TxrIoError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
