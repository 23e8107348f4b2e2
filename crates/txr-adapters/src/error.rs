use thiserror::Error;

/// The failure kinds an upstream HTTP call can hit, one variant per
/// underlying cause via `#[from]`.
///
/// Every adapter intentionally folds these into the domain-level
/// `(absent, transient_failure)` signal rather than propagating a `Result` —
/// errors here are kinds, not types — this enum documents the taxonomy at
/// the crate boundary the way `txr_cache::CacheError` does, rather than
/// being threaded through `search`/`labels` themselves.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
