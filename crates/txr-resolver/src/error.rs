use thiserror::Error;

/// Crate-boundary error taxonomy for the resolver, composed from its two
/// collaborators' failure kinds, one variant per cause via `#[from]`.
///
/// As with [`txr_cache::CacheError`] and [`txr_adapters::AdapterError`], the
/// resolver's public operations (`lookup`, `get_labels`, `hierarchy_paths`)
/// never return a `Result`: every failure is folded into an `Option`/`bool`
/// outcome. This enum exists to name the taxonomy at the crate
/// boundary for anything built on top of it later (a CLI subcommand, a
/// future write path) rather than to be threaded through today's call sites.
#[derive(Debug, Error)]
pub enum ResolverError {
    #[error(transparent)]
    Cache(#[from] txr_cache::CacheError),
    #[error(transparent)]
    Adapter(#[from] txr_adapters::AdapterError),
}
