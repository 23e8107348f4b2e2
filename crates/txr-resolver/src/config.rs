use std::path::PathBuf;

use txr_adapters::AdapterConfig;

/// Everything the resolver needs for a lookup: where the cache lives, how
/// fresh an entry must be, and how to reach the three upstreams.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    pub cache_dir: PathBuf,
    pub cache_ttl_secs: f64,
    pub adapters: AdapterConfig,
}
