//! Content-addressed on-disk cache for the taxonomy resolver: deterministic
//! key→file mapping, TTL-gated positive reads, a consolidated negative-cache
//! file, and a non-recursive stats scan.

pub mod error;
pub mod path;
pub mod stats;
pub mod store;

pub use error::CacheError;
pub use path::cache_path;
pub use stats::{cache_stats, CacheStats};
pub use store::{add_negative, is_negative, load, load_key, now_secs, save, save_key, NOT_FOUND_FILE};
