use std::fs;
use std::path::Path;

use serde::Serialize;
use txr_types::NegativeCacheFile;

use crate::store::NOT_FOUND_FILE;

#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub concept_count: usize,
    pub labels_count: usize,
    pub not_found_count: usize,
    pub cache_dir: String,
}

/// Non-recursive scan of `cache_dir` for `*.json` files. Basenames starting
/// with `concept_` count toward `concept_count`, `labels_` toward
/// `labels_count`; the reserved `_not_found.json` contributes
/// `len(entries)` to `not_found_count`. Unparseable files contribute zero —
/// this is a scan, not a validator.
pub fn cache_stats(cache_dir: &Path) -> CacheStats {
    let mut concept_count = 0;
    let mut labels_count = 0;
    let mut not_found_count = 0;

    if let Ok(entries) = fs::read_dir(cache_dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if name == NOT_FOUND_FILE {
                not_found_count = fs::read_to_string(&path)
                    .ok()
                    .and_then(|s| serde_json::from_str::<NegativeCacheFile>(&s).ok())
                    .map(|f| f.entries.len())
                    .unwrap_or(0);
            } else if name.starts_with("concept_") {
                concept_count += 1;
            } else if name.starts_with("labels_") {
                labels_count += 1;
            }
        }
    }

    CacheStats {
        concept_count,
        labels_count,
        not_found_count,
        cache_dir: cache_dir.display().to_string(),
    }
}
