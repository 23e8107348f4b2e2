use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

/// `<cache_dir>/<safe>_<hash16>.json`, where `hash16` is the first 16 hex
/// characters of `SHA-256(key)` and `safe` is the first 50 characters of
/// `key` with every non-alphanumeric character replaced by `_`. "Alphanumeric"
/// is Unicode-aware (matches Python's `str.isalnum()`, the peer tool's own
/// sanitiser), not ASCII-only, so non-Latin labels hash to the same filename
/// on both sides.
///
/// Pure function of its inputs: equal `(cache_dir, key)` always produces an
/// equal path. `safe`-prefix collisions (two keys sharing their first 50
/// sanitised characters) are disambiguated by the hash suffix.
pub fn cache_path(cache_dir: &Path, key: &str) -> PathBuf {
    let hash16 = hash16(key);
    let safe = sanitize(key);
    cache_dir.join(format!("{safe}_{hash16}.json"))
}

fn hash16(key: &str) -> String {
    let digest = Sha256::digest(key.as_bytes());
    let mut hex = String::with_capacity(16);
    for byte in digest.iter().take(8) {
        hex.push_str(&format!("{byte:02x}"));
    }
    hex
}

fn sanitize(key: &str) -> String {
    key.chars()
        .take(50)
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_pure() {
        let dir = Path::new("/tmp/cache");
        let a = cache_path(dir, "concept:agrovoc:en:potatoes");
        let b = cache_path(dir, "concept:agrovoc:en:potatoes");
        assert_eq!(a, b);
    }

    #[test]
    fn differs_by_key() {
        let dir = Path::new("/tmp/cache");
        let a = cache_path(dir, "concept:agrovoc:en:potatoes");
        let b = cache_path(dir, "concept:agrovoc:en:tomatoes");
        assert_ne!(a, b);
    }

    #[test]
    fn sanitize_is_unicode_aware() {
        // "café" and "pôtisserie" would collapse to different ASCII-only
        // sanitisations than Python's `isalnum()` produces; "café" must keep
        // its accented letters as themselves, not `_`.
        assert_eq!(sanitize("café"), "café");
        assert_eq!(sanitize("pommes de terre!"), "pommes_de_terre_");
    }

    #[test]
    fn basename_prefix_matches_key_kind() {
        let dir = Path::new("/tmp/cache");
        let concept = cache_path(dir, "concept:agrovoc:en:potatoes");
        let labels = cache_path(dir, "labels:agrovoc:aaaaaaaaaaaaaaaa");
        assert!(concept.file_name().unwrap().to_str().unwrap().starts_with("concept_"));
        assert!(labels.file_name().unwrap().to_str().unwrap().starts_with("labels_"));
    }
}
