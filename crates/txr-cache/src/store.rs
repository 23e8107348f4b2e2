use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::de::DeserializeOwned;
use serde::Serialize;
use txr_types::{Cached, NegativeCacheFile, NegativeEntry};
use txr_utils::io::write_atomic;

use crate::path::cache_path;

/// Reserved filename for the consolidated negative cache; no positive record
/// may ever collide with it.
pub const NOT_FOUND_FILE: &str = "_not_found.json";

pub fn now_secs() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

/// Returns the parsed payload iff the file exists, parses, and
/// `now - _cached_at <= ttl`. Parse errors, I/O errors, and TTL expiry are
/// all folded into `None` — never propagated to the caller.
pub fn load<T>(path: &Path, ttl: f64) -> Option<T>
where
    T: DeserializeOwned + Cached,
{
    let contents = match txr_utils::io::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            tracing::debug!(error = %e, "cache file unreadable");
            return None;
        }
    };
    let record: T = match serde_json::from_str(&contents) {
        Ok(r) => r,
        Err(e) => {
            tracing::debug!(error = %e, path = %path.display(), "cache file unparseable");
            return None;
        }
    };
    let cached_at = record.cached_at().unwrap_or(0.0);
    if now_secs() - cached_at > ttl {
        return None;
    }
    Some(record)
}

/// Creates parent directories, stamps `_cached_at = now`, and writes JSON
/// with UTF-8 and non-ASCII preserved, 2-space indentation. Write errors are
/// logged at warning level and swallowed: durability is lost, correctness is
/// not.
pub fn save<T>(path: &Path, record: &T) -> T
where
    T: Serialize + Cached + Clone,
{
    let mut stamped = record.clone();
    stamped.set_cached_at(now_secs());
    match serde_json::to_vec_pretty(&stamped) {
        Ok(bytes) => {
            if let Err(e) = write_atomic(path, &bytes) {
                tracing::warn!(error = %e, path = %path.display(), "failed to write cache file");
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, path = %path.display(), "failed to serialize cache record");
        }
    }
    stamped
}

fn not_found_path(cache_dir: &Path) -> PathBuf {
    cache_dir.join(NOT_FOUND_FILE)
}

fn read_negative_file(cache_dir: &Path) -> NegativeCacheFile {
    let path = not_found_path(cache_dir);
    txr_utils::io::read_to_string(&path)
        .ok()
        .and_then(|s| serde_json::from_str(&s).ok())
        .unwrap_or_default()
}

/// True iff `key` was recorded absent at the upstream within `ttl`.
pub fn is_negative(cache_dir: &Path, key: &str, ttl: f64) -> bool {
    let file = read_negative_file(cache_dir);
    match file.entries.get(key) {
        Some(entry) => now_secs() - entry.cached_at <= ttl,
        None => false,
    }
}

/// Read-modify-write of `_not_found.json`, adding `entries[key] = {cached_at: now}`.
///
/// Racy under concurrent writers: losing a negative-cache entry
/// only costs an extra upstream call on the next miss, so no locking is
/// attempted here.
pub fn add_negative(cache_dir: &Path, key: &str) {
    let mut file = read_negative_file(cache_dir);
    file.entries.insert(
        key.to_string(),
        NegativeEntry {
            cached_at: now_secs(),
        },
    );
    match serde_json::to_vec_pretty(&file) {
        Ok(bytes) => {
            if let Err(e) = write_atomic(&not_found_path(cache_dir), &bytes) {
                tracing::warn!(error = %e, "failed to write negative cache file");
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "failed to serialize negative cache file");
        }
    }
}

/// Convenience: compute the path for `key` under `cache_dir` and load it.
pub fn load_key<T>(cache_dir: &Path, key: &str, ttl: f64) -> Option<T>
where
    T: DeserializeOwned + Cached,
{
    load(&cache_path(cache_dir, key), ttl)
}

/// Convenience: compute the path for `key` under `cache_dir` and save to it.
pub fn save_key<T>(cache_dir: &Path, key: &str, record: &T) -> T
where
    T: Serialize + Cached + Clone,
{
    save(&cache_path(cache_dir, key), record)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;
    use tempfile::tempdir;
    use txr_types::{ConceptRecord, Source};

    use super::*;

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let record = ConceptRecord::new(
            "http://aims.fao.org/aos/agrovoc/c_13551",
            "potatoes",
            Source::Agrovoc,
        );
        let path = dir.path().join("concept_agrovoc_en_potatoes_abcdef0123456789.json");
        let saved = save(&path, &record);
        assert!(saved.cached_at.is_some());

        let loaded: ConceptRecord = load(&path, 60.0).expect("should load fresh record");
        assert_eq!(loaded.uri, record.uri);
        assert_eq!(loaded.pref_label, record.pref_label);
    }

    #[test]
    fn expired_record_is_absent() {
        let dir = tempdir().unwrap();
        let mut record = ConceptRecord::new("http://example/c1", "x", Source::Agrovoc);
        record.cached_at = Some(now_secs() - 1000.0);
        let path = dir.path().join("concept_x_0000000000000000.json");
        let bytes = serde_json::to_vec_pretty(&record).unwrap();
        write_atomic(&path, &bytes).unwrap();

        let loaded: Option<ConceptRecord> = load(&path, 1.0);
        assert!(loaded.is_none());
    }

    #[test]
    fn missing_file_is_absent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("concept_missing_0000000000000000.json");
        let loaded: Option<ConceptRecord> = load(&path, 60.0);
        assert!(loaded.is_none());
    }

    #[test]
    fn negative_cache_round_trips() {
        let dir = tempdir().unwrap();
        assert!(!is_negative(dir.path(), "concept:agrovoc:en:xyzzy", 60.0));
        add_negative(dir.path(), "concept:agrovoc:en:xyzzy");
        assert!(is_negative(dir.path(), "concept:agrovoc:en:xyzzy", 60.0));
    }

    #[test]
    fn negative_cache_respects_ttl() {
        let dir = tempdir().unwrap();
        let mut file = NegativeCacheFile::default();
        file.entries.insert(
            "concept:agrovoc:en:old".to_string(),
            NegativeEntry {
                cached_at: now_secs() - 1000.0,
            },
        );
        let bytes = serde_json::to_vec_pretty(&file).unwrap();
        write_atomic(&not_found_path(dir.path()), &bytes).unwrap();

        assert!(!is_negative(dir.path(), "concept:agrovoc:en:old", 1.0));
    }

    #[test]
    fn labels_record_round_trips() {
        let dir = tempdir().unwrap();
        let mut labels = HashMap::new();
        labels.insert("en".to_string(), "Potatoes".to_string());
        let record = txr_types::LabelsRecord {
            uri: "http://example/c1".to_string(),
            source: "agrovoc".to_string(),
            labels,
            cached_at: None,
        };
        let path = dir.path().join("labels_agrovoc_abcdef0123456789.json");
        save(&path, &record);
        let loaded: txr_types::LabelsRecord = load(&path, 60.0).unwrap();
        assert_eq!(loaded.labels.get("en").unwrap(), "Potatoes");
    }
}
