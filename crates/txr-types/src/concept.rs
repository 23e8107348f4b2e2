use std::collections::HashMap;

use serde::de::Deserializer;
use serde::{Deserialize, Serialize};

use crate::source::Source;

/// A single `{uri, label}` step on the path from a concept up to its root.
///
/// Writers always emit this pair form. Readers must also accept the older
/// on-disk format, where `broader` was a bare list of URI strings with no
/// label — see [`deserialize_broader`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroaderEntry {
    pub uri: String,
    #[serde(default)]
    pub label: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BroaderRaw {
    Pair { uri: String, #[serde(default)] label: String },
    UriOnly(String),
}

impl From<BroaderRaw> for BroaderEntry {
    fn from(raw: BroaderRaw) -> Self {
        match raw {
            BroaderRaw::Pair { uri, label } => BroaderEntry { uri, label },
            BroaderRaw::UriOnly(uri) => BroaderEntry { uri, label: String::new() },
        }
    }
}

/// Accepts both the newer `[{uri, label}, ...]` cache format and the older
/// bare `[uri, ...]` format.
pub fn deserialize_broader<'de, D>(deserializer: D) -> Result<Vec<BroaderEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Vec<BroaderRaw> = Vec::deserialize(deserializer)?;
    Ok(raw.into_iter().map(BroaderEntry::from).collect())
}

/// The canonical in-process representation of a taxonomy concept; also the
/// on-disk payload of a positive cache entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConceptRecord {
    pub uri: String,
    #[serde(rename = "prefLabel")]
    pub pref_label: String,
    pub source: Source,
    #[serde(default, deserialize_with = "deserialize_broader")]
    pub broader: Vec<BroaderEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        rename = "wikipediaUrl",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub wikipedia_url: Option<String>,
    #[serde(
        rename = "altLabel",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub alt_label: Option<HashMap<String, Vec<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<HashMap<String, String>>,
    /// Written only by the cache store; absent on a freshly-built record
    /// returned straight from an upstream adapter.
    #[serde(rename = "_cached_at", default, skip_serializing_if = "Option::is_none")]
    pub cached_at: Option<f64>,
}

impl ConceptRecord {
    pub fn new(uri: impl Into<String>, pref_label: impl Into<String>, source: Source) -> Self {
        Self {
            uri: uri.into(),
            pref_label: pref_label.into(),
            source,
            broader: Vec::new(),
            description: None,
            wikipedia_url: None,
            alt_label: None,
            labels: None,
            cached_at: None,
        }
    }

    /// A record is "present" only when it carries a non-empty URI; an empty
    /// URI marks a placeholder that must never be treated as a hit.
    pub fn is_present(&self) -> bool {
        !self.uri.is_empty()
    }

    /// Drops broader entries with an empty URI.
    pub fn drop_empty_broader(&mut self) {
        self.broader.retain(|b| !b.uri.is_empty());
    }
}

/// Implemented by every on-disk record so the cache store can stamp and read
/// `_cached_at` generically instead of duplicating TTL logic per record type.
pub trait Cached {
    fn cached_at(&self) -> Option<f64>;
    fn set_cached_at(&mut self, ts: f64);
}

impl Cached for ConceptRecord {
    fn cached_at(&self) -> Option<f64> {
        self.cached_at
    }

    fn set_cached_at(&mut self, ts: f64) {
        self.cached_at = Some(ts);
    }
}

impl Cached for LabelsRecord {
    fn cached_at(&self) -> Option<f64> {
        self.cached_at
    }

    fn set_cached_at(&mut self, ts: f64) {
        self.cached_at = Some(ts);
    }
}

/// The payload of a URI→labels cache entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelsRecord {
    pub uri: String,
    pub source: String,
    pub labels: HashMap<String, String>,
    #[serde(rename = "_cached_at", default, skip_serializing_if = "Option::is_none")]
    pub cached_at: Option<f64>,
}

/// A single entry in the consolidated negative-cache file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NegativeEntry {
    pub cached_at: f64,
}

/// The `_not_found.json` payload: every key confirmed absent at an upstream.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NegativeCacheFile {
    #[serde(default)]
    pub entries: HashMap<String, NegativeEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn broader_accepts_legacy_bare_uri_list() {
        let json = serde_json::json!({
            "uri": "http://aims.fao.org/aos/agrovoc/c_13551",
            "prefLabel": "potatoes",
            "source": "agrovoc",
            "broader": ["http://aims.fao.org/aos/agrovoc/c_8079"]
        });
        let record: ConceptRecord = serde_json::from_value(json).unwrap();
        assert_eq!(record.broader.len(), 1);
        assert_eq!(record.broader[0].uri, "http://aims.fao.org/aos/agrovoc/c_8079");
        assert_eq!(record.broader[0].label, "");
    }

    #[test]
    fn broader_accepts_newer_pair_list() {
        let json = serde_json::json!({
            "uri": "http://aims.fao.org/aos/agrovoc/c_13551",
            "prefLabel": "potatoes",
            "source": "agrovoc",
            "broader": [{"uri": "http://aims.fao.org/aos/agrovoc/c_8079", "label": "vegetables"}]
        });
        let record: ConceptRecord = serde_json::from_value(json).unwrap();
        assert_eq!(record.broader.len(), 1);
        assert_eq!(record.broader[0].uri, "http://aims.fao.org/aos/agrovoc/c_8079");
        assert_eq!(record.broader[0].label, "vegetables");
    }
}
