use md5::{Digest, Md5};

use crate::source::Source;

/// `concept:<source>:<lang>:<label-lowercased>` — the only thing that
/// controls which file a concept lookup reads and writes.
pub fn concept_key(source: Source, lang: &str, label: &str) -> String {
    format!("concept:{}:{}:{}", source.as_str(), lang, label.to_lowercase())
}

/// `labels:<source>:<md5(uri)[0:16]>`.
pub fn labels_key(source: Source, uri: &str) -> String {
    let digest = Md5::digest(uri.as_bytes());
    let hex = hex_lower(&digest);
    format!("labels:{}:{}", source.as_str(), &hex[..16])
}

fn hex_lower(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        s.push_str(&format!("{:02x}", b));
    }
    s
}
