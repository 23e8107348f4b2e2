use std::collections::{HashMap, HashSet};
use std::str::FromStr;

use txr_types::{root_remap::remap_root, Source};

use crate::config::ResolverConfig;
use crate::lookup::lookup_source;

/// Recursion bound for [`hierarchy_paths`]: guards against pathological or
/// malformed broader graphs rather than expecting one in practice.
pub const MAX_DEPTH: usize = 15;

fn normalize(label: &str) -> String {
    label.to_lowercase().replace(' ', "_").replace('-', "_")
}

/// Builds `"a/b/c"` prefixes of `path` and maps each to the matching URI in
/// `uris`, skipping the synthetic root segment when `skip_first` is set and
/// any segment whose URI is empty.
fn build_uri_map(path: &[String], uris: &[String], skip_first: bool) -> HashMap<String, String> {
    let start = usize::from(skip_first);
    let mut map = HashMap::new();
    for i in start..path.len() {
        if uris[i].is_empty() {
            continue;
        }
        map.insert(path[..=i].join("/"), uris[i].clone());
    }
    map
}

/// Recursive depth-first walk over the broader graph, starting at `label`.
/// The public entry point takes only `(label, lang, source, cache_dir)`;
/// this worker carries the extra recursion state privately so it never
/// leaks into the public API.
fn hierarchy_worker(
    config: &ResolverConfig,
    label: &str,
    lang: &str,
    source: Source,
    current_path: &[String],
    current_uris: &[String],
    visited: &HashSet<String>,
    depth: usize,
) -> (Vec<String>, bool, HashMap<String, String>) {
    if depth >= MAX_DEPTH {
        tracing::warn!(label, depth, "hierarchy depth cap reached");
        return (Vec::new(), false, HashMap::new());
    }

    let Some(concept) = lookup_source(config, label, lang, source) else {
        return (Vec::new(), false, HashMap::new());
    };

    if visited.contains(&concept.uri) {
        return (Vec::new(), true, HashMap::new());
    }

    let normalized = normalize(&concept.pref_label);
    let mut new_path = Vec::with_capacity(current_path.len() + 1);
    new_path.push(normalized);
    new_path.extend_from_slice(current_path);

    let mut new_uris = Vec::with_capacity(current_uris.len() + 1);
    new_uris.push(concept.uri.clone());
    new_uris.extend_from_slice(current_uris);

    let mut new_visited = visited.clone();
    new_visited.insert(concept.uri.clone());

    if concept.broader.is_empty() {
        let lower_pref = concept.pref_label.to_lowercase();
        let remapped = remap_root(source, &lower_pref);
        if let Some(replacement) = remapped {
            new_path[0] = replacement.to_string();
        }
        let path_string = new_path.join("/");
        let uri_map = build_uri_map(&new_path, &new_uris, remapped.is_some());
        return (vec![path_string], true, uri_map);
    }

    let mut combined_paths = Vec::new();
    let mut combined_found = false;
    let mut combined_uri_map = HashMap::new();

    for broader in &concept.broader {
        let (paths, found, uri_map) = hierarchy_worker(
            config,
            &broader.label,
            lang,
            source,
            &new_path,
            &new_uris,
            &new_visited,
            depth + 1,
        );
        combined_paths.extend(paths);
        combined_found |= found;
        combined_uri_map.extend(uri_map);
    }

    if combined_paths.is_empty() && !combined_found {
        // Every broader branch failed to resolve (none even pruned a cycle);
        // synthesise a partial path so hierarchy queries into disconnected
        // subgraphs still return something useful.
        let path_string = new_path.join("/");
        let uri_map = build_uri_map(&new_path, &new_uris, false);
        return (vec![path_string], !concept.uri.is_empty(), uri_map);
    }

    (combined_paths, combined_found, combined_uri_map)
}

/// `hierarchy_paths(label, lang, source, cache_dir) → (paths, found, uri_map)`.
pub fn hierarchy_paths(
    config: &ResolverConfig,
    label: &str,
    lang: &str,
    source: &str,
) -> (Vec<String>, bool, HashMap<String, String>) {
    let Ok(source) = Source::from_str(source) else {
        return (Vec::new(), false, HashMap::new());
    };
    hierarchy_worker(config, label, lang, source, &[], &[], &HashSet::new(), 0)
}
