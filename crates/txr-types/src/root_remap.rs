use crate::source::Source;

/// Per-source table mapping a root concept's lower-cased `prefLabel` to a
/// synthetic replacement segment for hierarchy paths. Treated as data, not
/// code: extending coverage for a source means adding rows here, not
/// branching in the hierarchy builder.
const AGROVOC_ROOTS: &[(&str, &str)] = &[
    ("products", "food"),
    ("plant products", "food"),
    ("animal products", "food"),
    ("processed products", "food"),
    ("aquatic products", "food"),
    ("equipment", "tools"),
    ("materials", "materials"),
    ("chemicals", "chemicals"),
    ("organisms", "organisms"),
];

/// Looks up the replacement segment for a root concept's lower-cased
/// preferred label, if the source's table maps it. Other sources currently
/// have an empty table and always return `None`.
pub fn remap_root(source: Source, lower_pref_label: &str) -> Option<&'static str> {
    let table: &[(&str, &str)] = match source {
        Source::Agrovoc => AGROVOC_ROOTS,
        Source::Dbpedia | Source::Wikidata => &[],
    };
    table
        .iter()
        .find(|(k, _)| *k == lower_pref_label)
        .map(|(_, v)| *v)
}
