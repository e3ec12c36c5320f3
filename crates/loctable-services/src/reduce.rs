use loctable_core::TranslationTable;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::warn;

/// Locale trees plus the authoritative ordered key list of the table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReducedTable {
    /// Header keys in table order, label cell excluded.
    pub keys: Vec<String>,
    pub locales: BTreeMap<String, Value>,
}

/// Fold a locale-major table into nested per-locale trees. Keys whose
/// dot-path is an ancestor or descendant of an already-assigned key in the
/// same locale are dropped with a warning; one bad key never aborts the
/// locale.
pub fn reduce(table: &TranslationTable) -> ReducedTable {
    let keys = table.keys().to_vec();
    let mut locales = BTreeMap::new();

    for series in &table.series {
        let mut tree = Value::Object(Map::new());
        let mut assigned: Vec<Vec<&str>> = Vec::new();
        for (key, value) in keys.iter().zip(&series.values) {
            // Empty cells contribute nothing and reserve no path.
            let Some(json) = value.to_json() else {
                continue;
            };
            let path: Vec<&str> = key.split('.').collect();
            if let Some(clash) = assigned.iter().find(|p| paths_conflict(p, &path)) {
                warn!(
                    event = "key_conflict",
                    locale = %series.locale,
                    key = %key,
                    conflicts_with = %clash.join("."),
                    "skipping conflicting key"
                );
                continue;
            }
            assign(&mut tree, &path, json);
            assigned.push(path);
        }
        locales.insert(series.locale.clone(), tree);
    }

    ReducedTable { keys, locales }
}

/// Two dot-paths conflict when one is a prefix of the other (equality
/// included).
fn paths_conflict(a: &[&str], b: &[&str]) -> bool {
    let n = a.len().min(b.len());
    a[..n] == b[..n]
}

fn assign(tree: &mut Value, path: &[&str], value: Value) {
    let (last, ancestors) = path.split_last().expect("split('.') yields at least one segment");
    let mut node = tree;
    for part in ancestors {
        node = node
            .as_object_mut()
            .expect("conflict rule keeps ancestor nodes as objects")
            .entry(part.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
    }
    node.as_object_mut()
        .expect("conflict rule keeps ancestor nodes as objects")
        .insert(last.to_string(), value);
}

#[cfg(test)]
mod tests {
    use super::*;
    use loctable_core::{CellValue, LocaleSeries};
    use serde_json::json;

    fn table(header: &[&str], series: &[(&str, &[&str])]) -> TranslationTable {
        TranslationTable {
            header: header.iter().map(|s| s.to_string()).collect(),
            series: series
                .iter()
                .map(|(locale, values)| LocaleSeries {
                    locale: locale.to_string(),
                    values: values.iter().map(|v| CellValue::from_text(*v)).collect(),
                })
                .collect(),
        }
    }

    #[test]
    fn keys_are_header_minus_label() {
        let reduced = reduce(&table(&["keys", "a.b", "a.c"], &[("en", &["1", "2"])]));
        assert_eq!(reduced.keys, vec!["a.b", "a.c"]);
    }

    #[test]
    fn builds_nested_tree_per_locale() {
        let reduced = reduce(&table(
            &["keys", "a.b", "a.c"],
            &[("en", &["1", "2"]), ("nb", &["en", "to"])],
        ));
        assert_eq!(reduced.locales["en"], json!({"a": {"b": "1", "c": "2"}}));
        assert_eq!(reduced.locales["nb"], json!({"a": {"b": "en", "c": "to"}}));
    }

    #[test]
    fn later_conflicting_key_is_dropped() {
        let reduced = reduce(&table(&["keys", "a", "a.b"], &[("en", &["X", "Y"])]));
        assert_eq!(reduced.locales["en"], json!({"a": "X"}));
    }

    #[test]
    fn ancestor_arriving_after_descendant_is_dropped() {
        let reduced = reduce(&table(&["keys", "a.b.c", "a.b"], &[("en", &["X", "Y"])]));
        assert_eq!(reduced.locales["en"], json!({"a": {"b": {"c": "X"}}}));
    }

    #[test]
    fn duplicate_key_keeps_first_value() {
        let reduced = reduce(&table(&["keys", "a.b", "a.b"], &[("en", &["first", "second"])]));
        assert_eq!(reduced.locales["en"], json!({"a": {"b": "first"}}));
    }

    #[test]
    fn conflict_in_one_locale_does_not_abort_the_rest() {
        let reduced = reduce(&table(
            &["keys", "a", "a.b", "c"],
            &[("en", &["X", "Y", "Z"])],
        ));
        assert_eq!(reduced.locales["en"], json!({"a": "X", "c": "Z"}));
    }

    #[test]
    fn empty_cells_are_omitted_and_reserve_no_path() {
        let mut t = table(&["keys", "a.b", "a"], &[("en", &["", "X"])]);
        t.series[0].values[0] = CellValue::Empty;
        let reduced = reduce(&t);
        // The empty `a.b` never claimed its path, so `a` assigns cleanly.
        assert_eq!(reduced.locales["en"], json!({"a": "X"}));
    }

    #[test]
    fn structured_cells_pass_through() {
        let mut t = table(&["keys", "rich"], &[("en", &[""])]);
        t.series[0].values[0] = CellValue::Structured(json!({"bold": true}));
        let reduced = reduce(&t);
        assert_eq!(reduced.locales["en"], json!({"rich": {"bold": true}}));
    }
}
