use loctable_domain::{KeyDiff, SCHEMA_VERSION};
use std::collections::BTreeSet;

/// Compare scanned source keys against the table's key set. Pure function,
/// no I/O.
///
/// An empty table is "nothing to build", which is distinct from "every key is
/// missing" and never aborts. With keys present, strict mode aborts on any
/// missing key; lenient mode only reports.
pub fn diff_keys(scanned: &BTreeSet<String>, table_keys: &[String], strict: bool) -> KeyDiff {
    if table_keys.is_empty() {
        return KeyDiff {
            schema_version: SCHEMA_VERSION,
            missing: Vec::new(),
            table_empty: true,
            should_abort: false,
        };
    }

    let known: BTreeSet<&str> = table_keys.iter().map(String::as_str).collect();
    let missing: Vec<String> = scanned
        .iter()
        .filter(|key| !known.contains(key.as_str()))
        .cloned()
        .collect();
    let should_abort = strict && !missing.is_empty();

    KeyDiff {
        schema_version: SCHEMA_VERSION,
        missing,
        table_empty: false,
        should_abort,
    }
}
