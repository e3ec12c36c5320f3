//! Cell-level reconciliation between the remote sheet and a local
//! translation document. Column indices are resolved once and threaded
//! through explicitly; nothing here keeps cursor state between calls.

use loctable_core::{CellUpdate, CellValue, LocError, Marker, Result, Sheet};
use loctable_domain::ExportRow;
use loctable_sheet_api::TranslationDocument;
use std::collections::BTreeMap;
use tracing::info;

/// Resolve the column of `locale` in a sheet header. Column 0 holds keys and
/// is never a locale; an unknown locale is fatal and names what is available.
pub fn resolve_locale_column(header: &[String], locale: &str) -> Result<usize> {
    match header
        .iter()
        .skip(1)
        .position(|cell| cell.eq_ignore_ascii_case(locale))
    {
        Some(index) => Ok(index + 1),
        None => Err(LocError::LocaleNotFound {
            locale: locale.to_string(),
            available: header.iter().skip(1).cloned().collect(),
        }
        .into()),
    }
}

/// Resolve `locale` in a local document header. The column must exist and be
/// visible; a hidden target column means the translator never saw it.
pub fn resolve_document_column(doc: &dyn TranslationDocument, locale: &str) -> Result<usize> {
    let index = resolve_locale_column(doc.header(), locale)?;
    if doc.hidden_columns().get(index).copied().unwrap_or(false) {
        return Err(LocError::LocaleHidden {
            locale: locale.to_string(),
            visible: doc.visible_header(),
        }
        .into());
    }
    Ok(index)
}

/// Rows still waiting on a translation: the target cell is empty or its
/// marker is not `Complete`. Header row and keyless rows are skipped.
pub fn rows_needing_translation(
    sheet: &Sheet,
    source_idx: usize,
    target_idx: usize,
) -> Vec<ExportRow> {
    sheet
        .rows
        .iter()
        .skip(1)
        .filter_map(|row| {
            let key = row.text(0);
            if key.is_empty() {
                return None;
            }
            let needs = match row.cell(target_idx) {
                None => true,
                Some(cell) => cell.value.is_empty() || cell.marker != Marker::Complete,
            };
            needs.then(|| ExportRow {
                key: key.to_string(),
                source: row.text(source_idx).to_string(),
                target: row.text(target_idx).to_string(),
            })
        })
        .collect()
}

/// Sheet-side entry for one key: current value in the locale column plus the
/// 1-based row to write back to.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceEntry {
    pub value: CellValue,
    pub row: usize,
}

pub fn source_entries(sheet: &Sheet, locale_idx: usize) -> BTreeMap<String, SourceEntry> {
    let mut entries = BTreeMap::new();
    for (index, row) in sheet.rows.iter().enumerate().skip(1) {
        let key = row.text(0);
        if key.is_empty() {
            continue;
        }
        entries.entry(key.to_string()).or_insert(SourceEntry {
            value: row
                .cell(locale_idx)
                .map(|c| c.value.clone())
                .unwrap_or_default(),
            row: index + 1,
        });
    }
    entries
}

/// Document-side entry for one key.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetEntry {
    pub value: CellValue,
    pub row: usize,
}

pub fn target_entries(
    doc: &dyn TranslationDocument,
    locale_idx: usize,
) -> BTreeMap<String, TargetEntry> {
    let mut entries = BTreeMap::new();
    for row in doc.rows().iter().filter(|row| !row.hidden) {
        let Some(key) = row.key() else { continue };
        entries.entry(key.to_string()).or_insert(TargetEntry {
            value: row.cells.get(locale_idx).cloned().unwrap_or_default(),
            row: row.number,
        });
    }
    entries
}

/// A value that has to be written back, addressed by the source sheet row.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingCell {
    pub value: CellValue,
    pub row: usize,
}

/// Decide which target keys actually need a write. A target key missing from
/// the source is a fatal consistency error; a key whose source value already
/// equals a non-empty target value is skipped.
pub fn map_source_to_target(
    source: &BTreeMap<String, SourceEntry>,
    target: &BTreeMap<String, TargetEntry>,
    locale: &str,
) -> Result<BTreeMap<String, PendingCell>> {
    let mut pending = BTreeMap::new();
    for (key, tgt) in target {
        let src = source
            .get(key)
            .ok_or_else(|| LocError::KeyMissingInSource {
                key: key.clone(),
                locale: locale.to_string(),
            })?;
        if src.value == tgt.value && !tgt.value.is_empty() {
            info!(event = "import_skip", key = %key, "already in sync");
            continue;
        }
        pending.insert(
            key.clone(),
            PendingCell {
                value: tgt.value.clone(),
                row: src.row,
            },
        );
    }
    Ok(pending)
}

/// Project pending cells onto concrete updates for the resolved column.
/// Structured values are serialized and flagged for manual review; empty
/// values clear the cell.
pub fn plan_updates(pending: &BTreeMap<String, PendingCell>, column: usize) -> Vec<CellUpdate> {
    pending
        .values()
        .map(|cell| {
            let (value, marker) = match &cell.value {
                CellValue::Structured(v) => (v.to_string(), Marker::NeedsReview),
                CellValue::Empty => (String::new(), Marker::Cleared),
                CellValue::Text(s) => (s.clone(), Marker::Normal),
            };
            CellUpdate {
                row: cell.row,
                column,
                value,
                marker,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use loctable_core::SheetCell;
    use loctable_sheet_api::DocumentRow;
    use serde_json::json;

    fn header(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    fn sheet(rows: &[&[&str]]) -> Sheet {
        Sheet {
            title: "t".into(),
            rows: rows
                .iter()
                .map(|cells| cells.iter().map(|c| SheetCell::text(*c)).collect())
                .collect(),
        }
    }

    struct Doc {
        header: Vec<String>,
        hidden: Vec<bool>,
        rows: Vec<DocumentRow>,
    }

    impl TranslationDocument for Doc {
        fn header(&self) -> &[String] {
            &self.header
        }
        fn hidden_columns(&self) -> &[bool] {
            &self.hidden
        }
        fn rows(&self) -> &[DocumentRow] {
            &self.rows
        }
    }

    fn doc_row(number: usize, cells: &[&str]) -> DocumentRow {
        DocumentRow {
            number,
            hidden: false,
            cells: cells.iter().map(|c| CellValue::from_text(*c)).collect(),
        }
    }

    #[test]
    fn resolves_locale_case_insensitively() {
        let h = header(&["keys", "en", "NB"]);
        assert_eq!(resolve_locale_column(&h, "nb").unwrap(), 2);
        assert_eq!(resolve_locale_column(&h, "EN").unwrap(), 1);
    }

    #[test]
    fn unknown_locale_names_available_ones() {
        let h = header(&["keys", "en", "nb"]);
        let err = resolve_locale_column(&h, "sv").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("sv"));
        assert!(msg.contains("en") && msg.contains("nb"));
    }

    #[test]
    fn key_column_is_never_a_locale() {
        let h = header(&["nb", "en"]);
        assert!(resolve_locale_column(&h, "nb").is_err());
    }

    #[test]
    fn hidden_target_column_is_fatal() {
        let doc = Doc {
            header: header(&["key", "en", "nb"]),
            hidden: vec![false, false, true],
            rows: vec![],
        };
        let err = resolve_document_column(&doc, "nb").unwrap_err();
        assert!(err.to_string().contains("hidden"));
        assert_eq!(resolve_document_column(&doc, "en").unwrap(), 1);
    }

    #[test]
    fn selects_rows_with_empty_or_unresolved_targets() {
        let mut s = sheet(&[
            &["keys", "en", "nb"],
            &["a", "Hello", ""],
            &["b", "Bye", "Ha det"],
            &["c", "Yes", "Ja"],
        ]);
        // `b` is fully resolved, `c` is translated but unreviewed.
        s.rows[2].cells[2].marker = Marker::Complete;

        let rows = rows_needing_translation(&s, 1, 2);
        assert_eq!(
            rows,
            vec![
                ExportRow {
                    key: "a".into(),
                    source: "Hello".into(),
                    target: String::new(),
                },
                ExportRow {
                    key: "c".into(),
                    source: "Yes".into(),
                    target: "Ja".into(),
                },
            ]
        );
    }

    #[test]
    fn map_skips_keys_already_in_sync() {
        let s = sheet(&[&["keys", "nb"], &["greet", "Hei"]]);
        let source = source_entries(&s, 1);
        let doc = Doc {
            header: header(&["key", "nb"]),
            hidden: vec![false, false],
            rows: vec![doc_row(2, &["greet", "Hei"])],
        };
        let target = target_entries(&doc, 1);
        let pending = map_source_to_target(&source, &target, "nb").unwrap();
        assert!(pending.is_empty());
    }

    #[test]
    fn map_emits_changed_values_with_source_rows() {
        let s = sheet(&[&["keys", "nb"], &["greet", "Hallo"], &["bye", ""]]);
        let source = source_entries(&s, 1);
        let doc = Doc {
            header: header(&["key", "nb"]),
            hidden: vec![false, false],
            rows: vec![doc_row(2, &["greet", "Hei"]), doc_row(3, &["bye", "Ha det"])],
        };
        let target = target_entries(&doc, 1);
        let pending = map_source_to_target(&source, &target, "nb").unwrap();
        assert_eq!(
            pending["greet"],
            PendingCell {
                value: CellValue::from_text("Hei"),
                row: 2,
            }
        );
        assert_eq!(
            pending["bye"],
            PendingCell {
                value: CellValue::from_text("Ha det"),
                row: 3,
            }
        );
    }

    #[test]
    fn target_key_missing_from_source_is_fatal() {
        let s = sheet(&[&["keys", "nb"], &["greet", "Hei"]]);
        let source = source_entries(&s, 1);
        let doc = Doc {
            header: header(&["key", "nb"]),
            hidden: vec![false, false],
            rows: vec![doc_row(2, &["rogue.key", "Hei"])],
        };
        let target = target_entries(&doc, 1);
        let err = map_source_to_target(&source, &target, "nb").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("rogue.key") && msg.contains("nb"));
    }

    #[test]
    fn plan_marks_value_shapes_distinctly() {
        let mut pending = BTreeMap::new();
        pending.insert(
            "a".to_string(),
            PendingCell {
                value: CellValue::from_text("plain"),
                row: 2,
            },
        );
        pending.insert(
            "b".to_string(),
            PendingCell {
                value: CellValue::Empty,
                row: 3,
            },
        );
        pending.insert(
            "c".to_string(),
            PendingCell {
                value: CellValue::Structured(json!({"richText": ["x"]})),
                row: 4,
            },
        );

        let updates = plan_updates(&pending, 5);
        assert_eq!(updates.len(), 3);
        assert_eq!(updates[0].value, "plain");
        assert_eq!(updates[0].marker, Marker::Normal);
        assert_eq!(updates[1].value, "");
        assert_eq!(updates[1].marker, Marker::Cleared);
        assert_eq!(updates[2].value, r#"{"richText":["x"]}"#);
        assert_eq!(updates[2].marker, Marker::NeedsReview);
        assert!(updates.iter().all(|u| u.column == 5));
    }
}
