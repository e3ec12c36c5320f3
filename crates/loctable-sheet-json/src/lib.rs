//! Reference `SheetClient` backed by a JSON snapshot on disk. The selector is
//! the snapshot path, so every pipeline runs end-to-end without a network
//! transport; swapping in a real service client is a matter of implementing
//! the same trait.

use loctable_core::{CellValue, Result, Sheet, SheetCell, SheetRow};
use loctable_sheet_api::{BatchOutcome, SheetClient};
use std::path::Path;

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSheetClient;

impl JsonSheetClient {
    pub fn new() -> Self {
        JsonSheetClient
    }

    fn load(&self, selector: &str) -> Result<Sheet> {
        let raw = std::fs::read_to_string(selector)?;
        Ok(serde_json::from_str(&raw)?)
    }

    fn store(&self, selector: &str, sheet: &Sheet) -> Result<()> {
        let mut out = serde_json::to_string_pretty(sheet)?;
        out.push('\n');
        std::fs::write(selector, out)?;
        Ok(())
    }
}

fn slug(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.ends_with('-') {
            out.push('-');
        }
    }
    out.trim_matches('-').to_string()
}

impl SheetClient for JsonSheetClient {
    fn get(&self, selector: &str) -> Result<Sheet> {
        self.load(selector)
    }

    fn batch_update(
        &mut self,
        selector: &str,
        updates: &[loctable_core::CellUpdate],
    ) -> Result<BatchOutcome> {
        let mut sheet = self.load(selector)?;
        for update in updates {
            if update.row == 0 {
                continue;
            }
            if sheet.rows.len() < update.row {
                sheet.rows.resize(update.row, SheetRow::default());
            }
            let row = &mut sheet.rows[update.row - 1];
            if row.cells.len() <= update.column {
                row.cells.resize(update.column + 1, SheetCell::default());
            }
            row.cells[update.column] = SheetCell {
                value: CellValue::from_text(update.value.clone()),
                marker: update.marker,
            };
        }
        self.store(selector, &sheet)?;
        // Row 0 updates are unaddressable and dropped.
        let applied = updates.iter().filter(|u| u.row > 0).count();
        Ok(BatchOutcome {
            requested: updates.len(),
            applied,
        })
    }

    fn create(&mut self, title: &str) -> Result<String> {
        let name = match slug(title).as_str() {
            "" => "sheet".to_string(),
            s => s.to_string(),
        };
        let selector = format!("{name}.json");
        if Path::new(&selector).exists() {
            color_eyre::eyre::bail!("sheet snapshot {selector} already exists");
        }
        self.store(
            &selector,
            &Sheet {
                title: title.to_string(),
                rows: Vec::new(),
            },
        )?;
        Ok(selector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loctable_core::{CellUpdate, Marker};

    fn snapshot(dir: &Path, sheet: &Sheet) -> String {
        let path = dir.join("sheet.json");
        std::fs::write(&path, serde_json::to_string(sheet).unwrap()).unwrap();
        path.display().to_string()
    }

    #[test]
    fn get_reads_snapshot_back() {
        let dir = tempfile::tempdir().unwrap();
        let sheet = Sheet {
            title: "demo".into(),
            rows: vec![[SheetCell::text("keys"), SheetCell::text("en")]
                .into_iter()
                .collect()],
        };
        let selector = snapshot(dir.path(), &sheet);
        let loaded = JsonSheetClient::new().get(&selector).unwrap();
        assert_eq!(loaded, sheet);
    }

    #[test]
    fn batch_update_grows_grid_and_sets_markers() {
        let dir = tempfile::tempdir().unwrap();
        let selector = snapshot(
            dir.path(),
            &Sheet {
                title: "demo".into(),
                rows: vec![],
            },
        );
        let mut client = JsonSheetClient::new();
        let outcome = client
            .batch_update(
                &selector,
                &[CellUpdate {
                    row: 2,
                    column: 1,
                    value: "Hei".into(),
                    marker: Marker::NeedsReview,
                }],
            )
            .unwrap();
        assert_eq!(outcome, BatchOutcome { requested: 1, applied: 1 });
        let sheet = client.get(&selector).unwrap();
        assert_eq!(sheet.rows.len(), 2);
        let cell = sheet.rows[1].cell(1).unwrap();
        assert_eq!(cell.value.as_text(), Some("Hei"));
        assert_eq!(cell.marker, Marker::NeedsReview);
    }

    #[test]
    fn create_writes_empty_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = std::env::current_dir().unwrap();
        std::env::set_current_dir(dir.path()).unwrap();
        let selector = JsonSheetClient::new().create("My Sheet!").unwrap();
        let result = JsonSheetClient::new().get(&selector);
        std::env::set_current_dir(cwd).unwrap();
        assert_eq!(selector, "my-sheet.json");
        let sheet = result.unwrap();
        assert_eq!(sheet.title, "My Sheet!");
        assert!(sheet.rows.is_empty());
    }
}
