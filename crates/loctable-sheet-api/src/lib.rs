use loctable_core::{CellUpdate, CellValue, Result, Sheet};
use serde::{Deserialize, Serialize};

/// Outcome of one batch write. The engine surfaces partial failure to the
/// caller and never retries on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchOutcome {
    pub requested: usize,
    pub applied: usize,
}

/// Remote tabular collaborator. Implementations own transport and
/// credentials; the engine only sees snapshots and batched writes.
pub trait SheetClient {
    /// Fetch the sheet addressed by `selector` as a rich-cell grid.
    fn get(&self, selector: &str) -> Result<Sheet>;

    /// Apply all updates as one atomic batch. Once this is issued the run is
    /// committed; there is no rollback.
    fn batch_update(&mut self, selector: &str, updates: &[CellUpdate]) -> Result<BatchOutcome>;

    /// Create a new sheet and return its selector.
    fn create(&mut self, title: &str) -> Result<String>;
}

/// One row of a local translation document. `number` is 1-based with the
/// header at row 1.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentRow {
    pub number: usize,
    pub hidden: bool,
    /// Key first, then one cell per header column. Values keep their ingested
    /// shape so structured cells survive into update planning.
    pub cells: Vec<CellValue>,
}

impl DocumentRow {
    pub fn key(&self) -> Option<&str> {
        self.cells.first().and_then(|c| c.as_text())
    }
}

/// Local tabular document the translator hands back (spreadsheet file or
/// equivalent). Hidden columns exist in the data but are excluded from
/// visible-locale validation.
pub trait TranslationDocument {
    fn header(&self) -> &[String];

    /// Hidden flags parallel to `header`.
    fn hidden_columns(&self) -> &[bool];

    /// Data rows, header excluded. Hidden rows are included here and filtered
    /// by the consumer.
    fn rows(&self) -> &[DocumentRow];

    fn visible_header(&self) -> Vec<String> {
        self.header()
            .iter()
            .zip(self.hidden_columns())
            .filter(|(_, hidden)| !**hidden)
            .map(|(name, _)| name.clone())
            .collect()
    }
}
