use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const SCHEMA_VERSION: u32 = 1;

/// Result of comparing scanned source keys against the table's key set.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct KeyDiff {
    pub schema_version: u32,
    /// Keys referenced in source text but absent from the table.
    pub missing: Vec<String>,
    /// The table has no keys at all: nothing to build, not a failure.
    pub table_empty: bool,
    /// Strict mode saw missing keys; the run must stop before any output.
    pub should_abort: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BuildReport {
    pub schema_version: u32,
    pub scanned_keys: usize,
    pub table_keys: usize,
    pub missing: Vec<String>,
    pub table_empty: bool,
    pub aborted: bool,
    /// File names emitted by the artifact generator, empty when generation
    /// was skipped or aborted.
    pub generated: Vec<String>,
}

/// One row of the translator hand-off document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ExportRow {
    pub key: String,
    pub source: String,
    pub target: String,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema)]
pub struct SyncSummary {
    pub schema_version: u32,
    /// Cell updates sent to the remote collaborator.
    pub requested: usize,
    /// Updates the collaborator reports as applied.
    pub applied: usize,
    /// Keys skipped because source and target were already in sync.
    pub skipped: usize,
}

/// One generated per-locale data unit (or the index enumerating them).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct GeneratedFile {
    pub name: String,
    pub content: String,
}
