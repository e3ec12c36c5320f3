use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Workspace-wide result alias.
pub type Result<T> = color_eyre::eyre::Result<T>;

/// Fatal, run-level errors. Entry-level problems (key conflicts, skipped
/// roots, in-sync keys) are tracing events, not errors.
#[derive(Debug, Error)]
pub enum LocError {
    #[error("syntax template {template:?} must contain one '#' placeholder with a non-empty anchor on both sides")]
    TemplateAnchor { template: String },
    #[error("locale {locale:?} is not a column of the sheet header; available locales: {available:?}")]
    LocaleNotFound {
        locale: String,
        available: Vec<String>,
    },
    #[error("locale {locale:?} is hidden in the target document; visible locales: {visible:?}")]
    LocaleHidden {
        locale: String,
        visible: Vec<String>,
    },
    #[error("key {key:?} exists in the target document but not in the source sheet for locale {locale:?}")]
    KeyMissingInSource { key: String, locale: String },
}

/// Background marker of a sheet cell. Markers double as the visual signal
/// attached to planned cell updates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Marker {
    /// Pure white background: the cell is fully resolved.
    Complete,
    /// Plain translated text.
    #[default]
    Normal,
    /// The cell was emptied on purpose.
    Cleared,
    /// Structured value that a human has to untangle.
    NeedsReview,
}

impl Marker {
    /// RGB triple written into the remote cell background.
    pub fn rgb(self) -> (f32, f32, f32) {
        match self {
            Marker::Complete => (1.0, 1.0, 1.0),
            Marker::Normal | Marker::Cleared => (0.4, 0.8, 0.8),
            Marker::NeedsReview => (1.0, 0.2, 0.2),
        }
    }
}

/// A single cell value, shape resolved once at ingestion so downstream logic
/// never re-inspects raw data. Serializes untagged: `Empty` as `null`, text
/// as a plain string, structured values as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Structured(serde_json::Value),
}

impl From<serde_json::Value> for CellValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => CellValue::Empty,
            Value::String(s) if s.is_empty() => CellValue::Empty,
            Value::String(s) => CellValue::Text(s),
            // Scalars read as their formatted text; only container shapes
            // count as structured.
            Value::Bool(b) => CellValue::Text(b.to_string()),
            Value::Number(n) => CellValue::Text(n.to_string()),
            other => CellValue::Structured(other),
        }
    }
}

impl<'de> Deserialize<'de> for CellValue {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Ok(serde_json::Value::deserialize(deserializer)?.into())
    }
}

impl CellValue {
    pub fn from_text(s: impl Into<String>) -> Self {
        let s = s.into();
        if s.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(s)
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Tree value for the per-locale reduction; empty cells contribute nothing.
    pub fn to_json(&self) -> Option<serde_json::Value> {
        match self {
            CellValue::Empty => None,
            CellValue::Text(s) => Some(serde_json::Value::String(s.clone())),
            CellValue::Structured(v) => Some(v.clone()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SheetCell {
    #[serde(default)]
    pub value: CellValue,
    #[serde(default)]
    pub marker: Marker,
}

impl SheetCell {
    pub fn text(value: impl Into<String>) -> Self {
        SheetCell {
            value: CellValue::from_text(value),
            marker: Marker::Normal,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SheetRow {
    pub cells: Vec<SheetCell>,
}

impl SheetRow {
    pub fn cell(&self, index: usize) -> Option<&SheetCell> {
        self.cells.get(index)
    }

    /// Formatted text of a cell; absent, empty and structured cells read as "".
    pub fn text(&self, index: usize) -> &str {
        self.cells
            .get(index)
            .and_then(|c| c.value.as_text())
            .unwrap_or("")
    }
}

impl FromIterator<SheetCell> for SheetRow {
    fn from_iter<I: IntoIterator<Item = SheetCell>>(iter: I) -> Self {
        SheetRow {
            cells: iter.into_iter().collect(),
        }
    }
}

/// Remote sheet snapshot: a row-major grid whose first row is the header
/// (key-column label followed by locale codes) and whose first column holds
/// the keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    pub title: String,
    pub rows: Vec<SheetRow>,
}

impl Sheet {
    /// Formatted texts of the header row.
    pub fn header_texts(&self) -> Vec<String> {
        match self.rows.first() {
            Some(row) => (0..row.cells.len()).map(|i| row.text(i).to_string()).collect(),
            None => Vec::new(),
        }
    }
}

/// Locale-major view of a sheet: the key header as stored (label cell first),
/// plus one value series per locale in header order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TranslationTable {
    pub header: Vec<String>,
    pub series: Vec<LocaleSeries>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocaleSeries {
    pub locale: String,
    pub values: Vec<CellValue>,
}

impl TranslationTable {
    /// Transpose a row-major grid into the locale-major view. Column 0 becomes
    /// the key header, every further column one locale series.
    pub fn from_grid(sheet: &Sheet) -> TranslationTable {
        let Some(first) = sheet.rows.first() else {
            return TranslationTable::default();
        };
        let header = sheet
            .rows
            .iter()
            .map(|row| row.text(0).to_string())
            .collect();
        let series = (1..first.cells.len())
            .map(|col| LocaleSeries {
                locale: first.text(col).to_string(),
                values: sheet.rows[1..]
                    .iter()
                    .map(|row| row.cell(col).map(|c| c.value.clone()).unwrap_or_default())
                    .collect(),
            })
            .collect();
        TranslationTable { header, series }
    }

    /// Keys known to the table: the header minus its label cell.
    pub fn keys(&self) -> &[String] {
        self.header.get(1..).unwrap_or(&[])
    }
}

/// One planned write against the remote sheet. `row` is 1-based as shown in
/// the sheet UI, `column` is 0-based.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellUpdate {
    pub row: usize,
    pub column: usize,
    pub value: String,
    pub marker: Marker,
}
