use color_eyre::eyre::Result;
use loctable_core::CellValue;
use loctable_sheet_api::{DocumentRow, TranslationDocument};
use std::io::Read;
use std::path::Path;

/// Hand-off document parsed from CSV. CSV cannot hide rows or columns, so
/// every flag is false; richer formats supply their own
/// `TranslationDocument`.
#[derive(Debug, Clone, Default)]
pub struct CsvDocument {
    header: Vec<String>,
    hidden: Vec<bool>,
    rows: Vec<DocumentRow>,
}

impl TranslationDocument for CsvDocument {
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

/// Parse a hand-off document. Rows are numbered like a spreadsheet: header is
/// row 1, data starts at row 2. Rows without a key are dropped.
pub fn read_csv_document<R: Read>(reader: R) -> Result<CsvDocument> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let header: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    let hidden = vec![false; header.len()];

    let mut rows = Vec::new();
    for (index, record) in rdr.records().enumerate() {
        let record = record?;
        let mut cells: Vec<CellValue> = record.iter().map(CellValue::from_text).collect();
        cells.resize(header.len(), CellValue::Empty);
        let row = DocumentRow {
            number: index + 2,
            hidden: false,
            cells,
        };
        if row.key().is_none() {
            continue;
        }
        rows.push(row);
    }

    Ok(CsvDocument {
        header,
        hidden,
        rows,
    })
}

pub fn read_csv_document_from_path(path: &Path) -> Result<CsvDocument> {
    let file = std::fs::File::open(path)?;
    read_csv_document(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(row: &DocumentRow) -> Vec<&str> {
        row.cells
            .iter()
            .map(|c| c.as_text().unwrap_or(""))
            .collect()
    }

    #[test]
    fn parses_header_rows_and_numbers() {
        let doc = read_csv_document("key,en,nb\na.b,Hello,Hei\n,skipped,\na.c,Body,\n".as_bytes())
            .unwrap();
        assert_eq!(doc.header(), ["key", "en", "nb"]);
        assert_eq!(doc.visible_header(), ["key", "en", "nb"]);
        assert_eq!(doc.rows().len(), 2);
        assert_eq!(doc.rows()[0].number, 2);
        assert_eq!(texts(&doc.rows()[0]), ["a.b", "Hello", "Hei"]);
        // The keyless row keeps its spreadsheet position for the next row.
        assert_eq!(doc.rows()[1].number, 4);
        assert_eq!(texts(&doc.rows()[1]), ["a.c", "Body", ""]);
    }

    #[test]
    fn short_rows_pad_to_header_width() {
        let doc = read_csv_document("key,en,nb\nonly.key\n".as_bytes()).unwrap();
        assert_eq!(doc.rows()[0].cells.len(), 3);
        assert_eq!(doc.rows()[0].key(), Some("only.key"));
        assert!(doc.rows()[0].cells[2].is_empty());
    }
}
