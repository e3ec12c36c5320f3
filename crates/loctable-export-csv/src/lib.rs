use color_eyre::eyre::Result;
use loctable_domain::ExportRow;
use std::io::Write;

/// Write the hand-off document: a `key,<source>,<target>` header followed by
/// one row per key still needing translation.
pub fn write_csv<W: Write>(
    writer: W,
    rows: &[ExportRow],
    source_locale: &str,
    target_locale: &str,
) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record(["key", source_locale, target_locale])?;
    for row in rows {
        wtr.write_record([&row.key, &row.source, &row.target])?;
    }

    wtr.flush()?;
    Ok(())
}
