use color_eyre::eyre::Result;
use loctable_domain::{BuildReport, ExportRow, GeneratedFile, KeyDiff, SyncSummary};
use std::path::Path;

fn write_schema<T: schemars::JsonSchema>(dir: &Path, name: &str) -> Result<()> {
    let schema = schemars::schema_for!(T);
    let file = std::fs::File::create(dir.join(name))?;
    serde_json::to_writer_pretty(file, &schema)?;
    Ok(())
}

pub fn run(out_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(out_dir)?;
    write_schema::<KeyDiff>(out_dir, "key_diff.schema.json")?;
    write_schema::<BuildReport>(out_dir, "build_report.schema.json")?;
    write_schema::<ExportRow>(out_dir, "export_row.schema.json")?;
    write_schema::<SyncSummary>(out_dir, "sync_summary.schema.json")?;
    write_schema::<GeneratedFile>(out_dir, "generated_file.schema.json")?;
    crate::ui_ok!("schemas written to {}", out_dir.display());
    Ok(())
}
