use crate::Result;
use loctable_domain::GeneratedFile;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

pub const INDEX_FILE: &str = "index.json";

/// One pretty-printed data unit per locale, plus an index enumerating the
/// generated unit names.
pub fn prepare_files(locales: &BTreeMap<String, Value>) -> Result<Vec<GeneratedFile>> {
    let mut files = Vec::with_capacity(locales.len() + 1);
    for (locale, tree) in locales {
        files.push(GeneratedFile {
            name: format!("{locale}.json"),
            content: pretty(tree)?,
        });
    }
    let names: Vec<&String> = locales.keys().collect();
    files.push(GeneratedFile {
        name: INDEX_FILE.to_string(),
        content: pretty(&names)?,
    });
    Ok(files)
}

fn pretty<T: serde::Serialize>(value: &T) -> Result<String> {
    let mut out = serde_json::to_string_pretty(value)?;
    out.push('\n');
    Ok(out)
}

/// Write prepared files under `out_dir`, creating it as needed. With `clean`
/// the directory is removed first so stale locale units disappear.
pub fn write_files(files: &[GeneratedFile], out_dir: &Path, clean: bool) -> Result<()> {
    if clean && out_dir.exists() {
        std::fs::remove_dir_all(out_dir)?;
    }
    std::fs::create_dir_all(out_dir)?;
    for file in files {
        std::fs::write(out_dir.join(&file.name), &file.content)?;
    }
    info!(event = "files_written", dir = %out_dir.display(), count = files.len());
    Ok(())
}
