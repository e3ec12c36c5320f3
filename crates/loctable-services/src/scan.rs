use crate::Result;
use loctable_patterns::CompiledRules;
use std::collections::BTreeSet;
use std::path::PathBuf;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Build and version-control directories pruned from every scan.
const ALWAYS_IGNORED: [&str; 2] = ["node_modules", ".git"];

fn is_pruned(entry: &walkdir::DirEntry, ignore: &[String]) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_str().unwrap_or("");
    ALWAYS_IGNORED.contains(&name) || ignore.iter().any(|i| i == name)
}

/// Walk `roots` depth-first and collect every key referenced by source text.
/// Missing or non-directory roots are skipped with a warning; files whose
/// extension has no configured matcher are ignored.
pub fn scan_keys(
    roots: &[PathBuf],
    rules: &CompiledRules,
    ignore: &[String],
) -> Result<BTreeSet<String>> {
    let mut keys = BTreeSet::new();

    for root in roots {
        if !root.exists() {
            warn!(event = "scan_root_skipped", root = %root.display(), reason = "does not exist");
            continue;
        }
        if !root.is_dir() {
            warn!(event = "scan_root_skipped", root = %root.display(), reason = "not a directory");
            continue;
        }
        info!(event = "scan_root", root = %root.display());

        for entry in WalkDir::new(root)
            .into_iter()
            .filter_entry(|e| !is_pruned(e, ignore))
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let Some(ext) = path
                .extension()
                .and_then(|e| e.to_str())
                .map(str::to_ascii_lowercase)
            else {
                continue;
            };
            let Some(matchers) = rules.get(&ext) else {
                continue;
            };
            // Binary or otherwise unreadable files are not scannable text.
            let Ok(text) = std::fs::read_to_string(path) else {
                continue;
            };
            let before = keys.len();
            for matcher in matchers {
                keys.extend(matcher.find_keys(&text).map(str::to_string));
            }
            if keys.len() > before {
                debug!(event = "scan_file", path = %path.display(), new_keys = keys.len() - before);
            }
        }
    }

    Ok(keys)
}
