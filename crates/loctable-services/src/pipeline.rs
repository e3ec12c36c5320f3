//! Sequential pipelines gluing the engines to the collaborator traits. Each
//! run rebuilds its tables from scratch; every fatal check fires before the
//! batch-write step so an aborted run leaves the remote sheet untouched.

use crate::{diff::diff_keys, generate, reduce::reduce, scan::scan_keys, sync, Result};
use loctable_core::TranslationTable;
use loctable_domain::{BuildReport, ExportRow, SyncSummary, SCHEMA_VERSION};
use loctable_patterns::CompiledRules;
use loctable_sheet_api::{SheetClient, TranslationDocument};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub strict: bool,
    /// Emit per-locale data units; off means check-only.
    pub emit: bool,
    pub output_dir: PathBuf,
    pub clean: bool,
}

pub fn run_build(
    client: &dyn SheetClient,
    selector: &str,
    roots: &[PathBuf],
    rules: &CompiledRules,
    ignore: &[String],
    opts: &BuildOptions,
) -> Result<BuildReport> {
    let scanned = scan_keys(roots, rules, ignore)?;
    info!(event = "scan_done", keys = scanned.len());

    let sheet = client.get(selector)?;
    let table = TranslationTable::from_grid(&sheet);
    let reduced = reduce(&table);
    info!(
        event = "table_read",
        keys = reduced.keys.len(),
        locales = reduced.locales.len()
    );

    let diff = diff_keys(&scanned, &reduced.keys, opts.strict);
    let mut generated = Vec::new();
    if diff.table_empty {
        info!(event = "build_skipped", reason = "no keys in sheet");
    } else if diff.should_abort {
        warn!(event = "build_aborted", missing = diff.missing.len());
    } else if opts.emit {
        let files = generate::prepare_files(&reduced.locales)?;
        generate::write_files(&files, &opts.output_dir, opts.clean)?;
        generated = files.into_iter().map(|f| f.name).collect();
    }

    Ok(BuildReport {
        schema_version: SCHEMA_VERSION,
        scanned_keys: scanned.len(),
        table_keys: reduced.keys.len(),
        missing: diff.missing,
        table_empty: diff.table_empty,
        aborted: diff.should_abort,
        generated,
    })
}

/// Export direction: rows of the remote sheet still waiting on a translation
/// into `target_locale`, projected for the hand-off document.
pub fn run_export(
    client: &dyn SheetClient,
    selector: &str,
    source_locale: &str,
    target_locale: &str,
) -> Result<Vec<ExportRow>> {
    let sheet = client.get(selector)?;
    let header = sheet.header_texts();
    let source_idx = sync::resolve_locale_column(&header, source_locale)?;
    let target_idx = sync::resolve_locale_column(&header, target_locale)?;
    info!(
        event = "export_columns",
        source = source_idx,
        target = target_idx
    );
    Ok(sync::rows_needing_translation(&sheet, source_idx, target_idx))
}

/// Import direction: reconcile a finished hand-off document back into the
/// remote sheet as one batch of cell updates.
pub fn run_import(
    client: &mut dyn SheetClient,
    selector: &str,
    doc: &dyn TranslationDocument,
    locale: &str,
) -> Result<SyncSummary> {
    let sheet = client.get(selector)?;
    let header = sheet.header_texts();
    let sheet_idx = sync::resolve_locale_column(&header, locale)?;
    let source = sync::source_entries(&sheet, sheet_idx);

    let doc_idx = sync::resolve_document_column(doc, locale)?;
    let target = sync::target_entries(doc, doc_idx);

    let pending = sync::map_source_to_target(&source, &target, locale)?;
    let skipped = target.len() - pending.len();
    let updates = sync::plan_updates(&pending, sheet_idx);
    info!(
        event = "import_updates",
        requested = updates.len(),
        skipped,
        column = sheet_idx
    );

    let outcome = client.batch_update(selector, &updates)?;
    Ok(SyncSummary {
        schema_version: SCHEMA_VERSION,
        requested: outcome.requested,
        applied: outcome.applied,
        skipped,
    })
}
