use color_eyre::eyre::Result;
use loctable_sheet_json::JsonSheetClient;
use std::path::Path;

pub fn run(file: &Path, locale: &str) -> Result<()> {
    tracing::debug!(event = "import_args", file = %file.display(), locale = %locale);
    let cfg = loctable_config::load_config().unwrap_or_default();
    let selector = super::require_sheet(&cfg)?;

    let locale = locale.to_lowercase();
    let doc = loctable_import_csv::read_csv_document_from_path(file)?;

    let mut client = JsonSheetClient::new();
    let summary = loctable_services::run_import(&mut client, &selector, &doc, &locale)?;

    crate::ui_ok!(
        "updated {} of {} cell(s), {} already in sync",
        summary.applied,
        summary.requested,
        summary.skipped
    );
    Ok(())
}
