use color_eyre::eyre::Result;
use loctable_sheet_json::JsonSheetClient;
use std::path::PathBuf;

pub fn run(locale: &str, source_locale: Option<&str>, out: Option<PathBuf>) -> Result<()> {
    tracing::debug!(event = "export_args", locale = %locale, source_locale = ?source_locale, out = ?out);
    let cfg = loctable_config::load_config().unwrap_or_default();
    let selector = super::require_sheet(&cfg)?;

    let locale = locale.to_lowercase();
    let source = source_locale
        .map(str::to_string)
        .or(cfg.source_locale)
        .unwrap_or_else(|| "en".to_string())
        .to_lowercase();

    let client = JsonSheetClient::new();
    let rows = loctable_services::run_export(&client, &selector, &source, &locale)?;

    let out = out.unwrap_or_else(|| PathBuf::from(format!("loctable-{source}-{locale}.csv")));
    let file = std::fs::File::create(&out)?;
    loctable_export_csv::write_csv(file, &rows, &source, &locale)?;

    crate::ui_ok!("exported {} row(s) to {}", rows.len(), out.display());
    Ok(())
}
