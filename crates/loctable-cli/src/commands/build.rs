use color_eyre::eyre::Result;
use loctable_patterns::TemplatePolicy;
use loctable_services::BuildOptions;
use loctable_sheet_json::JsonSheetClient;
use std::path::PathBuf;

#[allow(clippy::too_many_arguments)]
pub fn run(
    root: Vec<PathBuf>,
    build: bool,
    missing_keys: bool,
    lenient: bool,
    out_dir: Option<PathBuf>,
    clean: bool,
    format: &str,
    use_color: bool,
) -> Result<()> {
    tracing::debug!(
        event = "build_args",
        roots = ?root,
        build,
        missing_keys,
        lenient,
        out_dir = ?out_dir,
        clean,
        format = %format
    );
    let cfg = loctable_config::load_config().unwrap_or_default();
    let selector = super::require_sheet(&cfg)?;

    let scan = cfg.scan.unwrap_or_default();
    let roots: Vec<PathBuf> = if root.is_empty() {
        scan.roots
            .unwrap_or_else(|| vec!["src".to_string()])
            .iter()
            .map(PathBuf::from)
            .collect()
    } else {
        root
    };
    let ignore = scan.ignore.unwrap_or_default();
    let policy = if cfg.skip_bad_templates.unwrap_or(false) {
        TemplatePolicy::SkipInvalid
    } else {
        TemplatePolicy::FailFast
    };
    let rules = loctable_patterns::compile_rules(&scan.rules.unwrap_or_default(), policy)?;

    let opts = BuildOptions {
        strict: !lenient && cfg.strict.unwrap_or(true),
        emit: build,
        output_dir: out_dir
            .or_else(|| cfg.output_dir.as_deref().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("dist")),
        clean,
    };

    let client = JsonSheetClient::new();
    let report = loctable_services::run_build(&client, &selector, &roots, &rules, &ignore, &opts)?;

    if format == "json" {
        serde_json::to_writer(std::io::stdout().lock(), &report)?;
        println!();
        if report.aborted {
            color_eyre::eyre::bail!("missing keys in strict mode");
        }
        return Ok(());
    }

    crate::ui_info!("found {} language key(s) in files", report.scanned_keys);
    crate::ui_info!("found {} language key(s) in the sheet", report.table_keys);

    if report.table_empty {
        crate::ui_info!("nothing to build, the sheet has no keys");
        return Ok(());
    }

    if !report.missing.is_empty() {
        crate::ui_warn!(
            "{} scanned key(s) are missing from the sheet",
            report.missing.len()
        );
        if missing_keys {
            for key in &report.missing {
                if use_color {
                    use owo_colors::OwoColorize;
                    eprintln!("  {}", key.yellow());
                } else {
                    eprintln!("  {key}");
                }
            }
        } else {
            crate::ui_warn!("add --missing-keys to list them");
        }
    }

    if report.aborted {
        crate::ui_err!("missing keys in strict mode, not building (set strict = false or pass --lenient to override)");
        color_eyre::eyre::bail!("missing keys in strict mode");
    }

    if !build {
        crate::ui_info!("add --build to emit locale files");
    } else {
        crate::ui_ok!(
            "built {} file(s) into {}",
            report.generated.len(),
            opts.output_dir.display()
        );
    }
    Ok(())
}
