use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

pub const CONFIG_FILE_NAME: &str = "loctable.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoctableConfig {
    /// Sheet selector handed to the remote client (for the JSON client this
    /// is the snapshot path).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheet: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_locale: Option<String>,
    /// Abort the build when scanned keys are missing from the sheet.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strict: Option<bool>,
    /// Skip malformed syntax templates instead of failing the run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_bad_templates: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scan: Option<ScanCfg>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanCfg {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roots: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignore: Option<Vec<String>>,
    /// File extension (without the dot) to syntax templates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules: Option<BTreeMap<String, Vec<String>>>,
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("config file {0} already exists")]
    AlreadyExists(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Serialize(#[from] toml::ser::Error),
    #[error(transparent)]
    Parse(#[from] toml::de::Error),
}

/// Commented starting point written by `loctable init`.
pub const DEFAULT_CONFIG: &str = r##"# loctable configuration.

# Sheet selector for the remote collaborator. The bundled JSON client treats
# this as the path of the sheet snapshot file.
sheet = "i18n-sheet.json"

# Locale whose column feeds exported hand-off documents.
source_locale = "en"

# Abort the build when source files reference keys the sheet does not have.
strict = true

# Keep going when a syntax template is malformed instead of failing the run.
skip_bad_templates = false

# Where generated per-locale data units land.
output_dir = "dist"

[scan]
roots = ["src"]
ignore = ["dist"]

# One entry per file extension; '#' marks where the key sits in source text.
[scan.rules]
js = ["$t('#')", "$t(\"#\")"]
vue = ["$t('#')", "$t(\"#\")", "i18n.path=\"#\""]
"##;

/// Search order: CWD/loctable.toml, then $CONFIG_DIR/loctable/loctable.toml.
pub fn load_config() -> Result<LoctableConfig, ConfigError> {
    let mut merged = LoctableConfig::default();
    if let Ok(cwd) = std::env::current_dir() {
        merged = merge(merged, read_config_file(&cwd.join(CONFIG_FILE_NAME)));
    }
    if let Some(base) = dirs::config_dir() {
        merged = merge(
            merged,
            read_config_file(&base.join("loctable").join(CONFIG_FILE_NAME)),
        );
    }
    Ok(merged)
}

fn read_config_file(path: &Path) -> LoctableConfig {
    std::fs::read_to_string(path)
        .ok()
        .and_then(|s| toml::from_str(&s).ok())
        .unwrap_or_default()
}

fn merge(mut a: LoctableConfig, b: LoctableConfig) -> LoctableConfig {
    if a.sheet.is_none() {
        a.sheet = b.sheet;
    }
    if a.source_locale.is_none() {
        a.source_locale = b.source_locale;
    }
    if a.strict.is_none() {
        a.strict = b.strict;
    }
    if a.skip_bad_templates.is_none() {
        a.skip_bad_templates = b.skip_bad_templates;
    }
    if a.output_dir.is_none() {
        a.output_dir = b.output_dir;
    }
    a.scan = match (a.scan, b.scan) {
        (Some(a), Some(b)) => Some(merge_scan(a, b)),
        (a, b) => a.or(b),
    };
    a
}

fn merge_scan(mut a: ScanCfg, b: ScanCfg) -> ScanCfg {
    if a.roots.is_none() {
        a.roots = b.roots;
    }
    if a.ignore.is_none() {
        a.ignore = b.ignore;
    }
    if a.rules.is_none() {
        a.rules = b.rules;
    }
    a
}

/// Write the commented default config. Refuses to clobber an existing file
/// unless `overwrite` is set.
pub fn write_default_config(path: &Path, overwrite: bool) -> Result<(), ConfigError> {
    if path.exists() && !overwrite {
        return Err(ConfigError::AlreadyExists(path.display().to_string()));
    }
    std::fs::write(path, DEFAULT_CONFIG)?;
    Ok(())
}

/// Record a freshly created sheet selector into the config file at `path`,
/// keeping whatever else it already holds. Comments do not survive.
pub fn set_sheet(path: &Path, sheet: &str) -> Result<(), ConfigError> {
    let mut cfg: LoctableConfig = match std::fs::read_to_string(path) {
        Ok(s) => toml::from_str(&s)?,
        Err(_) => LoctableConfig::default(),
    };
    cfg.sheet = Some(sheet.to_string());
    std::fs::write(path, toml::to_string_pretty(&cfg)?)?;
    Ok(())
}
