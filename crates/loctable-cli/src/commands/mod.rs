pub mod build;
pub mod export;
pub mod import;
pub mod init;
pub mod new_sheet;
pub mod schema;

use color_eyre::eyre::{eyre, Result};
use loctable_config::LoctableConfig;

/// Sheet selector from config; every remote-facing command needs one.
pub fn require_sheet(cfg: &LoctableConfig) -> Result<String> {
    cfg.sheet
        .clone()
        .ok_or_else(|| eyre!("no sheet configured; run `loctable init` and set `sheet` in loctable.toml"))
}
