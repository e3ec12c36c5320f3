use color_eyre::eyre::Result;
use loctable_config::{ConfigError, CONFIG_FILE_NAME};
use std::path::Path;

pub fn run(force: bool) -> Result<()> {
    let path = Path::new(CONFIG_FILE_NAME);
    match loctable_config::write_default_config(path, force) {
        Ok(()) => {
            crate::ui_ok!("wrote {}", path.display());
            Ok(())
        }
        Err(ConfigError::AlreadyExists(existing)) => {
            crate::ui_err!("{existing} already exists, use --force to overwrite");
            color_eyre::eyre::bail!("config file already exists")
        }
        Err(e) => Err(e.into()),
    }
}
