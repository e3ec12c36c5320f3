use color_eyre::eyre::Result;
use loctable_config::CONFIG_FILE_NAME;
use loctable_sheet_api::SheetClient;
use loctable_sheet_json::JsonSheetClient;
use std::path::Path;

pub fn run(title: &str) -> Result<()> {
    let mut client = JsonSheetClient::new();
    let selector = client.create(title)?;
    loctable_config::set_sheet(Path::new(CONFIG_FILE_NAME), &selector)?;
    crate::ui_ok!("created sheet {selector} and recorded it in {CONFIG_FILE_NAME}");
    Ok(())
}
