use tracing::info;

use crate::error::Result;

pub const DOCUMENT_ID: &str = "1pwQ3V_mTEvUgaa-FoCeiI2TWtst4NzTsApZQCjDuoU0";
pub const SHEET_ID: &str = "1581013005";

pub fn export_url(document_id: &str, sheet_id: &str) -> String {
    format!(
        "https://docs.google.com/spreadsheets/d/{doc}/export?format=csv&id={doc}&gid={sheet}",
        doc = document_id,
        sheet = sheet_id
    )
}

pub fn default_url() -> String {
    export_url(DOCUMENT_ID, SHEET_ID)
}

pub fn sheet_csv(url: &str) -> Result<String> {
    info!(%url, "fetching moon sheet");
    let content = reqwest::blocking::get(url)?.error_for_status()?.text()?;
    info!(bytes = content.len(), "fetched moon sheet");
    Ok(content)
}
