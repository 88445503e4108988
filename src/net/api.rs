//! HTTP endpoints of the quiz server.

use tracing::debug;

use crate::ClientError;
use crate::protocol::{PackInfo, PackList};

/// Fetch the catalogue of question packs.
///
/// A response without a `packs` field is treated as an empty catalogue.
pub async fn list_packs(server: &str) -> Result<Vec<PackInfo>, ClientError> {
    let url = packs_url(server);
    debug!(%url, "listing packs");

    let body = reqwest::get(&url).await?.error_for_status()?.text().await?;
    parse_packs(&body)
}

fn packs_url(server: &str) -> String {
    format!("{}/api/packs", server.trim_end_matches('/'))
}

/// Parse a catalogue response body.
pub fn parse_packs(body: &str) -> Result<Vec<PackInfo>, ClientError> {
    let list: PackList = serde_json::from_str(body)?;
    Ok(list.packs)
}
