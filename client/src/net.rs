use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Response, Window};

use syncboard_shared::{decode_snapshot, LinesSnapshot};

use crate::error::ClientError;

pub const SNAPSHOT_PATH: &str = "/canvas/lines";
pub const WEBSOCKET_PATH: &str = "/ws";

pub fn http_url(protocol: &str, host: &str, path: &str) -> String {
    let scheme = if protocol == "https:" { "https" } else { "http" };
    format!("{scheme}://{host}{path}")
}

pub fn websocket_url(protocol: &str, host: &str, path: &str) -> String {
    let scheme = if protocol == "https:" { "wss" } else { "ws" };
    format!("{scheme}://{host}{path}")
}

/// Fetches the current board. Any non-2xx status is an error; the body is
/// only read on success.
pub async fn fetch_snapshot(window: &Window, url: &str) -> Result<LinesSnapshot, ClientError> {
    let response: Response = JsFuture::from(window.fetch_with_str(url))
        .await?
        .dyn_into()?;
    if !response.ok() {
        return Err(ClientError::Http {
            status: response.status(),
            status_text: response.status_text(),
        });
    }
    let body = JsFuture::from(response.text()?).await?;
    let text = body
        .as_string()
        .ok_or_else(|| ClientError::Js("snapshot body is not text".to_string()))?;
    Ok(decode_snapshot(&text)?)
}

#[cfg(test)]
#[path = "net_test.rs"]
mod tests;
