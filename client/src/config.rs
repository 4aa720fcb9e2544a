use wasm_bindgen::JsValue;
use web_sys::Window;

use crate::net::{http_url, websocket_url, SNAPSHOT_PATH, WEBSOCKET_PATH};

pub const DEFAULT_COLOR: &str = "#000000";
pub const LINE_WIDTH: u32 = 1;
pub const RECONNECT_INITIAL_MS: u32 = 1_000;
pub const RECONNECT_MAX_MS: u32 = 10_000;

/// Everything the client needs to know about where it runs. Derived from the
/// page location; there is nothing else to configure.
#[derive(Clone, Debug, PartialEq)]
pub struct ClientConfig {
    pub snapshot_url: String,
    pub websocket_url: String,
    pub debug: bool,
    pub line_width: u32,
    pub reconnect_initial_ms: u32,
    pub reconnect_max_ms: u32,
}

impl ClientConfig {
    pub fn from_location(protocol: &str, host: &str, search: &str) -> Self {
        Self {
            snapshot_url: http_url(protocol, host, SNAPSHOT_PATH),
            websocket_url: websocket_url(protocol, host, WEBSOCKET_PATH),
            debug: debug_enabled(search),
            line_width: LINE_WIDTH,
            reconnect_initial_ms: RECONNECT_INITIAL_MS,
            reconnect_max_ms: RECONNECT_MAX_MS,
        }
    }

    pub fn from_window(window: &Window) -> Result<Self, JsValue> {
        let location = window.location();
        let protocol = location.protocol()?;
        let host = location.host()?;
        let search = location.search().unwrap_or_default();
        Ok(Self::from_location(&protocol, &host, &search))
    }

    pub fn log_level(&self) -> log::Level {
        if self.debug {
            log::Level::Debug
        } else {
            log::Level::Info
        }
    }
}

fn debug_enabled(search: &str) -> bool {
    search
        .trim_start_matches('?')
        .split('&')
        .any(|pair| matches!(pair, "debug=1" | "debug=true" | "log=1" | "log=true"))
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
