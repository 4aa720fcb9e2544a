use wasm_bindgen::JsValue;

use syncboard_shared::ProtocolError;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("browser call failed: {0}")]
    Js(String),
    #[error("server answered {status} {status_text}")]
    Http { status: u16, status_text: String },
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

impl From<JsValue> for ClientError {
    fn from(value: JsValue) -> Self {
        let text = value.as_string().unwrap_or_else(|| format!("{value:?}"));
        ClientError::Js(text)
    }
}
