use serde::{Deserialize, Deserializer, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A single stroke. Sent and stored as-is; never edited after creation.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Line {
    #[serde(default, deserialize_with = "null_as_default")]
    pub points: Vec<Point>,
    pub color: String,
    /// The relay stores any integer; anything below 1 is read as 1.
    #[serde(rename = "lineWidth", deserialize_with = "positive_width")]
    pub line_width: u32,
}

impl Line {
    pub fn segment(from: Point, to: Point, color: impl Into<String>, line_width: u32) -> Self {
        Self {
            points: vec![from, to],
            color: color.into(),
            line_width,
        }
    }
}

/// Body of `GET /canvas/lines`. An empty board is sent as `"lines": null`.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct LinesSnapshot {
    #[serde(default, deserialize_with = "null_as_default")]
    pub lines: Vec<Line>,
}

/// The relay writes nil slices as `null`.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn positive_width<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let width = i64::deserialize(deserializer)?;
    Ok(u32::try_from(width.max(1)).unwrap_or(u32::MAX))
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type")]
pub enum ClientMessage {
    #[serde(rename = "line")]
    Line { data: Line },
}

/// Broadcast from the server. The relay forwards client frames verbatim, so a
/// `type` field is usually present too; only `data` matters.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ServerMessage {
    pub data: Line,
}

#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("failed to encode message: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("failed to decode message: {0}")]
    Decode(#[source] serde_json::Error),
}

pub fn encode_client_message(message: &ClientMessage) -> Result<String, ProtocolError> {
    serde_json::to_string(message).map_err(ProtocolError::Encode)
}

pub fn decode_server_message(text: &str) -> Result<ServerMessage, ProtocolError> {
    serde_json::from_str(text).map_err(ProtocolError::Decode)
}

pub fn decode_snapshot(text: &str) -> Result<LinesSnapshot, ProtocolError> {
    serde_json::from_str(text).map_err(ProtocolError::Decode)
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
