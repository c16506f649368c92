//! JSON-lines request codec.
//!
//! Wire format: one JSON object per line, in both directions.
//! ```text
//! → {"item": "valve3", "command": "open"}
//! ← [{"valve":1,"status":"closed"}, {"valve":2,"status":"closed"}, ...]
//!
//! → {"view": "display"}
//! ← {"version":"0.3.0","cpu_temperature_c":48.3,"valves":[...]}
//!
//! → {"nonsense": true}
//! ← {"error":"badly formed json message"}
//! ```

use log::warn;
use serde::{Deserialize, Serialize};

use crate::app::status::{DisplayReport, ValveStatus};

/// Maximum request line length in bytes.  The I/O loop never buffers more
/// than this per line.
pub const MAX_REQUEST_SIZE: usize = 4096;

pub const BADLY_FORMED: &str = "badly formed json message";

/// Decoded request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Request {
    /// An instruction for the dispatcher.
    Instruction { item: String, command: String },
    /// A read-only view.
    View { view: View },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    Display,
}

/// Why a request line was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    TooLong,
    BadlyFormed,
}

/// Reply to one request line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Status(Vec<ValveStatus>),
    Display(DisplayReport),
    Error { error: String },
}

impl Response {
    pub fn error(reason: impl ToString) -> Self {
        Self::Error {
            error: reason.to_string(),
        }
    }
}

pub fn decode_request(line: &str) -> Result<Request, DecodeError> {
    if line.len() > MAX_REQUEST_SIZE {
        return Err(DecodeError::TooLong);
    }
    serde_json::from_str(line).map_err(|_| DecodeError::BadlyFormed)
}

/// Encode a reply as a single line (no trailing newline).
pub fn encode_response(response: &Response) -> String {
    serde_json::to_string(response).unwrap_or_else(|e| {
        warn!("API: cannot encode reply: {}", e);
        r#"{"error":"encode failed"}"#.to_string()
    })
}
