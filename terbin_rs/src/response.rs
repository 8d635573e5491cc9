//! Structured Response: the JSON envelope ending every pipe-mode turn.

use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    Ok,
    BadRequest,
    InternalError,
}

impl StatusCode {
    pub fn code(self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::BadRequest => 400,
            StatusCode::InternalError => 500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Status {
    #[serde(rename = "Code")]
    pub code: u16,
    #[serde(rename = "Message")]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    #[serde(rename = "Status")]
    pub status: Status,
    #[serde(rename = "Content")]
    pub content: Option<Value>,
}

impl Response {
    pub fn new(code: StatusCode, message: impl Into<String>, content: Option<Value>) -> Self {
        Self {
            status: Status {
                code: code.code(),
                message: message.into(),
            },
            content,
        }
    }

    pub fn ok() -> Self {
        Self::new(StatusCode::Ok, "ok", None)
    }

    pub fn ok_with(content: Value) -> Self {
        Self::new(StatusCode::Ok, "ok", Some(content))
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BadRequest, message, None)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(StatusCode::InternalError, message, None)
    }

    /// Single-line JSON encoding.
    pub fn to_line(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(
                "{{\"Status\":{{\"Code\":{},\"Message\":\"unserializable response\"}},\"Content\":null}}",
                self.status.code
            )
        })
    }
}
