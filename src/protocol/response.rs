//! Response definitions
//!
//! Represents responses to clients.

use serde::{Deserialize, Serialize};

/// Response status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Status {
    Ok = 0x00,
    NotFound = 0x01,
    Conflict = 0x02,
    BadRequest = 0x03,
    Error = 0x04,
}

impl Status {
    pub fn from_u8(byte: u8) -> Option<Self> {
        match byte {
            0x00 => Some(Status::Ok),
            0x01 => Some(Status::NotFound),
            0x02 => Some(Status::Conflict),
            0x03 => Some(Status::BadRequest),
            0x04 => Some(Status::Error),
            _ => None,
        }
    }
}

/// Response payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ResponseBody {
    Empty,

    /// Human-readable outcome or error text
    Message(String),

    /// A single stored line
    Record(String),

    /// Stored lines in file order
    Records(Vec<String>),
}

/// A response to send to client
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// Status code
    pub status: Status,

    pub body: ResponseBody,
}

impl Response {
    /// Create an OK response with the given body
    pub fn ok(body: ResponseBody) -> Self {
        Self {
            status: Status::Ok,
            body,
        }
    }

    /// Create an OK response carrying a message
    pub fn message(message: &str) -> Self {
        Self::ok(ResponseBody::Message(message.to_string()))
    }

    /// Create a NOT_FOUND response
    pub fn not_found(message: &str) -> Self {
        Self::with_message(Status::NotFound, message)
    }

    /// Create a CONFLICT response
    pub fn conflict(message: &str) -> Self {
        Self::with_message(Status::Conflict, message)
    }

    /// Create a BAD_REQUEST response
    pub fn bad_request(message: &str) -> Self {
        Self::with_message(Status::BadRequest, message)
    }

    /// Create an ERROR response
    pub fn error(message: &str) -> Self {
        Self::with_message(Status::Error, message)
    }

    fn with_message(status: Status, message: &str) -> Self {
        Self {
            status,
            body: ResponseBody::Message(message.to_string()),
        }
    }

    /// Message text, if the body carries one
    pub fn message_text(&self) -> Option<&str> {
        match &self.body {
            ResponseBody::Message(m) => Some(m),
            _ => None,
        }
    }
}
