//! Command definitions
//!
//! Represents commands from clients.

use serde::{Deserialize, Serialize};

use crate::record::Record;

/// Command types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CommandType {
    Insert = 0x01,
    Search = 0x02,
    SearchByNamePrefix = 0x03,
    SearchByMarksRange = 0x04,
    SearchByEmail = 0x05,
    SearchByRollNo = 0x06,
    Delete = 0x07,
    Update = 0x08,
    Ping = 0x09,
}

impl CommandType {
    pub fn from_u8(byte: u8) -> Option<Self> {
        match byte {
            0x01 => Some(CommandType::Insert),
            0x02 => Some(CommandType::Search),
            0x03 => Some(CommandType::SearchByNamePrefix),
            0x04 => Some(CommandType::SearchByMarksRange),
            0x05 => Some(CommandType::SearchByEmail),
            0x06 => Some(CommandType::SearchByRollNo),
            0x07 => Some(CommandType::Delete),
            0x08 => Some(CommandType::Update),
            0x09 => Some(CommandType::Ping),
            _ => None,
        }
    }
}

/// A parsed command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Insert a new record under `key`
    Insert { key: String, record: Record },

    /// Exact-key lookup
    Search { key: String },

    /// Records whose name starts with `prefix`
    SearchByNamePrefix { prefix: String },

    /// Records with `min <= marks <= max`
    SearchByMarksRange { min: f64, max: f64 },

    /// Records whose email contains `query`
    SearchByEmail { query: String },

    /// Records whose roll number contains `query`
    SearchByRollNo { query: String },

    /// Remove the record under `key`
    Delete { key: String },

    /// Replace the record under `key`
    Update { key: String, record: Record },

    /// Ping (health check)
    Ping,
}

impl Command {
    /// Get the command type
    pub fn command_type(&self) -> CommandType {
        match self {
            Command::Insert { .. } => CommandType::Insert,
            Command::Search { .. } => CommandType::Search,
            Command::SearchByNamePrefix { .. } => CommandType::SearchByNamePrefix,
            Command::SearchByMarksRange { .. } => CommandType::SearchByMarksRange,
            Command::SearchByEmail { .. } => CommandType::SearchByEmail,
            Command::SearchByRollNo { .. } => CommandType::SearchByRollNo,
            Command::Delete { .. } => CommandType::Delete,
            Command::Update { .. } => CommandType::Update,
            Command::Ping => CommandType::Ping,
        }
    }
}
