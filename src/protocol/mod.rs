//! Protocol Module
//!
//! Defines the wire protocol for client-server communication.
//!
//! ## Protocol Format (V1 - Framed bincode)
//!
//! ### Request Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │ Cmd (1)  │ Len (4)  │   Payload (bincode)         │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```
//!
//! ### Commands
//! - 0x01: INSERT          - Payload: key + record
//! - 0x02: SEARCH          - Payload: key
//! - 0x03: BY_NAME_PREFIX  - Payload: prefix
//! - 0x04: BY_MARKS_RANGE  - Payload: min + max
//! - 0x05: BY_EMAIL        - Payload: query
//! - 0x06: BY_ROLL_NO      - Payload: query
//! - 0x07: DELETE          - Payload: key
//! - 0x08: UPDATE          - Payload: key + record
//! - 0x09: PING            - Payload: unit
//!
//! ### Response Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │Status(1) │ Len (4)  │   Body (bincode)            │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```
//!
//! ### Status Codes
//! - 0x00: OK
//! - 0x01: NOT_FOUND (missing key, or a scan with no matches)
//! - 0x02: CONFLICT (duplicate key)
//! - 0x03: BAD_REQUEST (record cannot be stored)
//! - 0x04: ERROR

mod command;
mod response;
mod codec;

pub use command::{Command, CommandType};
pub use response::{Response, ResponseBody, Status};
pub use codec::{
    decode_command, decode_response, encode_command, encode_response, read_command,
    read_response, write_command, write_response, HEADER_SIZE, MAX_PAYLOAD_SIZE,
};
