//! # isamstore
//!
//! A minimal ISAM-style record store:
//! - One append-only flat file of comma-delimited records
//! - In-memory primary-key index (key → byte offset) for O(1) lookups
//! - Linear scans for field searches (name prefix, marks range, substrings)
//! - Delete by atomic rewrite, update as delete + insert
//! - TCP-based client protocol
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      TCP Server                              │
//! │                  (Worker Pool)                               │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                   RecordStore                                │
//! │            (Single Writer / Multi Reader)                    │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │  RecordLog  │ ◄─scan── │  KeyIndex   │
//!   │  (Append)   │          │  (RwLock)   │
//!   └─────────────┘          └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod record;
pub mod index;
pub mod log;
pub mod store;
pub mod network;
pub mod protocol;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{IsamError, Result};
pub use config::{Config, SyncStrategy};
pub use record::Record;
pub use store::{RecordStore, Reply};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of isamstore
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
