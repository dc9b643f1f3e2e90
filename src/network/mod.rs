//! Network Module
//!
//! TCP server, connection handling and client.
//!
//! ## Architecture
//! - Single acceptor thread (non-blocking poll, shutdown flag)
//! - Worker thread pool fed by a crossbeam channel
//! - Commands routed through RecordStore::execute

mod server;
mod connection;
mod client;

pub use server::Server;
pub use connection::Connection;
pub use client::Client;
