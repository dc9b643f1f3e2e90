//! TCP Server
//!
//! Accepts connections and dispatches them to a pool of worker threads.

use std::io::ErrorKind;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam::channel::{self, Receiver};

use super::Connection;
use crate::config::Config;
use crate::error::{IsamError, Result};
use crate::protocol::{write_response, Response};
use crate::store::RecordStore;

/// How long the acceptor sleeps when no connection is pending
const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// TCP server for isamstore
pub struct Server {
    config: Config,
    store: Arc<RecordStore>,
    listener: Option<TcpListener>,
    shutdown: Arc<AtomicBool>,

    /// Connections queued or being served
    active: Arc<AtomicUsize>,
}

impl Server {
    /// Create a new server with the given config and store
    pub fn new(config: Config, store: Arc<RecordStore>) -> Self {
        Self {
            config,
            store,
            listener: None,
            shutdown: Arc::new(AtomicBool::new(false)),
            active: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Bind the listener and return the local address
    ///
    /// Lets callers bind port 0 and learn the port before `run`.
    pub fn bind(&mut self) -> Result<SocketAddr> {
        self.config.validate()?;

        let listener = TcpListener::bind(&self.config.listen_addr).map_err(|e| {
            IsamError::Network(format!("Failed to bind {}: {}", self.config.listen_addr, e))
        })?;
        listener.set_nonblocking(true)?;

        let addr = listener.local_addr()?;
        self.listener = Some(listener);
        Ok(addr)
    }

    /// Flag that stops the accept loop when set
    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    /// Signal the server to shutdown gracefully
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Start the server (blocking until shutdown)
    pub fn run(&mut self) -> Result<()> {
        if self.listener.is_none() {
            self.bind()?;
        }
        let listener = self
            .listener
            .take()
            .ok_or_else(|| IsamError::Network("Listener not bound".to_string()))?;

        tracing::info!(
            "Listening on {} with {} worker(s)",
            listener.local_addr()?,
            self.config.worker_threads
        );

        let (tx, rx) = channel::bounded::<TcpStream>(self.config.max_connections);
        let workers = self.spawn_workers(rx)?;

        while !self.shutdown.load(Ordering::Relaxed) {
            match listener.accept() {
                Ok((stream, addr)) => {
                    // Accepted sockets may inherit the listener's non-blocking mode
                    stream.set_nonblocking(false)?;

                    if self.active.load(Ordering::SeqCst) >= self.config.max_connections {
                        tracing::warn!("Rejecting {}: connection limit reached", addr);
                        reject(stream);
                        continue;
                    }

                    self.active.fetch_add(1, Ordering::SeqCst);
                    tracing::debug!("Accepted connection from {}", addr);
                    if tx.send(stream).is_err() {
                        self.active.fetch_sub(1, Ordering::SeqCst);
                        break;
                    }
                }
                Err(e) if e.kind() == ErrorKind::WouldBlock => {
                    thread::sleep(ACCEPT_POLL_INTERVAL);
                }
                Err(e) => {
                    tracing::warn!("Accept failed: {}", e);
                    thread::sleep(ACCEPT_POLL_INTERVAL);
                }
            }
        }

        tracing::info!("Shutting down, waiting for workers");
        drop(tx);
        for worker in workers {
            let _ = worker.join();
        }
        Ok(())
    }

    /// Number of connections queued or being served
    pub fn active_connections(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    fn spawn_workers(&self, rx: Receiver<TcpStream>) -> Result<Vec<JoinHandle<()>>> {
        let mut workers = Vec::with_capacity(self.config.worker_threads);

        for id in 0..self.config.worker_threads {
            let rx = rx.clone();
            let store = Arc::clone(&self.store);
            let active = Arc::clone(&self.active);
            let read_ms = self.config.read_timeout_ms;
            let write_ms = self.config.write_timeout_ms;

            let handle = thread::Builder::new()
                .name(format!("isam-worker-{}", id))
                .spawn(move || {
                    for stream in rx.iter() {
                        serve(stream, &store, read_ms, write_ms);
                        active.fetch_sub(1, Ordering::SeqCst);
                    }
                })?;
            workers.push(handle);
        }

        Ok(workers)
    }
}

fn serve(stream: TcpStream, store: &Arc<RecordStore>, read_ms: u64, write_ms: u64) {
    let mut connection = match Connection::new(stream, Arc::clone(store)) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!("Failed to set up connection: {}", e);
            return;
        }
    };

    if let Err(e) = connection.set_timeouts(read_ms, write_ms) {
        tracing::warn!("Failed to set timeouts for {}: {}", connection.peer_addr(), e);
        return;
    }

    if let Err(e) = connection.handle() {
        tracing::warn!("Connection {} ended with error: {}", connection.peer_addr(), e);
    }
}

fn reject(mut stream: TcpStream) {
    let _ = write_response(&mut stream, &Response::error("too many connections"));
}
