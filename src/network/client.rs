//! Blocking TCP client
//!
//! One request in flight at a time. Response statuses are mapped back onto
//! [`IsamError`] so callers see the same error kinds as the local store.

use std::io::{BufReader, BufWriter};
use std::net::{TcpStream, ToSocketAddrs};

use crate::error::{IsamError, Result};
use crate::protocol::{read_response, write_command, Command, Response, ResponseBody, Status};
use crate::record::Record;

/// Client connection to an isamstore server
pub struct Client {
    reader: BufReader<TcpStream>,
    writer: BufWriter<TcpStream>,
}

impl Client {
    /// Connect to a server
    pub fn connect<A: ToSocketAddrs>(addr: A) -> Result<Self> {
        let stream = TcpStream::connect(addr)
            .map_err(|e| IsamError::Network(format!("Failed to connect: {}", e)))?;
        stream.set_nodelay(true)?;

        let read_stream = stream.try_clone()?;
        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(stream),
        })
    }

    /// Send a command and wait for the raw response
    pub fn request(&mut self, command: &Command) -> Result<Response> {
        write_command(&mut self.writer, command)?;
        read_response(&mut self.reader)
    }

    pub fn insert(&mut self, key: &str, record: &Record) -> Result<()> {
        let response = self.request(&Command::Insert {
            key: key.to_string(),
            record: record.clone(),
        })?;
        check(response, key).map(drop)
    }

    pub fn search(&mut self, key: &str) -> Result<String> {
        let response = self.request(&Command::Search {
            key: key.to_string(),
        })?;
        match check(response, key)? {
            ResponseBody::Record(line) => Ok(line),
            other => Err(unexpected(other)),
        }
    }

    pub fn search_by_name_prefix(&mut self, prefix: &str) -> Result<Vec<String>> {
        self.scan(Command::SearchByNamePrefix {
            prefix: prefix.to_string(),
        })
    }

    pub fn search_by_marks_range(&mut self, min: f64, max: f64) -> Result<Vec<String>> {
        self.scan(Command::SearchByMarksRange { min, max })
    }

    pub fn search_by_email(&mut self, query: &str) -> Result<Vec<String>> {
        self.scan(Command::SearchByEmail {
            query: query.to_string(),
        })
    }

    pub fn search_by_roll_no(&mut self, query: &str) -> Result<Vec<String>> {
        self.scan(Command::SearchByRollNo {
            query: query.to_string(),
        })
    }

    pub fn delete(&mut self, key: &str) -> Result<()> {
        let response = self.request(&Command::Delete {
            key: key.to_string(),
        })?;
        check(response, key).map(drop)
    }

    pub fn update(&mut self, key: &str, record: &Record) -> Result<()> {
        let response = self.request(&Command::Update {
            key: key.to_string(),
            record: record.clone(),
        })?;
        check(response, key).map(drop)
    }

    pub fn ping(&mut self) -> Result<()> {
        let response = self.request(&Command::Ping)?;
        check(response, "").map(drop)
    }

    /// Scans report "no matches" as NOT_FOUND; surface that as an empty list
    fn scan(&mut self, command: Command) -> Result<Vec<String>> {
        let response = self.request(&command)?;
        if response.status == Status::NotFound {
            return Ok(Vec::new());
        }
        match check(response, "")? {
            ResponseBody::Records(lines) => Ok(lines),
            other => Err(unexpected(other)),
        }
    }
}

fn check(response: Response, key: &str) -> Result<ResponseBody> {
    let text = response.message_text().unwrap_or_default().to_string();
    match response.status {
        Status::Ok => Ok(response.body),
        Status::NotFound => Err(IsamError::NotFound(key.to_string())),
        Status::Conflict => Err(IsamError::DuplicateKey(key.to_string())),
        Status::BadRequest => Err(IsamError::InvalidRecord(text)),
        Status::Error => Err(IsamError::Network(format!("Server error: {}", text))),
    }
}

fn unexpected(body: ResponseBody) -> IsamError {
    IsamError::Protocol(format!("Unexpected response body: {:?}", body))
}
