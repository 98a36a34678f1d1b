//! TCP connection
//!
//! Splits one socket into the dispatcher's `MessageSink` / `ReplySource`.

use std::io::{BufReader, BufWriter, Write};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use crossbeam::channel::{self, Receiver, Sender, TryRecvError};

use crate::config::Config;
use crate::error::{ClientError, Result};
use crate::message::Message;
use crate::pipeline::{MessageSink, ReplySource};
use crate::protocol::{encode_request, encode_select, read_reply};
use crate::reply::{RawReply, OK_STATUS};

/// What the next reply on the wire answers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expect {
    /// Injected `SELECT`; consumed by the source
    Select(u32),
    /// A dispatcher message; handed upward
    Message,
}

/// Write half of a TCP connection
pub struct TcpSink {
    /// TCP stream writer (buffered for efficiency)
    writer: BufWriter<TcpStream>,

    /// Database the connection currently has selected
    current_db: u32,

    /// Reply expectations, in write order
    expect: Sender<Expect>,

    /// Peer address for logging
    peer_addr: String,
}

/// Read half of a TCP connection
pub struct TcpSource {
    /// TCP stream reader (buffered for efficiency)
    reader: BufReader<TcpStream>,

    expect: Receiver<Expect>,

    peer_addr: String,
}

/// Connect to `config.server_addr` and split the socket
///
/// Disables Nagle's algorithm and applies the configured timeouts
/// (0 = none). The connection starts on database 0.
pub fn connect(config: &Config) -> Result<(TcpSink, TcpSource)> {
    let stream = open_stream(&config.server_addr, config.connect_timeout_ms)?;

    let peer_addr = stream
        .peer_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    // Disable Nagle's algorithm for low latency
    stream.set_nodelay(true)?;

    if config.read_timeout_ms > 0 {
        stream.set_read_timeout(Some(Duration::from_millis(config.read_timeout_ms)))?;
    }
    if config.write_timeout_ms > 0 {
        stream.set_write_timeout(Some(Duration::from_millis(config.write_timeout_ms)))?;
    }

    // Clone stream for separate read/write handles
    let read_stream = stream.try_clone()?;
    let write_stream = stream;

    let (expect_tx, expect_rx) = channel::unbounded();

    tracing::debug!("Connected to {}", peer_addr);

    Ok((
        TcpSink {
            writer: BufWriter::new(write_stream),
            current_db: 0,
            expect: expect_tx,
            peer_addr: peer_addr.clone(),
        },
        TcpSource {
            reader: BufReader::new(read_stream),
            expect: expect_rx,
            peer_addr,
        },
    ))
}

fn open_stream(addr: &str, connect_timeout_ms: u64) -> Result<TcpStream> {
    if connect_timeout_ms == 0 {
        return Ok(TcpStream::connect(addr)?);
    }

    let timeout = Duration::from_millis(connect_timeout_ms);
    let addrs: Vec<SocketAddr> = addr.to_socket_addrs()?.collect();

    let mut last_error = None;
    for candidate in addrs {
        match TcpStream::connect_timeout(&candidate, timeout) {
            Ok(stream) => return Ok(stream),
            Err(e) => last_error = Some(e),
        }
    }

    Err(match last_error {
        Some(e) => ClientError::Io(e),
        None => ClientError::Config(format!("Address resolved to nothing: {}", addr)),
    })
}

// =============================================================================
// Write half
// =============================================================================

impl TcpSink {
    fn push_expect(&self, expect: Expect) -> Result<()> {
        self.expect
            .send(expect)
            .map_err(|_| ClientError::Connectivity("reply reader has stopped".to_string()))
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}

impl MessageSink for TcpSink {
    fn send(&mut self, message: &Message) -> Result<()> {
        if message.db() != self.current_db {
            tracing::trace!("Selecting db {} on {}", message.db(), self.peer_addr);
            self.push_expect(Expect::Select(message.db()))?;
            self.writer.write_all(&encode_select(message.db()))?;
            self.current_db = message.db();
        }

        self.push_expect(Expect::Message)?;
        self.writer.write_all(&encode_request(message))?;
        self.writer.flush()?;
        Ok(())
    }

    fn shutdown(&mut self) {
        let _ = self.writer.flush();
        if let Err(e) = self.writer.get_ref().shutdown(Shutdown::Both) {
            tracing::debug!("Shutdown of {} failed: {}", self.peer_addr, e);
        }
    }
}

// =============================================================================
// Read half
// =============================================================================

impl TcpSource {
    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}

impl ReplySource for TcpSource {
    fn next_reply(&mut self) -> Result<RawReply> {
        loop {
            let reply = read_reply(&mut self.reader)?;

            // Expectations are queued before the bytes are written, so one
            // is always present for a solicited reply.
            let expect = match self.expect.try_recv() {
                Ok(expect) => expect,
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => Expect::Message,
            };

            match expect {
                Expect::Message => return Ok(reply),
                Expect::Select(_) if reply == RawReply::Status(OK_STATUS.to_string()) => continue,
                Expect::Select(db) => {
                    return Err(ClientError::Connectivity(format!(
                        "SELECT {} on {} failed: {}",
                        db, self.peer_addr, reply
                    )))
                }
            }
        }
    }
}
