//! Shared test transport
//!
//! An in-memory `MessageSink` / `ReplySource` pair driven by a
//! `FakeServer` handle held by the test.

#![allow(dead_code)]

use std::thread::{self, JoinHandle};
use std::time::Duration;

use atlas_client::pipeline::{MessageSink, ReplySource};
use atlas_client::{ClientError, Message, RawReply, Result};
use crossbeam::channel::{self, select, Receiver, Sender};

pub const TIMEOUT: Duration = Duration::from_secs(5);

/// Write half: records every sent message
pub struct ChannelSink {
    sent: Sender<Message>,
    /// When set, each send waits for one token after recording
    gate: Option<Receiver<()>>,
    /// Dropped on shutdown to unblock the source
    alive: Option<Sender<()>>,
    fail_sends: bool,
}

/// Read half: replays replies pushed by the test
pub struct ChannelSource {
    replies: Receiver<Result<RawReply>>,
    alive: Receiver<()>,
}

/// Test-side handle of the fake connection
pub struct FakeServer {
    pub sent: Receiver<Message>,
    pub replies: Sender<Result<RawReply>>,
    pub gate: Option<Sender<()>>,
}

impl FakeServer {
    /// Next message the dispatcher transmitted
    pub fn next_sent(&self) -> Message {
        self.sent
            .recv_timeout(TIMEOUT)
            .expect("dispatcher did not transmit in time")
    }

    pub fn reply(&self, reply: RawReply) {
        self.replies.send(Ok(reply)).expect("source dropped");
    }

    /// Make the next `next_reply` fail like a broken socket
    pub fn break_connection(&self) {
        self.replies
            .send(Err(ClientError::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "connection reset by peer",
            ))))
            .expect("source dropped");
    }

    /// Let `n` gated sends complete
    pub fn release(&self, n: usize) {
        let gate = self.gate.as_ref().expect("transport is not gated");
        for _ in 0..n {
            gate.send(()).expect("sink dropped");
        }
    }

    /// Answer every sent message with `respond(&message)` on a thread
    pub fn auto_reply<F>(self, respond: F) -> JoinHandle<Vec<Message>>
    where
        F: Fn(&Message) -> RawReply + Send + 'static,
    {
        thread::spawn(move || {
            let mut seen = Vec::new();
            for message in self.sent.iter() {
                if self.replies.send(Ok(respond(&message))).is_err() {
                    break;
                }
                seen.push(message);
            }
            seen
        })
    }
}

impl MessageSink for ChannelSink {
    fn send(&mut self, message: &Message) -> Result<()> {
        if self.fail_sends {
            return Err(ClientError::Io(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "broken pipe",
            )));
        }

        self.sent
            .send(message.clone())
            .map_err(|_| ClientError::Connectivity("test server gone".to_string()))?;

        if let Some(gate) = &self.gate {
            gate.recv()
                .map_err(|_| ClientError::Connectivity("gate closed".to_string()))?;
        }
        Ok(())
    }

    fn shutdown(&mut self) {
        self.alive.take();
    }
}

impl ReplySource for ChannelSource {
    fn next_reply(&mut self) -> Result<RawReply> {
        select! {
            recv(self.replies) -> reply => match reply {
                Ok(reply) => reply,
                Err(_) => Err(ClientError::Connectivity("test server gone".to_string())),
            },
            recv(self.alive) -> _ => {
                Err(ClientError::Connectivity("transport shut down".to_string()))
            }
        }
    }
}

fn build(gated: bool, fail_sends: bool) -> (ChannelSink, ChannelSource, FakeServer) {
    let (sent_tx, sent_rx) = channel::unbounded();
    let (reply_tx, reply_rx) = channel::unbounded();
    let (alive_tx, alive_rx) = channel::bounded(0);
    let (gate_tx, gate_rx) = if gated {
        let (tx, rx) = channel::unbounded();
        (Some(tx), Some(rx))
    } else {
        (None, None)
    };

    (
        ChannelSink {
            sent: sent_tx,
            gate: gate_rx,
            alive: Some(alive_tx),
            fail_sends,
        },
        ChannelSource {
            replies: reply_rx,
            alive: alive_rx,
        },
        FakeServer {
            sent: sent_rx,
            replies: reply_tx,
            gate: gate_tx,
        },
    )
}

/// Plain transport
pub fn transport() -> (ChannelSink, ChannelSource, FakeServer) {
    build(false, false)
}

/// Transport whose sends block until `FakeServer::release`
pub fn gated_transport() -> (ChannelSink, ChannelSource, FakeServer) {
    build(true, false)
}

/// Transport whose every send fails
pub fn failing_transport() -> (ChannelSink, ChannelSource, FakeServer) {
    build(false, true)
}

/// First parameter of a message as UTF-8
pub fn first_param(message: &Message) -> String {
    String::from_utf8(message.params()[0].to_bytes().to_vec()).expect("utf-8 parameter")
}
