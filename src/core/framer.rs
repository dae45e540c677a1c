//! Network line framer.
//!
//! Receives timing-console output over UDP datagrams or TCP streams, splits it
//! into lines and pushes them onto the shared line queue. Every listener and
//! connection task watches the shutdown channel and exits within
//! [`POLL_INTERVAL`] of it flipping to `true`.

use crate::domain::ports::Transport;
use crate::utils::error::{Result, SignError};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::net::{TcpListener, TcpStream, UdpSocket};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinSet;

/// Longest line a stream peer may send before its connection is dropped.
pub const MAX_LINE_BYTES: usize = 4096;
pub const POLL_INTERVAL: Duration = Duration::from_millis(250);

const MAX_DATAGRAM_SIZE: usize = 65535;
const READ_CHUNK_SIZE: usize = 4096;

pub type LineSender = mpsc::UnboundedSender<String>;
pub type LineReceiver = mpsc::UnboundedReceiver<String>;

pub fn line_queue() -> (LineSender, LineReceiver) {
    mpsc::unbounded_channel()
}

fn decode_line(raw: &[u8]) -> Option<String> {
    let line = String::from_utf8_lossy(raw);
    let line = line.trim();
    if line.is_empty() {
        None
    } else {
        Some(line.to_string())
    }
}

// 接受 \n、\r\n 與單獨的 \r
fn is_line_break(byte: u8) -> bool {
    byte == b'\n' || byte == b'\r'
}

/// Splits one datagram into its non-blank lines.
pub fn split_datagram(data: &[u8]) -> Vec<String> {
    data.split(|b| is_line_break(*b))
        .filter_map(decode_line)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineOverflow {
    pub buffered: usize,
}

/// Per-connection accumulator for a TCP byte stream.
#[derive(Debug)]
pub struct LineBuffer {
    pending: Vec<u8>,
    max_line: usize,
}

impl LineBuffer {
    pub fn new(max_line: usize) -> Self {
        Self {
            pending: Vec::new(),
            max_line,
        }
    }

    /// Appends a chunk and returns every line it completed.
    ///
    /// Once a single line grows past the cap the overflow is reported next to
    /// the lines completed before it; the caller forwards those and then drops
    /// the connection.
    pub fn push(&mut self, chunk: &[u8]) -> (Vec<String>, Option<LineOverflow>) {
        self.pending.extend_from_slice(chunk);

        let mut lines = Vec::new();
        let mut start = 0;
        while let Some(offset) = self.pending[start..].iter().position(|b| is_line_break(*b)) {
            let end = start + offset;
            if end - start > self.max_line {
                let overflow = LineOverflow {
                    buffered: end - start,
                };
                self.pending.clear();
                return (lines, Some(overflow));
            }
            if let Some(line) = decode_line(&self.pending[start..end]) {
                lines.push(line);
            }
            start = end + 1;
        }
        self.pending.drain(..start);

        if self.pending.len() > self.max_line {
            let overflow = LineOverflow {
                buffered: self.pending.len(),
            };
            self.pending.clear();
            return (lines, Some(overflow));
        }
        (lines, None)
    }

    /// Flushes an unterminated trailing line, e.g. when the peer closes.
    pub fn take_remainder(&mut self) -> Option<String> {
        let rest = std::mem::take(&mut self.pending);
        decode_line(&rest)
    }

    pub fn buffered(&self) -> usize {
        self.pending.len()
    }
}

enum Listener {
    Udp(UdpSocket),
    Tcp(TcpListener),
}

pub struct LineFramer {
    listener: Listener,
    lines: LineSender,
    shutdown: watch::Receiver<bool>,
}

impl LineFramer {
    pub async fn bind(
        transport: Transport,
        address: &str,
        lines: LineSender,
        shutdown: watch::Receiver<bool>,
    ) -> Result<Self> {
        let bound = match transport {
            Transport::Udp => UdpSocket::bind(address).await.map(Listener::Udp),
            Transport::Tcp => TcpListener::bind(address).await.map(Listener::Tcp),
        };
        let listener = bound.map_err(|source| SignError::BindError {
            transport: transport.as_str().to_string(),
            address: address.to_string(),
            source,
        })?;

        Ok(Self {
            listener,
            lines,
            shutdown,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        let addr = match &self.listener {
            Listener::Udp(socket) => socket.local_addr()?,
            Listener::Tcp(listener) => listener.local_addr()?,
        };
        Ok(addr)
    }

    /// Runs until shutdown is signalled or the line queue's consumer is gone.
    pub async fn run(self) {
        match self.listener {
            Listener::Udp(socket) => run_datagrams(socket, self.lines, self.shutdown).await,
            Listener::Tcp(listener) => run_streams(listener, self.lines, self.shutdown).await,
        }
    }
}

fn is_stopping(shutdown: &watch::Receiver<bool>) -> bool {
    *shutdown.borrow()
}

fn describe_addr(addr: std::io::Result<SocketAddr>) -> String {
    match addr {
        Ok(addr) => addr.to_string(),
        Err(e) => format!("<unknown address: {}>", e),
    }
}

async fn run_datagrams(socket: UdpSocket, lines: LineSender, mut shutdown: watch::Receiver<bool>) {
    tracing::info!(
        "📡 Listening for UDP timing data on {}",
        describe_addr(socket.local_addr())
    );
    let mut buf = vec![0u8; MAX_DATAGRAM_SIZE];

    while !is_stopping(&shutdown) {
        tokio::select! {
            changed = shutdown.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            received = socket.recv_from(&mut buf) => match received {
                Ok((len, peer)) => {
                    let batch = split_datagram(&buf[..len]);
                    tracing::trace!("Datagram from {}: {} bytes, {} lines", peer, len, batch.len());
                    for line in batch {
                        if lines.send(line).is_err() {
                            tracing::debug!("Line queue closed, stopping UDP listener");
                            return;
                        }
                    }
                }
                Err(e) => tracing::warn!("UDP receive failed: {}", e),
            },
            _ = tokio::time::sleep(POLL_INTERVAL) => {}
        }
    }

    tracing::debug!("UDP listener stopped");
}

async fn run_streams(
    listener: TcpListener,
    lines: LineSender,
    mut shutdown: watch::Receiver<bool>,
) {
    tracing::info!(
        "📡 Listening for TCP timing data on {}",
        describe_addr(listener.local_addr())
    );
    let mut connections = JoinSet::new();

    while !is_stopping(&shutdown) {
        tokio::select! {
            changed = shutdown.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            accepted = listener.accept() => match accepted {
                Ok((stream, peer)) => {
                    tracing::debug!("Timing console connected from {}", peer);
                    connections.spawn(handle_connection(
                        stream,
                        peer,
                        lines.clone(),
                        shutdown.clone(),
                    ));
                }
                Err(e) => tracing::warn!("TCP accept failed: {}", e),
            },
            Some(_) = connections.join_next(), if !connections.is_empty() => {}
            _ = tokio::time::sleep(POLL_INTERVAL) => {}
        }
    }

    drop(listener);
    while connections.join_next().await.is_some() {}
    tracing::debug!("TCP listener stopped");
}

async fn handle_connection(
    mut stream: TcpStream,
    peer: SocketAddr,
    lines: LineSender,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut buffer = LineBuffer::new(MAX_LINE_BYTES);
    let mut chunk = [0u8; READ_CHUNK_SIZE];

    while !is_stopping(&shutdown) {
        tokio::select! {
            changed = shutdown.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            read = stream.read(&mut chunk) => match read {
                Ok(0) => {
                    if let Some(line) = buffer.take_remainder() {
                        let _ = lines.send(line);
                    }
                    tracing::debug!("Timing console {} disconnected", peer);
                    return;
                }
                Ok(n) => {
                    let (complete, overflow) = buffer.push(&chunk[..n]);
                    for line in complete {
                        if lines.send(line).is_err() {
                            return;
                        }
                    }
                    if let Some(overflow) = overflow {
                        tracing::warn!(
                            "Dropping connection {}: {} bytes without a line break (limit {})",
                            peer,
                            overflow.buffered,
                            MAX_LINE_BYTES
                        );
                        return;
                    }
                }
                Err(e) => {
                    tracing::debug!("Connection {} failed: {}", peer, e);
                    return;
                }
            },
            _ = tokio::time::sleep(POLL_INTERVAL) => {}
        }
    }
}
