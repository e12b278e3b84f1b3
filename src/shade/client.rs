//! TCP client for shade controllers.
//!
//! Every call to [`ShadeClient::send`] is one complete exchange on a fresh
//! connection: connect, write the command, read one reply, close.  Nothing
//! is pooled or retried, and the client itself holds no mutable state, so a
//! single instance can be shared between threads.

use super::command::{EncodedCommand, ShadeCommandRequest};
use crate::traits::ShadeLink;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::{Duration, Instant};

/// Default reply buffer size.  Replies longer than this are truncated.
pub const DEFAULT_REPLY_BUFFER_SIZE: usize = 1024;

/// Default connect timeout (ms).
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5_000;

/// Timeouts and buffer sizing for [`ShadeClient`].
///
/// All durations are in **milliseconds**.  A read or write timeout of `0`
/// means "no deadline"; a connect timeout of `0` falls back to
/// [`DEFAULT_CONNECT_TIMEOUT_MS`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadeClientConfig {
    pub connect_timeout_ms: u64,
    pub read_timeout_ms: u64,
    pub write_timeout_ms: u64,
    pub reply_buffer_size: usize,
}

impl Default for ShadeClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
            read_timeout_ms: 5_000,
            write_timeout_ms: 5_000,
            reply_buffer_size: DEFAULT_REPLY_BUFFER_SIZE,
        }
    }
}

fn millis(ms: u64) -> Option<Duration> {
    (ms > 0).then(|| Duration::from_millis(ms))
}

impl ShadeClientConfig {
    /// Budget for the whole connect step.  `0` means the default; a
    /// connect is never unbounded.
    pub fn connect_timeout(&self) -> Duration {
        millis(self.connect_timeout_ms)
            .unwrap_or(Duration::from_millis(DEFAULT_CONNECT_TIMEOUT_MS))
    }

    pub fn read_timeout(&self) -> Option<Duration> {
        millis(self.read_timeout_ms)
    }

    pub fn write_timeout(&self) -> Option<Duration> {
        millis(self.write_timeout_ms)
    }
}

/// Failures talking to a controller.
///
/// The transport variants carry the address that was dialed and the
/// underlying I/O error.
#[derive(Debug, thiserror::Error)]
pub enum ShadeError {
    /// Resolving or connecting to the controller failed or timed out.
    #[error("failed to connect to {address}: {source}")]
    Connect { address: String, source: io::Error },

    /// The command could not be fully written.
    #[error("failed to send command to {address}: {source}")]
    Write { address: String, source: io::Error },

    /// No reply could be read (timeout, reset, or the controller closed
    /// the connection without answering).
    #[error("failed to read reply from {address}: {source}")]
    Read { address: String, source: io::Error },

    /// A command kind name that has no wire token.
    #[error("invalid shade command kind: {0:?}")]
    InvalidCommandKind(String),
}

impl ShadeError {
    /// The controller address involved, if this is a transport failure.
    pub fn address(&self) -> Option<&str> {
        match self {
            ShadeError::Connect { address, .. }
            | ShadeError::Write { address, .. }
            | ShadeError::Read { address, .. } => Some(address),
            ShadeError::InvalidCommandKind(_) => None,
        }
    }
}

/// Raw reply bytes from a controller.
///
/// The controller's answer is not parsed; it is only ever logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShadeReply(Vec<u8>);

impl ShadeReply {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The reply as text, with invalid UTF-8 replaced.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ShadeReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

/// Shade controller client.
///
/// # Typical usage
///
/// ```no_run
/// use deckctl::shade::client::{ShadeClient, ShadeClientConfig};
/// use deckctl::shade::command::{encode, CommandKind};
///
/// let client = ShadeClient::new(ShadeClientConfig::default());
/// let reply = client.send("192.168.1.40:8838", &encode("03", "1", CommandKind::Stop))?;
/// println!("{}", reply);
/// # Ok::<(), deckctl::shade::client::ShadeError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ShadeClient {
    config: ShadeClientConfig,
}

impl ShadeClient {
    pub fn new(config: ShadeClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ShadeClientConfig {
        &self.config
    }

    /// Encode `request` and send it to `request.address`.
    pub fn execute(&self, request: &ShadeCommandRequest) -> Result<ShadeReply, ShadeError> {
        self.send(&request.address, &request.encode())
    }

    /// Send one command to the controller at `address` (`host:port`) and
    /// return its reply.
    ///
    /// The connection is closed before this returns, whatever the outcome.
    pub fn send(&self, address: &str, command: &EncodedCommand) -> Result<ShadeReply, ShadeError> {
        let mut stream = self.connect(address)?;
        debug!("connected to {}", address);

        let read_err = |source| ShadeError::Read {
            address: address.to_string(),
            source,
        };
        let write_err = |source| ShadeError::Write {
            address: address.to_string(),
            source,
        };

        stream
            .set_write_timeout(self.config.write_timeout())
            .map_err(write_err)?;
        stream
            .write_all(command.as_bytes())
            .and_then(|_| stream.flush())
            .map_err(write_err)?;
        debug!("sent {:?} to {}", command.as_str(), address);

        stream
            .set_read_timeout(self.config.read_timeout())
            .map_err(read_err)?;
        let mut buf = vec![0u8; self.config.reply_buffer_size.max(1)];
        let n = stream.read(&mut buf).map_err(read_err)?;
        if n == 0 {
            return Err(read_err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "connection closed before a reply was received",
            )));
        }
        buf.truncate(n);
        debug!("received {} byte(s) from {}", n, address);

        Ok(ShadeReply(buf))
    }

    /// Resolve `address` and connect to the first socket address that
    /// accepts.  The connect timeout bounds the whole step, not each
    /// address.
    fn connect(&self, address: &str) -> Result<TcpStream, ShadeError> {
        let addrs: Vec<SocketAddr> = address
            .to_socket_addrs()
            .map_err(|source| ShadeError::Connect {
                address: address.to_string(),
                source,
            })?
            .collect();
        dial_within(
            address,
            &addrs,
            self.config.connect_timeout(),
            TcpStream::connect_timeout,
        )
    }
}

/// Try `addrs` in order with `dial`, sharing one `timeout` budget between
/// them.  Each attempt gets whatever is left of the budget.
fn dial_within<T>(
    address: &str,
    addrs: &[SocketAddr],
    timeout: Duration,
    mut dial: impl FnMut(&SocketAddr, Duration) -> io::Result<T>,
) -> Result<T, ShadeError> {
    let deadline = Instant::now() + timeout;
    let mut last_err = None;
    for addr in addrs {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            last_err = Some(io::Error::new(
                io::ErrorKind::TimedOut,
                "connect timeout elapsed",
            ));
            break;
        }
        match dial(addr, remaining) {
            Ok(stream) => return Ok(stream),
            Err(e) => {
                warn!("connect to {} ({}) failed: {}", address, addr, e);
                last_err = Some(e);
            }
        }
    }

    Err(ShadeError::Connect {
        address: address.to_string(),
        source: last_err.unwrap_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "address did not resolve to any socket address",
            )
        }),
    })
}

impl ShadeLink for ShadeClient {
    fn execute(&self, request: &ShadeCommandRequest) -> Result<ShadeReply, ShadeError> {
        ShadeClient::execute(self, request)
    }
}

//  Tests
