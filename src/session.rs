//! RCON session
//!
//! One client-to-server TCP relationship, from lazy connect through the
//! authentication handshake to command execution.
//!
//! ## State machine
//!
//! ```text
//! Disconnected ──connect──▶ Connected ──handshake──▶ Authenticated
//!      ▲                        │                         │
//!      └────────── close ───────┴─────────────────────────┘
//! ```
//!
//! Both transitions happen lazily inside `exec_command`; a failed call
//! never poisons the session, it only reports the error and leaves
//! whatever state was already reached (a connected socket survives a
//! rejected password, so a corrected one can be retried without
//! re-dialing).
//!
//! ## Concurrency
//!
//! The protocol is half-duplex: one request and its complete response
//! must finish before the next request may touch the wire. Every public
//! operation therefore holds the session mutex for its full duration;
//! concurrent callers queue. Parallel commands require independent
//! sessions. The mutex (parking_lot) releases on unwind, so a panicking
//! caller cannot wedge the session.

use std::io::{BufReader, BufWriter};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::time::Duration;

use parking_lot::Mutex;

use crate::config::Options;
use crate::error::{RconError, Result};
use crate::protocol::{
    read_packet, write_packet, IdGenerator, Packet, PacketKind, RandomIds, AUTH_FAILED_ID,
};

/// A connection to one RCON server.
///
/// Cheap to construct: no I/O happens until the first
/// [`exec_command`](Session::exec_command). Safe to share between
/// threads; operations serialize.
pub struct Session {
    /// Immutable target and credential configuration
    options: Options,

    /// Socket, auth flag, and id source, guarded as one unit
    inner: Mutex<Inner>,
}

/// Mutable session state; lives behind the session mutex.
struct Inner {
    /// Present only while connected
    wire: Option<Wire>,

    /// Set only by a successful handshake; cleared on close
    authenticated: bool,

    /// Correlation-id source, injectable for tests
    ids: Box<dyn IdGenerator + Send>,
}

/// Buffered read/write halves over one TCP stream.
struct Wire {
    reader: BufReader<TcpStream>,
    writer: BufWriter<TcpStream>,
}

impl Session {
    /// Create a session in the configured, disconnected state.
    pub fn new(options: Options) -> Self {
        Self::with_id_generator(options, Box::new(RandomIds))
    }

    /// Create a session with an explicit packet-id source.
    pub fn with_id_generator(options: Options, ids: Box<dyn IdGenerator + Send>) -> Self {
        Self {
            options,
            inner: Mutex::new(Inner {
                wire: None,
                authenticated: false,
                ids,
            }),
        }
    }

    /// The options this session was built with.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Execute a command and return its complete output.
    ///
    /// Connects and authenticates first if needed. The server may split
    /// the output across several packets with no end marker, so an
    /// empty RESPONSE_VALUE "mirror" packet is sent right behind the
    /// command; per-connection ordering guarantees the server answers
    /// it only after every output fragment, and its echoed id marks the
    /// end of the response. Fragment bodies are ASCII-whitespace
    /// trimmed and concatenated in receipt order.
    ///
    /// Any receive error aborts the call with no partial result.
    pub fn exec_command(&self, command: &str) -> Result<Vec<u8>> {
        let mut inner = self.inner.lock();

        inner.ensure_connected(&self.options)?;
        if !inner.authenticated {
            if let Some(password) = self.options.password.as_deref() {
                if !password.is_empty() {
                    inner.authenticate(password)?;
                }
            }
        }

        let exec = Packet::new(
            inner.ids.next_id(),
            PacketKind::EXEC_COMMAND,
            command.as_bytes().to_vec(),
        );
        inner.send(&exec)?;

        let mirror = Packet::empty(inner.ids.next_id(), PacketKind::RESPONSE_VALUE);
        inner.send(&mirror)?;
        tracing::trace!(
            "sent command id {} with mirror id {}",
            exec.id,
            mirror.id
        );

        let mut output = Vec::new();
        loop {
            let reply = inner.receive()?;
            // the mirror echo marks the end of the response
            if reply.id == mirror.id {
                tracing::debug!(
                    "command id {} complete: {} bytes",
                    exec.id,
                    output.len()
                );
                return Ok(output);
            }
            tracing::trace!(
                "fragment for id {}: {} bytes",
                reply.id,
                reply.body.len()
            );
            output.extend_from_slice(reply.body.trim_ascii());
        }
    }

    /// Close the connection.
    ///
    /// A no-op on an already-disconnected session. The in-memory state
    /// resets to disconnected/unauthenticated even when the OS-level
    /// shutdown reports an error; that error is still surfaced. The
    /// next `exec_command` re-dials and re-authenticates from scratch.
    pub fn close(&self) -> Result<()> {
        let mut inner = self.inner.lock();
        let wire = match inner.wire.take() {
            Some(wire) => wire,
            None => return Ok(()),
        };
        inner.authenticated = false;

        tracing::debug!("closing connection to {}", self.options.address());
        let shutdown = wire.reader.get_ref().shutdown(Shutdown::Both);
        drop(wire);
        shutdown.map_err(RconError::from)
    }
}

impl Inner {
    /// Dial the server if no socket exists yet.
    ///
    /// On failure the session stays disconnected; on success the
    /// configured timeout is applied to the socket for connect, read,
    /// and write.
    fn ensure_connected(&mut self, options: &Options) -> Result<()> {
        if self.wire.is_some() {
            return Ok(());
        }

        let address = options.address();
        let addr = address
            .to_socket_addrs()
            .map_err(|e| RconError::Connection(format!("failed to resolve {}: {}", address, e)))?
            .next()
            .ok_or_else(|| {
                RconError::Connection(format!("no addresses resolved for {}", address))
            })?;

        let timeout = socket_timeout(options.timeout);
        let stream = match timeout {
            Some(limit) => TcpStream::connect_timeout(&addr, limit),
            None => TcpStream::connect(addr),
        }
        .map_err(|e| RconError::Connection(format!("failed to connect to {}: {}", address, e)))?;

        stream.set_read_timeout(timeout)?;
        stream.set_write_timeout(timeout)?;
        // disable Nagle's algorithm for low latency
        stream.set_nodelay(true)?;

        let read_stream = stream.try_clone()?;
        self.wire = Some(Wire {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(stream),
        });

        tracing::debug!("connected to {}", address);
        Ok(())
    }

    /// Run the two-reply authentication handshake.
    ///
    /// The server acknowledges an AUTH packet with an empty reply
    /// echoing its id, then a verdict reply: id `-1` means the password
    /// was rejected, the echoed id means it was accepted. Any other id
    /// in either position is a protocol desynchronization.
    fn authenticate(&mut self, password: &str) -> Result<()> {
        let auth = Packet::new(
            self.ids.next_id(),
            PacketKind::AUTH,
            password.as_bytes().to_vec(),
        );
        self.send(&auth)?;

        let ack = self.receive()?;
        if ack.id != auth.id {
            return Err(RconError::AuthSequence {
                expected: auth.id,
                got: ack.id,
            });
        }

        let verdict = self.receive()?;
        if verdict.id == AUTH_FAILED_ID {
            return Err(RconError::AuthenticationFailed);
        }
        if verdict.id != auth.id {
            return Err(RconError::AuthSequence {
                expected: auth.id,
                got: verdict.id,
            });
        }

        self.authenticated = true;
        tracing::debug!("authenticated (auth id {})", auth.id);
        Ok(())
    }

    /// Validate, encode, and write one packet.
    fn send(&mut self, packet: &Packet) -> Result<()> {
        let wire = self.wire_mut()?;
        write_packet(&mut wire.writer, packet)
    }

    /// Read one packet, blocking up to the socket timeout.
    fn receive(&mut self) -> Result<Packet> {
        let wire = self.wire_mut()?;
        read_packet(&mut wire.reader)
    }

    fn wire_mut(&mut self) -> Result<&mut Wire> {
        self.wire
            .as_mut()
            .ok_or_else(|| RconError::Connection("not connected".to_string()))
    }
}

/// `set_read_timeout` rejects a zero duration; map it to "no timeout".
fn socket_timeout(timeout: Duration) -> Option<Duration> {
    if timeout.is_zero() {
        None
    } else {
        Some(timeout)
    }
}
