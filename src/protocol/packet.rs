//! Packet definitions
//!
//! The semantic unit of wire exchange, plus packet-id generation.

use bytes::Bytes;
use rand::Rng;

/// Wire size of a packet with an empty body: 4 (id) + 4 (kind) + 2
/// (terminator). This is the value of the `size` field, which excludes
/// the 4-byte size prefix itself.
pub const MIN_PACKET_SIZE: i32 = 10;

/// Ceiling on the `size` field: the wire contract caps a frame at 4096
/// bytes past the size prefix, so the largest accepted body is 4086
/// bytes (`MAX_PACKET_SIZE - MIN_PACKET_SIZE`).
pub const MAX_PACKET_SIZE: i32 = 4096;

/// Reserved id signaled by the server in the second auth reply when the
/// password was rejected.
pub const AUTH_FAILED_ID: i32 = -1;

/// The purpose of a packet.
///
/// A newtype over the raw wire value rather than an enum: EXEC_COMMAND
/// and AUTH_RESPONSE share value 2, so the kind alone cannot identify a
/// reply. Receivers correlate on the packet id, and treat the kind of
/// an incoming packet as informational.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketKind(pub i32);

impl PacketKind {
    /// Command output fragments; also the client's empty mirror packet
    pub const RESPONSE_VALUE: PacketKind = PacketKind(0);
    /// Command execution request
    pub const EXEC_COMMAND: PacketKind = PacketKind(2);
    /// Authentication verdict reply (same wire value as EXEC_COMMAND)
    pub const AUTH_RESPONSE: PacketKind = PacketKind(2);
    /// Authentication request carrying the password
    pub const AUTH: PacketKind = PacketKind(3);
}

/// One framed unit of the wire protocol.
///
/// `body` holds the raw payload without the two terminator bytes; those
/// exist only on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    /// Sender-chosen correlation id; echoed by the receiver
    pub id: i32,

    /// Packet purpose (see [`PacketKind`])
    pub kind: PacketKind,

    /// Payload bytes (UTF-8/ASCII text in practice)
    pub body: Bytes,
}

impl Packet {
    /// Create a packet with an explicit id
    pub fn new(id: i32, kind: PacketKind, body: impl Into<Bytes>) -> Self {
        Self {
            id,
            kind,
            body: body.into(),
        }
    }

    /// Create an empty-bodied packet with an explicit id
    pub fn empty(id: i32, kind: PacketKind) -> Self {
        Self::new(id, kind, Bytes::new())
    }

    /// Value of the wire `size` field: body length plus fixed overhead
    pub fn size(&self) -> i32 {
        self.body.len() as i32 + MIN_PACKET_SIZE
    }
}

/// Source of packet correlation ids.
///
/// Injectable so tests can supply deterministic ids and assert exact
/// correlation behavior. Uniqueness-in-practice within one exchange is
/// all the protocol needs; collisions are protocol-inherent and
/// accepted.
pub trait IdGenerator {
    /// Produce the next id; must be non-negative so it can never
    /// collide with [`AUTH_FAILED_ID`]
    fn next_id(&mut self) -> i32;
}

/// Default generator: pseudo-random 31-bit ids
#[derive(Debug, Default)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn next_id(&mut self) -> i32 {
        rand::thread_rng().gen_range(0..=i32::MAX)
    }
}
