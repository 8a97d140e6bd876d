//! Protocol Module
//!
//! Defines the Source RCON wire protocol.
//!
//! ## Frame Format
//!
//! All integer fields are little-endian.
//!
//! ```text
//! ┌──────────┬──────────┬──────────┬──────────────┬────────────┐
//! │ Size (4) │  ID (4)  │ Kind (4) │     Body     │ 0x00 0x00  │
//! └──────────┴──────────┴──────────┴──────────────┴────────────┘
//! ```
//!
//! `Size` counts everything after itself: 4 (id) + 4 (kind) + body
//! length + 2 (terminator), i.e. body length + 10. The total frame on
//! the wire is therefore `Size + 4` bytes.
//!
//! ### Kinds
//! - 0: RESPONSE_VALUE - command output fragments, and the client's
//!   mirror packet
//! - 2: EXEC_COMMAND (request) / AUTH_RESPONSE (reply) - the wire value
//!   is shared; which meaning applies depends on protocol position
//! - 3: AUTH - authentication request carrying the password
//!
//! ### Identifiers
//! The client picks a 31-bit id per request; the server echoes it so
//! replies can be correlated. Id `-1` in an auth reply means the
//! password was rejected.

mod packet;
mod codec;

pub use packet::{
    IdGenerator, Packet, PacketKind, RandomIds, AUTH_FAILED_ID, MAX_PACKET_SIZE, MIN_PACKET_SIZE,
};
pub use codec::{decode, encode, read_packet, validate, write_packet};
