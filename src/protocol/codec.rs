//! Protocol codec
//!
//! Encoding and decoding functions for the wire protocol, plus blocking
//! stream helpers.
//!
//! ## Wire Format
//!
//! ```text
//! ┌──────────┬──────────┬──────────┬──────────────┬────────────┐
//! │ Size (4) │  ID (4)  │ Kind (4) │     Body     │ 0x00 0x00  │
//! └──────────┴──────────┴──────────┴──────────────┴────────────┘
//! ```
//!
//! All integers little-endian. `Size` = body length + 10; the total
//! frame is `Size + 4` bytes. The two-byte terminator is mandatory even
//! for empty bodies.
//!
//! ## Lenient decoding
//!
//! The reference protocol tolerates short and empty frames: a declared
//! size of 0 (or below the fixed overhead), or a frame that ends before
//! the declared body is available, decodes as "no payload" rather than
//! an error. This blurs "legitimately empty" and "cut short", but
//! servers in the wild rely on it; `TruncatedFrame` is reserved for
//! genuinely malformed input (no size prefix, negative size).

use std::io::{Read, Write};

use bytes::{Buf, BufMut, Bytes, BytesMut};

use super::{Packet, PacketKind, MAX_PACKET_SIZE, MIN_PACKET_SIZE};
use crate::error::{RconError, Result};

/// Re-check the size ceiling; called before every send.
pub fn validate(packet: &Packet) -> Result<()> {
    let size = packet.size();
    if size > MAX_PACKET_SIZE {
        return Err(RconError::PacketTooLarge {
            size,
            max: MAX_PACKET_SIZE,
        });
    }
    Ok(())
}

/// Encode a packet to its wire frame.
///
/// Fails with `PacketTooLarge` when the body would push the size field
/// past the ceiling; an empty body is valid and encodes to 16 bytes.
pub fn encode(packet: &Packet) -> Result<Bytes> {
    validate(packet)?;

    let size = packet.size();
    let mut frame = BytesMut::with_capacity(size as usize + 4);
    frame.put_i32_le(size);
    frame.put_i32_le(packet.id);
    frame.put_i32_le(packet.kind.0);
    frame.put_slice(&packet.body);
    // body payload must be null terminated, twice
    frame.put_u8(0);
    frame.put_u8(0);

    Ok(frame.freeze())
}

/// Decode a wire frame into a packet.
///
/// Tolerates short frames (see module docs): missing header fields read
/// as zero, and a payload that is absent or cut short yields an empty
/// body. Fails with `TruncatedFrame` only when the frame carries no
/// size prefix at all.
pub fn decode(frame: &[u8]) -> Result<Packet> {
    let mut buf = frame;

    if buf.remaining() < 4 {
        return Err(RconError::TruncatedFrame(format!(
            "missing size prefix: got {} bytes",
            buf.remaining()
        )));
    }
    let size = buf.get_i32_le();
    let id = get_i32_le_or_zero(&mut buf);
    let kind = PacketKind(get_i32_le_or_zero(&mut buf));

    // no payload declared; short sizes read as empty
    if size < MIN_PACKET_SIZE {
        return Ok(Packet::empty(id, kind));
    }

    let body_len = (size - MIN_PACKET_SIZE) as usize;
    if buf.remaining() < body_len {
        // frame ended before the declared body: treated as no payload,
        // matching the reference decoder
        return Ok(Packet::empty(id, kind));
    }

    let mut body = buf.copy_to_bytes(body_len);
    // some peers count the terminator pair inside the body region
    if body.ends_with(&[0, 0]) {
        body.truncate(body.len() - 2);
    }

    Ok(Packet::new(id, kind, body))
}

/// Read a little-endian i32, treating a short buffer as zero (the
/// reference decoder swallows end-of-input on header fields).
fn get_i32_le_or_zero(buf: &mut &[u8]) -> i32 {
    if buf.remaining() >= 4 {
        buf.get_i32_le()
    } else {
        buf.advance(buf.remaining());
        0
    }
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Read one complete frame from a stream.
///
/// Blocks until the frame is received, the stream errors, or the socket
/// timeout fires. The declared size is bound-checked before any
/// allocation.
pub fn read_packet<R: Read>(reader: &mut R) -> Result<Packet> {
    let mut prefix = [0u8; 4];
    reader.read_exact(&mut prefix)?;

    let size = i32::from_le_bytes(prefix);
    if size < 0 {
        return Err(RconError::TruncatedFrame(format!(
            "negative size field: {}",
            size
        )));
    }
    if size > MAX_PACKET_SIZE {
        return Err(RconError::PacketTooLarge {
            size,
            max: MAX_PACKET_SIZE,
        });
    }

    let mut frame = vec![0u8; 4 + size as usize];
    frame[..4].copy_from_slice(&prefix);
    reader.read_exact(&mut frame[4..])?;

    decode(&frame)
}

/// Write one packet to a stream, validating it first.
pub fn write_packet<W: Write>(writer: &mut W, packet: &Packet) -> Result<()> {
    let frame = encode(packet)?;
    writer.write_all(&frame)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_layout_is_little_endian() {
        let packet = Packet::new(0x0102_0304, PacketKind::EXEC_COMMAND, &b"ok"[..]);
        let frame = encode(&packet).unwrap();

        assert_eq!(&frame[0..4], &12i32.to_le_bytes());
        assert_eq!(&frame[4..8], &[0x04, 0x03, 0x02, 0x01]);
        assert_eq!(&frame[8..12], &2i32.to_le_bytes());
        assert_eq!(&frame[12..14], b"ok");
        assert_eq!(&frame[14..16], &[0, 0]);
    }

    #[test]
    fn test_decode_strips_counted_terminator_pair() {
        // size counts the terminators inside the body region
        let mut frame = Vec::new();
        frame.extend_from_slice(&15i32.to_le_bytes());
        frame.extend_from_slice(&9i32.to_le_bytes());
        frame.extend_from_slice(&0i32.to_le_bytes());
        frame.extend_from_slice(b"hello\x00\x00");

        let packet = decode(&frame).unwrap();
        assert_eq!(&packet.body[..], b"hello");
    }

    #[test]
    fn test_decode_mid_body_truncation_reads_as_empty() {
        let mut frame = Vec::new();
        frame.extend_from_slice(&20i32.to_le_bytes());
        frame.extend_from_slice(&1i32.to_le_bytes());
        frame.extend_from_slice(&0i32.to_le_bytes());
        frame.extend_from_slice(b"part");

        let packet = decode(&frame).unwrap();
        assert_eq!(packet.id, 1);
        assert!(packet.body.is_empty());
    }
}
