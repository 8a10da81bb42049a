//! Wire-level frame encoding and the 7-bit/14-bit MIDI-safe decoders.
//!
//! Frame layout: `SYNC(0xAA) | cmd | len | payload[len] | checksum`.
//! `checksum` is the XOR of `cmd`, `len`, and every payload byte.

pub const SYNC: u8 = 0xAA;

/// Command bytes understood by the dispatcher. Unlisted bytes are
/// logged and dropped.
pub mod cmd {
    pub const HANDSHAKE: u8 = 0x00;
    pub const HANDSHAKE_REPLY: u8 = 0x01;
    pub const DISCONNECT: u8 = 0x02;
    pub const PING: u8 = 0x03;

    pub const CLIP_STATE: u8 = 0x10;
    pub const CLIP_TRIGGER: u8 = 0x11;
    pub const CLIP_NAME: u8 = 0x14;

    pub const SCENE_STATE: u8 = 0x1A;
    pub const SCENE_NAME: u8 = 0x1B;
    pub const SCENE_COLOR: u8 = 0x1C;
    pub const SCENE_TRIGGERED: u8 = 0x1D;

    pub const MIXER_VOLUME: u8 = 0x21;
    pub const MIXER_PAN: u8 = 0x22;
    pub const MIXER_MUTE: u8 = 0x23;
    pub const MIXER_SOLO: u8 = 0x24;
    pub const MIXER_ARM: u8 = 0x25;
    pub const MIXER_SEND: u8 = 0x26;
    pub const TRACK_NAME: u8 = 0x27;
    pub const TRACK_COLOR: u8 = 0x28;
    pub const SELECTED_TRACK: u8 = 0x29;

    pub const TRANSPORT_PLAY: u8 = 0x40;
    pub const TRANSPORT_RECORD: u8 = 0x41;
    pub const TRANSPORT_LOOP: u8 = 0x42;
    pub const TRANSPORT_TEMPO: u8 = 0x43;
    pub const TRANSPORT_POSITION: u8 = 0x45;
    pub const TRANSPORT_STATE: u8 = 0x49;

    pub const GRID_UPDATE_7BIT: u8 = 0x60;
    pub const PAD_UPDATE_7BIT: u8 = 0x84;
    pub const SHIFT_STATE: u8 = 0x88;
    pub const MIXER_MODE: u8 = 0x98;
    pub const RING_POSITION: u8 = 0x9A;
    pub const GRID_UPDATE_14BIT: u8 = 0xA6;
    pub const PAD_UPDATE_14BIT: u8 = 0xA7;
}

/// An opaque RGB color reconstructed from either the 7-bit or 14-bit
/// wire encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// XOR fold of `cmd`, `len`, and every payload byte.
pub fn checksum(cmd: u8, len: u8, payload: &[u8]) -> u8 {
    payload.iter().fold(cmd ^ len, |acc, b| acc ^ b)
}

/// Encode a frame for transmission. `payload.len()` must fit in a
/// `u8`; a longer payload is a domain error at the caller since the
/// wire format has no continuation mechanism.
pub fn encode_frame(cmd: u8, payload: &[u8]) -> crate::error::Result<Vec<u8>> {
    if payload.len() > u8::MAX as usize {
        return Err(crate::error::LinkError::Domain(format!(
            "payload too long to encode: {} bytes",
            payload.len()
        )));
    }
    let len = payload.len() as u8;
    let mut out = Vec::with_capacity(4 + payload.len());
    out.push(SYNC);
    out.push(cmd);
    out.push(len);
    out.extend_from_slice(payload);
    out.push(checksum(cmd, len, payload));
    Ok(out)
}

/// Reconstruct a 14-bit value from two MIDI-safe 7-bit bytes, MSB first.
pub fn decode_u14(msb: u8, lsb: u8) -> u16 {
    ((msb as u16 & 0x7F) << 7) | (lsb as u16 & 0x7F)
}

/// Decode a 14-bit value and clamp it into `0..=255`.
///
/// The device packs values already in `0..=255` across two 7-bit
/// halves; values above 255 are clamped rather than reinterpreted as a
/// wider color space.
pub fn normalize_14_to_8(msb: u8, lsb: u8) -> u8 {
    decode_u14(msb, lsb).min(255) as u8
}

/// Scale a single 7-bit MIDI value (`0..=127`) up to `0..=255`.
pub fn normalize_7_to_8(value: u8) -> u8 {
    ((value & 0x7F) as u16 * 255 / 127) as u8
}

/// Decode a normalized `[0,1]` volume/level from a 14-bit pair.
pub fn normalize_volume_14(msb: u8, lsb: u8) -> f32 {
    (decode_u14(msb, lsb) as f32 / 16383.0).clamp(0.0, 1.0)
}

/// Decode a normalized `[0,1]` value from a single 7-bit byte.
pub fn normalize_unit_7(value: u8) -> f32 {
    ((value & 0x7F) as f32 / 127.0).clamp(0.0, 1.0)
}

/// Reconstruct an RGB color from a 6-byte 14-bit-per-channel buffer.
pub fn color_from_14(buf: &[u8; 6]) -> Rgb {
    Rgb::new(
        normalize_14_to_8(buf[0], buf[1]),
        normalize_14_to_8(buf[2], buf[3]),
        normalize_14_to_8(buf[4], buf[5]),
    )
}

/// Reconstruct an RGB color from a 3-byte 7-bit-per-channel buffer.
pub fn color_from_7(buf: &[u8; 3]) -> Rgb {
    Rgb::new(
        normalize_7_to_8(buf[0]),
        normalize_7_to_8(buf[1]),
        normalize_7_to_8(buf[2]),
    )
}

/// Decode a length-prefixed UTF-8 string starting at `payload[offset]`:
/// `payload[offset]` holds the byte length, followed by that many
/// bytes. Falls back to treating the rest of `payload` from `offset` as
/// the string when the declared length overruns the buffer — a legacy
/// encoding some firmware revisions still emit.
pub fn read_length_prefixed_utf8(payload: &[u8], offset: usize) -> Option<String> {
    let len_byte = *payload.get(offset)? as usize;
    let start = offset + 1;
    if start + len_byte <= payload.len() {
        Some(String::from_utf8_lossy(&payload[start..start + len_byte]).into_owned())
    } else {
        payload
            .get(offset..)
            .map(|rest| String::from_utf8_lossy(rest).into_owned())
    }
}
