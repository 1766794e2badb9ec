#![doc = r#"
Meta and system-exclusive events.

Meta events are `0xFF`, a type byte, then a length-prefixed payload. The
crate gives first-class accessors to the types the streaming layer cares
about (tempo, time signature, end-of-track, text) and round-trips every
other type as raw bytes.
"#]

use alloc::vec::Vec;
use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Meta event types this crate understands beyond raw bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MetaKind {
    /// Free text
    Text = 0x01,
    /// Track terminator
    EndOfTrack = 0x2F,
    /// Tempo change, microseconds per quarter note
    Tempo = 0x51,
    /// Time signature
    TimeSignature = 0x58,
}

/// A meta event: type byte plus raw payload.
///
/// A zero-length payload is legal (end-of-track has one). Unrecognized
/// types are preserved as-is and serialize back byte-identically.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetaEvent {
    type_byte: u8,
    data: Vec<u8>,
}

impl MetaEvent {
    /// A meta event from its raw parts.
    pub fn new(type_byte: u8, data: Vec<u8>) -> Self {
        Self { type_byte, data }
    }

    /// The track terminator (type `0x2F`, empty payload).
    pub fn end_of_track() -> Self {
        Self::new(MetaKind::EndOfTrack.into(), Vec::new())
    }

    /// A tempo change. The payload is the low three bytes of
    /// `us_per_quarter`, big-endian.
    pub fn tempo(us_per_quarter: u32) -> Self {
        let [_, a, b, c] = us_per_quarter.to_be_bytes();
        Self::new(MetaKind::Tempo.into(), [a, b, c].to_vec())
    }

    /// A time signature change.
    pub fn time_signature(signature: TimeSignature) -> Self {
        Self::new(MetaKind::TimeSignature.into(), signature.to_bytes().to_vec())
    }

    /// A text event.
    pub fn text(text: &str) -> Self {
        Self::new(MetaKind::Text.into(), text.as_bytes().to_vec())
    }

    /// Raw type byte.
    pub const fn type_byte(&self) -> u8 {
        self.type_byte
    }

    /// The recognized kind, when the type byte is one this crate knows.
    pub fn kind(&self) -> Option<MetaKind> {
        MetaKind::try_from(self.type_byte).ok()
    }

    /// Payload bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Microseconds per quarter note, when this is a well-formed tempo
    /// event (type `0x51` with exactly three payload bytes).
    pub fn as_tempo(&self) -> Option<u32> {
        if self.type_byte != MetaKind::Tempo as u8 || self.data.len() != 3 {
            return None;
        }
        Some(u32::from_be_bytes([
            0,
            self.data[0],
            self.data[1],
            self.data[2],
        ]))
    }

    /// The decoded time signature, when this is a well-formed time
    /// signature event (type `0x58` with exactly four payload bytes).
    pub fn as_time_signature(&self) -> Option<TimeSignature> {
        if self.type_byte != MetaKind::TimeSignature as u8 || self.data.len() != 4 {
            return None;
        }
        Some(TimeSignature::from_bytes([
            self.data[0],
            self.data[1],
            self.data[2],
            self.data[3],
        ]))
    }

    /// True for the track terminator.
    pub const fn is_end_of_track(&self) -> bool {
        self.type_byte == MetaKind::EndOfTrack as u8
    }
}

/// The four payload bytes of a time signature meta event, in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeSignature {
    /// Beats per bar.
    pub numerator: u8,
    /// Beat value as a power of two (2 = quarter notes, 3 = eighths).
    pub denominator_log2: u8,
    /// MIDI clocks per metronome click.
    pub clocks_per_click: u8,
    /// Notated 32nd notes per MIDI quarter note (24 clocks).
    pub thirty_seconds_per_quarter: u8,
}

impl TimeSignature {
    /// The payload in wire order.
    pub const fn to_bytes(&self) -> [u8; 4] {
        [
            self.numerator,
            self.denominator_log2,
            self.clocks_per_click,
            self.thirty_seconds_per_quarter,
        ]
    }

    /// A time signature from its payload bytes.
    pub const fn from_bytes(bytes: [u8; 4]) -> Self {
        Self {
            numerator: bytes[0],
            denominator_log2: bytes[1],
            clocks_per_click: bytes[2],
            thirty_seconds_per_quarter: bytes[3],
        }
    }
}

/// A system-exclusive event. The status byte (`0xF0` start, `0xF7`
/// continuation/escape) doubles as the type; the payload is carried
/// length-prefixed like a meta payload.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SysExEvent {
    status: u8,
    data: Vec<u8>,
}

impl SysExEvent {
    /// A sysex event. `status` must be `0xF0` or `0xF7`.
    pub fn new(status: u8, data: Vec<u8>) -> Self {
        Self { status, data }
    }

    /// The status byte, `0xF0` or `0xF7`.
    pub const fn status(&self) -> u8 {
        self.status
    }

    /// Payload bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}
