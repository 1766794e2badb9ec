#![doc = r#"
Channel voice messages and their status-byte table.

A channel message is a status byte (kind nibble + channel nibble) followed
by one or two data bytes; how many is a fixed property of the kind, which
both the parser and the serializer consult through
[`MessageKind::data_len`].
"#]

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// The seven channel message kinds, keyed by the status byte's high nibble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MessageKind {
    /// Key released
    NoteOff = 0x8,
    /// Key pressed
    NoteOn = 0x9,
    /// Per-key pressure
    PolyAftertouch = 0xA,
    /// Control change
    Controller = 0xB,
    /// Patch select
    ProgramChange = 0xC,
    /// Channel-wide pressure
    ChannelAftertouch = 0xD,
    /// Bend wheel
    PitchBend = 0xE,
}

impl MessageKind {
    /// Number of data bytes that follow the status byte on the wire.
    pub const fn data_len(&self) -> usize {
        match self {
            Self::ProgramChange | Self::ChannelAftertouch => 1,
            _ => 2,
        }
    }
}

/// A channel voice message: the status byte plus its one or two data bytes.
///
/// Single-data-byte kinds keep `data2` at zero; it is never written to the
/// wire for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelMessage {
    status: u8,
    data1: u8,
    data2: u8,
}

impl ChannelMessage {
    /// Builds a message from parts. `channel` is masked to 0..=15 and the
    /// data bytes to 0..=127.
    pub const fn new(kind: MessageKind, channel: u8, data1: u8, data2: u8) -> Self {
        Self {
            status: ((kind as u8) << 4) | (channel & 0x0F),
            data1: data1 & 0x7F,
            data2: data2 & 0x7F,
        }
    }

    /// Key pressed, with velocity.
    pub const fn note_on(channel: u8, key: u8, velocity: u8) -> Self {
        Self::new(MessageKind::NoteOn, channel, key, velocity)
    }

    /// Key released, with release velocity.
    pub const fn note_off(channel: u8, key: u8, velocity: u8) -> Self {
        Self::new(MessageKind::NoteOff, channel, key, velocity)
    }

    /// Control change.
    pub const fn controller(channel: u8, controller: u8, value: u8) -> Self {
        Self::new(MessageKind::Controller, channel, controller, value)
    }

    /// Patch select.
    pub const fn program_change(channel: u8, program: u8) -> Self {
        Self::new(MessageKind::ProgramChange, channel, program, 0)
    }

    /// Bend wheel position as a 14-bit value, 0x2000 centered.
    pub const fn pitch_bend(channel: u8, value: u16) -> Self {
        Self::new(
            MessageKind::PitchBend,
            channel,
            (value & 0x7F) as u8,
            ((value >> 7) & 0x7F) as u8,
        )
    }

    /// Bytes straight off the wire. The caller has already checked that
    /// `status` is in `0x80..=0xEF`; data bytes are kept untouched so a
    /// reparse serializes byte-identically.
    pub(crate) const fn from_wire(status: u8, data1: u8, data2: u8) -> Self {
        Self {
            status,
            data1,
            data2,
        }
    }

    /// The status byte: kind nibble then channel nibble.
    pub const fn status(&self) -> u8 {
        self.status
    }

    /// Which of the seven kinds this is.
    pub const fn kind(&self) -> MessageKind {
        match self.status >> 4 {
            0x8 => MessageKind::NoteOff,
            0x9 => MessageKind::NoteOn,
            0xA => MessageKind::PolyAftertouch,
            0xB => MessageKind::Controller,
            0xC => MessageKind::ProgramChange,
            0xD => MessageKind::ChannelAftertouch,
            _ => MessageKind::PitchBend,
        }
    }

    /// Channel number, 0..=15.
    pub const fn channel(&self) -> u8 {
        self.status & 0x0F
    }

    /// First data byte.
    pub const fn data1(&self) -> u8 {
        self.data1
    }

    /// Second data byte; zero for single-byte kinds.
    pub const fn data2(&self) -> u8 {
        self.data2
    }
}
