#![doc = r#"
A track event: one message plus its position in time.

Events carry both a delta (ticks since the previous event on the track)
and an absolute tick. Only one of them is authoritative before insertion,
fixed by the constructor used; [`Track::push`](crate::track::Track::push)
and [`Stream::write_one`](crate::stream::Stream::write_one) derive the
other, so the pair is always consistent once an event sits on a track.
"#]

use crate::message::{ChannelMessage, MessageKind};
use crate::meta::{MetaEvent, SysExEvent};
use crate::reader::{ParseErrorKind, ReadResult, Reader};
use crate::time::Micros;
use crate::vlq;

/// The three wire-level event families.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EventKind {
    /// A channel voice message
    Channel(ChannelMessage),
    /// A meta event
    Meta(MetaEvent),
    /// A system-exclusive event
    SysEx(SysExEvent),
}

impl From<ChannelMessage> for EventKind {
    fn from(value: ChannelMessage) -> Self {
        Self::Channel(value)
    }
}

impl From<MetaEvent> for EventKind {
    fn from(value: MetaEvent) -> Self {
        Self::Meta(value)
    }
}

impl From<SysExEvent> for EventKind {
    fn from(value: SysExEvent) -> Self {
        Self::SysEx(value)
    }
}

/// One event on a track.
///
/// The `timestamp` is a transient wall-clock stamp set by stream reads; it
/// is never serialized and is `None` for events that have not passed
/// through a stream.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackEvent {
    delta: u32,
    at: u32,
    timestamp: Option<Micros>,
    kind: EventKind,
}

impl TrackEvent {
    /// An event placed `delta` ticks after the previous event on its track.
    pub fn after(delta: u32, kind: impl Into<EventKind>) -> Self {
        Self {
            delta,
            at: 0,
            timestamp: None,
            kind: kind.into(),
        }
    }

    /// An event placed at an absolute tick; the delta is derived when the
    /// event is written to a stream.
    pub fn at(tick: u32, kind: impl Into<EventKind>) -> Self {
        Self {
            delta: 0,
            at: tick,
            timestamp: None,
            kind: kind.into(),
        }
    }

    /// An event placed by wall-clock time; the tick is derived from the
    /// stream's tempo anchor when the event is written.
    pub fn at_time(stamp: Micros, kind: impl Into<EventKind>) -> Self {
        Self {
            delta: 0,
            at: 0,
            timestamp: Some(stamp),
            kind: kind.into(),
        }
    }

    /// Ticks since the previous event on the track.
    pub const fn delta(&self) -> u32 {
        self.delta
    }

    /// Absolute tick from the start of the track.
    pub const fn tick(&self) -> u32 {
        self.at
    }

    /// Wall-clock stamp of the last stream read that handed this event out.
    pub const fn timestamp(&self) -> Option<Micros> {
        self.timestamp
    }

    /// What the event is.
    pub const fn kind(&self) -> &EventKind {
        &self.kind
    }

    /// Mutable access to the message, for in-place edits.
    pub fn kind_mut(&mut self) -> &mut EventKind {
        &mut self.kind
    }

    /// Consumes the event, keeping only the message.
    pub fn into_kind(self) -> EventKind {
        self.kind
    }

    /// True when this is an end-of-track meta event.
    pub fn is_end_of_track(&self) -> bool {
        matches!(&self.kind, EventKind::Meta(m) if m.is_end_of_track())
    }

    pub(crate) fn set_delta(&mut self, delta: u32) {
        self.delta = delta;
    }

    pub(crate) fn set_tick(&mut self, tick: u32) {
        self.at = tick;
    }

    pub(crate) fn set_timestamp(&mut self, stamp: Micros) {
        self.timestamp = Some(stamp);
    }

    /// Reads one delta-prefixed event. `running` carries the running status
    /// across events of a track: channel statuses update it, meta and sysex
    /// cancel it, and a data-first byte with nothing to run on is an error.
    pub(crate) fn read(reader: &mut Reader<'_>, running: &mut Option<u8>) -> ReadResult<Self> {
        let (delta, _) = vlq::read_from(reader)?;
        let first = reader.read_u8()?;
        let kind = match first {
            0xFF => {
                *running = None;
                let type_byte = reader.read_u8()?;
                let (len, _) = vlq::read_from(reader)?;
                let data = reader.read_exact(len as usize)?.to_vec();
                EventKind::Meta(MetaEvent::new(type_byte, data))
            }
            0xF0 | 0xF7 => {
                *running = None;
                let (len, _) = vlq::read_from(reader)?;
                let data = reader.read_exact(len as usize)?.to_vec();
                EventKind::SysEx(SysExEvent::new(first, data))
            }
            status @ 0x80..=0xEF => {
                *running = Some(status);
                let kind = MessageKind::try_from(status >> 4)
                    .map_err(|_| reader.err(ParseErrorKind::UnrecognizedEventType(status)))?;
                let data1 = reader.read_u8()?;
                let data2 = if kind.data_len() == 2 {
                    reader.read_u8()?
                } else {
                    0
                };
                EventKind::Channel(ChannelMessage::from_wire(status, data1, data2))
            }
            data1 @ 0x00..=0x7F => {
                // running status: the data bytes arrive with no status byte
                let Some(status) = *running else {
                    return Err(reader.err(ParseErrorKind::UnrecognizedEventType(data1)));
                };
                let kind = MessageKind::try_from(status >> 4)
                    .map_err(|_| reader.err(ParseErrorKind::UnrecognizedEventType(status)))?;
                let data2 = if kind.data_len() == 2 {
                    reader.read_u8()?
                } else {
                    0
                };
                EventKind::Channel(ChannelMessage::from_wire(status, data1, data2))
            }
            other => {
                return Err(reader.err(ParseErrorKind::UnrecognizedEventType(other)));
            }
        };
        Ok(Self {
            delta,
            at: 0,
            timestamp: None,
            kind,
        })
    }
}
