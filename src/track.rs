#![doc = r#"
An ordered sequence of timed events.

Tracks are built by appending at the tail and consumed from the head by
streams, so the storage is a deque. Absolute ticks are assigned in exactly
one place, [`Track::push`], which keeps them nondecreasing by construction.
"#]

use alloc::collections::VecDeque;

use crate::event::TrackEvent;
use crate::meta::MetaEvent;
use crate::reader::{ParseErrorKind, ReadResult, Reader};

/// One track of a file: events ordered by absolute tick.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Track {
    events: VecDeque<TrackEvent>,
}

impl Track {
    /// An empty track.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an event, placing it `delta` ticks after the current tail.
    ///
    /// This is the only place absolute ticks are assigned; everything else
    /// (parsing, stream writes) funnels through it.
    pub fn push(&mut self, mut event: TrackEvent) {
        let base = self.end_tick();
        event.set_tick(base.saturating_add(event.delta()));
        self.events.push_back(event);
    }

    /// Puts an event back at the head.
    ///
    /// Intended for restoring events previously popped from the head, as
    /// the stream's look-ahead does; the stored delta and tick are kept
    /// verbatim, so pushing anything else breaks the tick order.
    pub fn push_front(&mut self, event: TrackEvent) {
        self.events.push_front(event);
    }

    pub(crate) fn pop_front(&mut self) -> Option<TrackEvent> {
        self.events.pop_front()
    }

    /// The next event to be consumed, if any.
    pub fn first(&self) -> Option<&TrackEvent> {
        self.events.front()
    }

    /// The tail event, if any.
    pub fn last(&self) -> Option<&TrackEvent> {
        self.events.back()
    }

    /// Number of events on the track.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True when no events remain.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Iterates events in order.
    pub fn events(&self) -> impl Iterator<Item = &TrackEvent> {
        self.events.iter()
    }

    /// Mutable iteration, for in-place edits that keep ticks untouched.
    pub fn events_mut(&mut self) -> impl Iterator<Item = &mut TrackEvent> {
        self.events.iter_mut()
    }

    /// Tick of the tail event; 0 for an empty track.
    pub fn end_tick(&self) -> u32 {
        self.events.back().map(|e| e.tick()).unwrap_or(0)
    }

    /// Appends an end-of-track meta event unless the tail already is one.
    /// Idempotent; an empty track gets exactly one.
    pub fn finalize(&mut self) {
        if self.events.back().is_none_or(|e| !e.is_end_of_track()) {
            self.push(TrackEvent::after(0, MetaEvent::end_of_track()));
        }
    }

    /// Reads one `MTrk` chunk: magic, declared byte length, then events
    /// until the chunk is exactly consumed.
    pub(crate) fn read(reader: &mut Reader<'_>) -> ReadResult<Self> {
        let magic = reader.read_array::<4>()?;
        if &magic != b"MTrk" {
            return Err(reader.err(ParseErrorKind::BadHeader("expected MTrk chunk")));
        }
        let declared = reader.read_u32()?;
        let end = reader.position().saturating_add(declared as usize);

        let mut track = Track::new();
        let mut running: Option<u8> = None;
        while reader.position() < end {
            track.push(TrackEvent::read(reader, &mut running)?);
        }
        if reader.position() != end {
            return Err(reader.err(ParseErrorKind::BadChunkLength));
        }
        Ok(track)
    }
}
