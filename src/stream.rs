#![doc = r#"
Tempo-mapped event streaming over a [`MidiFile`].

A stream binds a file's tick timeline to wall-clock microseconds through a
single tempo anchor: a (tick, time, tempo) triple that moves forward every
time the tempo changes. Conversions in both directions are pure integer
arithmetic relative to the anchor; the sub-microsecond remainder of the
anchor's time is carried exactly (as a numerator over the file's division)
so that repeated tempo changes accumulate no drift.

Reading pops events off track heads once their tick comes due, stamping
each with its wall-clock time. Writing appends events placed by delta,
absolute tick, or timestamp. [`Stream::close`] finalizes every track with
an end-of-track meta and derives the format word from the track count.
"#]

use alloc::vec::Vec;
use log::debug;

use crate::event::{EventKind, TrackEvent};
use crate::file::{Format, MidiFile};
use crate::message::MessageKind;
use crate::time::Micros;

/// Default tempo, 120 beats per minute, in microseconds per quarter note.
pub const DEFAULT_TEMPO: u32 = 500_000;

/// The current tempo anchor: a known (tick, time) pair and the tempo in
/// force from that point on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TempoAnchor {
    tick: u32,
    at: Micros,
    /// Sub-microsecond remainder of `at`, as a numerator over the file's
    /// division.
    carry: u32,
    us_per_quarter: u32,
}

/// A [`MidiFile`] bound to a wall-clock timeline for timed reading and
/// writing. One stream owns one file; a playback and a record stream are
/// two separate streams.
#[derive(Debug)]
pub struct Stream {
    file: MidiFile,
    anchor: TempoAnchor,
}

impl Stream {
    /// Wraps a file for timed reading or writing. The timeline starts
    /// anchored at tick 0, time zero, default tempo; call
    /// [`start`](Self::start) to anchor it at the real clock instead.
    pub fn open(file: MidiFile) -> Self {
        Self {
            file,
            anchor: TempoAnchor {
                tick: 0,
                at: Micros::ZERO,
                carry: 0,
                us_per_quarter: DEFAULT_TEMPO,
            },
        }
    }

    /// Anchors tick 0 at `now` with the default tempo.
    pub fn start(&mut self, now: Micros) {
        self.anchor = TempoAnchor {
            tick: 0,
            at: now,
            carry: 0,
            us_per_quarter: DEFAULT_TEMPO,
        };
    }

    /// The wrapped file.
    pub const fn file(&self) -> &MidiFile {
        &self.file
    }

    /// Ticks per quarter note of the wrapped file.
    pub const fn division(&self) -> u16 {
        self.file.division()
    }

    /// Microseconds per quarter note currently in force.
    pub const fn tempo(&self) -> u32 {
        self.anchor.us_per_quarter
    }

    /// The tick playing at wall-clock time `at`.
    ///
    /// Times before the anchor clamp to the anchor tick.
    pub fn tick_at(&self, at: Micros) -> u32 {
        let anchor = &self.anchor;
        let elapsed = at.us().saturating_sub(anchor.at.us());
        if elapsed <= 0 {
            return anchor.tick;
        }
        let division = i128::from(self.division().max(1));
        let numer = i128::from(elapsed) * division - i128::from(anchor.carry);
        if numer <= 0 {
            return anchor.tick;
        }
        let ticks = numer / i128::from(anchor.us_per_quarter.max(1));
        anchor
            .tick
            .saturating_add(u32::try_from(ticks).unwrap_or(u32::MAX))
    }

    /// The wall-clock time of an absolute tick, truncated to whole
    /// microseconds.
    ///
    /// Ticks at or before the anchor clamp to the anchor's time.
    pub fn timestamp_at(&self, tick: u32) -> Micros {
        let (at, _) = self.timestamp_parts(tick);
        at
    }

    /// Exact time of `tick`: whole microseconds plus the sub-microsecond
    /// remainder numerator (over the division).
    fn timestamp_parts(&self, tick: u32) -> (Micros, u32) {
        let anchor = &self.anchor;
        if tick < anchor.tick {
            return (anchor.at, 0);
        }
        if tick == anchor.tick {
            return (anchor.at, anchor.carry);
        }
        let division = u128::from(self.division().max(1));
        let numer = u128::from(tick - anchor.tick) * u128::from(anchor.us_per_quarter)
            + u128::from(anchor.carry);
        let us = i64::try_from(numer / division).unwrap_or(i64::MAX);
        let carry = (numer % division) as u32;
        (Micros::new(anchor.at.us().saturating_add(us)), carry)
    }

    /// Changes tempo at a tick. The anchor moves to that tick at the time
    /// it has under the outgoing tempo, remainder included, so earlier
    /// conversions stay valid and nothing drifts. Returns the anchor time.
    pub fn set_tempo_at_tick(&mut self, tick: u32, us_per_quarter: u32) -> Micros {
        let (at, carry) = self.timestamp_parts(tick);
        self.anchor = TempoAnchor {
            tick,
            at,
            carry,
            us_per_quarter: us_per_quarter.max(1),
        };
        at
    }

    /// Changes tempo at a wall-clock time. The anchor moves to the tick
    /// playing at `at` under the outgoing tempo. Returns that tick.
    pub fn set_tempo_at_timestamp(&mut self, at: Micros, us_per_quarter: u32) -> u32 {
        let tick = self.tick_at(at);
        self.anchor = TempoAnchor {
            tick,
            at,
            carry: 0,
            us_per_quarter: us_per_quarter.max(1),
        };
        tick
    }

    /// The earliest pending tick across all tracks.
    pub fn next_tick(&self) -> Option<u32> {
        self.file
            .tracks()
            .iter()
            .filter_map(|t| t.first())
            .map(|e| e.tick())
            .min()
    }

    /// True when every track has been fully consumed.
    pub fn is_empty(&self) -> bool {
        self.file.tracks().iter().all(|t| t.is_empty())
    }

    /// True when an event is due at or before wall-clock time `now`.
    pub fn is_ready(&self, now: Micros) -> bool {
        match self.next_tick() {
            Some(tick) => tick <= self.tick_at(now),
            None => false,
        }
    }

    /// Pops every event due at or before `tick`, stamped with its
    /// wall-clock time. Events come out in track order: all of track 0's
    /// due events, then track 1's, and so on; pass `u32::MAX` to drain.
    pub fn read_until(&mut self, tick: u32) -> Vec<(usize, TrackEvent)> {
        let mut out = Vec::new();
        for index in 0..self.file.tracks().len() {
            loop {
                let due = match self.file.tracks()[index].first() {
                    Some(event) if event.tick() <= tick => event.tick(),
                    _ => break,
                };
                let stamp = self.timestamp_at(due);
                if let Some(mut event) = self.file.tracks_mut()[index].pop_front() {
                    event.set_timestamp(stamp);
                    out.push((index, event));
                }
            }
        }
        out
    }

    /// Looks ahead for the next sounding note without consuming it.
    ///
    /// Scans forward pulse by pulse, consuming and returning every
    /// non-note event, until a note-on with nonzero velocity turns up, the
    /// stream empties, or `max` events have been gathered. The scan stops
    /// at the found note-on; anything past it, same-tick events on later
    /// tracks included, stays unread. Note-ons and note-offs encountered
    /// along the way (a zero-velocity note-on counts as an off) are put
    /// back at their track heads. The second value is the tick of the
    /// found note-on, or `None` when none turned up in the scanned window.
    pub fn peek(&mut self, max: usize) -> (Vec<(usize, TrackEvent)>, Option<u32>) {
        let mut out = Vec::new();
        let mut notes: Vec<(usize, TrackEvent)> = Vec::new();
        let mut found = None;

        'scan: loop {
            let Some(tick) = self.next_tick() else { break };
            for index in 0..self.file.tracks().len() {
                while self.file.tracks()[index].first().map(|e| e.tick()) == Some(tick) {
                    if out.len() + notes.len() >= max {
                        break 'scan;
                    }
                    let stamp = self.timestamp_at(tick);
                    let Some(mut event) = self.file.tracks_mut()[index].pop_front() else {
                        break;
                    };
                    event.set_timestamp(stamp);
                    match event.kind() {
                        EventKind::Channel(msg)
                            if matches!(msg.kind(), MessageKind::NoteOn | MessageKind::NoteOff) =>
                        {
                            let sounds = msg.kind() == MessageKind::NoteOn && msg.data2() > 0;
                            notes.push((index, event));
                            if sounds {
                                found = Some(tick);
                                break 'scan;
                            }
                        }
                        _ => out.push((index, event)),
                    }
                }
            }
        }

        // restore in reverse so each head comes back in original order
        for (index, event) in notes.into_iter().rev() {
            self.file.tracks_mut()[index].push_front(event);
        }
        (out, found)
    }

    /// Appends an event to a track, deriving its position: an explicit
    /// delta is used as-is; otherwise an absolute tick derives the delta
    /// from the track tail (clamped to zero for ticks behind it);
    /// otherwise a timestamp derives the tick through the anchor first.
    /// Tracks grow on demand until `track` exists.
    pub fn write_one(&mut self, track: usize, mut event: TrackEvent) {
        if event.delta() == 0 {
            if event.tick() == 0 {
                if let Some(stamp) = event.timestamp() {
                    event.set_tick(self.tick_at(stamp));
                }
            }
            if event.tick() != 0 {
                let tail = self
                    .file
                    .tracks()
                    .get(track)
                    .map(|t| t.end_tick())
                    .unwrap_or(0);
                event.set_delta(event.tick().saturating_sub(tail));
            }
        }
        while self.file.tracks().len() <= track {
            self.file.new_track();
        }
        self.file.tracks_mut()[track].push(event);
    }

    /// Finalizes every track with an end-of-track meta, derives the format
    /// word from the track count, and hands the file back.
    pub fn close(mut self) -> MidiFile {
        for track in self.file.tracks_mut() {
            track.finalize();
        }
        let format = if self.file.tracks().len() > 1 {
            Format::Simultaneous
        } else {
            Format::SingleTrack
        };
        self.file.set_format(format);
        debug!("closed stream with {} tracks", self.file.tracks().len());
        self.file
    }
}
