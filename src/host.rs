#![doc = r#"
A playback host: drives a stream against the wall clock, routing due
events to a live output port and through registered hook sets.

The host owns a [`HostContext`] (the play stream, a record stream, the
optional ports, and the playback gate) and a registry of [`Hooks`]
implementations. The embedding application owns the timer: it calls
[`Host::tick`] from its clock callback with the current time, and
[`Host::finish`] once the input has drained.

Hooks are how behavior is layered on: each callback has a no-op default,
hooks run in registration order, and a `false` return ends that callback
pass. Hooks that need live input poll `ctx.port_in` themselves, typically
from [`Hooks::tick_pre_midi`].
"#]

use alloc::boxed::Box;
use alloc::vec::Vec;
use log::debug;

use crate::event::{EventKind, TrackEvent};
use crate::file::MidiFile;
use crate::message::ChannelMessage;
use crate::stream::Stream;
use crate::time::Micros;

/// Source of live incoming channel messages.
pub trait MidiInput {
    /// The next pending message, if one has arrived. Must not block.
    fn poll(&mut self) -> Option<ChannelMessage>;
}

/// Sink for outgoing channel messages.
pub trait MidiOutput {
    /// Sends one message to the device.
    fn send(&mut self, message: ChannelMessage);
}

/// What a hook wants done with an event it was shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Disposition {
    /// Send the event to the output port.
    pub play: bool,
    /// Record the event into the output file.
    pub record: bool,
}

impl Default for Disposition {
    fn default() -> Self {
        Self {
            play: true,
            record: false,
        }
    }
}

/// Everything a hook may inspect or steer.
pub struct HostContext {
    /// The stream being played.
    pub input: Stream,
    /// The stream being recorded.
    pub output: Stream,
    /// Live input port, when one is attached.
    pub port_in: Option<Box<dyn MidiInput>>,
    /// Live output port, when one is attached.
    pub port_out: Option<Box<dyn MidiOutput>>,
    /// Playback gate. `None` free-runs; `Some(tick)` holds reads strictly
    /// before `tick`, and `Some(0)` pauses playback entirely.
    pub next_tick: Option<u32>,
}

/// Capability hooks layered onto the host loop. Every method has a no-op
/// default; implement only what the extension needs.
pub trait Hooks {
    /// Runs once from [`Host::begin`], after the streams are anchored.
    fn begin(&mut self, _ctx: &mut HostContext) -> bool {
        true
    }

    /// Runs at the top of every tick, before any events are read.
    fn tick_pre_midi(&mut self, _ctx: &mut HostContext, _now: Micros) -> bool {
        true
    }

    /// Runs after the read tick is known, before events are drained.
    fn tick_with_midi(&mut self, _ctx: &mut HostContext, _now: Micros, _until: u32) -> bool {
        true
    }

    /// Shown every due channel or sysex event. The returned disposition of
    /// the last hook to run decides whether the event is played to the
    /// output port and whether it is recorded into the output file; a hook
    /// clearing `play` ends the pass.
    fn handle_event(
        &mut self,
        _ctx: &mut HostContext,
        _track: usize,
        _event: &mut TrackEvent,
    ) -> Disposition {
        Disposition::default()
    }

    /// Shown every due meta event before the host applies it. Returning
    /// `false` suppresses the host's own handling (tempo re-anchoring).
    fn handle_meta(&mut self, _ctx: &mut HostContext, _track: usize, _event: &TrackEvent) -> bool {
        true
    }

    /// Runs once from [`Host::finish`], before the output stream closes.
    fn finished(&mut self, _ctx: &mut HostContext) {}
}

/// The host loop. See the module docs for the shape of the whole thing.
pub struct Host {
    /// State shared with hooks.
    pub ctx: HostContext,
    hooks: Vec<Box<dyn Hooks>>,
}

impl Host {
    /// A host playing `input`, recording into an empty file with the same
    /// division.
    pub fn new(input: Stream) -> Self {
        let division = input.division();
        Self {
            ctx: HostContext {
                input,
                output: Stream::open(MidiFile::new(division)),
                port_in: None,
                port_out: None,
                next_tick: None,
            },
            hooks: Vec::new(),
        }
    }

    /// Attaches a live output port.
    pub fn with_output(mut self, port: Box<dyn MidiOutput>) -> Self {
        self.ctx.port_out = Some(port);
        self
    }

    /// Attaches a live input port.
    pub fn with_input(mut self, port: Box<dyn MidiInput>) -> Self {
        self.ctx.port_in = Some(port);
        self
    }

    /// Registers a hook set. Hooks run in registration order.
    pub fn register(&mut self, hooks: Box<dyn Hooks>) {
        self.hooks.push(hooks);
    }

    /// Anchors both streams at `now` and runs the `begin` hooks. Returns
    /// `false` if a hook aborted the pass.
    pub fn begin(&mut self, now: Micros) -> bool {
        self.ctx.input.start(now);
        self.ctx.output.start(now);
        for hook in &mut self.hooks {
            if !hook.begin(&mut self.ctx) {
                return false;
            }
        }
        true
    }

    /// One timer callback: reads everything due at `now` (bounded by the
    /// gate), shows it to the hooks, plays and records per their
    /// dispositions, and re-anchors the input stream on tempo metas.
    /// Returns `true` once the input stream has drained.
    pub fn tick(&mut self, now: Micros) -> bool {
        for hook in &mut self.hooks {
            if !hook.tick_pre_midi(&mut self.ctx, now) {
                return false;
            }
        }

        let clock = self.ctx.input.tick_at(now);
        let until = match self.ctx.next_tick {
            Some(0) => return false,
            Some(gate) => clock.min(gate - 1),
            None => clock,
        };
        for hook in &mut self.hooks {
            if !hook.tick_with_midi(&mut self.ctx, now, until) {
                return false;
            }
        }

        for (track, mut event) in self.ctx.input.read_until(until) {
            match event.kind() {
                EventKind::Meta(meta) => {
                    let tempo = meta.as_tempo();
                    let apply = self
                        .hooks
                        .iter_mut()
                        .all(|hook| hook.handle_meta(&mut self.ctx, track, &event));
                    if apply {
                        if let Some(us_per_quarter) = tempo {
                            self.ctx
                                .input
                                .set_tempo_at_tick(event.tick(), us_per_quarter);
                        }
                    }
                }
                _ => {
                    let mut disposition = Disposition::default();
                    for hook in &mut self.hooks {
                        disposition = hook.handle_event(&mut self.ctx, track, &mut event);
                        if !disposition.play {
                            break;
                        }
                    }
                    if disposition.play {
                        if let EventKind::Channel(msg) = event.kind() {
                            if let Some(port) = self.ctx.port_out.as_mut() {
                                port.send(*msg);
                            }
                        }
                    }
                    if disposition.record {
                        let at = event.tick();
                        self.ctx
                            .output
                            .write_one(track, TrackEvent::at(at, event.into_kind()));
                    }
                }
            }
        }

        let drained = self.ctx.input.is_empty();
        if drained {
            debug!("input stream drained");
        }
        drained
    }

    /// Runs the `finished` hooks and closes the output stream into a file.
    /// Whatever is left of the input stream is dropped.
    pub fn finish(mut self) -> MidiFile {
        for hook in &mut self.hooks {
            hook.finished(&mut self.ctx);
        }
        self.ctx.output.close()
    }
}
