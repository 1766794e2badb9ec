#![doc = r#"
Standard MIDI File parsing, writing, and tempo-mapped streaming.

The crate has three layers:

- a byte-level codec for `.mid` files: the [`vlq`] variable-length
  quantity routines and the [`MidiFile`](file::MidiFile) parse/serialize
  pair, covering running status, meta, and sysex events;
- an owned data model ([`MidiFile`](file::MidiFile), [`Track`](track::Track),
  [`TrackEvent`](event::TrackEvent)) where every event carries both its
  delta and its absolute tick;
- a [`Stream`](stream::Stream) that binds a file to a wall-clock timeline
  through a single tempo anchor, for timed reads during playback and timed
  writes during recording, plus the [`host`] loop that drives live MIDI
  ports from one.

# Example

```
use midiflow::prelude::*;

# fn main() -> Result<(), Box<dyn std::error::Error>> {
let mut stream = Stream::open(MidiFile::new(480));
stream.start(Micros::ZERO);

stream.write_one(0, TrackEvent::after(0, ChannelMessage::note_on(0, 60, 96)));
stream.write_one(0, TrackEvent::after(480, ChannelMessage::note_off(0, 60, 0)));

let bytes = stream.close().to_bytes()?;
let parsed = MidiFile::parse(&bytes)?;
assert_eq!(parsed.tracks().len(), 1);
# Ok(())
# }
```
"#]
#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod event;
pub mod file;
pub mod host;
pub mod merge;
pub mod message;
pub mod meta;
pub mod reader;
pub mod stream;
pub mod tag;
pub mod time;
pub mod track;
pub mod vlq;
pub mod writer;

pub mod prelude {
    //! Everything needed to read, write, and stream MIDI files.
    pub use crate::event::{EventKind, TrackEvent};
    pub use crate::file::{Format, MidiFile};
    pub use crate::host::{Disposition, Hooks, Host, HostContext, MidiInput, MidiOutput};
    pub use crate::merge::{MergeError, merge};
    pub use crate::message::{ChannelMessage, MessageKind};
    pub use crate::meta::{MetaEvent, MetaKind, SysExEvent, TimeSignature};
    pub use crate::reader::{ParseError, ParseErrorKind};
    pub use crate::stream::{DEFAULT_TEMPO, Stream};
    pub use crate::tag::{tag, tag_header};
    pub use crate::time::Micros;
    pub use crate::track::Track;
    pub use crate::writer::WriteError;
}
