#![doc = r#"
Overlaying two files onto one timeline.

Both inputs are drained through streams in next-tick order and rewritten
into one output stream at their original absolute ticks, track index to
track index. End-of-track markers are dropped along the way; closing the
output stream synthesizes fresh ones.
"#]

use thiserror::Error;

use crate::event::TrackEvent;
use crate::file::MidiFile;
use crate::stream::Stream;

/// Error merging two files.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MergeError {
    /// The inputs disagree on ticks per quarter note, so their tick
    /// timelines are not comparable.
    #[error("time division mismatch: {left} vs {right}")]
    TimeDivisionMismatch { left: u16, right: u16 },
}

/// Merges two files by overlaying their tracks: left track 0 and right
/// track 0 land on output track 0, and so on. Events keep their absolute
/// ticks. Fails if the files disagree on time division.
pub fn merge(left: MidiFile, right: MidiFile) -> Result<MidiFile, MergeError> {
    if left.division() != right.division() {
        return Err(MergeError::TimeDivisionMismatch {
            left: left.division(),
            right: right.division(),
        });
    }
    let division = left.division();
    let mut a = Stream::open(left);
    let mut b = Stream::open(right);
    let mut out = Stream::open(MidiFile::new(division));

    loop {
        let tick = match (a.next_tick(), b.next_tick()) {
            (Some(x), Some(y)) => x.min(y),
            (Some(x), None) => x,
            (None, Some(y)) => y,
            (None, None) => break,
        };
        for (track, event) in a.read_until(tick).into_iter().chain(b.read_until(tick)) {
            if event.is_end_of_track() {
                continue;
            }
            let at = event.tick();
            out.write_one(track, TrackEvent::at(at, event.into_kind()));
        }
    }
    Ok(out.close())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventKind;
    use crate::message::ChannelMessage;
    use crate::meta::MetaEvent;
    use alloc::vec::Vec;
    use pretty_assertions::assert_eq;

    #[test]
    fn division_mismatch_is_refused() {
        let left = MidiFile::new(480);
        let right = MidiFile::new(96);
        assert_eq!(
            merge(left, right),
            Err(MergeError::TimeDivisionMismatch {
                left: 480,
                right: 96
            })
        );
    }

    #[test]
    fn tracks_overlay_by_index_with_ticks_preserved() {
        let mut left = MidiFile::new(480);
        let track = left.new_track();
        track.push(TrackEvent::after(0, ChannelMessage::note_on(0, 60, 96)));
        track.push(TrackEvent::after(20, ChannelMessage::note_off(0, 60, 0)));
        track.finalize();

        let mut right = MidiFile::new(480);
        let track = right.new_track();
        track.push(TrackEvent::after(10, ChannelMessage::note_on(1, 72, 80)));
        track.finalize();
        right
            .new_track()
            .push(TrackEvent::after(5, MetaEvent::text("second track")));

        let merged = merge(left, right).unwrap();
        assert_eq!(merged.tracks().len(), 2);

        let ticks: Vec<u32> = merged.tracks()[0].events().map(|e| e.tick()).collect();
        // interleaved by tick, end-of-track dropped and re-added at the tail
        assert_eq!(ticks, [0, 10, 20, 20]);
        assert!(merged.tracks()[0].last().unwrap().is_end_of_track());

        let second = &merged.tracks()[1];
        assert_eq!(second.first().unwrap().tick(), 5);
        assert!(matches!(second.first().unwrap().kind(), EventKind::Meta(_)));
    }

    #[test]
    fn empty_inputs_merge_to_an_empty_file() {
        let merged = merge(MidiFile::new(120), MidiFile::new(120)).unwrap();
        assert_eq!(merged.tracks().len(), 0);
    }
}
