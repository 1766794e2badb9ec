#![doc = r#"
Serialization to Standard MIDI File bytes.

Each track is measured with a dry-run pass using the same per-event length
function that emission uses, so the declared chunk length is exact by
construction. Channel statuses are running-status compressed: the status
byte is omitted when it equals the previous one, and any meta or sysex
event breaks the run on both the write and read sides.
"#]

use alloc::vec::Vec;
use thiserror::Error;

use crate::event::{EventKind, TrackEvent};
use crate::file::MidiFile;
use crate::track::Track;
use crate::vlq;

/// The ways serialization can fail. Both are caller-contract violations;
/// well-formed models always serialize.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum WriteError {
    /// A delta time or payload length too large for a four-byte
    /// variable-length quantity.
    #[error("value {0} does not fit in a variable-length quantity")]
    ValueOutOfRange(u32),
    /// More tracks than the 16-bit header field can count.
    #[error("{0} tracks exceed the 16-bit track count")]
    TooManyTracks(usize),
}

pub(crate) fn file_to_bytes(file: &MidiFile) -> Result<Vec<u8>, WriteError> {
    let track_count = u16::try_from(file.tracks().len())
        .map_err(|_| WriteError::TooManyTracks(file.tracks().len()))?;

    let mut out = Vec::new();
    out.extend_from_slice(b"MThd");
    out.extend_from_slice(&6u32.to_be_bytes());
    out.extend_from_slice(&u16::from(u8::from(file.format())).to_be_bytes());
    out.extend_from_slice(&track_count.to_be_bytes());
    out.extend_from_slice(&file.division().to_be_bytes());
    for track in file.tracks() {
        write_track(track, &mut out)?;
    }
    Ok(out)
}

fn write_track(track: &Track, out: &mut Vec<u8>) -> Result<(), WriteError> {
    // dry run for the exact chunk length
    let mut length: u64 = 0;
    let mut running: Option<u8> = None;
    for event in track.events() {
        length += u64::from(event_len(event, &mut running)?);
    }
    let length = u32::try_from(length).map_err(|_| WriteError::ValueOutOfRange(u32::MAX))?;

    out.extend_from_slice(b"MTrk");
    out.extend_from_slice(&length.to_be_bytes());
    let mut running: Option<u8> = None;
    for event in track.events() {
        write_event(event, &mut running, out)?;
    }
    Ok(())
}

fn payload_len(data: &[u8]) -> Result<u32, WriteError> {
    u32::try_from(data.len()).map_err(|_| WriteError::ValueOutOfRange(u32::MAX))
}

fn event_len(event: &TrackEvent, running: &mut Option<u8>) -> Result<u32, WriteError> {
    let mut n = vlq::len(event.delta())?;
    match event.kind() {
        EventKind::Channel(msg) => {
            if *running != Some(msg.status()) {
                n += 1;
            }
            *running = Some(msg.status());
            n += msg.kind().data_len() as u32;
        }
        EventKind::Meta(meta) => {
            *running = None;
            let payload = payload_len(meta.data())?;
            n += 2 + vlq::len(payload)? + payload;
        }
        EventKind::SysEx(sysex) => {
            *running = None;
            let payload = payload_len(sysex.data())?;
            n += 1 + vlq::len(payload)? + payload;
        }
    }
    Ok(n)
}

fn write_event(
    event: &TrackEvent,
    running: &mut Option<u8>,
    out: &mut Vec<u8>,
) -> Result<(), WriteError> {
    vlq::write(event.delta(), out)?;
    match event.kind() {
        EventKind::Channel(msg) => {
            if *running != Some(msg.status()) {
                out.push(msg.status());
            }
            *running = Some(msg.status());
            out.push(msg.data1());
            if msg.kind().data_len() == 2 {
                out.push(msg.data2());
            }
        }
        EventKind::Meta(meta) => {
            *running = None;
            out.push(0xFF);
            out.push(meta.type_byte());
            vlq::write(payload_len(meta.data())?, out)?;
            out.extend_from_slice(meta.data());
        }
        EventKind::SysEx(sysex) => {
            *running = None;
            out.push(sysex.status());
            vlq::write(payload_len(sysex.data())?, out)?;
            out.extend_from_slice(sysex.data());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::ChannelMessage;
    use crate::meta::MetaEvent;
    use pretty_assertions::assert_eq;

    fn one_track_file(events: impl IntoIterator<Item = TrackEvent>) -> MidiFile {
        let mut file = MidiFile::new(480);
        let track = file.new_track();
        for event in events {
            track.push(event);
        }
        file
    }

    #[test]
    fn running_status_is_compressed() {
        let file = one_track_file([
            TrackEvent::after(0, ChannelMessage::note_on(0, 60, 96)),
            TrackEvent::after(1, ChannelMessage::note_on(0, 64, 96)),
            TrackEvent::after(1, ChannelMessage::note_off(0, 60, 0)),
            TrackEvent::after(0, MetaEvent::end_of_track()),
        ]);
        let bytes = file.to_bytes().unwrap();
        let expected: &[u8] = &[
            b'M', b'T', b'h', b'd', 0, 0, 0, 6, //
            0, 0, // format 0
            0, 1, // one track
            0x01, 0xE0, // division 480
            b'M', b'T', b'r', b'k', 0, 0, 0, 15, //
            0x00, 0x90, 60, 96, // status written once
            0x01, 64, 96, // running status
            0x01, 0x80, 60, 0, // status change forces a new byte
            0x00, 0xFF, 0x2F, 0x00, // end of track
        ];
        assert_eq!(bytes, expected);
    }

    #[test]
    fn meta_breaks_the_run() {
        let file = one_track_file([
            TrackEvent::after(0, ChannelMessage::note_on(0, 60, 96)),
            TrackEvent::after(0, MetaEvent::text("x")),
            TrackEvent::after(0, ChannelMessage::note_on(0, 64, 96)),
        ]);
        let bytes = file.to_bytes().unwrap();
        // the second note on must carry its status again
        let track = &bytes[22..];
        assert_eq!(
            track,
            &[
                0x00, 0x90, 60, 96, //
                0x00, 0xFF, 0x01, 0x01, b'x', //
                0x00, 0x90, 64, 96,
            ]
        );
    }

    #[test]
    fn declared_length_matches_emission() {
        let file = one_track_file([
            TrackEvent::after(200, ChannelMessage::program_change(3, 12)),
            TrackEvent::after(0x4000, ChannelMessage::note_on(3, 60, 40)),
            TrackEvent::after(0, MetaEvent::end_of_track()),
        ]);
        let bytes = file.to_bytes().unwrap();
        let declared = u32::from_be_bytes([bytes[18], bytes[19], bytes[20], bytes[21]]);
        assert_eq!(declared as usize, bytes.len() - 22);
    }

    #[test]
    fn oversized_delta_is_rejected() {
        let file = one_track_file([TrackEvent::after(
            vlq::MAX + 1,
            ChannelMessage::note_on(0, 60, 96),
        )]);
        assert_eq!(
            file.to_bytes(),
            Err(WriteError::ValueOutOfRange(vlq::MAX + 1))
        );
    }
}
