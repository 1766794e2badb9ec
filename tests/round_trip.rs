use midiflow::prelude::*;
use pretty_assertions::assert_eq;

/// A canonical two-track file: a conductor track (tempo, time signature)
/// and a note track that exercises running status. "Canonical" means the
/// bytes are exactly what the writer emits, so it doubles as a
/// byte-identity fixture.
fn two_track_fixture() -> Vec<u8> {
    let mut bytes = Vec::new();

    bytes.extend_from_slice(b"MThd"); // header chunk type
    bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x06]); // header length (6 bytes)
    bytes.extend_from_slice(&[0x00, 0x01]); // format 1
    bytes.extend_from_slice(&[0x00, 0x02]); // two tracks
    bytes.extend_from_slice(&[0x01, 0xE0]); // division 480

    // conductor track
    bytes.extend_from_slice(b"MTrk");
    bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x14]); // 20 bytes of events

    bytes.push(0x00); // delta 0
    bytes.extend_from_slice(&[0xFF, 0x51, 0x03]); // tempo meta, 3 bytes
    bytes.extend_from_slice(&[0x07, 0xA1, 0x20]); // 500_000 us per quarter

    bytes.push(0x00); // delta 0
    bytes.extend_from_slice(&[0xFF, 0x58, 0x04]); // time signature, 4 bytes
    bytes.extend_from_slice(&[0x04, 0x02, 0x18, 0x08]); // 4/4, 24 clocks, 8 32nds

    bytes.extend_from_slice(&[0x83, 0x60]); // delta 480
    bytes.extend_from_slice(&[0xFF, 0x2F, 0x00]); // end of track

    // note track
    bytes.extend_from_slice(b"MTrk");
    bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x0E]); // 14 bytes of events

    bytes.push(0x00); // delta 0
    bytes.extend_from_slice(&[0xC0, 0x05]); // program change, channel 0, program 5

    bytes.push(0x00); // delta 0
    bytes.extend_from_slice(&[0x90, 0x3C, 0x60]); // note on, middle C, velocity 96

    bytes.push(0x60); // delta 96
    bytes.extend_from_slice(&[0x3C, 0x00]); // running status: velocity 0 note off

    bytes.push(0x00); // delta 0
    bytes.extend_from_slice(&[0xFF, 0x2F, 0x00]); // end of track

    bytes
}

#[test]
fn fixture_parses_into_the_expected_model() {
    let file = MidiFile::parse(&two_track_fixture()).unwrap();
    assert_eq!(file.format(), Format::Simultaneous);
    assert_eq!(file.division(), 480);
    assert_eq!(file.tracks().len(), 2);

    let conductor: Vec<&TrackEvent> = file.tracks()[0].events().collect();
    assert_eq!(conductor.len(), 3);
    let ticks: Vec<u32> = conductor.iter().map(|e| e.tick()).collect();
    assert_eq!(ticks, [0, 0, 480]);

    let EventKind::Meta(tempo) = conductor[0].kind() else {
        panic!("expected a tempo meta event");
    };
    assert_eq!(tempo.as_tempo(), Some(500_000));

    let EventKind::Meta(signature) = conductor[1].kind() else {
        panic!("expected a time signature meta event");
    };
    assert_eq!(
        signature.as_time_signature(),
        Some(TimeSignature {
            numerator: 4,
            denominator_log2: 2,
            clocks_per_click: 24,
            thirty_seconds_per_quarter: 8,
        })
    );
    assert!(conductor[2].is_end_of_track());

    let notes: Vec<&TrackEvent> = file.tracks()[1].events().collect();
    let ticks: Vec<u32> = notes.iter().map(|e| e.tick()).collect();
    assert_eq!(ticks, [0, 0, 96, 96]);

    let EventKind::Channel(program) = notes[0].kind() else {
        panic!("expected a program change");
    };
    assert_eq!(program.kind(), MessageKind::ProgramChange);
    assert_eq!(program.data1(), 5);

    // the running-status event decoded with the carried 0x90 status
    let EventKind::Channel(on) = notes[1].kind() else {
        panic!("expected a note on");
    };
    let EventKind::Channel(off) = notes[2].kind() else {
        panic!("expected a running-status note");
    };
    assert_eq!(on.status(), 0x90);
    assert_eq!(off.status(), 0x90);
    assert_eq!((off.data1(), off.data2()), (0x3C, 0x00));
}

#[test]
fn fixture_reserializes_byte_identically() {
    let fixture = two_track_fixture();
    let file = MidiFile::parse(&fixture).unwrap();
    assert_eq!(file.to_bytes().unwrap(), fixture);
}

#[test]
fn non_canonical_deltas_come_back_one_byte_shorter() {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"MThd");
    bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x06]);
    bytes.extend_from_slice(&[0x00, 0x00]); // format 0
    bytes.extend_from_slice(&[0x00, 0x01]); // one track
    bytes.extend_from_slice(&[0x00, 0x60]); // division 96
    bytes.extend_from_slice(b"MTrk");
    bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x09]);
    bytes.extend_from_slice(&[0x80, 0x00]); // delta 0, padded to two bytes
    bytes.extend_from_slice(&[0x90, 0x3C, 0x60]); // note on
    bytes.extend_from_slice(&[0x00, 0xFF, 0x2F, 0x00]); // end of track

    let file = MidiFile::parse(&bytes).unwrap();
    assert_eq!(file.tracks()[0].first().unwrap().delta(), 0);

    let out = file.to_bytes().unwrap();
    assert_eq!(out.len(), bytes.len() - 1);
    assert_eq!(MidiFile::parse(&out).unwrap(), file);
}

#[test]
fn written_models_reparse_equal() {
    let mut file = MidiFile::new(480);
    let track = file.new_track();
    track.push(TrackEvent::after(0, MetaEvent::text("take one")));
    track.push(TrackEvent::after(0, ChannelMessage::program_change(0, 19)));
    track.push(TrackEvent::after(4, ChannelMessage::note_on(0, 60, 90)));
    track.push(TrackEvent::after(96, ChannelMessage::note_off(0, 60, 0)));
    track.finalize();

    let track = file.new_track();
    track.push(TrackEvent::after(2, ChannelMessage::pitch_bend(1, 0x2345)));
    track.push(TrackEvent::after(2, ChannelMessage::controller(1, 64, 127)));
    track.push(TrackEvent::after(
        0,
        SysExEvent::new(0xF0, vec![0x7E, 0x09, 0x01, 0xF7]),
    ));
    // an unrecognized meta type must survive as raw bytes
    track.push(TrackEvent::after(1, MetaEvent::new(0x7F, vec![0x00, 0x41])));
    track.finalize();

    let bytes = file.to_bytes().unwrap();
    let parsed = MidiFile::parse(&bytes).unwrap();
    assert_eq!(parsed, file);
}

#[test]
fn metas_can_be_fixed_in_place_and_reserialized() {
    let mut file = MidiFile::new(480);
    let track = file.new_track();
    track.push(TrackEvent::after(
        0,
        MetaEvent::time_signature(TimeSignature {
            numerator: 6,
            denominator_log2: 3,
            clocks_per_click: 12, // plain eighth-note click
            thirty_seconds_per_quarter: 8,
        }),
    ));
    track.push(TrackEvent::after(0, ChannelMessage::note_on(0, 60, 96)));
    track.finalize();

    // re-click compound meter on the dotted quarter
    for track in file.tracks_mut() {
        for event in track.events_mut() {
            if let EventKind::Meta(meta) = event.kind_mut() {
                if let Some(mut sig) = meta.as_time_signature() {
                    sig.clocks_per_click *= 3;
                    *meta = MetaEvent::time_signature(sig);
                }
            }
        }
    }

    let reparsed = MidiFile::parse(&file.to_bytes().unwrap()).unwrap();
    let EventKind::Meta(meta) = reparsed.tracks()[0].first().unwrap().kind() else {
        panic!("expected the time signature");
    };
    assert_eq!(meta.as_time_signature().unwrap().clocks_per_click, 36);
    assert_eq!(reparsed.tracks()[0].first().unwrap().tick(), 0);
}

#[test]
fn error_position_points_where_parsing_stopped() {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"MThd");
    bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x06]);
    bytes.extend_from_slice(&[0x00, 0x00]);
    bytes.extend_from_slice(&[0x00, 0x01]);
    bytes.extend_from_slice(&[0x01, 0xE0]);
    bytes.extend_from_slice(b"MTrk");
    bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x02]);
    bytes.extend_from_slice(&[0x00, 0xF8]); // delta 0, then a realtime status

    let err = MidiFile::parse(&bytes).unwrap_err();
    assert_eq!(*err.kind(), ParseErrorKind::UnrecognizedEventType(0xF8));
    // the cursor sits just past the offending byte at offset 23
    assert_eq!(err.position(), 24);
}

#[test]
fn track_magic_mismatch_is_rejected() {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"MThd");
    bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x06]);
    bytes.extend_from_slice(&[0x00, 0x00]);
    bytes.extend_from_slice(&[0x00, 0x01]);
    bytes.extend_from_slice(&[0x01, 0xE0]);
    bytes.extend_from_slice(b"XTrk");
    bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x04]);
    bytes.extend_from_slice(&[0x00, 0xFF, 0x2F, 0x00]);

    let err = MidiFile::parse(&bytes).unwrap_err();
    assert!(matches!(err.kind(), ParseErrorKind::BadHeader(_)));
}

#[test]
fn running_status_does_not_cross_tracks() {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"MThd");
    bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x06]);
    bytes.extend_from_slice(&[0x00, 0x01]);
    bytes.extend_from_slice(&[0x00, 0x02]);
    bytes.extend_from_slice(&[0x01, 0xE0]);
    // track 0 ends with a live 0x90 status
    bytes.extend_from_slice(b"MTrk");
    bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x04]);
    bytes.extend_from_slice(&[0x00, 0x90, 0x3C, 0x60]);
    // track 1 opens with bare data bytes, which must not inherit it
    bytes.extend_from_slice(b"MTrk");
    bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x03]);
    bytes.extend_from_slice(&[0x00, 0x3E, 0x60]);

    let err = MidiFile::parse(&bytes).unwrap_err();
    assert_eq!(*err.kind(), ParseErrorKind::UnrecognizedEventType(0x3E));
}
