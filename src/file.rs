#![doc = r#"
The in-memory Standard MIDI File.

A file is a format word, a time division (ticks per quarter note), and the
tracks themselves. [`MidiFile::parse`] and [`MidiFile::to_bytes`] are the
codec entry points; the format word is validated on parse and re-derived
from the track count when a [`Stream`](crate::stream::Stream) is closed.
"#]

use alloc::vec::Vec;
use log::{debug, warn};
use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::reader::{ParseError, ParseErrorKind, ReadResult, Reader};
use crate::track::Track;
use crate::writer::{self, WriteError};

/// The SMF format word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Format {
    /// A single track.
    SingleTrack = 0,
    /// Multiple tracks sharing one timeline.
    Simultaneous = 1,
}

/// An in-memory Standard MIDI File.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MidiFile {
    format: Format,
    division: u16,
    tracks: Vec<Track>,
}

impl MidiFile {
    /// A new, empty file. `division` is ticks per quarter note; it must be
    /// nonzero with the high (SMPTE) bit clear, as parse enforces for files
    /// read from bytes.
    pub fn new(division: u16) -> Self {
        Self {
            format: Format::SingleTrack,
            division,
            tracks: Vec::new(),
        }
    }

    /// Appends an empty track and returns it for filling.
    pub fn new_track(&mut self) -> &mut Track {
        self.tracks.push(Track::new());
        if self.tracks.len() > 1 {
            self.format = Format::Simultaneous;
        }
        let end = self.tracks.len() - 1;
        &mut self.tracks[end]
    }

    /// Ticks per quarter note.
    pub const fn division(&self) -> u16 {
        self.division
    }

    /// The format word.
    pub const fn format(&self) -> Format {
        self.format
    }

    pub(crate) fn set_format(&mut self, format: Format) {
        self.format = format;
    }

    /// All tracks, in file order.
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Mutable track access, for in-place edits.
    pub fn tracks_mut(&mut self) -> &mut [Track] {
        &mut self.tracks
    }

    /// Parses a Standard MIDI File. All-or-nothing: any malformed byte
    /// fails the whole parse with the offset it was found at.
    pub fn parse(bytes: &[u8]) -> ReadResult<Self> {
        let mut reader = Reader::new(bytes);

        let magic = reader.read_array::<4>()?;
        if &magic != b"MThd" {
            return Err(ParseError::new(
                0,
                ParseErrorKind::BadHeader("expected MThd magic"),
            ));
        }
        let header_len = reader.read_u32()?;
        if header_len != 6 {
            return Err(reader.err(ParseErrorKind::BadHeader("header length is not 6")));
        }
        let format_word = reader.read_u16()?;
        let format = u8::try_from(format_word)
            .ok()
            .and_then(|b| Format::try_from(b).ok())
            .ok_or_else(|| reader.err(ParseErrorKind::BadHeader("format is not 0 or 1")))?;
        let track_count = reader.read_u16()?;
        let division = reader.read_u16()?;
        if division == 0 {
            return Err(reader.err(ParseErrorKind::BadHeader("division is zero")));
        }
        if division & 0x8000 != 0 {
            return Err(reader.err(ParseErrorKind::BadHeader("SMPTE division is not supported")));
        }

        let mut tracks = Vec::with_capacity(track_count as usize);
        for _ in 0..track_count {
            tracks.push(Track::read(&mut reader)?);
        }
        if reader.remaining() > 0 {
            warn!(
                "ignoring {} trailing bytes after the last declared track",
                reader.remaining()
            );
        }
        debug!("parsed {} tracks, division {}", tracks.len(), division);

        Ok(Self {
            format,
            division,
            tracks,
        })
    }

    /// Serializes the file. Fails only on caller-contract violations: a
    /// delta or payload length too large for a variable-length quantity,
    /// or more tracks than the 16-bit header field can count.
    pub fn to_bytes(&self) -> Result<Vec<u8>, WriteError> {
        writer::file_to_bytes(self)
    }
}
