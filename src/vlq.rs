#![doc = r#"
Variable-length quantities: the big-endian base-128 integers that carry
every delta time and every meta/sysex payload length in a MIDI file.

Each byte contributes seven value bits, most significant group first; the
high bit marks continuation. Encoding is canonical (shortest form, so zero
is the single byte `0x00`) and capped at four bytes, which bounds values
at [`MAX`] (2^28 - 1).
"#]

use crate::reader::{ParseErrorKind, ReadResult, Reader};
use crate::writer::WriteError;
use alloc::vec::Vec;

/// Largest value a four-byte variable-length quantity can carry.
pub const MAX: u32 = 0x0FFF_FFFF;

/// Decodes one quantity from the front of `bytes`, returning the value and
/// the number of bytes consumed.
pub fn read(bytes: &[u8]) -> ReadResult<(u32, u32)> {
    let mut reader = Reader::new(bytes);
    read_from(&mut reader)
}

pub(crate) fn read_from(reader: &mut Reader<'_>) -> ReadResult<(u32, u32)> {
    let mut value: u32 = 0;
    for i in 0..4u32 {
        let byte = reader.read_u8()?;
        value = (value << 7) | u32::from(byte & 0x7F);
        if byte & 0x80 == 0 {
            return Ok((value, i + 1));
        }
    }
    Err(reader.err(ParseErrorKind::VlqOverflow))
}

/// Appends the canonical encoding of `value` to `out`, returning the number
/// of bytes written.
pub fn write(value: u32, out: &mut Vec<u8>) -> Result<u32, WriteError> {
    let n = len(value)?;
    for i in (0..n).rev() {
        let mut byte = ((value >> (7 * i)) & 0x7F) as u8;
        if i > 0 {
            byte |= 0x80;
        }
        out.push(byte);
    }
    Ok(n)
}

/// The number of bytes [`write`] would emit for `value`.
pub const fn len(value: u32) -> Result<u32, WriteError> {
    if value > MAX {
        return Err(WriteError::ValueOutOfRange(value));
    }
    Ok(match value {
        0..=0x7F => 1,
        0x80..=0x3FFF => 2,
        0x4000..=0x001F_FFFF => 3,
        _ => 4,
    })
}
