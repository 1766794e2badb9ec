#![doc = r#"
Byte-level reading for the file parser.

Parsing is all-or-nothing: [`MidiFile::parse`](crate::file::MidiFile::parse)
either consumes every declared chunk or reports a [`ParseError`] with the
byte offset it stopped at.
"#]

mod error;
pub use error::*;

/// Position-tracked cursor over raw file bytes. All multi-byte reads are
/// big-endian, as the wire format requires.
#[derive(Debug)]
pub(crate) struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub(crate) const fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    pub(crate) const fn position(&self) -> usize {
        self.pos
    }

    pub(crate) const fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    /// An error at the current position.
    pub(crate) const fn err(&self, kind: ParseErrorKind) -> ParseError {
        ParseError::new(self.pos, kind)
    }

    pub(crate) fn read_exact(&mut self, n: usize) -> ReadResult<&'a [u8]> {
        if self.remaining() < n {
            return Err(self.err(ParseErrorKind::TruncatedInput));
        }
        let out = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    pub(crate) fn read_array<const N: usize>(&mut self) -> ReadResult<[u8; N]> {
        let slice = self.read_exact(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(slice);
        Ok(out)
    }

    pub(crate) fn read_u8(&mut self) -> ReadResult<u8> {
        let bytes = self.read_array::<1>()?;
        Ok(bytes[0])
    }

    pub(crate) fn read_u16(&mut self) -> ReadResult<u16> {
        Ok(u16::from_be_bytes(self.read_array()?))
    }

    pub(crate) fn read_u32(&mut self) -> ReadResult<u32> {
        Ok(u32::from_be_bytes(self.read_array()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_are_big_endian_and_advance() {
        let mut reader = Reader::new(&[0x01, 0x02, 0x03, 0x04, 0x05]);
        assert_eq!(reader.read_u16().unwrap(), 0x0102);
        assert_eq!(reader.read_u8().unwrap(), 0x03);
        assert_eq!(reader.position(), 3);
        assert_eq!(reader.remaining(), 2);
    }

    #[test]
    fn truncated_read_reports_position() {
        let mut reader = Reader::new(&[0xAA]);
        reader.read_u8().unwrap();
        let err = reader.read_u32().unwrap_err();
        assert_eq!(err.position(), 1);
        assert_eq!(*err.kind(), ParseErrorKind::TruncatedInput);
    }
}
