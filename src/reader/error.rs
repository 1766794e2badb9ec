use thiserror::Error;

/// An error raised while parsing file bytes, carrying the offset at
/// which parsing stopped.
#[derive(Debug, Error)]
#[error("parse failed at byte {position}: {kind}")]
pub struct ParseError {
    position: usize,
    kind: ParseErrorKind,
}

impl ParseError {
    pub(crate) const fn new(position: usize, kind: ParseErrorKind) -> Self {
        Self { position, kind }
    }
    /// Byte offset from the start of the input at which parsing failed.
    pub const fn position(&self) -> usize {
        self.position
    }
    /// What went wrong.
    pub const fn kind(&self) -> &ParseErrorKind {
        &self.kind
    }
}

/// The ways parsing can fail. Every kind is fatal: nothing parsed
/// before the error is handed back.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Header or chunk preamble is malformed: magic, declared length,
    /// format word, or division.
    #[error("bad header: {0}")]
    BadHeader(&'static str),
    /// A track's events do not line up with its declared byte length.
    #[error("track events overran the declared chunk length")]
    BadChunkLength,
    /// Input ended before the structure it was describing.
    #[error("input truncated")]
    TruncatedInput,
    /// Status byte that is not a channel, meta, or sysex event, or a
    /// data byte with no running status to apply.
    #[error("unrecognized event type {0:#04x}")]
    UnrecognizedEventType(u8),
    /// A variable-length quantity ran past its four-byte cap.
    #[error("variable-length quantity overflow")]
    VlqOverflow,
}

/// The parse result type (see [`ParseError`])
pub type ReadResult<T> = Result<T, ParseError>;
