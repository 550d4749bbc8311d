/// Where a [`MultipartParser`](crate::MultipartParser) is in the body-part
/// grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    /// Skipping lines until a boundary line shows up.
    AwaitingDelimiter,
    /// Reading the header lines of a body part.
    ReadingHeaders,
    /// Passing body bytes through. `None` means no declared length; the
    /// caller decides where the part ends.
    ReadingBody { remaining: Option<usize> },
    /// The terminating boundary was seen; everything else is discarded.
    Epilogue,
}

impl ParserState {
    /// Returns `true` once the declared body length has been read in full.
    pub fn is_body_complete(&self) -> bool {
        matches!(self, ParserState::ReadingBody { remaining: Some(0) })
    }
}

impl Default for ParserState {
    fn default() -> Self {
        ParserState::AwaitingDelimiter
    }
}
