use crate::constants;
use crate::constraints::Constraints;
use crate::headers::{HeaderField, HeaderSet};
use crate::helpers;
use crate::line::LineSplitter;
use crate::state::ParserState;
use std::mem;

/// What a [`MultipartParser`] found in the bytes it was given.
#[derive(Debug, PartialEq, Eq)]
pub enum PartEvent<'d> {
    /// The header section of a body part is complete.
    Headers(HeaderSet),
    /// A slice of body bytes, borrowed from the input.
    BodyChunk(&'d [u8]),
    /// The declared body length has been read in full.
    PartComplete,
    /// The terminating boundary was seen.
    StreamEnd,
}

/// An incremental parser for the body-part structure of a multipart stream.
///
/// Boundary and header lines go through a [`LineSplitter`]; body bytes are
/// passed through untouched. Devices that mangle the multipart grammar are
/// tolerated: any number of leading dashes on a boundary line, noise before
/// the first boundary, a header field run onto the boundary line, and parts
/// without a `Content-Length`.
///
/// A part without a declared length never ends on its own. Whoever reads its
/// body has to find the end, call [`clear`](MultipartParser::clear) and push
/// the bytes that follow the payload again.
///
/// # Examples
///
/// ```
/// use mjpeg_parser::{MultipartParser, PartEvent};
///
/// let data = b"--myboundary\r\nContent-Length: 4\r\n\r\nabcd\r\n--myboundary--\r\n";
/// let mut parser = MultipartParser::new("myboundary");
///
/// let mut body = Vec::new();
/// let consumed = parser
///     .push(data, |event| {
///         if let PartEvent::BodyChunk(chunk) = event {
///             body.extend_from_slice(chunk);
///         }
///     })
///     .unwrap();
///
/// assert_eq!(consumed, data.len());
/// assert_eq!(body, b"abcd");
/// ```
#[derive(Debug)]
pub struct MultipartParser {
    lines: LineSplitter,
    part: Part,
}

#[derive(Debug)]
struct Part {
    boundary: Vec<u8>,
    max_headers: usize,
    state: ParserState,
    headers: HeaderSet,
}

impl MultipartParser {
    /// Creates a parser for the given boundary with the default constraints.
    ///
    /// Leading dashes of the boundary are stripped.
    pub fn new<B: AsRef<str>>(boundary: B) -> MultipartParser {
        MultipartParser::with_constraints(boundary, &Constraints::default())
    }

    /// Creates a parser for the given boundary, taking the header count and
    /// line length limits from `constraints`.
    pub fn with_constraints<B: AsRef<str>>(boundary: B, constraints: &Constraints) -> MultipartParser {
        let boundary = boundary.as_ref().trim_start_matches(constants::DASH as char);

        MultipartParser {
            lines: LineSplitter::new(constants::CRLF, constraints.max_line_length),
            part: Part {
                boundary: boundary.as_bytes().to_vec(),
                max_headers: constraints.max_headers,
                state: ParserState::AwaitingDelimiter,
                headers: HeaderSet::new(),
            },
        }
    }

    pub fn state(&self) -> ParserState {
        self.part.state
    }

    /// Overrides the body length of the part being read.
    ///
    /// `None` leaves the body unbounded; the caller then ends the part with
    /// [`clear`](MultipartParser::clear). Has no effect outside a body.
    pub fn set_body_length(&mut self, remaining: Option<usize>) {
        if let ParserState::ReadingBody { .. } = self.part.state {
            self.part.state = ParserState::ReadingBody { remaining };
        }
    }

    /// The boundary token, without leading dashes.
    pub fn boundary(&self) -> &[u8] {
        &self.part.boundary
    }

    /// Feeds `data` to the parser and reports every event through `on_event`.
    ///
    /// Returns the number of bytes consumed. It is smaller than `data.len()`
    /// only when the parser needs more input than it was given to make
    /// progress, which does not happen for well-formed input.
    pub fn push<F>(&mut self, data: &[u8], mut on_event: F) -> crate::Result<usize>
    where
        F: FnMut(PartEvent<'_>),
    {
        let mut offset = 0;

        loop {
            let (consumed, event) = self.next_event(&data[offset..])?;
            offset += consumed;

            match event {
                Some(event) => on_event(event),
                None if consumed == 0 => break,
                None => {}
            }
        }

        Ok(offset)
    }

    /// Runs the state machine until it produces one event or runs out of
    /// input.
    ///
    /// Returns the number of bytes consumed together with the event, if any.
    /// `(0, None)` means more input is needed.
    pub fn next_event<'d>(&mut self, data: &'d [u8]) -> crate::Result<(usize, Option<PartEvent<'d>>)> {
        match self.part.state {
            ParserState::AwaitingDelimiter | ParserState::ReadingHeaders => {
                let (consumed, line) = self.lines.push(data)?;
                let event = match line {
                    Some(line) => self.part.on_line(line)?,
                    None => None,
                };

                Ok((consumed, event))
            }
            ParserState::ReadingBody { remaining: Some(0) } => {
                self.clear();
                Ok((0, Some(PartEvent::PartComplete)))
            }
            ParserState::ReadingBody { remaining: Some(n) } => {
                let consume = n.min(data.len());
                if consume == 0 {
                    return Ok((0, None));
                }

                self.part.state = ParserState::ReadingBody {
                    remaining: Some(n - consume),
                };

                Ok((consume, Some(PartEvent::BodyChunk(&data[..consume]))))
            }
            ParserState::ReadingBody { remaining: None } => {
                if data.is_empty() {
                    return Ok((0, None));
                }

                Ok((data.len(), Some(PartEvent::BodyChunk(data))))
            }
            ParserState::Epilogue => Ok((data.len(), None)),
        }
    }

    /// Drops the current body part and waits for the next boundary line.
    pub fn clear(&mut self) {
        self.part.state = ParserState::AwaitingDelimiter;
        self.part.headers.clear();
        self.lines.clear();
    }
}

impl Part {
    fn on_line(&mut self, line: &[u8]) -> crate::Result<Option<PartEvent<'static>>> {
        match self.state {
            ParserState::AwaitingDelimiter => Ok(self.on_delimiter_line(line)),
            ParserState::ReadingHeaders => self.on_header_line(line),
            ParserState::ReadingBody { .. } | ParserState::Epilogue => Ok(None),
        }
    }

    fn on_delimiter_line(&mut self, line: &[u8]) -> Option<PartEvent<'static>> {
        let rest = match self.match_boundary(line) {
            Some(rest) => rest,
            None => {
                debug!("skipping {} bytes of non-boundary data", line.len());
                return None;
            }
        };

        if rest == constants::BOUNDARY_EXT.as_bytes() {
            trace!("terminating boundary found");
            self.state = ParserState::Epilogue;
            return Some(PartEvent::StreamEnd);
        }

        trace!("boundary found");

        // Some cameras skip the CRLF after the boundary and put the first
        // header field on the same line.
        if !rest.is_empty() {
            if let Err(err) = self.push_field(rest) {
                debug!("ignoring data after boundary: {}", err);
            }
        }

        self.state = ParserState::ReadingHeaders;
        None
    }

    fn on_header_line(&mut self, line: &[u8]) -> crate::Result<Option<PartEvent<'static>>> {
        match line.first() {
            None => {
                let remaining = helpers::content_length(&self.headers);
                trace!("part headers complete, content length: {:?}", remaining);

                self.state = ParserState::ReadingBody { remaining };
                Ok(Some(PartEvent::Headers(mem::take(&mut self.headers))))
            }
            Some(b' ') | Some(b'\t') => {
                self.headers.continue_last(line)?;
                Ok(None)
            }
            Some(_) => {
                self.push_field(line)?;
                Ok(None)
            }
        }
    }

    fn push_field(&mut self, line: &[u8]) -> crate::Result<()> {
        let field = HeaderField::parse(line)?;

        if self.headers.len() >= self.max_headers {
            return Err(crate::Error::TooManyHeaders {
                limit: self.max_headers,
            });
        }

        self.headers.push(field);
        Ok(())
    }

    /// Matches one or more dashes followed by the boundary and returns what
    /// follows the boundary.
    fn match_boundary<'l>(&self, line: &'l [u8]) -> Option<&'l [u8]> {
        let dashes = line.iter().take_while(|b| **b == constants::DASH).count();
        if dashes == 0 {
            return None;
        }

        line[dashes..].strip_prefix(self.boundary.as_slice())
    }
}
