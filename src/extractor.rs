use crate::constraints::Constraints;
use crate::frame::Frame;
use crate::headers::HeaderSet;
use crate::helpers;
use crate::jpeg::JpegFramer;
use crate::multipart::{MultipartParser, PartEvent};
use bytes::BytesMut;
use mime::Mime;
use std::mem;

/// What a [`FrameExtractor`] reports while it is fed.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A frame has been fully reassembled.
    Frame(Frame),
    /// A body part with a declared `Content-Length` has been read in full.
    PartComplete,
    /// The terminating boundary was seen. Nothing follows.
    StreamEnd,
}

/// Extracts JPEG frames from a motion-JPEG `multipart/x-mixed-replace` body.
///
/// Each body part's payload length is taken from `Content-Length`, or from a
/// `DataLen` header some cameras send instead. A part that declares neither
/// is framed by its JPEG start/end markers; whatever follows the image is
/// handed back to the multipart parser so the next boundary is found.
///
/// # Examples
///
/// ```
/// use mjpeg_parser::{Event, FrameExtractor};
///
/// let data = b"--myboundary\r\nContent-Type: image/jpeg\r\nContent-Length: 4\r\n\r\n\xFF\xD8\xFF\xD9\r\n--myboundary--\r\n";
/// let mut extractor = FrameExtractor::new("myboundary");
///
/// let mut frames = Vec::new();
/// extractor
///     .push(data, |event| {
///         if let Event::Frame(frame) = event {
///             frames.push(frame);
///         }
///     })
///     .unwrap();
///
/// assert_eq!(frames.len(), 1);
/// assert_eq!(&frames[0].data()[..], b"\xFF\xD8\xFF\xD9");
/// ```
#[derive(Debug)]
pub struct FrameExtractor {
    parser: MultipartParser,
    max_frame_size: usize,
    jpeg: Option<JpegFramer>,
    mode: Mode,
    next_frame_idx: usize,
}

#[derive(Debug)]
enum Mode {
    Idle,
    Fixed { part: PartMeta, buf: BytesMut, expected: usize },
    Jpeg { part: PartMeta },
}

#[derive(Debug)]
struct PartMeta {
    headers: HeaderSet,
    content_type: Mime,
}

impl FrameExtractor {
    /// Creates an extractor for the given boundary with the default
    /// constraints.
    pub fn new<B: AsRef<str>>(boundary: B) -> FrameExtractor {
        FrameExtractor::with_constraints(boundary, Constraints::default())
    }

    /// Creates an extractor for the given boundary and constraints.
    pub fn with_constraints<B: AsRef<str>>(boundary: B, constraints: Constraints) -> FrameExtractor {
        FrameExtractor {
            parser: MultipartParser::with_constraints(boundary, &constraints),
            max_frame_size: constraints.max_frame_size,
            jpeg: None,
            mode: Mode::Idle,
            next_frame_idx: 0,
        }
    }

    /// Feeds `data` to the extractor and reports frames and the end of the
    /// stream through `on_event`, in stream order.
    ///
    /// An error is fatal for the body part being read. Frames completed
    /// earlier in the same call have already been reported. Call
    /// [`clear`](FrameExtractor::clear) before feeding more bytes to resume at
    /// the next boundary.
    pub fn push<F>(&mut self, data: &[u8], mut on_event: F) -> crate::Result<()>
    where
        F: FnMut(Event),
    {
        let mut offset = 0;

        loop {
            let (consumed, event) = self.parser.next_event(&data[offset..])?;
            offset += consumed;

            let event = match event {
                Some(event) => event,
                None if consumed == 0 => break,
                None => continue,
            };

            match event {
                PartEvent::Headers(headers) => self.on_headers(headers)?,
                PartEvent::BodyChunk(chunk) => {
                    let (used, frame) = self.on_body_chunk(chunk)?;

                    if let Some(frame) = frame {
                        trace!("frame {} complete: {} bytes", frame.index(), frame.len());
                        on_event(Event::Frame(frame));

                        // Unless the parser's count ended with the frame, it
                        // cannot tell where the part ends. Hand it back the
                        // bytes that follow the frame.
                        let rest = chunk.len() - used;
                        if rest > 0 || !self.parser.state().is_body_complete() {
                            trace!("reinjecting {} bytes into the multipart parser", rest);
                            self.parser.clear();
                            offset -= rest;
                        }
                    }
                }
                PartEvent::PartComplete => on_event(Event::PartComplete),
                PartEvent::StreamEnd => {
                    trace!("end of stream");
                    on_event(Event::StreamEnd);
                }
            }
        }

        Ok(())
    }

    /// Reports whether the stream can end here without losing a frame.
    ///
    /// Call it when the transport is exhausted. Cameras usually never send
    /// the terminating boundary, so its absence is not an error; a frame that
    /// was started but not completed is.
    pub fn finish(&self) -> crate::Result<()> {
        match &self.mode {
            Mode::Idle => Ok(()),
            Mode::Fixed { buf, expected, .. } => Err(crate::Error::IncompleteFrame {
                expected: Some(*expected),
                received: buf.len(),
            }),
            Mode::Jpeg { .. } => Err(crate::Error::IncompleteFrame {
                expected: None,
                received: self.jpeg.as_ref().map_or(0, JpegFramer::buffered),
            }),
        }
    }

    /// Returns `true` while a frame has been started but not completed.
    pub fn is_frame_in_progress(&self) -> bool {
        !matches!(self.mode, Mode::Idle)
    }

    /// Drops the frame in progress and waits for the next boundary.
    pub fn clear(&mut self) {
        self.parser.clear();
        self.mode = Mode::Idle;

        if let Some(jpeg) = self.jpeg.as_mut() {
            jpeg.clear();
        }
    }

    fn on_headers(&mut self, headers: HeaderSet) -> crate::Result<()> {
        self.mode = Mode::Idle;

        let content_type = helpers::content_type(&headers)?;
        let length = helpers::declared_length(&headers)?;
        let part = PartMeta { headers, content_type };

        // The parser counts `Content-Length` alone; the body length resolved
        // here overrides it.
        self.mode = match length {
            Some(len) if len > self.max_frame_size => {
                return Err(crate::Error::FrameTooLarge {
                    size: len,
                    limit: self.max_frame_size,
                });
            }
            Some(len) => {
                self.parser.set_body_length(Some(len));

                Mode::Fixed {
                    part,
                    buf: BytesMut::with_capacity(len),
                    expected: len,
                }
            }
            None if self.parser.state().is_body_complete() => {
                trace!("empty part");
                Mode::Idle
            }
            None => {
                self.parser.set_body_length(None);

                debug!("part has no declared length, framing by JPEG markers");

                let max_frame_size = self.max_frame_size;
                self.jpeg
                    .get_or_insert_with(|| JpegFramer::new(max_frame_size))
                    .clear();

                Mode::Jpeg { part }
            }
        };

        Ok(())
    }

    /// Returns how many bytes of `chunk` belong to the current frame and the
    /// frame, once complete.
    fn on_body_chunk(&mut self, chunk: &[u8]) -> crate::Result<(usize, Option<Frame>)> {
        let (used, jpeg_data) = match &mut self.mode {
            Mode::Idle => return Ok((chunk.len(), None)),
            Mode::Fixed { buf, expected, .. } => {
                let consume = (*expected - buf.len()).min(chunk.len());
                buf.extend_from_slice(&chunk[..consume]);

                if buf.len() < *expected {
                    return Ok((consume, None));
                }

                // Complete; the buffer is taken out of `self.mode` below.
                (consume, None)
            }
            Mode::Jpeg { .. } => {
                let max_frame_size = self.max_frame_size;
                let framer = self.jpeg.get_or_insert_with(|| JpegFramer::new(max_frame_size));

                let mut used = 0;
                let mut data = None;

                while used < chunk.len() && data.is_none() {
                    let (consumed, frame) = framer.push(&chunk[used..])?;
                    used += consumed;
                    data = frame;
                }

                match data {
                    Some(data) => (used, Some(data)),
                    None => return Ok((used, None)),
                }
            }
        };

        let idx = self.next_frame_idx;

        let frame = match (mem::replace(&mut self.mode, Mode::Idle), jpeg_data) {
            (Mode::Fixed { part, buf, .. }, _) => Frame::new(part.headers, part.content_type, buf.freeze(), idx),
            (Mode::Jpeg { part }, Some(data)) => Frame::new(part.headers, part.content_type, data, idx),
            _ => return Ok((used, None)),
        };

        self.next_frame_idx += 1;
        Ok((used, Some(frame)))
    }
}
