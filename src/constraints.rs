use crate::constants;

/// Limits applied while parsing a stream.
///
/// Every buffer of the pipeline is sized from these values when the parser is
/// built, so they also bound the parser's memory use.
///
/// # Examples
///
/// ```
/// use mjpeg_parser::{Constraints, FrameExtractor};
///
/// let constraints = Constraints::new()
///     .max_headers(32)
///     .max_line_length(1024)
///     .max_frame_size(2 * 1024 * 1024);
///
/// let extractor = FrameExtractor::with_constraints("myboundary", constraints);
/// # drop(extractor);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraints {
    pub(crate) max_headers: usize,
    pub(crate) max_line_length: usize,
    pub(crate) max_frame_size: usize,
}

impl Constraints {
    /// Creates the default constraints: 256 header fields per part, 4096 bytes
    /// per line and 8 MiB per frame.
    pub fn new() -> Constraints {
        Constraints::default()
    }

    /// Sets the maximum number of header fields in a single body part.
    pub fn max_headers(mut self, limit: usize) -> Constraints {
        self.max_headers = limit;
        self
    }

    /// Sets the maximum length of a boundary or header line, delimiter included.
    pub fn max_line_length(mut self, limit: usize) -> Constraints {
        self.max_line_length = limit;
        self
    }

    /// Sets the maximum size of a single frame in bytes.
    pub fn max_frame_size(mut self, limit: usize) -> Constraints {
        self.max_frame_size = limit;
        self
    }
}

impl Default for Constraints {
    fn default() -> Self {
        Constraints {
            max_headers: constants::DEFAULT_MAX_HEADERS,
            max_line_length: constants::DEFAULT_MAX_LINE_LENGTH,
            max_frame_size: constants::DEFAULT_MAX_FRAME_SIZE,
        }
    }
}
