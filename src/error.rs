use std::fmt::{self, Debug, Display, Formatter};

use derive_more::Display;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A set of errors that can occur while extracting frames from a motion-JPEG
/// stream and in other operations.
///
/// Every error is fatal for the body part that raised it. The affected parser
/// keeps its corrupted state until it is cleared, so callers either call
/// `clear()` and keep feeding bytes or drop the stream.
#[derive(Display)]
#[non_exhaustive]
pub enum Error {
    /// A line (boundary or header) did not fit in the line buffer.
    #[display(fmt = "line exceeded the maximum length: {} bytes", limit)]
    LineTooLong { limit: usize },

    /// A body part carried more header fields than allowed.
    #[display(fmt = "maximum number of header fields exceeded: {}", limit)]
    TooManyHeaders { limit: usize },

    /// A header line has no valid field name.
    #[display(fmt = "invalid header field: {:?}", line)]
    MalformedHeaderField { line: String },

    /// A folded header line arrived before any header field.
    #[display(fmt = "first header field cannot be a continuation")]
    UnexpectedContinuation,

    /// The declared frame length is negative or otherwise unusable.
    #[display(fmt = "missing or invalid frame length: {:?}", value)]
    MissingOrInvalidLength { value: String },

    /// The frame exceeded the maximum frame size.
    #[display(fmt = "frame size {} exceeded the maximum limit: {} bytes", size, limit)]
    FrameTooLarge { size: usize, limit: usize },

    /// The part's `Content-Type` is not a JPEG type.
    #[display(fmt = "invalid frame content type: {}", content_type)]
    InvalidContentType { content_type: String },

    /// A JPEG end-of-image marker arrived without a matching start marker.
    #[display(fmt = "unexpected JPEG end marker at offset {}", offset)]
    UnexpectedEndMarker { offset: usize },

    /// Failed to decode a part's raw header name to
    /// [`HeaderName`](http::header::HeaderName) type.
    #[display(fmt = "failed to decode part's raw header name: {:?} {}", name, cause)]
    DecodeHeaderName { name: String, cause: BoxError },

    /// Failed to decode a part's raw header value to
    /// [`HeaderValue`](http::header::HeaderValue) type.
    #[display(fmt = "failed to decode part's raw header value: {}", cause)]
    DecodeHeaderValue { value: Vec<u8>, cause: BoxError },

    /// The byte stream ended in the middle of a frame. `expected` is `None`
    /// when the frame was being framed by its JPEG markers.
    #[display(
        fmt = "incomplete frame: received {} bytes, expected {}",
        received,
        "expected.map_or_else(|| \"an end marker\".to_owned(), |len| format!(\"{} bytes\", len))"
    )]
    IncompleteFrame { expected: Option<usize>, received: usize },

    /// Stream read failed.
    #[display(fmt = "stream read failed: {}", _0)]
    StreamReadFailed(BoxError),

    /// The `Content-Type` header is not `multipart/*`.
    #[display(fmt = "Content-Type is not multipart")]
    NoMultipart,

    /// Failed to convert the `Content-Type` to [`mime::Mime`] type.
    #[display(fmt = "failed to convert Content-Type to `mime::Mime` type: {}", _0)]
    DecodeContentType(mime::FromStrError),

    /// No boundary found in `Content-Type` header.
    #[display(fmt = "multipart boundary not found in Content-Type")]
    NoBoundary,
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::StreamReadFailed(err) => Some(err.as_ref()),
            Error::DecodeHeaderName { cause, .. } | Error::DecodeHeaderValue { cause, .. } => Some(cause.as_ref()),
            Error::DecodeContentType(err) => Some(err),
            _ => None,
        }
    }
}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.to_string().eq(&other.to_string())
    }
}

impl Eq for Error {}
