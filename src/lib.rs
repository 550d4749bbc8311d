//! An incremental parser for motion-JPEG streams served by network cameras as
//! `multipart/x-mixed-replace` bodies.
//!
//! Bytes are pushed in whatever chunks the transport delivers them and whole
//! JPEG frames come out. Memory use is bounded by the configured line and
//! frame sizes, however long the stream runs. The parser copes with the usual
//! camera quirks: extra dashes on boundary lines, a header field run onto the
//! boundary line, folded headers, `DataLen` instead of `Content-Length`, and
//! parts with no length at all, which are framed by their JPEG markers.
//!
//! The pipeline is made of four layers, each usable on its own:
//!
//! - [`LineSplitter`] splits bytes into CRLF-terminated lines.
//! - [`MultipartParser`] runs the body-part state machine.
//! - [`JpegFramer`] finds images by their start/end markers.
//! - [`FrameExtractor`] composes them into frame extraction.
//!
//! [`FrameStream`] drives a [`FrameExtractor`] from an async byte stream.
//!
//! # Examples
//!
//! ```
//! use bytes::Bytes;
//! use futures_util::stream::once;
//! use mjpeg_parser::FrameStream;
//! use std::convert::Infallible;
//!
//! # async fn run() {
//! let data = "--myboundary\r\nContent-Type: image/jpeg\r\nContent-Length: 4\r\n\r\n\u{0}\u{1}\u{2}\u{3}\r\n--myboundary--\r\n";
//! let stream = once(async move { Result::<Bytes, Infallible>::Ok(Bytes::from(data)) });
//! let mut frames = FrameStream::new(stream, "myboundary");
//!
//! while let Some(frame) = frames.next_frame().await.unwrap() {
//!     println!("Frame {}: {} bytes of {}", frame.index(), frame.len(), frame.content_type());
//! }
//! # }
//! # tokio::runtime::Runtime::new().unwrap().block_on(run());
//! ```
//!
//! ## Optional features
//!
//! - `tokio-io`: [`FrameStream::with_reader`] over any `tokio::io::AsyncRead`.
//! - `log`: parser events are traced through the `log` crate.

#[cfg(feature = "log")]
macro_rules! trace {
    ($($arg:tt)+) => { ::log::trace!($($arg)+) };
}

#[cfg(not(feature = "log"))]
macro_rules! trace {
    ($($arg:tt)+) => {{
        let _ = ::std::format_args!($($arg)+);
    }};
}

#[cfg(feature = "log")]
macro_rules! debug {
    ($($arg:tt)+) => { ::log::debug!($($arg)+) };
}

#[cfg(not(feature = "log"))]
macro_rules! debug {
    ($($arg:tt)+) => {{
        let _ = ::std::format_args!($($arg)+);
    }};
}

pub use bytes;
pub use constraints::Constraints;
pub use error::Error;
pub use extractor::{Event, FrameExtractor};
pub use frame::Frame;
pub use headers::{HeaderField, HeaderSet};
pub use jpeg::JpegFramer;
pub use line::LineSplitter;
pub use multipart::{MultipartParser, PartEvent};
pub use state::ParserState;
pub use stream::FrameStream;

mod buffer;
mod constants;
mod constraints;
mod error;
mod extractor;
mod frame;
mod headers;
mod helpers;
mod jpeg;
mod line;
mod multipart;
mod state;
mod stream;

/// A Result type often returned from methods that can have `mjpeg-parser`
/// errors.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Parses the `Content-Type` header of a camera response to extract the
/// multipart boundary value.
///
/// Any `multipart/*` type is accepted, since cameras are not consistent about
/// sending `multipart/x-mixed-replace`.
///
/// # Examples
///
/// ```
/// let content_type = "multipart/x-mixed-replace; boundary=myboundary";
/// assert_eq!(mjpeg_parser::parse_boundary(content_type), Ok("myboundary".to_owned()));
/// ```
pub fn parse_boundary<T: AsRef<str>>(content_type: T) -> Result<String> {
    let m = content_type
        .as_ref()
        .parse::<mime::Mime>()
        .map_err(Error::DecodeContentType)?;

    if m.type_() != mime::MULTIPART {
        return Err(Error::NoMultipart);
    }

    m.get_param(mime::BOUNDARY)
        .map(|name| name.as_str().to_owned())
        .ok_or(Error::NoBoundary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_boundary() {
        let content_type = "multipart/x-mixed-replace; boundary=ABCDEFG";
        assert_eq!(parse_boundary(content_type), Ok("ABCDEFG".to_owned()));

        let content_type = "multipart/x-mixed-replace;boundary=--myboundary";
        assert_eq!(parse_boundary(content_type), Ok("--myboundary".to_owned()));

        let content_type = "multipart/mixed; boundary=\"quoted\"";
        assert_eq!(parse_boundary(content_type), Ok("quoted".to_owned()));

        let content_type = "boundary=------ABCDEFG";
        assert!(parse_boundary(content_type).is_err());

        let content_type = "multipart/x-mixed-replace";
        assert_eq!(parse_boundary(content_type), Err(Error::NoBoundary));

        let content_type = "image/jpeg; boundary=------ABCDEFG";
        assert_eq!(parse_boundary(content_type), Err(Error::NoMultipart));
    }
}
