use crate::buffer::ByteWindow;
use crate::constants::markers;
use bytes::Bytes;

/// Finds complete JPEG images in a raw byte stream.
///
/// Nothing is decoded: the framer only pairs start-of-image and end-of-image
/// markers. Nested images such as EXIF thumbnails are absorbed into the
/// enclosing frame, which ends at the end marker that balances the first
/// start marker.
///
/// # Examples
///
/// ```
/// use mjpeg_parser::JpegFramer;
///
/// let mut framer = JpegFramer::new(1024);
///
/// let (consumed, frame) = framer.push(&[0xFF, 0xD8, 0x01, 0xFF, 0xD9, b'\r', b'\n']).unwrap();
/// assert_eq!(consumed, 5);
/// assert_eq!(frame.unwrap().len(), 5);
/// ```
#[derive(Debug)]
pub struct JpegFramer {
    window: ByteWindow,
    pending_ends: i32,
    start: Option<usize>,
    end: Option<usize>,
}

impl JpegFramer {
    /// Creates a framer that buffers at most `max_frame_size` bytes.
    pub fn new(max_frame_size: usize) -> JpegFramer {
        JpegFramer {
            window: ByteWindow::with_capacity(max_frame_size),
            pending_ends: 0,
            start: None,
            end: None,
        }
    }

    /// Feeds `data` to the framer.
    ///
    /// Returns the number of bytes consumed and the frame completed by them,
    /// if any. When a frame completes, the bytes after its end marker are not
    /// consumed; they belong to whatever follows the image.
    pub fn push(&mut self, data: &[u8]) -> crate::Result<(usize, Option<Bytes>)> {
        if data.is_empty() {
            return Ok((0, None));
        }

        if self.window.is_full() {
            return Err(crate::Error::FrameTooLarge {
                size: self.window.len() + data.len(),
                limit: self.window.capacity(),
            });
        }

        let appended_at = self.window.len();
        let mut consumed = self.window.fill(data);
        let filled = self.window.len();

        // Step back one byte: a marker prefix may have been the last byte of
        // the previous push.
        let mut offset = appended_at.saturating_sub(1);

        while offset < filled && self.end.is_none() {
            let pos = match memchr::memchr(markers::PREFIX, &self.window.as_slice()[offset..filled]) {
                Some(idx) => offset + idx,
                None => break,
            };

            if pos + 1 >= filled {
                break;
            }

            match self.window.as_slice()[pos + 1] {
                markers::SOI => self.on_start(pos),
                markers::EOI => self.on_end(pos)?,
                _ => {}
            }

            offset = pos + 1;
        }

        let (start, end) = match (self.start, self.end) {
            (Some(start), Some(end)) => (start, end),
            _ => return Ok((consumed, None)),
        };

        let frame = Bytes::copy_from_slice(&self.window.as_slice()[start..end]);
        consumed -= filled - end;

        trace!("jpeg frame complete: {} bytes", frame.len());
        self.clear();

        Ok((consumed, Some(frame)))
    }

    /// Number of bytes buffered for the image in progress.
    pub fn buffered(&self) -> usize {
        self.window.len()
    }

    /// Drops the image in progress.
    pub fn clear(&mut self) {
        self.window.clear();
        self.pending_ends = 0;
        self.start = None;
        self.end = None;
    }

    fn on_start(&mut self, pos: usize) {
        if self.start.is_none() {
            self.start = Some(pos);
        }

        self.pending_ends += 1;
    }

    fn on_end(&mut self, pos: usize) -> crate::Result<()> {
        self.pending_ends -= 1;

        if self.pending_ends < 0 {
            return Err(crate::Error::UnexpectedEndMarker { offset: pos });
        }

        if self.pending_ends == 0 && self.start.is_some() {
            self.end = Some(pos + 2);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NESTED: &[u8] = &[
        0xFF, 0xD8, 0x01, 0x02, 0xD8, 0x04, 0xD9, 0xFF, 0x00, 0xFF, 0xAA, 0xFF, 0xD9,
    ];

    #[test]
    fn test_single_frame() {
        let mut framer = JpegFramer::new(100);

        let (consumed, frame) = framer.push(NESTED).unwrap();

        assert_eq!(consumed, NESTED.len());
        assert_eq!(frame.as_deref(), Some(NESTED));
        assert_eq!(framer.buffered(), 0);
    }

    #[test]
    fn test_thumbnail_does_not_end_frame() {
        let data = [
            0xFF, 0xD8, 0xFF, 0xE1, 0xFF, 0xD8, 0x11, 0xFF, 0xD9, 0x22, 0xFF, 0xD9, 0x0D, 0x0A,
        ];
        let mut framer = JpegFramer::new(100);

        let (consumed, frame) = framer.push(&data).unwrap();

        assert_eq!(consumed, 12);
        assert_eq!(frame.as_deref(), Some(&data[..12]));
    }

    #[test]
    fn test_marker_split_across_pushes() {
        let mut framer = JpegFramer::new(100);
        let mut frames = Vec::new();

        for byte in NESTED.chunks(1) {
            let (consumed, frame) = framer.push(byte).unwrap();
            assert_eq!(consumed, 1);
            frames.extend(frame);
        }

        assert_eq!(frames.len(), 1);
        assert_eq!(&frames[0][..], NESTED);
    }

    #[test]
    fn test_leading_bytes_are_dropped_and_trailing_bytes_returned() {
        let mut framer = JpegFramer::new(100);
        let data = b"\r\n\xFF\xD8ab\xFF\xD9\r\n--b";

        let (consumed, frame) = framer.push(data).unwrap();

        assert_eq!(consumed, 8);
        assert_eq!(frame.as_deref(), Some(&b"\xFF\xD8ab\xFF\xD9"[..]));
    }

    #[test]
    fn test_frame_too_large() {
        let mut framer = JpegFramer::new(4);

        let (consumed, frame) = framer.push(&[0xFF, 0xD8, 0x00, 0x00, 0x00]).unwrap();
        assert_eq!(consumed, 4);
        assert!(frame.is_none());

        assert_eq!(
            framer.push(&[0x00]),
            Err(crate::Error::FrameTooLarge { size: 5, limit: 4 })
        );
    }

    #[test]
    fn test_unexpected_end_marker() {
        let mut framer = JpegFramer::new(100);

        assert_eq!(
            framer.push(&[0x00, 0xFF, 0xD9]),
            Err(crate::Error::UnexpectedEndMarker { offset: 1 })
        );
    }

    #[test]
    fn test_consecutive_frames() {
        let mut framer = JpegFramer::new(100);
        let data = [0xFF, 0xD8, 0x01, 0xFF, 0xD9, 0xFF, 0xD8, 0x02, 0xFF, 0xD9];

        let (consumed, first) = framer.push(&data).unwrap();
        assert_eq!(consumed, 5);
        assert_eq!(first.as_deref(), Some(&data[..5]));

        let (consumed, second) = framer.push(&data[consumed..]).unwrap();
        assert_eq!(consumed, 5);
        assert_eq!(second.as_deref(), Some(&data[5..]));
    }
}
