use crate::buffer::ByteWindow;
use crate::constants;
use memchr::memmem::Finder;

/// Splits a byte stream into delimiter-terminated lines.
///
/// No character encoding is assumed; a line is whatever precedes the
/// delimiter. All bytes of the line in progress live in one buffer of
/// `max_length` bytes, so a line longer than that is refused with
/// [`Error::LineTooLong`](crate::Error::LineTooLong).
///
/// # Examples
///
/// ```
/// use mjpeg_parser::LineSplitter;
///
/// let mut lines = LineSplitter::new("\r\n", 4096);
///
/// let (consumed, line) = lines.push(b"abc\r\ndef").unwrap();
/// assert_eq!(consumed, 5);
/// assert_eq!(line, Some(&b"abc"[..]));
/// ```
#[derive(Debug)]
pub struct LineSplitter {
    window: ByteWindow,
    finder: Finder<'static>,
    line_taken: bool,
}

impl LineSplitter {
    /// Creates a splitter for the given delimiter and maximum line length.
    ///
    /// An empty delimiter falls back to CRLF and a zero length to 4096 bytes.
    pub fn new<D: AsRef<[u8]>>(delimiter: D, max_length: usize) -> LineSplitter {
        let delimiter = match delimiter.as_ref() {
            [] => constants::CRLF.as_bytes(),
            delimiter => delimiter,
        };

        let max_length = if max_length == 0 {
            constants::DEFAULT_MAX_LINE_LENGTH
        } else {
            max_length
        };

        LineSplitter {
            window: ByteWindow::with_capacity(max_length),
            finder: Finder::new(delimiter).into_owned(),
            line_taken: false,
        }
    }

    /// Feeds `data` to the splitter.
    ///
    /// Returns the number of input bytes consumed and, if a delimiter was
    /// found, the completed line without its delimiter. Bytes after the
    /// delimiter are not consumed and have to be pushed again.
    pub fn push(&mut self, data: &[u8]) -> crate::Result<(usize, Option<&[u8]>)> {
        if self.line_taken {
            self.window.clear();
            self.line_taken = false;
        }

        if data.is_empty() {
            return Ok((0, None));
        }

        if self.window.is_full() {
            return Err(crate::Error::LineTooLong {
                limit: self.window.capacity(),
            });
        }

        let dlen = self.finder.needle().len();
        let start = self.window.len();
        let consumed = self.window.fill(data);

        // Rescan the tail of the previous fill so a delimiter split across
        // two pushes is still found.
        let scan_from = start.saturating_sub(dlen - 1);

        match self.finder.find(&self.window.as_slice()[scan_from..]) {
            Some(idx) => {
                let pos = scan_from + idx;
                self.line_taken = true;
                Ok((pos + dlen - start, Some(&self.window.as_slice()[..pos])))
            }
            None => Ok((consumed, None)),
        }
    }

    /// Discards every byte buffered for the line in progress.
    pub fn clear(&mut self) {
        self.window.clear();
        self.line_taken = false;
    }

    /// Number of bytes buffered for the line in progress.
    pub fn buffered(&self) -> usize {
        if self.line_taken {
            0
        } else {
            self.window.len()
        }
    }

    /// Bytes buffered for the line in progress.
    pub fn pending(&self) -> &[u8] {
        if self.line_taken {
            &[]
        } else {
            self.window.as_slice()
        }
    }
}

impl Default for LineSplitter {
    fn default() -> Self {
        LineSplitter::new(constants::CRLF, constants::DEFAULT_MAX_LINE_LENGTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn push_all(splitter: &mut LineSplitter, data: &[u8], lines: &mut Vec<String>) -> crate::Result<()> {
        let mut offset = 0;

        while offset < data.len() {
            let (consumed, line) = splitter.push(&data[offset..])?;
            if let Some(line) = line {
                lines.push(String::from_utf8_lossy(line).into_owned());
            }
            if consumed == 0 {
                break;
            }
            offset += consumed;
        }

        Ok(())
    }

    #[test]
    fn test_splits_lines_and_keeps_partial_tail() {
        let mut splitter = LineSplitter::default();

        let mut lines = Vec::new();
        push_all(&mut splitter, b"abc\rde\nf\r\nhello\r\n\r\nworld\r\naaa", &mut lines).unwrap();

        assert_eq!(lines, vec!["abc\rde\nf", "hello", "", "world"]);
        assert_eq!(splitter.pending(), b"aaa");

        splitter.clear();
        assert_eq!(splitter.buffered(), 0);
    }

    #[test]
    fn test_single_line_consumes_delimiter() {
        let mut splitter = LineSplitter::default();

        let (consumed, line) = splitter.push(b"abc\r\n").unwrap();
        assert_eq!(consumed, 5);
        assert_eq!(line, Some(&b"abc"[..]));
    }

    #[test]
    fn test_partial_delimiter_does_not_emit_line() {
        let mut splitter = LineSplitter::default();

        let mut lines = Vec::new();
        push_all(&mut splitter, b"\r\n\r", &mut lines).unwrap();

        assert_eq!(lines, vec![""]);
        assert_eq!(splitter.buffered(), 1);
    }

    #[test]
    fn test_delimiter_split_across_pushes() {
        let mut splitter = LineSplitter::default();

        assert_eq!(splitter.push(b"ab\r").unwrap(), (3, None));

        let (consumed, line) = splitter.push(b"\ncd").unwrap();
        assert_eq!(consumed, 1);
        assert_eq!(line, Some(&b"ab"[..]));
    }

    #[test]
    fn test_line_too_long() {
        let mut splitter = LineSplitter::new("\r\n", 5);

        let mut lines = Vec::new();
        let res = push_all(&mut splitter, b"aaa\r\nbbbb\r\nccc", &mut lines);

        assert_eq!(lines, vec!["aaa"]);
        assert_eq!(res, Err(crate::Error::LineTooLong { limit: 5 }));
        assert_eq!(splitter.pending(), b"bbbb\r");
    }

    #[test]
    fn test_custom_delimiter() {
        let mut splitter = LineSplitter::new("||", 16);

        let mut lines = Vec::new();
        push_all(&mut splitter, b"a|b||c||", &mut lines).unwrap();
        assert_eq!(lines, vec!["a|b", "c"]);

        let mut splitter = LineSplitter::new("", 0);
        let mut lines = Vec::new();
        push_all(&mut splitter, b"x\r\n", &mut lines).unwrap();
        assert_eq!(lines, vec!["x"]);
    }
}
