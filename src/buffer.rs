use bytes::BytesMut;

/// A fixed-capacity byte arena with an explicit fill length.
///
/// The backing storage is allocated once at construction and reused; `fill`
/// never grows it past `capacity`.
#[derive(Debug)]
pub(crate) struct ByteWindow {
    buf: BytesMut,
    capacity: usize,
}

impl ByteWindow {
    pub fn with_capacity(capacity: usize) -> ByteWindow {
        ByteWindow {
            buf: BytesMut::with_capacity(capacity),
            capacity,
        }
    }

    /// Copies as many bytes of `data` as fit and returns how many were taken.
    pub fn fill(&mut self, data: &[u8]) -> usize {
        let consume = data.len().min(self.available());
        self.buf.extend_from_slice(&data[..consume]);
        consume
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn available(&self) -> usize {
        self.capacity - self.buf.len()
    }

    pub fn is_full(&self) -> bool {
        self.available() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    pub fn clear(&mut self) {
        self.buf.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_refuses_bytes_beyond_capacity() {
        let mut window = ByteWindow::with_capacity(4);

        assert_eq!(window.fill(b"ab"), 2);
        assert_eq!(window.fill(b"cdef"), 2);
        assert!(window.is_full());
        assert_eq!(window.fill(b"g"), 0);
        assert_eq!(window.as_slice(), b"abcd");

        window.clear();
        assert_eq!(window.len(), 0);
        assert_eq!(window.available(), 4);
        assert_eq!(window.capacity(), 4);
    }
}
