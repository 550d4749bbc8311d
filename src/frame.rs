use crate::headers::HeaderSet;
use bytes::Bytes;
use mime::Mime;

/// A complete JPEG image extracted from the stream.
///
/// The frame owns its bytes; the parser keeps no reference to them once the
/// frame has been handed out.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    headers: HeaderSet,
    content_type: Mime,
    data: Bytes,
    idx: usize,
}

impl Frame {
    pub(crate) fn new(headers: HeaderSet, content_type: Mime, data: Bytes, idx: usize) -> Frame {
        Frame {
            headers,
            content_type,
            data,
            idx,
        }
    }

    /// The header fields of the body part that carried this frame.
    pub fn headers(&self) -> &HeaderSet {
        &self.headers
    }

    /// The resolved content type. `image/jpeg` when the part had none.
    pub fn content_type(&self) -> &Mime {
        &self.content_type
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Position of this frame in the stream, starting at zero.
    pub fn index(&self) -> usize {
        self.idx
    }

    pub fn into_bytes(self) -> Bytes {
        self.data
    }

    pub fn into_parts(self) -> (HeaderSet, Bytes) {
        (self.headers, self.data)
    }
}
