pub(crate) const DEFAULT_MAX_HEADERS: usize = 256;
pub(crate) const DEFAULT_MAX_LINE_LENGTH: usize = 4096;
pub(crate) const DEFAULT_MAX_FRAME_SIZE: usize = 0x80_0000;

pub(crate) const CRLF: &str = "\r\n";
pub(crate) const BOUNDARY_EXT: &str = "--";
pub(crate) const DASH: u8 = b'-';

/// JPEG marker bytes. Only the ones used for framing are listed.
pub(crate) mod markers {
    pub(crate) const PREFIX: u8 = 0xFF;
    /// Start of image.
    pub(crate) const SOI: u8 = 0xD8;
    /// End of image.
    pub(crate) const EOI: u8 = 0xD9;
}

pub(crate) const DATA_LEN: &str = "datalen";

pub(crate) const JPEG_SUBTYPES: &[&str] = &["jpeg", "jpg", "pjpeg"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_frame_size_is_eight_mib() {
        assert_eq!(DEFAULT_MAX_FRAME_SIZE, 8 * 1024 * 1024);
    }

    #[test]
    fn test_boundary_ext_is_made_of_dashes() {
        assert!(BOUNDARY_EXT.bytes().all(|b| b == DASH));
        assert_eq!(CRLF.len(), 2);
    }
}
