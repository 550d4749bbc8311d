use crate::constants;
use crate::headers::HeaderSet;
use http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use mime::Mime;

/// The `Content-Length` of a part, if present and a non-negative integer.
pub(crate) fn content_length(headers: &HeaderSet) -> Option<usize> {
    headers
        .get_str(CONTENT_LENGTH.as_str())
        .and_then(|value| parse_length(value.trim()))
        .and_then(|len| usize::try_from(len).ok())
}

fn parse_length(value: &str) -> Option<i64> {
    value.parse::<i64>().ok()
}

/// Resolves the payload length a part declares.
///
/// A positive `Content-Length` wins; otherwise a positive `DataLen` is used,
/// which some cameras send zero-padded. `Ok(None)` means no usable length was
/// declared. A negative value with no positive alternative is an error.
pub(crate) fn declared_length(headers: &HeaderSet) -> crate::Result<Option<usize>> {
    let candidates = [
        headers.get_str(CONTENT_LENGTH.as_str()),
        headers.get_str(constants::DATA_LEN),
    ];

    let mut invalid = None;

    for value in candidates.iter().flatten().map(|value| value.trim()) {
        match parse_length(value) {
            Some(len) if len > 0 => {
                return usize::try_from(len)
                    .map(Some)
                    .map_err(|_| crate::Error::MissingOrInvalidLength { value: value.to_owned() });
            }
            Some(len) if len < 0 => invalid = invalid.or(Some(value)),
            _ => {}
        }
    }

    match invalid {
        Some(value) => Err(crate::Error::MissingOrInvalidLength { value: value.to_owned() }),
        None => Ok(None),
    }
}

/// Resolves the `Content-Type` of a part, defaulting to `image/jpeg`.
///
/// Only JPEG types are accepted; parameters after `;` are ignored.
pub(crate) fn content_type(headers: &HeaderSet) -> crate::Result<Mime> {
    let field = match headers.get(CONTENT_TYPE.as_str()) {
        Some(field) => field,
        None => return Ok(mime::IMAGE_JPEG),
    };

    let invalid = || crate::Error::InvalidContentType {
        content_type: String::from_utf8_lossy(field.value()).into_owned(),
    };

    let mime = field
        .value_str()
        .and_then(|value| value.trim().parse::<Mime>().ok())
        .ok_or_else(invalid)?;

    if is_jpeg(&mime) {
        Ok(mime)
    } else {
        Err(invalid())
    }
}

fn is_jpeg(mime: &Mime) -> bool {
    mime.type_().as_str().eq_ignore_ascii_case(mime::IMAGE.as_str())
        && constants::JPEG_SUBTYPES
            .iter()
            .any(|subtype| mime.subtype().as_str().eq_ignore_ascii_case(subtype))
}
