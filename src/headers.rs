use http::header::{HeaderMap, HeaderName, HeaderValue};
use std::collections::HashMap;
use std::convert::TryFrom;

/// A single header field of a body part.
///
/// The name keeps its original case. Neither name nor value is decoded; use
/// [`name_str`](HeaderField::name_str) and [`value_str`](HeaderField::value_str)
/// when the bytes are known to be text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderField {
    name: Vec<u8>,
    value: Vec<u8>,
}

impl HeaderField {
    pub fn new<N: Into<Vec<u8>>, V: Into<Vec<u8>>>(name: N, value: V) -> HeaderField {
        HeaderField {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn name(&self) -> &[u8] {
        &self.name
    }

    pub fn value(&self) -> &[u8] {
        &self.value
    }

    pub fn name_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.name).ok()
    }

    pub fn value_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.value).ok()
    }

    /// Parses a header line of the form `name` or `name: value`.
    ///
    /// The name runs up to the first colon or whitespace byte and must not be
    /// empty. Whitespace after the colon is skipped.
    pub(crate) fn parse(line: &[u8]) -> crate::Result<HeaderField> {
        let name_len = line
            .iter()
            .position(|b| *b == b':' || b.is_ascii_whitespace())
            .unwrap_or(line.len());

        let value = match &line[name_len..] {
            _ if name_len == 0 => return Err(malformed(line)),
            [] => &[][..],
            [b':', value @ ..] => value.trim_ascii_start(),
            _ => return Err(malformed(line)),
        };

        Ok(HeaderField::new(&line[..name_len], value))
    }
}

fn malformed(line: &[u8]) -> crate::Error {
    crate::Error::MalformedHeaderField {
        line: String::from_utf8_lossy(line).into_owned(),
    }
}

/// The header fields of one body part, in the order they were parsed.
///
/// Lookups are case-insensitive. When a name occurs more than once the last
/// field wins the lookup while every field stays in [`iter`](HeaderSet::iter).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderSet {
    fields: Vec<HeaderField>,
    index: HashMap<Vec<u8>, usize>,
}

impl HeaderSet {
    pub fn new() -> HeaderSet {
        HeaderSet::default()
    }

    /// Returns the last field named `name`, ignoring ASCII case.
    pub fn get<N: AsRef<[u8]>>(&self, name: N) -> Option<&HeaderField> {
        self.index
            .get(&name.as_ref().to_ascii_lowercase())
            .map(|idx| &self.fields[*idx])
    }

    /// Returns the value of the last field named `name` if it is valid UTF-8.
    pub fn get_str<N: AsRef<[u8]>>(&self, name: N) -> Option<&str> {
        self.get(name).and_then(HeaderField::value_str)
    }

    pub fn contains<N: AsRef<[u8]>>(&self, name: N) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HeaderField> {
        self.fields.iter()
    }

    /// Converts the fields to an [`http::HeaderMap`], keeping repeated names.
    pub fn to_header_map(&self) -> crate::Result<HeaderMap> {
        let mut headers = HeaderMap::with_capacity(self.fields.len());

        for field in &self.fields {
            let name = HeaderName::from_bytes(&field.name).map_err(|err| crate::Error::DecodeHeaderName {
                name: String::from_utf8_lossy(&field.name).into_owned(),
                cause: err.into(),
            })?;

            let value = HeaderValue::try_from(field.value.as_slice()).map_err(|err| {
                crate::Error::DecodeHeaderValue {
                    value: field.value.clone(),
                    cause: err.into(),
                }
            })?;

            headers.append(name, value);
        }

        Ok(headers)
    }

    pub(crate) fn push(&mut self, field: HeaderField) {
        self.index.insert(field.name.to_ascii_lowercase(), self.fields.len());
        self.fields.push(field);
    }

    /// Appends folded text to the most recently parsed field.
    pub(crate) fn continue_last(&mut self, line: &[u8]) -> crate::Result<()> {
        match self.fields.last_mut() {
            Some(field) => {
                field.value.extend_from_slice(line.trim_ascii());
                Ok(())
            }
            None => Err(crate::Error::UnexpectedContinuation),
        }
    }

    pub(crate) fn clear(&mut self) {
        self.fields.clear();
        self.index.clear();
    }
}

impl<'a> IntoIterator for &'a HeaderSet {
    type Item = &'a HeaderField;
    type IntoIter = std::slice::Iter<'a, HeaderField>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
