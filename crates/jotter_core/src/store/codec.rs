//! Binary codec for the backing file.
//!
//! # Responsibility
//! - Encode an ordered note collection into the private file layout.
//! - Decode that layout back, rejecting any truncated or malformed input.
//!
//! # Invariants
//! - Integers are little-endian.
//! - Strings are a 7-bit varint byte length followed by UTF-8 bytes.
//! - Decoding consumes the whole buffer; trailing bytes are malformed.
//!
//! Layout:
//! ```text
//! i32                note_count
//! note_count x {
//!     string         title
//!     string         content
//!     i64            created
//!     u8             has_modified (0 | 1)
//!     i64            modified      (only when has_modified = 1)
//! }
//! ```

use crate::model::note::{Note, TimestampOrderError};
use std::error::Error;
use std::fmt::{Display, Formatter};

const MAX_VARINT_BYTES: usize = 5;

/// Encode-side failure. Only oversized inputs can fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// Collection does not fit the `i32` header.
    TooManyNotes(usize),
    /// One string field does not fit the `i32` length prefix.
    FieldTooLong { field: &'static str, len: usize },
}

impl Display for EncodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooManyNotes(count) => {
                write!(f, "note count {count} exceeds the file header limit")
            }
            Self::FieldTooLong { field, len } => {
                write!(f, "{field} is {len} bytes, exceeding the length prefix limit")
            }
        }
    }
}

impl Error for EncodeError {}

/// Decode-side failure for truncated or malformed files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Input ended while reading `field`.
    UnexpectedEof { field: &'static str, offset: usize },
    /// Header count is negative.
    NegativeCount(i32),
    /// Length prefix is overlong or larger than `i32::MAX`.
    InvalidLength { field: &'static str, offset: usize },
    /// String bytes are not valid UTF-8.
    InvalidUtf8 { field: &'static str, offset: usize },
    /// `has_modified` byte is neither 0 nor 1.
    InvalidFlag { value: u8, offset: usize },
    /// Record violates `modified >= created`.
    TimestampOrder {
        record: usize,
        source: TimestampOrderError,
    },
    /// Bytes remain after the last declared record.
    TrailingBytes(usize),
}

impl Display for DecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnexpectedEof { field, offset } => {
                write!(f, "unexpected end of data reading {field} at byte {offset}")
            }
            Self::NegativeCount(count) => write!(f, "negative note count {count}"),
            Self::InvalidLength { field, offset } => {
                write!(f, "invalid length prefix for {field} at byte {offset}")
            }
            Self::InvalidUtf8 { field, offset } => {
                write!(f, "invalid UTF-8 in {field} at byte {offset}")
            }
            Self::InvalidFlag { value, offset } => {
                write!(f, "invalid has_modified flag {value} at byte {offset}")
            }
            Self::TimestampOrder { record, source } => {
                write!(f, "record {record}: {source}")
            }
            Self::TrailingBytes(count) => {
                write!(f, "{count} trailing bytes after last record")
            }
        }
    }
}

impl Error for DecodeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::TimestampOrder { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Encodes the collection into the backing file layout.
///
/// # Errors
/// - Returns `EncodeError` when a count or length exceeds `i32::MAX`.
pub fn encode_notes<'a, I>(notes: I) -> Result<Vec<u8>, EncodeError>
where
    I: IntoIterator<Item = &'a Note>,
    I::IntoIter: ExactSizeIterator,
{
    let notes = notes.into_iter();
    let count =
        i32::try_from(notes.len()).map_err(|_| EncodeError::TooManyNotes(notes.len()))?;

    let mut out = Vec::new();
    out.extend_from_slice(&count.to_le_bytes());
    for note in notes {
        write_string(&mut out, "title", &note.title)?;
        write_string(&mut out, "content", &note.content)?;
        out.extend_from_slice(&note.created().to_le_bytes());
        match note.modified() {
            Some(modified) => {
                out.push(1);
                out.extend_from_slice(&modified.to_le_bytes());
            }
            None => out.push(0),
        }
    }
    Ok(out)
}

/// Decodes a full backing file buffer.
///
/// # Errors
/// - Returns `DecodeError` for any truncation, malformed field or trailing data.
pub fn decode_notes(bytes: &[u8]) -> Result<Vec<Note>, DecodeError> {
    let mut reader = Reader::new(bytes);
    let count = reader.read_i32("note_count")?;
    if count < 0 {
        return Err(DecodeError::NegativeCount(count));
    }

    // Every record takes at least 2 + 8 + 1 bytes.
    let capacity = (count as usize).min(bytes.len() / 11);
    let mut notes = Vec::with_capacity(capacity);
    for record in 0..count as usize {
        let title = reader.read_string("title")?;
        let content = reader.read_string("content")?;
        let created = reader.read_i64("created")?;
        let modified = if reader.read_flag()? {
            Some(reader.read_i64("modified")?)
        } else {
            None
        };
        let note = Note::restore(title, content, created, modified)
            .map_err(|source| DecodeError::TimestampOrder { record, source })?;
        notes.push(note);
    }

    match reader.remaining() {
        0 => Ok(notes),
        extra => Err(DecodeError::TrailingBytes(extra)),
    }
}

fn write_string(out: &mut Vec<u8>, field: &'static str, value: &str) -> Result<(), EncodeError> {
    let bytes = value.as_bytes();
    let len = u32::try_from(bytes.len())
        .ok()
        .filter(|len| *len <= i32::MAX as u32)
        .ok_or(EncodeError::FieldTooLong {
            field,
            len: bytes.len(),
        })?;
    write_varint(out, len);
    out.extend_from_slice(bytes);
    Ok(())
}

fn write_varint(out: &mut Vec<u8>, mut value: u32) {
    while value >= 0x80 {
        out.push((value as u8) | 0x80);
        value >>= 7;
    }
    out.push(value as u8);
}

struct Reader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.offset
    }

    fn take(&mut self, len: usize, field: &'static str) -> Result<&'a [u8], DecodeError> {
        if self.remaining() < len {
            return Err(DecodeError::UnexpectedEof {
                field,
                offset: self.offset,
            });
        }
        let slice = &self.bytes[self.offset..self.offset + len];
        self.offset += len;
        Ok(slice)
    }

    fn take_array<const N: usize>(&mut self, field: &'static str) -> Result<[u8; N], DecodeError> {
        let mut buf = [0u8; N];
        buf.copy_from_slice(self.take(N, field)?);
        Ok(buf)
    }

    fn read_i32(&mut self, field: &'static str) -> Result<i32, DecodeError> {
        self.take_array::<4>(field).map(i32::from_le_bytes)
    }

    fn read_i64(&mut self, field: &'static str) -> Result<i64, DecodeError> {
        self.take_array::<8>(field).map(i64::from_le_bytes)
    }

    fn read_flag(&mut self) -> Result<bool, DecodeError> {
        let offset = self.offset;
        match self.take_array::<1>("has_modified")?[0] {
            0 => Ok(false),
            1 => Ok(true),
            value => Err(DecodeError::InvalidFlag { value, offset }),
        }
    }

    fn read_varint(&mut self, field: &'static str) -> Result<usize, DecodeError> {
        let start = self.offset;
        let mut value: u64 = 0;
        for index in 0..MAX_VARINT_BYTES {
            let byte = self.take_array::<1>(field)?[0];
            value |= u64::from(byte & 0x7f) << (7 * index);
            if byte & 0x80 == 0 {
                if value > i32::MAX as u64 {
                    break;
                }
                return Ok(value as usize);
            }
        }
        Err(DecodeError::InvalidLength {
            field,
            offset: start,
        })
    }

    fn read_string(&mut self, field: &'static str) -> Result<String, DecodeError> {
        let len = self.read_varint(field)?;
        let offset = self.offset;
        let bytes = self.take(len, field)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| DecodeError::InvalidUtf8 { field, offset })
    }
}

#[cfg(test)]
mod tests {
    use super::{decode_notes, encode_notes, write_varint, DecodeError};
    use crate::model::note::Note;

    #[test]
    fn empty_collection_is_just_the_header() {
        let bytes = encode_notes(&Vec::<Note>::new()).unwrap();
        assert_eq!(bytes, vec![0, 0, 0, 0]);
        assert!(decode_notes(&bytes).unwrap().is_empty());
    }

    #[test]
    fn varint_matches_seven_bit_layout() {
        let mut out = Vec::new();
        write_varint(&mut out, 300);
        assert_eq!(out, vec![0xac, 0x02]);
    }

    #[test]
    fn multi_byte_length_prefix_decodes() {
        let title = "t".repeat(300);
        let bytes = encode_notes(&vec![Note::with_created(title.as_str(), "", 1)]).unwrap();
        assert_eq!(&bytes[4..6], &[0xac, 0x02]);
        assert_eq!(decode_notes(&bytes).unwrap()[0].title, title);
    }

    #[test]
    fn length_prefix_is_capped_at_i32_max() {
        let mut above = 1i32.to_le_bytes().to_vec();
        above.extend_from_slice(&[0x80, 0x80, 0x80, 0x80, 0x08]);
        assert_eq!(
            decode_notes(&above).unwrap_err(),
            DecodeError::InvalidLength {
                field: "title",
                offset: 4
            }
        );

        let mut at_max = 1i32.to_le_bytes().to_vec();
        at_max.extend_from_slice(&[0xff, 0xff, 0xff, 0xff, 0x07]);
        assert_eq!(
            decode_notes(&at_max).unwrap_err(),
            DecodeError::UnexpectedEof {
                field: "title",
                offset: 9
            }
        );
    }

    #[test]
    fn single_note_layout_is_stable() {
        let notes = vec![Note::with_created("A", "hi", 1)];
        let bytes = encode_notes(&notes).unwrap();
        let mut expected = vec![1, 0, 0, 0, 1, b'A', 2, b'h', b'i'];
        expected.extend_from_slice(&1i64.to_le_bytes());
        expected.push(0);
        assert_eq!(bytes, expected);
    }

    #[test]
    fn every_truncation_point_is_rejected() {
        let mut edited = Note::with_created("title", "line1\nline2", 10);
        edited.touch(20);
        let bytes = encode_notes(&vec![edited, Note::with_created("", "", 30)]).unwrap();
        for cut in 0..bytes.len() {
            let err = decode_notes(&bytes[..cut]).unwrap_err();
            assert!(
                matches!(err, DecodeError::UnexpectedEof { .. }),
                "cut at {cut} produced {err:?}"
            );
        }
    }

    #[test]
    fn rejects_negative_count() {
        let bytes = (-1i32).to_le_bytes();
        assert_eq!(
            decode_notes(&bytes).unwrap_err(),
            DecodeError::NegativeCount(-1)
        );
    }

    #[test]
    fn rejects_invalid_flag_byte() {
        let mut bytes = encode_notes(&vec![Note::with_created("a", "b", 1)]).unwrap();
        let last = bytes.len() - 1;
        bytes[last] = 7;
        assert!(matches!(
            decode_notes(&bytes).unwrap_err(),
            DecodeError::InvalidFlag { value: 7, .. }
        ));
    }

    #[test]
    fn rejects_trailing_bytes() {
        let mut bytes = encode_notes(&Vec::<Note>::new()).unwrap();
        bytes.extend_from_slice(&[0xff, 0xff]);
        assert_eq!(
            decode_notes(&bytes).unwrap_err(),
            DecodeError::TrailingBytes(2)
        );
    }

    #[test]
    fn rejects_invalid_utf8() {
        let mut bytes = 1i32.to_le_bytes().to_vec();
        bytes.extend_from_slice(&[2, 0xc3, 0x28]);
        assert!(matches!(
            decode_notes(&bytes).unwrap_err(),
            DecodeError::InvalidUtf8 { field: "title", .. }
        ));
    }

    #[test]
    fn rejects_overlong_length_prefix() {
        let mut bytes = 1i32.to_le_bytes().to_vec();
        bytes.extend_from_slice(&[0xff, 0xff, 0xff, 0xff, 0xff, 0x01]);
        assert!(matches!(
            decode_notes(&bytes).unwrap_err(),
            DecodeError::InvalidLength { field: "title", .. }
        ));
    }

    #[test]
    fn rejects_modified_before_created() {
        let mut bytes = 1i32.to_le_bytes().to_vec();
        bytes.extend_from_slice(&[0, 0]);
        bytes.extend_from_slice(&100i64.to_le_bytes());
        bytes.push(1);
        bytes.extend_from_slice(&50i64.to_le_bytes());
        assert!(matches!(
            decode_notes(&bytes).unwrap_err(),
            DecodeError::TimestampOrder { record: 0, .. }
        ));
    }
}
