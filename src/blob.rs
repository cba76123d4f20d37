//! Bounds-checked byte range primitives for reading and writing nested resource blobs.
//!
//! Reading goes through [`BlobReader`], which never touches bytes outside the source slice.
//! Writing goes through a [`BlobSink`]: [`BlobSizer`] only accumulates the total length,
//! [`BlobWriter`] appends the bytes. Both apply the same 4-byte padding rule so a traversal
//! run against either produces the same layout.

use alloc::{format, string::String, vec::Vec};

use zerocopy::FromBytes;

use crate::{errors::*, util::*};

/// Half-open byte range `[begin, end)` relative to the start of the source blob.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub(crate) struct Range {
    pub begin: usize,
    pub end:   usize,
}
impl Range {
    pub const fn new(begin: usize, end: usize) -> Self { Self { begin, end } }
}

pub(crate) struct BlobReader<'a> {
    src: &'a [u8],
}
impl<'a> BlobReader<'a> {
    pub fn new(src: &'a [u8]) -> Self { Self { src } }

    /// Advance the range start to the next 4-byte boundary.
    pub fn align(&self, range: &mut Range) -> Result<(), ReadError> {
        range.begin = aligned_to(range.begin, 4);
        if range.begin > range.end {
            return Err(ReadError(format!(
                "alignment to {:#x} passes range end {:#x}",
                range.begin, range.end
            )));
        }
        Ok(())
    }

    /// Returns the bytes of `pos`, which has to be non-empty and lie inside `bound`.
    pub fn copy(&self, pos: Range, bound: Range) -> Result<&'a [u8], ReadError> {
        if pos.begin < pos.end && pos.end <= bound.end && bound.begin <= pos.begin {
            if let Some(data) = self.src.get(pos.begin..pos.end) {
                return Ok(data);
            }
        }
        Err(ReadError(format!(
            "range {:#x}..{:#x} outside {:#x}..{:#x}",
            pos.begin, pos.end, bound.begin, bound.end
        )))
    }

    /// Read a value of type `T` from the start of `range`.
    pub fn read<T: FromBytes + Copy>(&self, begin: usize, bound: Range) -> Result<T, ReadError> {
        let pos = Range::new(begin, begin + core::mem::size_of::<T>());
        read::<T>(self.copy(pos, bound)?)
    }

    /// Read a zero-terminated UTF-16 string from the start of `range`.
    ///
    /// # Returns
    /// The string and the number of bytes consumed including the terminator.
    pub fn string(&self, range: Range) -> Result<(String, usize), ReadError> {
        if range.begin & 1 != 0 || range.begin > range.end {
            return Err(ReadError(format!("misaligned string at {:#x}", range.begin)));
        }
        let end = range.end.min(self.src.len());
        let mut units = Vec::new();
        let mut pos = range.begin;
        while pos + 2 <= end {
            let unit = u16::from_le_bytes([self.src[pos], self.src[pos + 1]]);
            if unit == 0 {
                let string = String::from_utf16(&units).map_err(|_| {
                    ReadError(format!("invalid utf16 string at {:#x}", range.begin))
                })?;
                return Ok((string, pos + 2 - range.begin));
            }
            units.push(unit);
            pos += 2;
        }
        Err(ReadError(format!("unterminated string at {:#x}", range.begin)))
    }
}

/// Output of a resource blob traversal.
pub(crate) trait BlobSink {
    /// Returns the number of bytes written so far.
    fn position(&self) -> usize;

    /// Pad the output with zeros to the next 4-byte boundary.
    fn padding(&mut self);

    fn append(&mut self, data: &[u8]);

    /// Append a zero-terminated UTF-16 string.
    fn append_string(&mut self, string: &str) { self.append(&string_to_u16(string)); }
}

/// Sink that only measures the output length.
#[derive(Debug, Default)]
pub(crate) struct BlobSizer {
    total: usize,
}
impl BlobSink for BlobSizer {
    fn position(&self) -> usize { self.total }

    fn padding(&mut self) { self.total = aligned_to(self.total, 4); }

    fn append(&mut self, data: &[u8]) { self.total += data.len(); }

    fn append_string(&mut self, string: &str) {
        self.total += string.encode_utf16().count() * 2 + 2;
    }
}

/// Sink that appends the output to a byte buffer.
#[derive(Debug, Default)]
pub(crate) struct BlobWriter {
    data: Vec<u8>,
}
impl BlobWriter {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    pub fn into_inner(self) -> Vec<u8> { self.data }
}
impl BlobSink for BlobWriter {
    fn position(&self) -> usize { self.data.len() }

    fn padding(&mut self) {
        let padded = aligned_to(self.data.len(), 4);
        self.data.resize(padded, 0);
    }

    fn append(&mut self, data: &[u8]) { self.data.extend_from_slice(data); }
}
