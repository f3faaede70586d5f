//! TLV primitive codec: VAR-NUMBER and nonNegativeInteger encodings.
//!
//! A VAR-NUMBER is encoded in 1, 3, 5 or 9 octets:
//! - `0..=252`: the octet itself
//! - `253`: followed by a 2-octet big-endian number
//! - `254`: followed by a 4-octet big-endian number
//! - `255`: followed by an 8-octet big-endian number
//!
//! The writer always produces the shortest form. Readers take a cursor
//! (`&mut &[u8]`) and advance it past the consumed octets on success.

use std::io::{self, Read};

use bytes::BufMut;

use crate::error::{Error, Result};

/// Marker octet for a 2-octet VAR-NUMBER.
pub const VAR_NUMBER_2: u8 = 253;
/// Marker octet for a 4-octet VAR-NUMBER.
pub const VAR_NUMBER_4: u8 = 254;
/// Marker octet for an 8-octet VAR-NUMBER.
pub const VAR_NUMBER_8: u8 = 255;

/// Width in octets of the number following a VAR-NUMBER marker, or `None`
/// when the first octet is the value itself.
fn trailing_width(first: u8) -> Option<usize> {
    match first {
        VAR_NUMBER_2 => Some(2),
        VAR_NUMBER_4 => Some(4),
        VAR_NUMBER_8 => Some(8),
        _ => None,
    }
}

fn be_u64(octets: &[u8]) -> u64 {
    octets.iter().fold(0u64, |acc, b| (acc << 8) | u64::from(*b))
}

fn insufficient_data() -> Error {
    Error::Format("insufficient data during TLV processing".into())
}

fn check_type(number: u64) -> Result<u32> {
    u32::try_from(number)
        .map_err(|_| Error::Format("TLV type code exceeds allowed maximum".into()))
}

/// Read a VAR-NUMBER without raising.
///
/// Returns `None` if the encoding is truncated; the cursor is left untouched
/// in that case.
pub fn try_read_var_number(input: &mut &[u8]) -> Option<u64> {
    let (&first, rest) = input.split_first()?;
    let number = match trailing_width(first) {
        None => {
            *input = rest;
            return Some(u64::from(first));
        }
        Some(width) => {
            if rest.len() < width {
                return None;
            }
            let (octets, rest) = rest.split_at(width);
            *input = rest;
            be_u64(octets)
        }
    };
    Some(number)
}

/// Read a VAR-NUMBER.
pub fn read_var_number(input: &mut &[u8]) -> Result<u64> {
    try_read_var_number(input).ok_or_else(insufficient_data)
}

/// Read a TLV-TYPE without raising.
///
/// Returns `None` on truncation or if the number does not fit in 32 bits.
pub fn try_read_type(input: &mut &[u8]) -> Option<u32> {
    let mut cursor = *input;
    let number = try_read_var_number(&mut cursor)?;
    let tlv_type = u32::try_from(number).ok()?;
    *input = cursor;
    Some(tlv_type)
}

/// Read a TLV-TYPE: a VAR-NUMBER that must fit in 32 bits.
pub fn read_type(input: &mut &[u8]) -> Result<u32> {
    check_type(read_var_number(input)?)
}

fn map_eof(e: io::Error) -> Error {
    if e.kind() == io::ErrorKind::UnexpectedEof {
        insufficient_data()
    } else {
        Error::Io(e)
    }
}

/// Read a VAR-NUMBER from a blocking byte source, consuming only its octets.
pub fn read_var_number_from<R: Read + ?Sized>(reader: &mut R) -> Result<u64> {
    let mut first = [0u8; 1];
    reader.read_exact(&mut first).map_err(map_eof)?;

    match trailing_width(first[0]) {
        None => Ok(u64::from(first[0])),
        Some(width) => {
            let mut octets = [0u8; 8];
            reader.read_exact(&mut octets[..width]).map_err(map_eof)?;
            Ok(be_u64(&octets[..width]))
        }
    }
}

/// Read a TLV-TYPE from a blocking byte source.
pub fn read_type_from<R: Read + ?Sized>(reader: &mut R) -> Result<u32> {
    check_type(read_var_number_from(reader)?)
}

/// Read a VAR-NUMBER from an async byte source, consuming only its octets.
#[cfg(feature = "tokio")]
pub async fn read_var_number_async<R>(reader: &mut R) -> Result<u64>
where
    R: tokio::io::AsyncRead + Unpin + ?Sized,
{
    use tokio::io::AsyncReadExt;

    let first = reader.read_u8().await.map_err(map_eof)?;
    match trailing_width(first) {
        None => Ok(u64::from(first)),
        Some(width) => {
            let mut octets = [0u8; 8];
            reader
                .read_exact(&mut octets[..width])
                .await
                .map_err(map_eof)?;
            Ok(be_u64(&octets[..width]))
        }
    }
}

/// Read a TLV-TYPE from an async byte source.
#[cfg(feature = "tokio")]
pub async fn read_type_async<R>(reader: &mut R) -> Result<u32>
where
    R: tokio::io::AsyncRead + Unpin + ?Sized,
{
    check_type(read_var_number_async(reader).await?)
}

/// Number of octets `write_var_number` produces for `number`.
pub const fn size_of_var_number(number: u64) -> usize {
    if number < VAR_NUMBER_2 as u64 {
        1
    } else if number <= 0xffff {
        3
    } else if number <= 0xffff_ffff {
        5
    } else {
        9
    }
}

/// Append the shortest VAR-NUMBER encoding of `number`.
///
/// Returns the number of octets written.
pub fn write_var_number<B: BufMut>(buf: &mut B, number: u64) -> usize {
    if number < VAR_NUMBER_2 as u64 {
        buf.put_u8(number as u8);
    } else if number <= 0xffff {
        buf.put_u8(VAR_NUMBER_2);
        buf.put_u16(number as u16);
    } else if number <= 0xffff_ffff {
        buf.put_u8(VAR_NUMBER_4);
        buf.put_u32(number as u32);
    } else {
        buf.put_u8(VAR_NUMBER_8);
        buf.put_u64(number);
    }
    size_of_var_number(number)
}

/// Size of the TLV header (type + length) for an element.
pub const fn size_of_header(tlv_type: u32, value_size: usize) -> usize {
    size_of_var_number(tlv_type as u64) + size_of_var_number(value_size as u64)
}

/// Decode a nonNegativeInteger occupying the whole of `value`.
///
/// Only 1, 2, 4 and 8 octet encodings are valid.
pub fn read_non_negative_integer(value: &[u8]) -> Result<u64> {
    match value.len() {
        1 | 2 | 4 | 8 => Ok(be_u64(value)),
        n => Err(Error::Format(format!(
            "invalid length {} for nonNegativeInteger (only 1, 2, 4, and 8 are allowed)",
            n
        ))),
    }
}

/// Number of octets `write_non_negative_integer` produces for `number`.
pub const fn size_of_non_negative_integer(number: u64) -> usize {
    if number <= 0xff {
        1
    } else if number <= 0xffff {
        2
    } else if number <= 0xffff_ffff {
        4
    } else {
        8
    }
}

/// Append the shortest nonNegativeInteger encoding of `number`.
///
/// Returns the number of octets written.
pub fn write_non_negative_integer<B: BufMut>(buf: &mut B, number: u64) -> usize {
    let size = size_of_non_negative_integer(number);
    match size {
        1 => buf.put_u8(number as u8),
        2 => buf.put_u16(number as u16),
        4 => buf.put_u32(number as u32),
        _ => buf.put_u64(number),
    }
    size
}
