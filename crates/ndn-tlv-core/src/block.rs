//! Block: one node of a TLV tree.
//!
//! A Block is held in one of three representations:
//! - **wire-backed**: the element bytes exist in a shared [`Bytes`] buffer,
//!   addressed by an element range and a value range
//! - **value**: a type plus raw value bytes, no header written yet
//! - **structured**: a type plus a list of child Blocks
//!
//! All three encode to the same canonical bytes. Parsing children never
//! copies payload: every child holds a clone of its parent's buffer handle
//! plus its own ranges.
//!
//! ## Concurrency
//!
//! The children cache is a [`OnceLock`], so [`Block::parse`] may be called
//! through a shared reference from any thread. Everything that changes the
//! representation takes `&mut self`.

use std::fmt;
use std::io::Read;
use std::ops::Range;
use std::sync::OnceLock;

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{Error, Result};
use crate::limits::ReadLimits;
use crate::tlv;

/// Type of a default-constructed (empty) Block.
pub const TYPE_INVALID: u32 = u32::MAX;

#[derive(Clone)]
enum Repr {
    Empty,
    Wire {
        buffer: Bytes,
        element: Range<usize>,
        value: Range<usize>,
    },
    Value(Bytes),
    Structured,
}

/// A TLV element.
#[derive(Clone)]
pub struct Block {
    tlv_type: u32,
    repr: Repr,
    elements: OnceLock<Vec<Block>>,
}

impl Default for Block {
    fn default() -> Self {
        Self {
            tlv_type: TYPE_INVALID,
            repr: Repr::Empty,
            elements: OnceLock::new(),
        }
    }
}

/// Decode a TLV header without raising.
///
/// Returns `(type, header_len, value_len)` when the header is complete and
/// the declared value fits in `input`.
fn peek_header(input: &[u8]) -> Option<(u32, usize, usize)> {
    let mut cursor = input;
    let tlv_type = tlv::try_read_type(&mut cursor)?;
    let length = tlv::try_read_var_number(&mut cursor)?;
    let length = usize::try_from(length).ok().filter(|l| *l <= cursor.len())?;
    Some((tlv_type, input.len() - cursor.len(), length))
}

impl Block {
    // ─────────────────────────────────────────────────────────────────────────
    // Construction
    // ─────────────────────────────────────────────────────────────────────────

    fn from_parts(buffer: Bytes, tlv_type: u32, element: Range<usize>, value: Range<usize>) -> Self {
        Self {
            tlv_type,
            repr: Repr::Wire {
                buffer,
                element,
                value,
            },
            elements: OnceLock::new(),
        }
    }

    /// Create a wire-backed Block from a buffer holding exactly one element.
    ///
    /// The buffer is shared, not copied.
    pub fn from_bytes(buffer: Bytes) -> Result<Self> {
        let end = buffer.len();
        Self::from_range(buffer, 0..end, true)
    }

    /// Create a wire-backed Block over `range` of a shared buffer.
    ///
    /// With `verify_length` set, the declared length must consume the rest of
    /// the range exactly. Without it, the value is whatever follows the
    /// header up to `range.end`.
    pub fn from_range(buffer: Bytes, range: Range<usize>, verify_length: bool) -> Result<Self> {
        if range.start > range.end || range.end > buffer.len() {
            return Err(Error::Format(format!(
                "element range {:?} lies outside a buffer of {} bytes",
                range,
                buffer.len()
            )));
        }

        let mut cursor = &buffer[range.clone()];
        let tlv_type = tlv::read_type(&mut cursor)?;
        let length = tlv::read_var_number(&mut cursor)?;
        if verify_length && length != cursor.len() as u64 {
            return Err(Error::Format("TLV length doesn't match buffer length".into()));
        }

        let value_start = range.end - cursor.len();
        let value_end = range.end;
        Ok(Self::from_parts(buffer, tlv_type, range, value_start..value_end))
    }

    /// Create a Block from the front of an untrusted slice.
    ///
    /// Only the octets of this one element are copied into a new buffer, so
    /// the Block does not borrow from `input`. Trailing octets are ignored.
    pub fn from_slice(input: &[u8]) -> Result<Self> {
        let mut cursor = input;
        let tlv_type = tlv::read_type(&mut cursor)?;
        let length = tlv::read_var_number(&mut cursor)?;
        if length > cursor.len() as u64 {
            return Err(Error::Format(
                "not enough data in the buffer to fully parse TLV".into(),
            ));
        }

        let header_len = input.len() - cursor.len();
        let end = header_len + length as usize;
        let buffer = Bytes::copy_from_slice(&input[..end]);
        Ok(Self::from_parts(buffer, tlv_type, 0..end, header_len..end))
    }

    /// Try to extract the element starting at `offset` of a shared buffer.
    ///
    /// Returns `None` if the header is truncated or the declared length runs
    /// past the end of the buffer. Octets after the element are allowed.
    pub fn try_from_shared(buffer: &Bytes, offset: usize) -> Option<Self> {
        let (tlv_type, header_len, length) = peek_header(buffer.get(offset..)?)?;
        let value_start = offset + header_len;
        let end = value_start + length;
        Some(Self::from_parts(
            buffer.clone(),
            tlv_type,
            offset..end,
            value_start..end,
        ))
    }

    /// Try to extract the element at the front of a slice, copying it.
    pub fn try_from_slice(input: &[u8]) -> Option<Self> {
        let (tlv_type, header_len, length) = peek_header(input)?;
        let end = header_len + length;
        let buffer = Bytes::copy_from_slice(&input[..end]);
        Some(Self::from_parts(buffer, tlv_type, 0..end, header_len..end))
    }

    /// Read one Block from a blocking byte source using default limits.
    pub fn from_reader<R: Read>(reader: &mut R) -> Result<Self> {
        Self::from_reader_with(reader, &ReadLimits::default())
    }

    /// Read one Block from a blocking byte source.
    ///
    /// The declared length is checked against `limits` before any value
    /// octet is read, and no octet past the element is consumed.
    pub fn from_reader_with<R: Read>(reader: &mut R, limits: &ReadLimits) -> Result<Self> {
        let tlv_type = tlv::read_type_from(reader)?;
        let length = limits.check_length(tlv::read_var_number_from(reader)?)?;

        let mut value = Vec::with_capacity(length);
        reader.by_ref().take(length as u64).read_to_end(&mut value)?;
        if value.len() != length {
            tracing::debug!(expected = length, got = value.len(), "short read of block from stream");
            return Err(Error::Format(
                "not enough data in the buffer to fully parse TLV".into(),
            ));
        }

        Ok(Self::encode_value(tlv_type, &value))
    }

    /// Read one Block from an async byte source using default limits.
    #[cfg(feature = "tokio")]
    pub async fn from_async_reader<R>(reader: &mut R) -> Result<Self>
    where
        R: tokio::io::AsyncRead + Unpin,
    {
        Self::from_async_reader_with(reader, &ReadLimits::default()).await
    }

    /// Read one Block from an async byte source.
    ///
    /// Same contract as [`Block::from_reader_with`].
    #[cfg(feature = "tokio")]
    pub async fn from_async_reader_with<R>(reader: &mut R, limits: &ReadLimits) -> Result<Self>
    where
        R: tokio::io::AsyncRead + Unpin,
    {
        use tokio::io::AsyncReadExt;

        let tlv_type = tlv::read_type_async(reader).await?;
        let length = limits.check_length(tlv::read_var_number_async(reader).await?)?;

        let mut value = Vec::with_capacity(length);
        (&mut *reader)
            .take(length as u64)
            .read_to_end(&mut value)
            .await?;
        if value.len() != length {
            tracing::debug!(expected = length, got = value.len(), "short read of block from stream");
            return Err(Error::Format(
                "not enough data in the buffer to fully parse TLV".into(),
            ));
        }

        Ok(Self::encode_value(tlv_type, &value))
    }

    /// Create a structured Block with a type and an empty value.
    pub fn with_type(tlv_type: u32) -> Self {
        Self {
            tlv_type,
            repr: Repr::Structured,
            elements: OnceLock::new(),
        }
    }

    /// Create a structured Block with a type and raw value bytes.
    pub fn with_value(tlv_type: u32, value: impl Into<Bytes>) -> Self {
        Self {
            tlv_type,
            repr: Repr::Value(value.into()),
            elements: OnceLock::new(),
        }
    }

    /// Create a Block whose value is the whole element of another Block.
    ///
    /// The other Block must be wire-backed; its buffer is shared, not copied.
    pub fn with_block_value(tlv_type: u32, value: &Block) -> Result<Self> {
        let element = value
            .wire_bytes()
            .ok_or_else(|| Error::Encoding("underlying value buffer is empty".into()))?;
        Ok(Self::with_value(tlv_type, element))
    }

    /// Build a wire-backed Block by writing `tlv_type`, the length of `value`
    /// and `value` into a fresh buffer.
    pub fn encode_value(tlv_type: u32, value: &[u8]) -> Self {
        let mut buf = BytesMut::with_capacity(tlv::size_of_header(tlv_type, value.len()) + value.len());
        let header_len = write_header(&mut buf, tlv_type, value.len());
        buf.put_slice(value);

        let buffer = buf.freeze();
        let end = buffer.len();
        Self::from_parts(buffer, tlv_type, 0..end, header_len..end)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// The TLV type, [`TYPE_INVALID`] for an empty Block.
    pub fn tlv_type(&self) -> u32 {
        self.tlv_type
    }

    /// Whether this is a default-constructed (or reset) Block.
    pub fn is_empty(&self) -> bool {
        matches!(self.repr, Repr::Empty)
    }

    /// Whether the element bytes already exist.
    pub fn has_wire(&self) -> bool {
        matches!(self.repr, Repr::Wire { .. })
    }

    /// Whether the Block holds value bytes (raw or as part of its wire form).
    pub fn has_value(&self) -> bool {
        matches!(self.repr, Repr::Wire { .. } | Repr::Value(_))
    }

    /// Size of the whole element in bytes.
    ///
    /// Known for wire-backed Blocks and computed from the header sizes for
    /// raw-value Blocks. Structured Blocks must be encoded first.
    pub fn size(&self) -> Result<usize> {
        match &self.repr {
            Repr::Wire { element, .. } => Ok(element.len()),
            Repr::Value(value) => Ok(tlv::size_of_header(self.tlv_type, value.len()) + value.len()),
            Repr::Structured | Repr::Empty => Err(Error::Encoding(
                "block size cannot be determined (undefined block size)".into(),
            )),
        }
    }

    /// Size of the value in bytes.
    pub fn value_size(&self) -> usize {
        self.value().len()
    }

    /// The whole element, if wire-backed.
    pub fn wire(&self) -> Option<&[u8]> {
        match &self.repr {
            Repr::Wire {
                buffer, element, ..
            } => Some(&buffer[element.clone()]),
            _ => None,
        }
    }

    /// The whole element as a shared buffer slice, if wire-backed.
    pub fn wire_bytes(&self) -> Option<Bytes> {
        match &self.repr {
            Repr::Wire {
                buffer, element, ..
            } => Some(buffer.slice(element.clone())),
            _ => None,
        }
    }

    /// The value bytes; empty for structured Blocks.
    pub fn value(&self) -> &[u8] {
        match &self.repr {
            Repr::Wire { buffer, value, .. } => &buffer[value.clone()],
            Repr::Value(value) => &value[..],
            Repr::Structured | Repr::Empty => &[],
        }
    }

    /// The value bytes as a shared buffer slice.
    pub fn value_bytes(&self) -> Bytes {
        match &self.repr {
            Repr::Wire { buffer, value, .. } => buffer.slice(value.clone()),
            Repr::Value(value) => value.clone(),
            Repr::Structured | Repr::Empty => Bytes::new(),
        }
    }

    /// Buffer and range holding the value, for representations that have one.
    fn value_view(&self) -> Option<(&Bytes, Range<usize>)> {
        match &self.repr {
            Repr::Wire { buffer, value, .. } => Some((buffer, value.clone())),
            Repr::Value(value) => Some((value, 0..value.len())),
            Repr::Structured | Repr::Empty => None,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Parsing
    // ─────────────────────────────────────────────────────────────────────────

    /// Decompose the value into direct children, once.
    ///
    /// A no-op if children are already cached or the value is empty. On
    /// failure nothing is cached.
    pub fn parse(&self) -> Result<()> {
        if self.elements.get().is_some() {
            return Ok(());
        }
        let Some((buffer, value)) = self.value_view() else {
            return Ok(());
        };
        if value.is_empty() {
            return Ok(());
        }

        let children = scan_children(buffer, value).map_err(|e| {
            tracing::debug!(tlv_type = self.tlv_type, error = %e, "failed to parse block value");
            e
        })?;
        // A concurrent parse stored identical children first.
        let _ = self.elements.set(children);
        Ok(())
    }

    /// The direct children, parsing the value if needed.
    pub fn elements(&self) -> Result<&[Block]> {
        self.parse()?;
        Ok(self.cached_elements())
    }

    fn cached_elements(&self) -> &[Block] {
        self.elements.get().map(Vec::as_slice).unwrap_or(&[])
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Encoding
    // ─────────────────────────────────────────────────────────────────────────

    /// Produce the wire form from the current representation.
    ///
    /// A no-op for wire-backed Blocks. Children must already be wire-backed
    /// or carry a raw value; nested structured children are not encoded
    /// recursively. On failure the Block is unchanged.
    pub fn encode(&mut self) -> Result<()> {
        let buffer = match &self.repr {
            Repr::Wire { .. } => return Ok(()),
            Repr::Empty => {
                return Err(Error::Encoding("cannot encode a block without a type".into()));
            }
            Repr::Value(value) => {
                let mut buf = BytesMut::with_capacity(
                    tlv::size_of_header(self.tlv_type, value.len()) + value.len(),
                );
                write_header(&mut buf, self.tlv_type, value.len());
                buf.put_slice(value);
                buf.freeze()
            }
            Repr::Structured => encode_children(self.tlv_type, self.cached_elements())
                .map_err(|e| {
                    tracing::debug!(tlv_type = self.tlv_type, error = %e, "failed to encode block");
                    e
                })?,
        };

        let mut cursor = &buffer[..];
        tlv::read_type(&mut cursor)?;
        tlv::read_var_number(&mut cursor)?;
        let value_start = buffer.len() - cursor.len();
        let end = buffer.len();

        self.repr = Repr::Wire {
            buffer,
            element: 0..end,
            value: value_start..end,
        };
        Ok(())
    }

    /// Encode and return the Block.
    pub fn encoded(mut self) -> Result<Self> {
        self.encode()?;
        Ok(self)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Query & mutation
    // ─────────────────────────────────────────────────────────────────────────

    /// The first child of the given type.
    pub fn get(&self, tlv_type: u32) -> Result<&Block> {
        self.elements()?
            .iter()
            .find(|child| child.tlv_type == tlv_type)
            .ok_or(Error::NotFound { tlv_type })
    }

    /// The first materialized child of the given type.
    ///
    /// Searches only children that already exist (structured children or a
    /// previous [`Block::parse`]); it never parses. On a freshly decoded
    /// Block call [`Block::parse`] first, or use [`Block::get`].
    pub fn find(&self, tlv_type: u32) -> Option<&Block> {
        self.cached_elements()
            .iter()
            .find(|child| child.tlv_type == tlv_type)
    }

    /// Drop every child of the given type, keeping the order of the rest.
    ///
    /// The wire form is discarded; call [`Block::encode`] to rebuild it.
    pub fn remove(&mut self, tlv_type: u32) -> Result<()> {
        self.parse()?;
        let mut children = self.elements.take().unwrap_or_default();
        children.retain(|child| child.tlv_type != tlv_type);
        self.reset_wire();
        self.elements = OnceLock::from(children);
        Ok(())
    }

    /// Append a child.
    ///
    /// The wire form is discarded; call [`Block::encode`] to rebuild it.
    pub fn push(&mut self, child: Block) -> Result<()> {
        self.parse()?;
        let mut children = self.elements.take().unwrap_or_default();
        children.push(child);
        self.reset_wire();
        self.elements = OnceLock::from(children);
        Ok(())
    }

    /// Interpret the value as exactly one nested element.
    ///
    /// The returned Block shares this Block's buffer.
    pub fn block_from_value(&self) -> Result<Block> {
        let Some((buffer, value)) = self.value_view().filter(|(_, v)| !v.is_empty()) else {
            return Err(Error::Encoding("underlying value buffer is empty".into()));
        };

        let mut cursor = &buffer[value.clone()];
        let tlv_type = tlv::read_type(&mut cursor)?;
        let length = tlv::read_var_number(&mut cursor)?;
        if length != cursor.len() as u64 {
            return Err(Error::Format("TLV length mismatches buffer length".into()));
        }

        let value_start = value.end - cursor.len();
        let value_end = value.end;
        Ok(Self::from_parts(
            buffer.clone(),
            tlv_type,
            value,
            value_start..value_end,
        ))
    }

    /// Return to the default empty Block, dropping children too.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Drop the wire form and value, keeping the type and cached children.
    pub fn reset_wire(&mut self) {
        if !matches!(self.repr, Repr::Empty) {
            self.repr = Repr::Structured;
        }
    }
}

fn write_header(buf: &mut BytesMut, tlv_type: u32, value_size: usize) -> usize {
    tlv::write_var_number(buf, u64::from(tlv_type)) + tlv::write_var_number(buf, value_size as u64)
}

/// Scan `value` of `buffer` into wire-backed children sharing `buffer`.
fn scan_children(buffer: &Bytes, value: Range<usize>) -> Result<Vec<Block>> {
    let mut children = Vec::new();
    let mut begin = value.start;

    while begin < value.end {
        let mut cursor = &buffer[begin..value.end];
        let tlv_type = tlv::read_type(&mut cursor)?;
        let length = tlv::read_var_number(&mut cursor)?;
        if length > cursor.len() as u64 {
            return Err(Error::Format("TLV length exceeds buffer length".into()));
        }

        let value_begin = value.end - cursor.len();
        let element_end = value_begin + length as usize;
        children.push(Block::from_parts(
            buffer.clone(),
            tlv_type,
            begin..element_end,
            value_begin..element_end,
        ));
        // one level only
        begin = element_end;
    }

    Ok(children)
}

/// Encode a structured Block's header followed by each child element.
fn encode_children(tlv_type: u32, children: &[Block]) -> Result<Bytes> {
    let mut value_size = 0;
    for child in children {
        if !child.has_value() {
            return Err(Error::Encoding("underlying value buffer is empty".into()));
        }
        value_size += child.size()?;
    }

    let mut buf = BytesMut::with_capacity(tlv::size_of_header(tlv_type, value_size) + value_size);
    write_header(&mut buf, tlv_type, value_size);
    for child in children {
        match &child.repr {
            Repr::Wire {
                buffer, element, ..
            } => buf.put_slice(&buffer[element.clone()]),
            Repr::Value(value) => {
                write_header(&mut buf, child.tlv_type, value.len());
                buf.put_slice(value);
            }
            Repr::Structured | Repr::Empty => {
                return Err(Error::Encoding("underlying value buffer is empty".into()));
            }
        }
    }

    Ok(buf.freeze())
}

impl PartialEq for Block {
    /// Blocks are equal when both are wire-backed with identical bytes.
    fn eq(&self, other: &Self) -> bool {
        match (self.wire(), other.wire()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Block");
        s.field("type", &self.tlv_type);
        match &self.repr {
            Repr::Empty => s.field("state", &"empty"),
            Repr::Wire { .. } => s.field("wire", &hex::encode(self.wire().unwrap_or_default())),
            Repr::Value(value) => s.field("value", &hex::encode(value)),
            Repr::Structured => s.field("elements", &self.cached_elements()),
        };
        s.finish()
    }
}

impl TryFrom<&Block> for Bytes {
    type Error = Error;

    fn try_from(block: &Block) -> Result<Self> {
        block
            .wire_bytes()
            .ok_or_else(|| Error::Encoding("block has no wire encoding".into()))
    }
}
