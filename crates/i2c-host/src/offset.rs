use crate::error::{Error, Result};

/// Widest offset, in bytes, that can precede a payload.
pub const MAX_OFFSET_WIDTH: u32 = 4;

/// A register offset sent to the target device ahead of the payload.
///
/// The width is validated on construction, so every `Offset` encodes to at
/// most [`MAX_OFFSET_WIDTH`] bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Offset {
    width: usize,
    value: u32,
}

impl Offset {
    /// No offset: nothing is sent before the payload.
    pub const NONE: Self = Self { width: 0, value: 0 };

    /// Offset of `width` bytes carrying the low bytes of `value`.
    pub fn new(width: u32, value: u32) -> Result<Self> {
        if width > MAX_OFFSET_WIDTH {
            return Err(Error::InvalidOffsetWidth(width));
        }
        Ok(Self { width: width as usize, value })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    /// Encode the offset most-significant byte first.
    ///
    /// Bytes of `value` above `width` are dropped.
    pub fn encode(&self) -> EncodedOffset {
        EncodedOffset { bytes: self.value.to_be_bytes(), width: self.width }
    }
}

/// Big-endian wire form of an [`Offset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodedOffset {
    bytes: [u8; 4],
    width: usize,
}

impl EncodedOffset {
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes[self.bytes.len() - self.width..]
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0
    }
}
