//! Bounds-checked primitive reads over an in-memory marshal stream.

use crate::error::EndOfStream;

/// A cursor over the raw bytes of a marshal stream.
///
/// Owns the byte slice and a consumed-byte offset. Every higher layer
/// funnels its byte access through the cursor, so the `consumed` count
/// carried by an [`EndOfStream`] error is always exact.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    consumed: usize,
}

impl<'a> ByteCursor<'a> {
    /// Creates a cursor at the start of `data`.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, consumed: 0 }
    }

    /// Number of bytes consumed so far.
    #[must_use]
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Consumes one byte.
    ///
    /// # Errors
    ///
    /// [`EndOfStream`] if the stream is exhausted.
    pub fn byte(&mut self) -> Result<u8, EndOfStream> {
        let Some(&byte) = self.data.get(self.consumed) else {
            return Err(EndOfStream {
                consumed: self.consumed,
                requested: 1,
            });
        };
        self.consumed += 1;
        Ok(byte)
    }

    /// Consumes `count` raw bytes and returns them as a slice of the input.
    ///
    /// # Errors
    ///
    /// [`EndOfStream`] if fewer than `count` bytes remain; `requested`
    /// reports the full size of the failed request.
    pub fn bytes(&mut self, count: usize) -> Result<&'a [u8], EndOfStream> {
        let slice = self
            .consumed
            .checked_add(count)
            .and_then(|end| self.data.get(self.consumed..end));
        let Some(slice) = slice else {
            return Err(EndOfStream {
                consumed: self.consumed,
                requested: count,
            });
        };
        self.consumed += count;
        Ok(slice)
    }

    /// Decodes the marshal signed variable-length integer.
    ///
    /// The leading byte `c` is interpreted as signed: `0` is the value zero;
    /// `1..=4` prefixes that many little-endian magnitude bytes,
    /// zero-extended; `-1..=-4` prefixes `-c` little-endian bytes filled in
    /// over an all-ones word, reconstructing the two's-complement negative;
    /// anything else is a one-byte literal offset by ±5.
    ///
    /// # Errors
    ///
    /// [`EndOfStream`] if a prefixed magnitude byte is missing.
    pub fn long(&mut self) -> Result<i64, EndOfStream> {
        let c = i64::from(self.byte()? as i8);

        match c {
            0 => Ok(0),
            1..=4 => {
                let mut value = 0;
                for i in 0..c {
                    value |= i64::from(self.byte()?) << (8 * i);
                }
                Ok(value)
            }
            5.. => Ok(c - 5),
            -4..=-1 => {
                let mut value = -1;
                for i in 0..-c {
                    let factor = 8 * i;
                    value &= !(0xff << factor);
                    value |= i64::from(self.byte()?) << factor;
                }
                Ok(value)
            }
            _ => Ok(c + 5),
        }
    }
}
