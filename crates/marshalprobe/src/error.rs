//! Error types for each layer of the decoding pipeline.
//!
//! [`EndOfStream`] is the primitive read failure and carries exact byte
//! diagnostics. [`TokenizeError`] is everything the lexer can report.
//! [`ParseError`] is the consumer-facing taxonomy: it deliberately collapses
//! `EndOfStream` into the single [`ParseError::DataTooShort`] condition,
//! because a caller asking for structure has no use for low-level offsets.

use thiserror::Error;

use crate::tokenizer::{MAJOR_VERSION, MINOR_VERSION};

/// A primitive read was attempted past the end of the marshal stream.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("consumed {consumed} bytes, requested {requested} more")]
pub struct EndOfStream {
    /// Bytes of the stream consumed before the failing read.
    pub consumed: usize,
    /// Additional bytes the failing read asked for.
    pub requested: usize,
}

/// A failure while turning the byte stream into tokens.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TokenizeError {
    /// The two-byte version header does not describe a stream this crate can
    /// read. Nothing can be recovered from such a stream.
    #[error(
        "incompatible marshal file format (can't be read): format version {}.{} required; {major}.{minor} given",
        MAJOR_VERSION,
        MINOR_VERSION
    )]
    UnsupportedVersion {
        /// Major version byte found in the stream.
        major: u8,
        /// Minor version byte found in the stream.
        minor: u8,
    },

    /// The stream ended in the middle of a value.
    #[error(transparent)]
    EndOfStream(#[from] EndOfStream),

    /// A byte in type-tag position matched no known type.
    #[error("unknown type 0x{tag:02x}")]
    UnknownTag {
        /// The unrecognized tag byte.
        tag: u8,
    },

    /// A symbol or symbol link was required but another tag was found.
    #[error("expected symbol type, got 0x{tag:02x}")]
    ExpectedSymbol {
        /// The tag byte found instead.
        tag: u8,
    },

    /// A decoded length, element count or table index was negative or does
    /// not fit in memory.
    #[error("invalid count {value}")]
    InvalidCount {
        /// The long decoded where a count was required.
        value: i64,
    },
}

/// A failure while building structure or counting allocations.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// The stream ended before one whole top-level value was decoded.
    #[error("marshal data too short")]
    DataTooShort,

    /// A token in symbol position was neither a symbol nor a symbol link.
    #[error("expected SYMBOL or SYMLINK, got {kind}")]
    ExpectedSymbol {
        /// Kind name of the offending token.
        kind: &'static str,
    },

    /// The token sequence does not have the shape its tags promise.
    #[error("unexpected {kind} token")]
    UnexpectedToken {
        /// Kind name of the offending token.
        kind: &'static str,
    },

    /// The underlying tokenizer failed.
    #[error(transparent)]
    Tokenize(TokenizeError),
}

impl From<TokenizeError> for ParseError {
    fn from(error: TokenizeError) -> Self {
        match error {
            TokenizeError::EndOfStream(_) => Self::DataTooShort,
            other => Self::Tokenize(other),
        }
    }
}
