//! Pull-based lexer for marshal streams.
//!
//! The tokenizer is a push-down automaton performing a pre-order traversal
//! of the encoded value tree without recursion. It keeps a LIFO stack of
//! pending obligations, seeded with a single `Any`. Each internal step
//! pops one obligation and either emits a complete token (having consumed
//! exactly that token's bytes) or pushes the obligations implied by what was
//! just read and emits nothing yet. Because no native call frames are held
//! across tokens, scanning can be suspended between any two tokens and
//! resumed by the next pull.
//!
//! The stream is consumed destructively: a `Tokenizer` cannot be restarted
//! or shared, and a fresh one must be constructed to re-scan the same bytes.

use alloc::{vec, vec::Vec};

use bstr::BString;
use num_bigint::{BigInt, Sign};

use crate::{cursor::ByteCursor, error::TokenizeError, token::Token};

/// Supported major marshal version.
pub const MAJOR_VERSION: u8 = 4;

/// Highest supported minor marshal version.
pub const MINOR_VERSION: u8 = 8;

// Type tag bytes of the 4.8 wire format.
const TYPE_NIL: u8 = b'0';
const TYPE_TRUE: u8 = b'T';
const TYPE_FALSE: u8 = b'F';
const TYPE_FIXNUM: u8 = b'i';
const TYPE_EXTENDED: u8 = b'e';
const TYPE_UCLASS: u8 = b'C';
const TYPE_OBJECT: u8 = b'o';
const TYPE_DATA: u8 = b'd';
const TYPE_USERDEF: u8 = b'u';
const TYPE_USRMARSHAL: u8 = b'U';
const TYPE_FLOAT: u8 = b'f';
const TYPE_BIGNUM: u8 = b'l';
const TYPE_STRING: u8 = b'"';
const TYPE_REGEXP: u8 = b'/';
const TYPE_ARRAY: u8 = b'[';
const TYPE_HASH: u8 = b'{';
const TYPE_HASH_DEF: u8 = b'}';
const TYPE_STRUCT: u8 = b'S';
const TYPE_MODULE_OLD: u8 = b'M';
const TYPE_CLASS: u8 = b'c';
const TYPE_MODULE: u8 = b'm';
const TYPE_SYMBOL: u8 = b':';
const TYPE_SYMLINK: u8 = b';';
const TYPE_IVAR: u8 = b'I';
const TYPE_LINK: u8 = b'@';

/// One entry of pending decoding work.
///
/// Obligations carry no state beyond their tag; iteration counts are
/// expanded into repeated `Any` entries when the count is read, so resuming
/// never needs a captured frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Obligation {
    /// A value of any type: read a tag byte and dispatch.
    Any,
    /// A value that must be a symbol or symbol link.
    Sym,
    Fixnum,
    Link,
    SymbolLink,
    Bignum,
    Symbol,
    Class,
    Module,
    ModuleOld,
    String,
    Float,
    Regexp,
    Array,
    Hash,
    HashDefault,
    Pairs,
    /// A single raw byte: a regexp's trailing option flags.
    Byte,
    /// A length-prefixed raw run: a `_dump` payload.
    Bytes,
}

/// A pull-based lexer over one marshal stream.
///
/// Implements [`Iterator`] over `Result<Token, TokenizeError>`. The sequence
/// is finite; it ends when exactly one top-level value has been consumed.
/// After an error the iterator is exhausted; every error is terminal for
/// the current decode.
///
/// # Examples
///
/// ```
/// use marshalprobe::{Token, Tokenizer};
///
/// // version 4.8, array of two elements: true, false
/// let tokens = Tokenizer::new(b"\x04\x08[\x07TF")?;
///
/// assert_eq!(
///     tokens.collect::<Result<Vec<_>, _>>()?,
///     [Token::Array(2), Token::True, Token::False]
/// );
/// # Ok::<(), marshalprobe::TokenizeError>(())
/// ```
#[derive(Debug)]
pub struct Tokenizer<'a> {
    cursor: ByteCursor<'a>,
    pending: Vec<Obligation>,
}

impl<'a> Tokenizer<'a> {
    /// Creates a tokenizer over `stream`, validating the two version header
    /// bytes.
    ///
    /// # Errors
    ///
    /// [`TokenizeError::UnsupportedVersion`] unless the major version equals
    /// [`MAJOR_VERSION`] and the minor version is at most [`MINOR_VERSION`];
    /// [`TokenizeError::EndOfStream`] if the stream is shorter than the
    /// header.
    pub fn new(stream: &'a [u8]) -> Result<Self, TokenizeError> {
        let mut cursor = ByteCursor::new(stream);

        let major = cursor.byte()?;
        let minor = cursor.byte()?;

        if major != MAJOR_VERSION || minor > MINOR_VERSION {
            return Err(TokenizeError::UnsupportedVersion { major, minor });
        }

        Ok(Self {
            cursor,
            pending: vec![Obligation::Any],
        })
    }

    /// Bytes consumed so far, including the two version bytes.
    #[must_use]
    pub fn consumed(&self) -> usize {
        self.cursor.consumed()
    }

    /// Runs one obligation. Returns `Ok(None)` when the obligation only
    /// restructured the stack and the caller must step again.
    fn step(&mut self, obligation: Obligation) -> Result<Option<Token>, TokenizeError> {
        let token = match obligation {
            Obligation::Any => return self.any(),
            Obligation::Sym => return self.sym(),
            Obligation::Fixnum => Token::Fixnum(self.cursor.long()?),
            Obligation::Link => Token::Link(self.count()?),
            Obligation::SymbolLink => Token::SymbolLink(self.count()?),
            Obligation::Bignum => Token::Bignum(self.bignum()?),
            Obligation::Symbol => Token::Symbol(self.byte_run()?),
            Obligation::Class => Token::Class(self.byte_run()?),
            Obligation::Module => Token::Module(self.byte_run()?),
            Obligation::ModuleOld => Token::ModuleOld(self.byte_run()?),
            Obligation::String => Token::String(self.byte_run()?),
            Obligation::Float => Token::Float(self.byte_run()?),
            Obligation::Regexp => {
                let source = self.byte_run()?;
                self.pending.push(Obligation::Byte);
                Token::Regexp(source)
            }
            Obligation::Array => {
                let count = self.count()?;
                self.push_any(count);
                Token::Array(count)
            }
            Obligation::Hash => Token::Hash(self.pair_count()?),
            Obligation::Pairs => Token::Pairs(self.pair_count()?),
            Obligation::HashDefault => {
                let count = self.count()?;
                // The default value is encoded after the pairs, so it goes
                // under them on the stack.
                self.pending.push(Obligation::Any);
                self.push_any(count);
                self.push_any(count);
                Token::HashDefault(count)
            }
            Obligation::Byte => Token::Byte(self.cursor.byte()?),
            Obligation::Bytes => Token::Bytes(self.byte_run()?),
        };

        Ok(Some(token))
    }

    /// Reads a tag byte and dispatches. Singletons and structure markers are
    /// emitted here; payload-carrying types push their body obligation and
    /// emit once the payload is read.
    fn any(&mut self) -> Result<Option<Token>, TokenizeError> {
        let tag = self.cursor.byte()?;

        let marker = match tag {
            TYPE_NIL => return Ok(Some(Token::Nil)),
            TYPE_TRUE => return Ok(Some(Token::True)),
            TYPE_FALSE => return Ok(Some(Token::False)),
            TYPE_FIXNUM => return self.body(Obligation::Fixnum),
            TYPE_LINK => return self.body(Obligation::Link),
            TYPE_SYMLINK => return self.body(Obligation::SymbolLink),
            TYPE_SYMBOL => return self.body(Obligation::Symbol),
            TYPE_CLASS => return self.body(Obligation::Class),
            TYPE_MODULE => return self.body(Obligation::Module),
            TYPE_MODULE_OLD => return self.body(Obligation::ModuleOld),
            TYPE_STRING => return self.body(Obligation::String),
            TYPE_FLOAT => return self.body(Obligation::Float),
            TYPE_REGEXP => return self.body(Obligation::Regexp),
            TYPE_BIGNUM => return self.body(Obligation::Bignum),
            TYPE_ARRAY => return self.body(Obligation::Array),
            TYPE_HASH => return self.body(Obligation::Hash),
            TYPE_HASH_DEF => return self.body(Obligation::HashDefault),
            TYPE_STRUCT => {
                self.push_pair(Obligation::Pairs, Obligation::Sym);
                Token::Struct
            }
            TYPE_OBJECT => {
                self.push_pair(Obligation::Pairs, Obligation::Sym);
                Token::Object
            }
            TYPE_DATA => {
                self.push_pair(Obligation::Any, Obligation::Sym);
                Token::Data
            }
            TYPE_EXTENDED => {
                self.push_pair(Obligation::Any, Obligation::Sym);
                Token::Extended
            }
            TYPE_UCLASS => {
                self.push_pair(Obligation::Any, Obligation::Sym);
                Token::UserClass
            }
            TYPE_USRMARSHAL => {
                self.push_pair(Obligation::Any, Obligation::Sym);
                Token::UserMarshal
            }
            TYPE_USERDEF => {
                self.push_pair(Obligation::Bytes, Obligation::Sym);
                Token::UserDefined
            }
            TYPE_IVAR => {
                self.push_pair(Obligation::Pairs, Obligation::Any);
                Token::InstanceVariables
            }
            _ => return Err(TokenizeError::UnknownTag { tag }),
        };

        Ok(Some(marker))
    }

    /// Reads a tag byte that must introduce a symbol or symbol link.
    fn sym(&mut self) -> Result<Option<Token>, TokenizeError> {
        let tag = self.cursor.byte()?;

        match tag {
            TYPE_SYMBOL => self.body(Obligation::Symbol),
            TYPE_SYMLINK => self.body(Obligation::SymbolLink),
            _ => Err(TokenizeError::ExpectedSymbol { tag }),
        }
    }

    fn body(&mut self, obligation: Obligation) -> Result<Option<Token>, TokenizeError> {
        self.pending.push(obligation);
        Ok(None)
    }

    /// Pushes `below` then `top`, so `top` is decoded first.
    fn push_pair(&mut self, below: Obligation, top: Obligation) {
        self.pending.push(below);
        self.pending.push(top);
    }

    fn push_any(&mut self, count: usize) {
        self.pending
            .extend(core::iter::repeat_n(Obligation::Any, count));
    }

    /// Reads a pair count and queues both halves of each pair.
    fn pair_count(&mut self) -> Result<usize, TokenizeError> {
        let count = self.count()?;
        self.push_any(count);
        self.push_any(count);
        Ok(count)
    }

    /// Decodes a long that must be a non-negative count, length or index.
    fn count(&mut self) -> Result<usize, TokenizeError> {
        let value = self.cursor.long()?;
        usize::try_from(value).map_err(|_| TokenizeError::InvalidCount { value })
    }

    /// Reads a length-prefixed byte run.
    fn byte_run(&mut self) -> Result<BString, TokenizeError> {
        let size = self.count()?;
        Ok(self.cursor.bytes(size)?.into())
    }

    /// Reads sign byte, limb count and little-endian magnitude, producing
    /// the decoded signed value.
    fn bignum(&mut self) -> Result<BigInt, TokenizeError> {
        let sign = if self.cursor.byte()? == b'-' {
            Sign::Minus
        } else {
            Sign::Plus
        };
        let limbs = self.count()?.saturating_mul(2);
        let magnitude = self.cursor.bytes(limbs)?;

        Ok(BigInt::from_bytes_le(sign, magnitude))
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Result<Token, TokenizeError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let obligation = self.pending.pop()?;

            match self.step(obligation) {
                Ok(Some(token)) => return Some(Ok(token)),
                Ok(None) => {}
                Err(error) => {
                    self.pending.clear();
                    return Some(Err(error));
                }
            }
        }
    }
}
