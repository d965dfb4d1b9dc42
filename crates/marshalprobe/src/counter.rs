//! Counts the allocations loading a stream would require.

use crate::{
    error::{ParseError, TokenizeError},
    token::Token,
};

/// Computes how many objects a real load of the stream would allocate.
///
/// The traversal shape is identical to the [`Parser`](crate::Parser)'s, but
/// payloads are discarded and only costs are summed:
///
/// * `nil`, `true`, `false` and fixnums are singletons or immediates; free.
/// * Links and symbol links re-use existing objects; free.
/// * Class and module references are never re-materialized; they either
///   already exist at load time or the load fails; free. The same applies
///   to the class names consumed by structs, data objects, extended values
///   and user-class wrappers.
/// * Symbols count one allocation even though they may already be interned;
///   the format only mentions each symbol once, so none is counted twice.
/// * Every other object counts one allocation plus its contents.
///
/// The count may therefore overestimate a load into a warm process, never
/// underestimate it.
pub struct AllocationCounter<I> {
    tokens: I,
}

impl<I> AllocationCounter<I>
where
    I: Iterator<Item = Result<Token, TokenizeError>>,
{
    /// Creates a counter over a token sequence.
    pub fn new(tokens: I) -> Self {
        Self { tokens }
    }

    /// Counts allocations for one top-level value.
    ///
    /// # Errors
    ///
    /// The same taxonomy as [`Parser::parse`](crate::Parser::parse):
    /// [`ParseError::DataTooShort`] on truncation, shape errors on malformed
    /// token sequences.
    pub fn count(mut self) -> Result<u64, ParseError> {
        self.value()
    }

    fn next_token(&mut self) -> Result<Token, ParseError> {
        self.tokens
            .next()
            .ok_or(ParseError::DataTooShort)?
            .map_err(ParseError::from)
    }

    fn value(&mut self) -> Result<u64, ParseError> {
        let allocations = match self.next_token()? {
            Token::Nil | Token::True | Token::False => 0,
            Token::Fixnum(_) | Token::Link(_) | Token::SymbolLink(_) => 0,
            Token::Class(_) | Token::Module(_) | Token::ModuleOld(_) => 0,
            Token::Symbol(_) | Token::String(_) | Token::Float(_) | Token::Bignum(_) => 1,
            Token::Regexp(_) => {
                self.options_byte()?;
                1
            }
            Token::Array(count) => {
                let mut allocations = 1;
                for _ in 0..count {
                    allocations += self.value()?;
                }
                allocations
            }
            Token::Hash(count) => 1 + self.value_pairs(count)?,
            Token::HashDefault(count) => 1 + self.value_pairs(count)? + self.value()?,
            Token::Struct => {
                // The struct class must already exist; its name symbol is
                // consumed but not charged.
                self.symbol()?;
                let count = self.pair_count()?;
                let mut allocations = 1;
                for _ in 0..count {
                    allocations += self.symbol()?;
                    allocations += self.value()?;
                }
                allocations
            }
            Token::Object => {
                let class_name = self.symbol()?;
                class_name + self.symbol_pairs()?
            }
            Token::Data => {
                self.symbol()?;
                1 + self.value()?
            }
            Token::Extended | Token::UserClass => {
                self.symbol()?;
                self.value()?
            }
            Token::UserDefined => {
                let name = self.symbol()?;
                self.data_bytes()?;
                name + 1
            }
            Token::UserMarshal => self.symbol()? + self.value()?,
            Token::InstanceVariables => self.value()? + self.symbol_pairs()?,
            token @ (Token::Pairs(_) | Token::Bytes(_) | Token::Byte(_)) => {
                return Err(ParseError::UnexpectedToken { kind: token.kind() });
            }
        };

        Ok(allocations)
    }

    /// Consumes a symbol-position token; a fresh symbol costs one
    /// allocation, a symbol link nothing.
    fn symbol(&mut self) -> Result<u64, ParseError> {
        match self.next_token()? {
            Token::Symbol(_) => Ok(1),
            Token::SymbolLink(_) => Ok(0),
            other => Err(ParseError::ExpectedSymbol { kind: other.kind() }),
        }
    }

    fn pair_count(&mut self) -> Result<usize, ParseError> {
        match self.next_token()? {
            Token::Pairs(count) => Ok(count),
            other => Err(ParseError::UnexpectedToken { kind: other.kind() }),
        }
    }

    fn options_byte(&mut self) -> Result<u8, ParseError> {
        match self.next_token()? {
            Token::Byte(options) => Ok(options),
            other => Err(ParseError::UnexpectedToken { kind: other.kind() }),
        }
    }

    fn data_bytes(&mut self) -> Result<(), ParseError> {
        match self.next_token()? {
            Token::Bytes(_) => Ok(()),
            other => Err(ParseError::UnexpectedToken { kind: other.kind() }),
        }
    }

    /// Sums `count` key/value pairs.
    fn value_pairs(&mut self, count: usize) -> Result<u64, ParseError> {
        let mut allocations = 0;
        for _ in 0..count {
            allocations += self.value()?;
            allocations += self.value()?;
        }
        Ok(allocations)
    }

    /// Sums a pair count's worth of symbol/value pairs.
    fn symbol_pairs(&mut self) -> Result<u64, ParseError> {
        let count = self.pair_count()?;
        let mut allocations = 0;
        for _ in 0..count {
            allocations += self.symbol()?;
            allocations += self.value()?;
        }
        Ok(allocations)
    }
}
