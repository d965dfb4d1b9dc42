//! Builds a nested structure description from a token sequence.

use alloc::{boxed::Box, vec::Vec};

use bstr::BString;

use crate::{
    error::{ParseError, TokenizeError},
    node::Node,
    token::Token,
};

/// Assembles the [`Node`] tree for one top-level value.
///
/// The parser maintains the two reference tables as plain counters: it
/// records which object-table or symbol-table slot each newly seen value
/// would occupy during a real load, in depth-first decode order. It never
/// resolves a link against the table; whether an index is in range is the
/// caller's concern.
///
/// The token source is consumed destructively; parsing the same bytes again
/// requires a fresh [`Tokenizer`](crate::Tokenizer).
pub struct Parser<I> {
    tokens: I,
    objects: usize,
    symbols: usize,
}

impl<I> Parser<I>
where
    I: Iterator<Item = Result<Token, TokenizeError>>,
{
    /// Creates a parser over a token sequence.
    pub fn new(tokens: I) -> Self {
        Self {
            tokens,
            objects: 0,
            symbols: 0,
        }
    }

    /// Parses one top-level value to completion.
    ///
    /// # Errors
    ///
    /// [`ParseError::DataTooShort`] if the token source ends or reports a
    /// truncated stream mid-structure; [`ParseError::ExpectedSymbol`] and
    /// [`ParseError::UnexpectedToken`] on token sequences that break the
    /// shape their tags promise; tokenizer failures otherwise pass through
    /// as [`ParseError::Tokenize`].
    pub fn parse(mut self) -> Result<Node, ParseError> {
        self.value()
    }

    fn next_token(&mut self) -> Result<Token, ParseError> {
        self.tokens
            .next()
            .ok_or(ParseError::DataTooShort)?
            .map_err(ParseError::from)
    }

    /// Claims the next object-table slot.
    fn object_ref(&mut self) -> usize {
        let id = self.objects;
        self.objects += 1;
        id
    }

    /// Claims the next symbol-table slot.
    fn symbol_ref(&mut self) -> usize {
        let id = self.symbols;
        self.symbols += 1;
        id
    }

    fn value(&mut self) -> Result<Node, ParseError> {
        let node = match self.next_token()? {
            Token::Nil => Node::Nil,
            Token::True => Node::True,
            Token::False => Node::False,
            Token::Fixnum(value) => Node::Fixnum(value),
            Token::Link(id) => Node::Link(id),
            Token::SymbolLink(id) => Node::SymbolLink(id),
            Token::Symbol(name) => Node::Symbol {
                id: self.symbol_ref(),
                name,
            },
            Token::Class(name) => Node::Class {
                id: self.object_ref(),
                name,
            },
            Token::Module(name) | Token::ModuleOld(name) => Node::Module {
                id: self.object_ref(),
                name,
            },
            Token::String(bytes) => Node::String {
                id: self.object_ref(),
                bytes,
            },
            Token::Float(text) => Node::Float {
                id: self.object_ref(),
                text,
            },
            Token::Bignum(value) => Node::Bignum {
                id: self.object_ref(),
                value,
            },
            Token::Regexp(source) => {
                let id = self.object_ref();
                let options = self.options_byte()?;
                Node::Regexp {
                    id,
                    source,
                    options,
                }
            }
            Token::Array(count) => {
                let id = self.object_ref();
                // Counts are attacker-controlled; collections grow as
                // children actually decode instead of trusting the count
                // for a preallocation.
                let mut elements = Vec::new();
                for _ in 0..count {
                    elements.push(self.value()?);
                }
                Node::Array { id, elements }
            }
            Token::Hash(count) => {
                let id = self.object_ref();
                let pairs = self.value_pairs(count)?;
                Node::Hash { id, pairs }
            }
            Token::HashDefault(count) => {
                let id = self.object_ref();
                let pairs = self.value_pairs(count)?;
                let default = Box::new(self.value()?);
                Node::HashDefault { id, pairs, default }
            }
            Token::Struct => {
                let id = self.object_ref();
                let name = Box::new(self.symbol()?);
                let count = self.pair_count()?;
                let mut members = Vec::new();
                for _ in 0..count {
                    let member = self.symbol()?;
                    let value = self.value()?;
                    members.push((member, value));
                }
                Node::Struct { id, name, members }
            }
            Token::Object => {
                let id = self.object_ref();
                let class_name = Box::new(self.symbol()?);
                let ivars = self.symbol_pairs()?;
                Node::Object {
                    id,
                    class_name,
                    ivars,
                }
            }
            Token::Data => {
                let id = self.object_ref();
                let class_name = Box::new(self.symbol()?);
                let value = Box::new(self.value()?);
                Node::Data {
                    id,
                    class_name,
                    value,
                }
            }
            Token::Extended => {
                let module_name = Box::new(self.symbol()?);
                let value = Box::new(self.value()?);
                Node::Extended { module_name, value }
            }
            Token::UserClass => {
                let name = Box::new(self.symbol()?);
                let value = Box::new(self.value()?);
                Node::UserClass { name, value }
            }
            Token::UserDefined => {
                let id = self.object_ref();
                let name = Box::new(self.symbol()?);
                let data = self.data_bytes()?;
                Node::UserDefined { id, name, data }
            }
            Token::UserMarshal => {
                let id = self.object_ref();
                let name = Box::new(self.symbol()?);
                let value = Box::new(self.value()?);
                Node::UserMarshal { id, name, value }
            }
            Token::InstanceVariables => {
                let value = Box::new(self.value()?);
                let ivars = self.symbol_pairs()?;
                Node::InstanceVariables { value, ivars }
            }
            token @ (Token::Pairs(_) | Token::Bytes(_) | Token::Byte(_)) => {
                return Err(ParseError::UnexpectedToken { kind: token.kind() });
            }
        };

        Ok(node)
    }

    /// Decodes a value that must be a symbol or symbol link.
    fn symbol(&mut self) -> Result<Node, ParseError> {
        match self.next_token()? {
            Token::Symbol(name) => Ok(Node::Symbol {
                id: self.symbol_ref(),
                name,
            }),
            Token::SymbolLink(id) => Ok(Node::SymbolLink(id)),
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

    fn data_bytes(&mut self) -> Result<BString, ParseError> {
        match self.next_token()? {
            Token::Bytes(data) => Ok(data),
            other => Err(ParseError::UnexpectedToken { kind: other.kind() }),
        }
    }

    /// Decodes `count` key/value pairs.
    fn value_pairs(&mut self, count: usize) -> Result<Vec<(Node, Node)>, ParseError> {
        let mut pairs = Vec::new();
        for _ in 0..count {
            let key = self.value()?;
            let value = self.value()?;
            pairs.push((key, value));
        }
        Ok(pairs)
    }

    /// Decodes a pair count followed by that many symbol/value pairs.
    fn symbol_pairs(&mut self) -> Result<Vec<(Node, Node)>, ParseError> {
        let count = self.pair_count()?;
        let mut pairs = Vec::new();
        for _ in 0..count {
            let name = self.symbol()?;
            let value = self.value()?;
            pairs.push((name, value));
        }
        Ok(pairs)
    }
}
