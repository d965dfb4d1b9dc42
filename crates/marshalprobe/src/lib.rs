//! Decode the structure of Ruby Marshal (format 4.8) streams without
//! constructing the objects they describe.
//!
//! Loading a marshal stream from an untrusted source is unsafe: the stream
//! chooses which classes are instantiated and how much memory is allocated.
//! This crate decodes a stream into a structural description instead:
//! what the stream contains, where its back-references point, and how many
//! allocations a real load would cost. The stream can then be inspected,
//! validated or rejected before any object graph is built.
//!
//! The pipeline has three consumable layers:
//!
//! * [`Tokenizer`]: an incremental, pull-based lexer producing a finite
//!   sequence of [`Token`]s from the raw bytes. This is the only component
//!   that knows the wire format.
//! * [`Parser`]: consumes a token sequence and rebuilds the nested,
//!   reference-aware [`Node`] description of the encoded value.
//! * [`AllocationCounter`]: consumes the same token sequence shape and
//!   sums the allocation cost instead.
//!
//! A token sequence is consumed destructively; to run both the parser and
//! the counter over the same bytes, construct a fresh tokenizer for each.
//!
//! # Examples
//!
//! ```
//! use marshalprobe::{Node, count_allocations, structure};
//!
//! // version 4.8, array of two elements: true, false
//! let stream = b"\x04\x08[\x07TF";
//!
//! assert_eq!(
//!     structure(stream)?,
//!     Node::Array {
//!         id: 0,
//!         elements: vec![Node::True, Node::False],
//!     }
//! );
//!
//! // Only the array itself would be allocated; booleans are singletons.
//! assert_eq!(count_allocations(stream)?, 1);
//! # Ok::<(), marshalprobe::ParseError>(())
//! ```
//!
//! Back-references are recorded, not resolved:
//!
//! ```
//! use marshalprobe::{Node, structure};
//!
//! // a = []; a << a
//! let stream = b"\x04\x08[\x06@\x00";
//!
//! assert_eq!(
//!     structure(stream)?,
//!     Node::Array {
//!         id: 0,
//!         elements: vec![Node::Link(0)],
//!     }
//! );
//! # Ok::<(), marshalprobe::ParseError>(())
//! ```

#![no_std]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod counter;
mod cursor;
mod error;
mod node;
mod parser;
mod token;
mod tokenizer;

#[cfg(test)]
mod tests;

pub use counter::AllocationCounter;
pub use cursor::ByteCursor;
pub use error::{EndOfStream, ParseError, TokenizeError};
pub use node::Node;
pub use parser::Parser;
pub use token::Token;
pub use tokenizer::{MAJOR_VERSION, MINOR_VERSION, Tokenizer};

/// Parses the structure of one marshal stream.
///
/// # Errors
///
/// [`ParseError::DataTooShort`] on truncated input;
/// [`ParseError::Tokenize`] for version mismatches and malformed bytes.
pub fn structure(data: &[u8]) -> Result<Node, ParseError> {
    let tokenizer = Tokenizer::new(data).map_err(ParseError::from)?;
    Parser::new(tokenizer).parse()
}

/// Counts the allocations loading one marshal stream would require.
///
/// # Errors
///
/// Same taxonomy as [`structure`].
pub fn count_allocations(data: &[u8]) -> Result<u64, ParseError> {
    let tokenizer = Tokenizer::new(data).map_err(ParseError::from)?;
    AllocationCounter::new(tokenizer).count()
}
