//! The nested structure description produced by the parser.

use alloc::{boxed::Box, vec::Vec};

use bstr::BString;
use num_bigint::BigInt;

/// A tagged, ordered description of one decoded value and its children.
///
/// Variants that represent referenceable objects carry the object-table
/// slot `id` they would occupy during a real load; symbols carry their
/// symbol-table slot. [`Node::Link`] and [`Node::SymbolLink`] record the
/// index a back-reference points at; the parser does not resolve it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Node {
    /// The `nil` singleton.
    Nil,
    /// The `true` singleton.
    True,
    /// The `false` singleton.
    False,
    /// An immediate integer. Never entered into the object table.
    Fixnum(i64),
    /// A back-reference into the object table.
    Link(usize),
    /// A back-reference into the symbol table.
    SymbolLink(usize),
    /// A symbol.
    Symbol {
        /// Symbol-table slot.
        id: usize,
        /// The symbol's name bytes.
        name: BString,
    },
    /// A class reference by name.
    Class {
        /// Object-table slot.
        id: usize,
        /// Fully qualified class name.
        name: BString,
    },
    /// A module reference by name. Old-style module references are
    /// normalized into this variant.
    Module {
        /// Object-table slot.
        id: usize,
        /// Fully qualified module name.
        name: BString,
    },
    /// A string.
    String {
        /// Object-table slot.
        id: usize,
        /// The string's raw bytes.
        bytes: BString,
    },
    /// A float, kept as the exact bytes the producer wrote.
    Float {
        /// Object-table slot.
        id: usize,
        /// The dumped decimal text.
        text: BString,
    },
    /// A regexp.
    Regexp {
        /// Object-table slot.
        id: usize,
        /// The regexp source bytes.
        source: BString,
        /// The option-flags byte.
        options: u8,
    },
    /// An arbitrary-precision integer.
    Bignum {
        /// Object-table slot.
        id: usize,
        /// The decoded signed value.
        value: BigInt,
    },
    /// An array.
    Array {
        /// Object-table slot.
        id: usize,
        /// The decoded elements, in stream order.
        elements: Vec<Node>,
    },
    /// A hash.
    Hash {
        /// Object-table slot.
        id: usize,
        /// The decoded key/value pairs, in stream order.
        pairs: Vec<(Node, Node)>,
    },
    /// A hash with a default value.
    HashDefault {
        /// Object-table slot.
        id: usize,
        /// The decoded key/value pairs, in stream order.
        pairs: Vec<(Node, Node)>,
        /// The default value, decoded after the pairs.
        default: Box<Node>,
    },
    /// A struct instance.
    Struct {
        /// Object-table slot.
        id: usize,
        /// The struct's class name (symbol or symbol link).
        name: Box<Node>,
        /// Member name/value pairs; names are symbols or symbol links.
        members: Vec<(Node, Node)>,
    },
    /// A plain object.
    Object {
        /// Object-table slot.
        id: usize,
        /// The object's class name (symbol or symbol link).
        class_name: Box<Node>,
        /// Instance-variable name/value pairs.
        ivars: Vec<(Node, Node)>,
    },
    /// A wrapped C pointer dumped via `_dump_data`.
    Data {
        /// Object-table slot.
        id: usize,
        /// The class name (symbol or symbol link).
        class_name: Box<Node>,
        /// The dumped state value.
        value: Box<Node>,
    },
    /// A value extended by a module. Not itself referenceable.
    Extended {
        /// The extending module's name (symbol or symbol link).
        module_name: Box<Node>,
        /// The extended value.
        value: Box<Node>,
    },
    /// An instance of a subclass of a built-in type. Not itself
    /// referenceable; the wrapped value is.
    UserClass {
        /// The subclass name (symbol or symbol link).
        name: Box<Node>,
        /// The built-in value carrying the data.
        value: Box<Node>,
    },
    /// An object dumped with `_dump`.
    UserDefined {
        /// Object-table slot.
        id: usize,
        /// The class name (symbol or symbol link).
        name: Box<Node>,
        /// The opaque `_dump` payload.
        data: BString,
    },
    /// An object dumped with `marshal_dump`.
    UserMarshal {
        /// Object-table slot.
        id: usize,
        /// The class name (symbol or symbol link).
        name: Box<Node>,
        /// The value `marshal_dump` returned.
        value: Box<Node>,
    },
    /// Instance variables attached to another value. The wrapper is not
    /// referenceable; the carried value is.
    InstanceVariables {
        /// The value the variables belong to.
        value: Box<Node>,
        /// Instance-variable name/value pairs.
        ivars: Vec<(Node, Node)>,
    },
}

impl Node {
    /// The object-table slot this node was assigned, if it is a
    /// referenceable object.
    #[must_use]
    pub fn object_id(&self) -> Option<usize> {
        match self {
            Self::Class { id, .. }
            | Self::Module { id, .. }
            | Self::String { id, .. }
            | Self::Float { id, .. }
            | Self::Regexp { id, .. }
            | Self::Bignum { id, .. }
            | Self::Array { id, .. }
            | Self::Hash { id, .. }
            | Self::HashDefault { id, .. }
            | Self::Struct { id, .. }
            | Self::Object { id, .. }
            | Self::Data { id, .. }
            | Self::UserDefined { id, .. }
            | Self::UserMarshal { id, .. } => Some(*id),
            _ => None,
        }
    }
}
