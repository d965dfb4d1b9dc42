//! The token vocabulary shared by the tokenizer and its consumers.

use bstr::BString;
use num_bigint::BigInt;

/// One atomic unit of decoded lexical information.
///
/// Tokens that carry a count ([`Array`](Token::Array),
/// [`Hash`](Token::Hash), [`HashDefault`](Token::HashDefault),
/// [`Pairs`](Token::Pairs)) tell the consumer how many further
/// sub-structures to pull: `count` for an array, `2 * count` for the paired
/// collections, and for a hash-with-default the default value follows the
/// pairs. Marker tokens ([`Struct`](Token::Struct) and friends) announce a
/// fixed shape of tokens to follow.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Token {
    /// The `nil` singleton.
    Nil,
    /// The `true` singleton.
    True,
    /// The `false` singleton.
    False,
    /// An immediate integer.
    Fixnum(i64),
    /// A back-reference to an object-table slot.
    Link(usize),
    /// A back-reference to a symbol-table slot.
    SymbolLink(usize),
    /// A symbol and its name bytes.
    Symbol(BString),
    /// A class reference by name.
    Class(BString),
    /// A module reference by name.
    Module(BString),
    /// An old-style module reference. Wire-identical to [`Token::Module`]
    /// apart from its tag byte.
    ModuleOld(BString),
    /// A string's raw bytes.
    String(BString),
    /// A float, kept as the exact bytes the producer wrote.
    Float(BString),
    /// A regexp source; the option-flags [`Token::Byte`] follows.
    Regexp(BString),
    /// An arbitrary-precision integer, decoded from sign and magnitude.
    Bignum(BigInt),
    /// An array of `count` values.
    Array(usize),
    /// A hash of `count` key/value pairs.
    Hash(usize),
    /// A hash of `count` pairs followed by a default value.
    HashDefault(usize),
    /// A pair count inside a struct, object or instance-variable section.
    Pairs(usize),
    /// A struct: name symbol, then member pairs.
    Struct,
    /// A plain object: class-name symbol, then instance-variable pairs.
    Object,
    /// A wrapped C pointer: class-name symbol, then the state value.
    Data,
    /// A value extended by a module: module-name symbol, then the value.
    Extended,
    /// A subclass of a built-in type: class-name symbol, then the value.
    UserClass,
    /// An object dumped with `_dump`: class-name symbol, then raw
    /// [`Token::Bytes`].
    UserDefined,
    /// An object dumped with `marshal_dump`: class-name symbol, then the
    /// dumped value.
    UserMarshal,
    /// Instance variables attached to the following value: the value, then
    /// name/value pairs.
    InstanceVariables,
    /// The raw payload of a [`Token::UserDefined`] object.
    Bytes(BString),
    /// A single raw byte; the option flags trailing a [`Token::Regexp`].
    Byte(u8),
}

impl Token {
    /// Stable lowercase name of the token kind, used in error messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Nil => "nil",
            Self::True => "true",
            Self::False => "false",
            Self::Fixnum(_) => "fixnum",
            Self::Link(_) => "link",
            Self::SymbolLink(_) => "symbol_link",
            Self::Symbol(_) => "symbol",
            Self::Class(_) => "class",
            Self::Module(_) => "module",
            Self::ModuleOld(_) => "module_old",
            Self::String(_) => "string",
            Self::Float(_) => "float",
            Self::Regexp(_) => "regexp",
            Self::Bignum(_) => "bignum",
            Self::Array(_) => "array",
            Self::Hash(_) => "hash",
            Self::HashDefault(_) => "hash_default",
            Self::Pairs(_) => "pairs",
            Self::Struct => "struct",
            Self::Object => "object",
            Self::Data => "data",
            Self::Extended => "extended",
            Self::UserClass => "user_class",
            Self::UserDefined => "user_defined",
            Self::UserMarshal => "user_marshal",
            Self::InstanceVariables => "instance_variables",
            Self::Bytes(_) => "bytes",
            Self::Byte(_) => "byte",
        }
    }
}
