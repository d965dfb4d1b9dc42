//! Token sequences produced for each wire type.

use alloc::vec::Vec;

use num_bigint::BigInt;

use crate::{EndOfStream, Token, TokenizeError, Tokenizer};

fn tokens(stream: &[u8]) -> Vec<Token> {
    Tokenizer::new(stream)
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap()
}

#[test]
fn version_header_is_validated() {
    assert_eq!(
        Tokenizer::new(b"\x03\x00").err(),
        Some(TokenizeError::UnsupportedVersion { major: 3, minor: 0 })
    );
    assert_eq!(
        Tokenizer::new(b"\x04\x09").err(),
        Some(TokenizeError::UnsupportedVersion { major: 4, minor: 9 })
    );

    assert!(Tokenizer::new(b"\x04\x07T").is_ok());
    assert!(Tokenizer::new(b"\x04\x08T").is_ok());
}

#[test]
fn missing_header_is_end_of_stream() {
    assert_eq!(
        Tokenizer::new(b"\x04").err(),
        Some(TokenizeError::EndOfStream(EndOfStream {
            consumed: 1,
            requested: 1
        }))
    );
}

#[test]
fn singletons() {
    assert_eq!(tokens(b"\x04\x080"), [Token::Nil]);
    assert_eq!(tokens(b"\x04\x08T"), [Token::True]);
    assert_eq!(tokens(b"\x04\x08F"), [Token::False]);
}

#[test]
fn fixnum() {
    assert_eq!(tokens(b"\x04\x08i/"), [Token::Fixnum(42)]);
}

#[test]
fn array() {
    assert_eq!(
        tokens(b"\x04\x08[\x07TF"),
        [Token::Array(2), Token::True, Token::False]
    );
}

#[test]
fn bignum() {
    assert_eq!(
        tokens(b"\x04\x08l-\x07\x00\x00\x00\x40"),
        [Token::Bignum(BigInt::from(-1_073_741_824))]
    );
}

#[test]
fn class() {
    assert_eq!(tokens(b"\x04\x08c\x06C"), [Token::Class("C".into())]);
}

#[test]
fn module() {
    assert_eq!(
        tokens(b"\x04\x08m\x0fEnumerable"),
        [Token::Module("Enumerable".into())]
    );
}

#[test]
fn module_old() {
    assert_eq!(
        tokens(b"\x04\x08M\x0fEnumerable"),
        [Token::ModuleOld("Enumerable".into())]
    );
}

#[test]
fn string() {
    assert_eq!(tokens(b"\x04\x08\"\x06x"), [Token::String("x".into())]);
}

#[test]
fn float() {
    assert_eq!(tokens(b"\x04\x08f\x084.2"), [Token::Float("4.2".into())]);
}

#[test]
fn symbol() {
    assert_eq!(tokens(b"\x04\x08:\x06S"), [Token::Symbol("S".into())]);
}

#[test]
fn symbol_link() {
    assert_eq!(
        tokens(b"\x04\x08[\x07:\x06s;\x00"),
        [
            Token::Array(2),
            Token::Symbol("s".into()),
            Token::SymbolLink(0),
        ]
    );
}

#[test]
fn hash() {
    assert_eq!(
        tokens(b"\x04\x08{\x07i\x06i\x07TF"),
        [
            Token::Hash(2),
            Token::Fixnum(1),
            Token::Fixnum(2),
            Token::True,
            Token::False,
        ]
    );
}

#[test]
fn hash_default_without_pairs() {
    assert_eq!(
        tokens(b"\x04\x08}\x00i\x06"),
        [Token::HashDefault(0), Token::Fixnum(1)]
    );
}

#[test]
fn hash_default_decodes_its_default_after_the_pairs() {
    assert_eq!(
        tokens(b"\x04\x08}\x06i\x06i\x07i\x08"),
        [
            Token::HashDefault(1),
            Token::Fixnum(1),
            Token::Fixnum(2),
            Token::Fixnum(3),
        ]
    );
}

#[test]
fn regexp_carries_a_trailing_options_byte() {
    assert_eq!(
        tokens(b"\x04\x08I/\x06x\x01\x06:\x06EF"),
        [
            Token::InstanceVariables,
            Token::Regexp("x".into()),
            Token::Byte(1),
            Token::Pairs(1),
            Token::Symbol("E".into()),
            Token::False,
        ]
    );
}

#[test]
fn instance_variables() {
    assert_eq!(
        tokens(b"\x04\x08I\"\x00\x07:\x06ET:\x07@xi\x07"),
        [
            Token::InstanceVariables,
            Token::String("".into()),
            Token::Pairs(2),
            Token::Symbol("E".into()),
            Token::True,
            Token::Symbol("@x".into()),
            Token::Fixnum(2),
        ]
    );
}

#[test]
fn link() {
    assert_eq!(
        tokens(b"\x04\x08[\x07I\"\x00\x06:\x06ET@\x06"),
        [
            Token::Array(2),
            Token::InstanceVariables,
            Token::String("".into()),
            Token::Pairs(1),
            Token::Symbol("E".into()),
            Token::True,
            Token::Link(1),
        ]
    );
}

#[test]
fn object_without_instance_variables() {
    assert_eq!(
        tokens(b"\x04\x08o:\x0bObject\x00"),
        [
            Token::Object,
            Token::Symbol("Object".into()),
            Token::Pairs(0),
        ]
    );
}

#[test]
fn object_with_instance_variables() {
    assert_eq!(
        tokens(b"\x04\x08o:\x0bObject\x06:\x07@xi\x07"),
        [
            Token::Object,
            Token::Symbol("Object".into()),
            Token::Pairs(1),
            Token::Symbol("@x".into()),
            Token::Fixnum(2),
        ]
    );
}

#[test]
fn structs() {
    assert_eq!(
        tokens(b"\x04\x08S:\x06S\x06:\x06ai\x08"),
        [
            Token::Struct,
            Token::Symbol("S".into()),
            Token::Pairs(1),
            Token::Symbol("a".into()),
            Token::Fixnum(3),
        ]
    );
}

#[test]
fn data() {
    assert_eq!(
        tokens(b"\x04\x08d:\x18OpenSSL::X509::Name[\x00"),
        [
            Token::Data,
            Token::Symbol("OpenSSL::X509::Name".into()),
            Token::Array(0),
        ]
    );
}

#[test]
fn extended() {
    assert_eq!(
        tokens(b"\x04\x08e:\x0fEnumerableo:\x0bObject\x00"),
        [
            Token::Extended,
            Token::Symbol("Enumerable".into()),
            Token::Object,
            Token::Symbol("Object".into()),
            Token::Pairs(0),
        ]
    );
}

#[test]
fn user_defined() {
    let stream = b"\x04\x08Iu:\x09Time\x0d\xe7\x51\x1c\x80\xa8\xc3\x83\xe5\x07\
:\x0boffseti\xfe\x90\x9d:\x09zoneI\"\x08PDT\x06:\x06ET";

    assert_eq!(
        tokens(stream),
        [
            Token::InstanceVariables,
            Token::UserDefined,
            Token::Symbol("Time".into()),
            Token::Bytes(b"\xe7\x51\x1c\x80\xa8\xc3\x83\xe5".as_slice().into()),
            Token::Pairs(2),
            Token::Symbol("offset".into()),
            Token::Fixnum(-25200),
            Token::Symbol("zone".into()),
            Token::InstanceVariables,
            Token::String("PDT".into()),
            Token::Pairs(1),
            Token::Symbol("E".into()),
            Token::True,
        ]
    );
}

#[test]
fn user_marshal() {
    assert_eq!(
        tokens(b"\x04\x08U:\x09Date[\x0bi\x00i\x03l{%i\x00i\x00i\x00f\x0c2299161"),
        [
            Token::UserMarshal,
            Token::Symbol("Date".into()),
            Token::Array(6),
            Token::Fixnum(0),
            Token::Fixnum(2_456_428),
            Token::Fixnum(0),
            Token::Fixnum(0),
            Token::Fixnum(0),
            Token::Float("2299161".into()),
        ]
    );
}

#[test]
fn truncated_stream_reports_exact_offsets() {
    let mut tokenizer = Tokenizer::new(b"\x04\x08").unwrap();

    assert_eq!(
        tokenizer.next(),
        Some(Err(TokenizeError::EndOfStream(EndOfStream {
            consumed: 2,
            requested: 1
        })))
    );
    // Errors are terminal.
    assert_eq!(tokenizer.next(), None);
}

#[test]
fn unknown_tag_is_an_error() {
    let mut tokenizer = Tokenizer::new(b"\x04\x08Z").unwrap();

    assert_eq!(
        tokenizer.next(),
        Some(Err(TokenizeError::UnknownTag { tag: b'Z' }))
    );
}

#[test]
fn symbol_position_rejects_other_tags() {
    let mut tokenizer = Tokenizer::new(b"\x04\x08d[\x00T").unwrap();

    assert_eq!(tokenizer.next(), Some(Ok(Token::Data)));
    assert_eq!(
        tokenizer.next(),
        Some(Err(TokenizeError::ExpectedSymbol { tag: b'[' }))
    );
    assert_eq!(tokenizer.next(), None);
}

#[test]
fn negative_length_is_an_error() {
    // string with length long -1
    let mut tokenizer = Tokenizer::new(b"\x04\x08\"\xfa").unwrap();

    assert_eq!(
        tokenizer.next(),
        Some(Err(TokenizeError::InvalidCount { value: -1 }))
    );
}

#[test]
fn exact_consumption_of_one_value() {
    let stream = b"\x04\x08[\x07TF";
    let mut tokenizer = Tokenizer::new(stream).unwrap();

    while let Some(token) = tokenizer.next() {
        token.unwrap();
    }

    assert_eq!(tokenizer.consumed(), stream.len());
}

#[test]
fn independent_tokenizers_agree() {
    let stream = b"\x04\x08{\x07i\x06i\x07TF";

    let first: Vec<_> = Tokenizer::new(stream).unwrap().map(Result::unwrap).collect();
    let second: Vec<_> = Tokenizer::new(stream).unwrap().map(Result::unwrap).collect();

    assert_eq!(first, second);
}
