use alloc::string::{String, ToString};

use rstest::rstest;

use crate::{
    CodecError, DEFAULT_MAX_DEPTH, JsonReader, ReaderOptions, StrSource, SyntaxError, Value, from_str,
};

fn syntax_error(result: crate::Result<Value>) -> SyntaxError {
    match result {
        Err(CodecError::MalformedInput { reason, .. }) => reason,
        other => panic!("expected malformed input, got {other:?}"),
    }
}

#[rstest]
#[case("\"", SyntaxError::UnterminatedString)]
#[case("[\"abc", SyntaxError::UnterminatedString)]
#[case(r#""trailing backslash\"#, SyntaxError::UnterminatedString)]
#[case("{1}", SyntaxError::ExpectedPropertyName('1'))]
#[case("{\"a\":1,,\"b\":2}", SyntaxError::ExpectedPropertyName(','))]
#[case("{\"a\"15}", SyntaxError::ExpectedColon)]
#[case("{\"a\"", SyntaxError::ExpectedColon)]
#[case("[{'a': 1}]", SyntaxError::ExpectedPropertyName('\''))]
fn malformed_documents(#[case] text: &str, #[case] expected: SyntaxError) {
    assert_eq!(syntax_error(from_str(text)), expected);
}

#[test]
fn errors_carry_position() {
    let err = from_str("{\n  \"a\" 1\n}").unwrap_err();
    assert!(err.is_malformed());
    match err {
        CodecError::MalformedInput { line, column, .. } => {
            assert_eq!(line, 2);
            assert_eq!(column, 7);
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn error_messages() {
    let err = from_str("{1}").unwrap_err();
    assert_eq!(
        err.to_string(),
        "malformed JSON: expected '\"' to start a property name, found '1' at 1:2"
    );
}

#[rstest]
#[case("nope")]
#[case("[1, undefined]")]
#[case("{\"a\": tru}")]
#[case("1_000")]
fn strict_literals_reject_unknown_tokens(#[case] text: &str) {
    let options = ReaderOptions {
        strict_literals: true,
        ..ReaderOptions::default()
    };
    let result = JsonReader::with_options(StrSource::new(text), options).read_value();
    assert!(matches!(
        syntax_error(result),
        SyntaxError::UnknownLiteral(_)
    ));
}

#[test]
fn strict_literals_still_accept_known_tokens() {
    let options = ReaderOptions {
        strict_literals: true,
        ..ReaderOptions::default()
    };
    let result = JsonReader::with_options(StrSource::new("[null, TRUE, 1.5]"), options).read_value();
    assert!(result.is_ok());
}

#[rstest]
#[case("[1, 2", ']')]
#[case("{\"a\": 1", '}')]
#[case("{\"a\": [", ']')]
fn strict_containers_reject_truncation(#[case] text: &str, #[case] close: char) {
    let options = ReaderOptions {
        strict_containers: true,
        ..ReaderOptions::default()
    };
    let result = JsonReader::with_options(StrSource::new(text), options).read_value();
    assert_eq!(syntax_error(result), SyntaxError::UnclosedContainer(close));
}

#[test]
fn invalid_unicode_escape_is_malformed_when_decoding() {
    let options = ReaderOptions {
        decode_escapes: true,
        ..ReaderOptions::default()
    };
    let result = JsonReader::with_options(StrSource::new(r#""\u00zz""#), options).read_value();
    assert_eq!(syntax_error(result), SyntaxError::InvalidUnicodeEscape('z'));
}

#[rstest]
#[case("[".repeat(100_000))]
#[case("{\"a\":".repeat(100_000))]
#[case("[".repeat(DEFAULT_MAX_DEPTH + 1) + &"]".repeat(DEFAULT_MAX_DEPTH + 1))]
fn deep_nesting_is_rejected(#[case] text: String) {
    assert_eq!(
        syntax_error(from_str(&text)),
        SyntaxError::TooDeep(DEFAULT_MAX_DEPTH)
    );
}

#[test]
fn nesting_limit_is_configurable() {
    let options = ReaderOptions {
        max_depth: 2,
        ..ReaderOptions::default()
    };
    let read = |text: &str| JsonReader::with_options(StrSource::new(text), options).read_value();
    assert!(read("[[1]]").is_ok());
    assert!(read(r#"{"a": [1]}"#).is_ok());
    assert_eq!(syntax_error(read("[[[1]]]")), SyntaxError::TooDeep(2));
    assert_eq!(syntax_error(read(r#"[{"a": []}]"#)), SyntaxError::TooDeep(2));
}
