#![allow(missing_docs)]

mod common;

use std::str::FromStr;

use bigdecimal::BigDecimal;
use jsonbind::{JsonReader, Map, ReaderOptions, StrSource, Value, to_json};
use rstest::rstest;

/// Converts a `serde_json` value into the shape this crate decodes to.
fn from_serde(value: serde_json::Value) -> Value {
    match value {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Boolean(b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(l) => i32::try_from(l).map_or(Value::Long(l), Value::Integer),
            None => Value::Decimal(BigDecimal::from_str(&n.to_string()).unwrap()),
        },
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(items) => Value::Array(items.into_iter().map(from_serde).collect()),
        serde_json::Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, from_serde(v)))
                .collect::<Map>(),
        ),
    }
}

fn read_decoded(text: &str) -> Value {
    let options = ReaderOptions {
        decode_escapes: true,
        ..ReaderOptions::default()
    };
    JsonReader::with_options(StrSource::new(text), options)
        .read_value()
        .unwrap()
}

#[rstest]
#[case("null")]
#[case("true")]
#[case("-17")]
#[case("4294967296")]
#[case("0.125")]
#[case(r#""tab\tquote\"slash\/unié""#)]
#[case(r#"[1, [2, [3, []]], {"k": "v"}]"#)]
#[case(r#"{"a": {"b": {"c": [true, false, null]}}, "d": -1.5e-3}"#)]
fn agrees_with_serde_json_on_valid_documents(#[case] text: &str) {
    let expected = from_serde(serde_json::from_str(text).unwrap());
    assert_eq!(read_decoded(text), expected);
}

#[rstest]
#[case("\u{0}\u{1f}\u{7f}\u{80}\u{9f}\u{a0}")]
#[case("\u{2000}\u{2028}\u{2029}\u{20ac}\u{20ff}\u{2100}")]
#[case("</script><!-- \\ \" / -->")]
#[case("\u{1F600} \u{FEFF}")]
fn written_strings_parse_back_in_serde_json(#[case] text: &str) {
    let written = to_json(text);
    let parsed: String = serde_json::from_str(&written).unwrap();
    assert_eq!(parsed, text);
}

#[test]
fn written_documents_parse_in_serde_json() {
    let order: common::Order = jsonbind::record_from_str(common::ORDER).unwrap();
    let written = to_json(&order);
    let parsed: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(parsed["customer"]["display_name"], "Ada Lovelace");
    assert_eq!(parsed["lines"].as_array().map(Vec::len), Some(2));
    assert!(parsed.get("notes").is_none());
}
