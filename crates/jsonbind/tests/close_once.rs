#![allow(missing_docs)]

mod common;

use std::{cell::Cell, io, rc::Rc};

use jsonbind::{
    CharSource, CodecError, IoSource, JsonReader, Result, Value, from_reader, record_from_reader,
};

use crate::common::{Customer, Line};

/// Character source that counts how often it is closed.
struct CountingSource {
    chars: std::vec::IntoIter<char>,
    closes: Rc<Cell<usize>>,
    fail_after: Option<usize>,
    read: usize,
}

impl CountingSource {
    fn new(text: &str, closes: &Rc<Cell<usize>>) -> Self {
        Self {
            chars: text.chars().collect::<Vec<_>>().into_iter(),
            closes: Rc::clone(closes),
            fail_after: None,
            read: 0,
        }
    }

    fn failing_after(mut self, n: usize) -> Self {
        self.fail_after = Some(n);
        self
    }
}

impl CharSource for CountingSource {
    fn next_char(&mut self) -> Result<Option<char>> {
        if self.fail_after == Some(self.read) {
            return Err(io::Error::other("source failed").into());
        }
        self.read += 1;
        Ok(self.chars.next())
    }

    fn close(&mut self) -> Result<()> {
        self.closes.set(self.closes.get() + 1);
        Ok(())
    }
}

#[test]
fn read_value_closes_once() {
    let closes = Rc::new(Cell::new(0));
    let value = JsonReader::new(CountingSource::new("[1, 2]", &closes))
        .read_value()
        .unwrap();
    assert_eq!(value, Value::Array(vec![Value::Integer(1), Value::Integer(2)]));
    assert_eq!(closes.get(), 1);
}

#[test]
fn malformed_input_still_closes_once() {
    let closes = Rc::new(Cell::new(0));
    let err = JsonReader::new(CountingSource::new("{1}", &closes))
        .read_value()
        .unwrap_err();
    assert!(err.is_malformed());
    assert_eq!(closes.get(), 1);
}

#[test]
fn non_record_target_closes_without_reading() {
    let closes = Rc::new(Cell::new(0));
    let source = CountingSource::new("{}", &closes).failing_after(0);
    let err = JsonReader::new(source).read_record::<String>().unwrap_err();
    assert!(matches!(err, CodecError::TargetNotBindable));
    assert_eq!(closes.get(), 1);
}

#[test]
fn source_errors_propagate_and_close() {
    let closes = Rc::new(Cell::new(0));
    let source = CountingSource::new(r#"{"a": 1}"#, &closes).failing_after(3);
    let err = JsonReader::new(source).read_value().unwrap_err();
    assert!(matches!(err, CodecError::Io(_)));
    assert_eq!(closes.get(), 1);
}

#[test]
fn explicit_close_is_idempotent() {
    let closes = Rc::new(Cell::new(0));
    let mut reader = JsonReader::new(CountingSource::new("1", &closes));
    reader.close().unwrap();
    reader.close().unwrap();
    assert_eq!(reader.read_value().unwrap(), Value::Integer(1));
    assert_eq!(closes.get(), 1);
}

#[test]
fn dropping_an_unused_reader_closes() {
    let closes = Rc::new(Cell::new(0));
    drop(JsonReader::new(CountingSource::new("1", &closes)));
    assert_eq!(closes.get(), 1);
}

#[test]
fn borrowed_sources_are_closed_too() {
    let closes = Rc::new(Cell::new(0));
    let mut source = CountingSource::new("true", &closes);
    let value = JsonReader::new(&mut source).read_value().unwrap();
    assert_eq!(value, Value::Boolean(true));
    assert_eq!(closes.get(), 1);
}

#[test]
fn io_source_is_released_after_reading() {
    let mut source = IoSource::new(&b"[1, 2, 3] trailing"[..]);
    let value = JsonReader::new(&mut source).read_value().unwrap();
    assert_eq!(value.as_array().map(Vec::len), Some(3));
    assert!(source.is_closed());
}

#[test]
fn byte_streams_decode_records() {
    let customer: Customer =
        record_from_reader(&b"{\"display_name\": \"Zo\xc3\xab\", \"email\": null}"[..]).unwrap();
    assert_eq!(customer.display_name, "Zo\u{eb}");
    assert_eq!(customer.email, None);

    let line: Line = record_from_reader(io::Cursor::new(
        r#"{"SKU": "K-9", "QUANTITY": 4, "UNIT_PRICE": 2.25}"#,
    ))
    .unwrap();
    assert_eq!(line.quantity, 4);
    assert!((line.unit_price - 2.25).abs() < f64::EPSILON);
}

#[test]
fn io_errors_surface() {
    struct Broken;

    impl io::Read for Broken {
        fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "gone"))
        }
    }

    assert!(matches!(from_reader(Broken), Err(CodecError::Io(_))));
}
