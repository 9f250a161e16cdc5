#![no_main]
use arbitrary::Arbitrary;
use jsonbind::{JsonReader, ReaderOptions, StrSource, Value, to_json};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input<'a> {
    strict_literals: bool,
    strict_containers: bool,
    decode_escapes: bool,
    text: &'a str,
}

fn read(text: &str, options: ReaderOptions) -> jsonbind::Result<Value> {
    JsonReader::with_options(StrSource::new(text), options).read_value()
}

fuzz_target!(|input: Input<'_>| {
    let options = ReaderOptions {
        strict_literals: input.strict_literals,
        strict_containers: input.strict_containers,
        decode_escapes: input.decode_escapes,
        ..ReaderOptions::default()
    };

    let Ok(value) = read(input.text, options) else {
        // Anything serde_json accepts must read in permissive mode.
        if serde_json::from_str::<serde_json::Value>(input.text).is_ok() {
            assert!(read(input.text, ReaderOptions::default()).is_ok());
        }
        return;
    };

    // Whatever was read writes back as valid JSON.
    let written = to_json(&value);
    if let Err(e) = serde_json::from_str::<serde_json::Value>(&written) {
        panic!("writer produced invalid JSON {written:?} from {:?}: {e}", input.text);
    }

    // Reading the written form again is stable once escapes are decoded.
    let decoded = ReaderOptions {
        decode_escapes: true,
        ..ReaderOptions::default()
    };
    let reread = read(&written, decoded).expect("written JSON reads back");
    assert_eq!(to_json(&reread), written);
});
