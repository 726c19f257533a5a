//! Fuzz test for the column schema decoder
//!
//! Feeds arbitrary bytes to `ColumnSchema::deserialize` to find:
//! - Panics on malformed or truncated input
//! - Decoded schemas that do not re-encode to the same bytes
//!
//! Run with: cargo +nightly fuzz run schema_decode_fuzz -- -max_total_time=60

#![no_main]

use honeycomb_schema::{CodecConfig, ColumnSchema, PayloadEncoding};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(schema) = ColumnSchema::deserialize(data, "fuzz") else {
        return;
    };

    // Anything the decoder accepts must survive a round trip in both encodings
    let binary = schema.serialize();
    let again = ColumnSchema::deserialize(&binary, "fuzz").expect("re-decode binary");
    assert_eq!(again, schema);

    let config = CodecConfig {
        encoding: PayloadEncoding::Json,
        ..CodecConfig::default()
    };
    let json = schema.encode_with(&config).expect("encode json");
    let again = ColumnSchema::deserialize(&json, "fuzz").expect("re-decode json");
    assert_eq!(again, schema);

    // Binary input that decodes is canonical
    if data.get(1) == Some(&0) {
        assert_eq!(binary.as_slice(), data);
    }
});
