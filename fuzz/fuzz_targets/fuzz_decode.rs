#![no_main]

use absent_codec::{decode, encode};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Decoding never panics, and decoded values stay within the depth encode accepts.
    if let Ok(value) = decode(data) {
        if let Err(err) = encode(&value) {
            panic!("decoded value failed to re-encode: {err}");
        }
    }
});
