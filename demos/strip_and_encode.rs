//! Example: stripping absent fields and encoding values
//!
//! Shows what `strip` removes, what it keeps, and how the codec rejects
//! textual input.
//!
//! Run with: `cargo run --example strip_and_encode`

use absent_codec::{strip, Codec, CodecError, Mapping, SerializationFormat, Value};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Absent Stripping Demo ===\n");

    let profile = Mapping::new();
    profile.insert("name", "ada");
    profile.insert("nickname", Value::Absent);
    profile.insert("email", Value::Null);
    profile.insert(
        "history",
        Value::from(vec![Value::from(1), Value::Absent, Value::from(3)]),
    );
    let profile = Value::from(profile);

    println!("Original:  {profile:?}");
    let stripped = strip(&profile)?;
    println!("Stripped:  {stripped:?}");
    println!("  - mapping keys holding Absent are removed");
    println!("  - Null is kept, sequence slots are kept\n");

    let msgpack = Codec::new();
    let bytes = msgpack.encode(&profile)?;
    println!("MessagePack: {} bytes", bytes.len());
    println!("  - Hex: {:02X?}", &bytes[..bytes.len().min(20)]);
    println!("  - Decoded: {:?}\n", msgpack.decode(&bytes[..])?);

    let json = Codec::with_format(SerializationFormat::Json);
    let json_bytes = json.encode(&profile)?;
    println!("JSON: {}\n", std::str::from_utf8(&json_bytes)?);

    match msgpack.decode("this came from a text encoder") {
        Err(CodecError::UnexpectedTextualInput) => {
            println!("Textual input rejected:\n  {}", CodecError::UnexpectedTextualInput)
        }
        other => println!("Unexpected result: {other:?}"),
    }

    Ok(())
}
