#![no_main]
use blvm_wire::serialization::varint::{decode_varint, put_varint, read_varint};
use blvm_wire::serialization::varstr::{decode_varstr, put_varstr, read_varstr, varstr_len};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Buffer and stream decoders must agree on arbitrary input and never panic

    // Test 1: varint
    let mut stream = data;
    match decode_varint(data) {
        Some((value, consumed)) => {
            assert!(consumed > 0, "success must consume bytes");
            assert_eq!(read_varint(&mut stream).ok(), Some(value));
            assert_eq!(data.len() - stream.len(), consumed);

            // Re-encoding is canonical and never longer than the input
            let mut buf = [0u8; 9];
            let written = put_varint(&mut buf, value);
            assert!(written <= consumed);
            assert_eq!(decode_varint(&buf[..written]), Some((value, written)));
        }
        None => assert!(read_varint(&mut stream).is_err()),
    }

    // Test 2: varstr
    let mut stream = data;
    match decode_varstr(data) {
        Some((payload, consumed)) => {
            assert_eq!(read_varstr(&mut stream).ok().as_ref(), Some(&payload));
            assert_eq!(data.len() - stream.len(), consumed);

            // Round-trip property: decode(encode(s)) = s
            let mut buf = vec![0u8; varstr_len(payload.len())];
            let written = put_varstr(&mut buf, &payload);
            assert_eq!(decode_varstr(&buf), Some((payload, written)));
        }
        None => assert!(read_varstr(&mut stream).is_err()),
    }
});
