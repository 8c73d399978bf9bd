//! Split-point resumability, round-trip, and buffer-boundedness properties.

use mpack_push::value::{Array, Str, Value};
use mpack_push::{decode, Config, Error, StreamingDecoder};

/// A handful of representative encodings covering every tag family this decoder
/// recognizes, each paired with the `Value` it must produce under default config.
fn representative_encodings() -> Vec<(Vec<u8>, Value)> {
    vec![
        (vec![0x00], Value::UInt(0)),
        (vec![0x7f], Value::UInt(127)),
        (vec![0xff], Value::Int(-1)),
        (vec![0xc0], Value::Nil),
        (vec![0xc2], Value::Bool(false)),
        (vec![0xc3], Value::Bool(true)),
        (vec![0xcc, 0x2a], Value::UInt(42)),
        (vec![0xcd, 0x01, 0x00], Value::UInt(256)),
        (vec![0xce, 0x00, 0x01, 0x00, 0x00], Value::UInt(65536)),
        (vec![0xcf, 0, 0, 0, 0, 0, 0, 0x01, 0x00], Value::UInt(256)),
        (vec![0xd0, 0xff], Value::Int(-1)),
        (vec![0xd1, 0xff, 0x00], Value::Int(-256)),
        (vec![0xca, 0x40, 0x48, 0xf5, 0xc3], Value::F32(3.140000104904175)),
        (
            vec![0xcb, 0x40, 0x09, 0x21, 0xfb, 0x54, 0x44, 0x2d, 0x18],
            Value::F64(core::f64::consts::PI),
        ),
        (vec![0xa0], Value::Str(Str::Bytes(vec![]))),
        (vec![0xa3, b'a', b'b', b'c'], Value::Str(Str::Bytes(b"abc".to_vec()))),
        (vec![0xc4, 0x02, 0xaa, 0xbb], Value::Bin(vec![0xaa, 0xbb])),
        (
            vec![0x93, 0x01, 0x02, 0x03],
            Value::Array(Array::List(vec![Value::UInt(1), Value::UInt(2), Value::UInt(3)])),
        ),
        (
            vec![0x91, 0x91, 0x91, 0x01],
            Value::Array(Array::List(vec![Value::Array(Array::List(vec![Value::Array(Array::List(vec![
                Value::UInt(1),
            ]))]))])),
        ),
        (
            vec![0x82, 0xa1, b'a', 0x01, 0xa1, b'b', 0x02],
            Value::Map(vec![
                (Value::Str(Str::Bytes(vec![b'a'])), Value::UInt(1)),
                (Value::Str(Str::Bytes(vec![b'b'])), Value::UInt(2)),
            ]),
        ),
        (vec![0x80], Value::Map(vec![])),
        (vec![0x90], Value::Array(Array::List(vec![]))),
    ]
}

#[test]
fn round_trip_matches_reference_values() {
    for (bytes, expected) in representative_encodings() {
        let value = decode(&bytes, Config::default()).unwrap();
        assert_eq!(value, expected, "mismatch decoding {bytes:?}");
    }
}

/// Feeding `A` then `B` (for every split point, including 0 and `|S|`) must yield the
/// same value as one-shot decoding the whole string.
#[test]
fn resumability_holds_at_every_split_point() {
    for (bytes, expected) in representative_encodings() {
        for split in 0..=bytes.len() {
            let (a, b) = bytes.split_at(split);
            let mut decoder = StreamingDecoder::new(Config::default());
            decoder.feed(a).unwrap();
            let value = match decoder.unpack_one() {
                Ok(value) => value,
                Err(Error::OutOfData) => {
                    decoder.feed(b).unwrap();
                    decoder.unpack_one().unwrap_or_else(|e| panic!("split {split} of {bytes:?} failed: {e:?}"))
                }
                Err(e) => panic!("split {split} of {bytes:?} failed early: {e:?}"),
            };
            assert_eq!(value, expected, "split {split} of {bytes:?} produced a different value");
        }
    }
}

/// Feeding byte-by-byte is the most extreme split and must still resume correctly.
#[test]
fn resumability_holds_byte_by_byte() {
    for (bytes, expected) in representative_encodings() {
        let mut decoder = StreamingDecoder::new(Config::default());
        let mut value = None;
        for byte in &bytes {
            decoder.feed(core::slice::from_ref(byte)).unwrap();
            match decoder.unpack_one() {
                Ok(v) => {
                    value = Some(v);
                    break;
                }
                Err(Error::OutOfData) => continue,
                Err(e) => panic!("byte-by-byte decode of {bytes:?} failed: {e:?}"),
            }
        }
        assert_eq!(value, Some(expected), "byte-by-byte decode of {bytes:?} never completed");
    }
}

/// A streaming decoder must never report a buffer larger than its configured cap,
/// and a feed that would exceed it is rejected with `BUFFER_FULL`.
#[test]
fn buffer_never_exceeds_max_buffer_size() {
    let config = Config::builder().max_buffer_size(4).build().unwrap();
    let mut decoder = StreamingDecoder::new(config);
    decoder.feed(&[1, 2, 3, 4]).unwrap();
    let err = decoder.feed(&[5]).unwrap_err();
    assert!(matches!(err, Error::BufferFull));
}

/// Reading raw bytes across a compaction point must return the same bytes whether or
/// not a compaction happened to occur in between.
#[test]
fn compaction_does_not_corrupt_pending_bytes() {
    let config = Config::builder().max_buffer_size(8).read_size(4).build().unwrap();
    let mut decoder = StreamingDecoder::new(config);
    decoder.feed(&[0xcc, 0x01]).unwrap();
    assert_eq!(decoder.unpack_one().unwrap(), Value::UInt(1));
    // The buffer should have reclaimed its consumed prefix; feeding past the old
    // capacity boundary must still work without reporting spurious fullness.
    decoder.feed(&[0xcc, 0x02, 0xcc, 0x03, 0xcc, 0x04]).unwrap();
    assert_eq!(decoder.unpack_one().unwrap(), Value::UInt(2));
    assert_eq!(decoder.unpack_one().unwrap(), Value::UInt(3));
    assert_eq!(decoder.unpack_one().unwrap(), Value::UInt(4));
}

/// `read_raw_bytes` bypasses the format decoder but must still observe the same
/// resumability guarantee across a split feed.
#[test]
fn read_raw_bytes_resumes_across_a_split_feed() {
    let mut decoder = StreamingDecoder::new(Config::default());
    decoder.feed(&[0xaa, 0xbb]).unwrap();
    assert!(matches!(decoder.read_raw_bytes(4).unwrap_err(), Error::OutOfData));
    decoder.feed(&[0xcc, 0xdd]).unwrap();
    assert_eq!(decoder.read_raw_bytes(4).unwrap(), vec![0xaa, 0xbb, 0xcc, 0xdd]);
}
