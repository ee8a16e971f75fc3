use indexmap::IndexMap;
use wirepack::write::{
    append_bool, append_bytes, append_float32, append_int, append_str, append_uint, append_value,
};
use wirepack::{
    next_type, read_bool_bytes, read_float64_bytes, read_int64_bytes, read_int8_bytes,
    read_string_zc, read_uint64_bytes, read_value_bytes, skip, Error, Type, Value,
};

#[test]
fn nil_decodes_to_nil_with_empty_tail() {
    let (v, rest) = read_value_bytes(&[0xc0]).unwrap();
    assert_eq!(v, Value::Nil);
    assert!(rest.is_empty());
}

#[test]
fn fixarray_of_fixints() {
    let (v, rest) = read_value_bytes(&[0x93, 0x01, 0x02, 0x03]).unwrap();
    assert_eq!(
        v,
        Value::Array(vec![Value::Int(1), Value::Int(2), Value::Int(3)])
    );
    assert!(rest.is_empty());
}

#[test]
fn fixmap_with_mixed_values() {
    let (v, rest) = read_value_bytes(&[0x82, 0xa1, 0x61, 0x01, 0xa1, 0x62, 0xc3]).unwrap();
    let mut want = IndexMap::new();
    want.insert("a".to_owned(), Value::Int(1));
    want.insert("b".to_owned(), Value::Bool(true));
    assert_eq!(v, Value::Map(want));
    assert!(rest.is_empty());
}

#[test]
fn wire_uint16_overflows_int8() {
    let err = read_int8_bytes(&[0xcd, 0x01, 0x00]).unwrap_err();
    assert!(matches!(err, Error::IntOverflow { value: 256, bits: 8 }));
}

#[test]
fn skip_map_with_nested_empty_array() {
    // {"k": []}: one header, one key, one nested header
    let rest = skip(&[0x81, 0xa1, 0x6b, 0x90]).unwrap();
    assert!(rest.is_empty());
}

#[test]
fn skip_consumes_exactly_one_object_per_call() {
    let values = vec![
        Value::Int(-7),
        Value::Str("hello".into()),
        Value::Array(vec![Value::Nil, Value::Bool(false)]),
        Value::Bin(vec![1, 2, 3]),
        Value::Map(IndexMap::from([("k".to_owned(), Value::Uint(9))])),
    ];
    let mut buf = Vec::new();
    for v in &values {
        append_value(&mut buf, v);
    }
    let mut rest: &[u8] = &buf;
    for _ in 0..values.len() {
        rest = skip(rest).unwrap();
    }
    assert!(rest.is_empty());
}

#[test]
fn integers_widen_across_wire_forms() {
    for i in [0i64, 1, 127, 128, -1, -32, -33, 4096, -4096, i64::MAX, i64::MIN] {
        let mut b = Vec::new();
        append_int(&mut b, i);
        let (back, rest) = read_int64_bytes(&b).unwrap();
        assert_eq!(back, i, "value {i}");
        assert!(rest.is_empty());
    }
    for u in [0u64, 127, 128, 255, 256, 1 << 16, 1 << 32, u64::MAX] {
        let mut b = Vec::new();
        append_uint(&mut b, u);
        let (back, rest) = read_uint64_bytes(&b).unwrap();
        assert_eq!(back, u, "value {u}");
        assert!(rest.is_empty());
    }
}

#[test]
fn float32_widens_through_float64_reader() {
    let mut b = Vec::new();
    append_float32(&mut b, 1.25);
    let (f, rest) = read_float64_bytes(&b).unwrap();
    assert_eq!(f, 1.25);
    assert!(rest.is_empty());
}

#[test]
fn readers_do_not_consume_on_error() {
    let mut b = Vec::new();
    append_str(&mut b, "nope");
    let before = b.clone();
    assert!(read_int64_bytes(&b).is_err());
    assert!(read_bool_bytes(&b).is_err());
    assert_eq!(b, before);
    // the slice still decodes with the right method
    let (s, _) = read_string_zc(&b).unwrap();
    assert_eq!(s, b"nope");
}

#[test]
fn empty_input_is_short_bytes() {
    assert!(matches!(read_int64_bytes(&[]).unwrap_err(), Error::ShortBytes));
    assert!(matches!(read_value_bytes(&[]).unwrap_err(), Error::ShortBytes));
    assert_eq!(next_type(&[]), Type::Invalid);
}

#[test]
fn unmapped_prefix_is_invalid() {
    assert!(matches!(
        skip(&[0xc1]).unwrap_err(),
        Error::InvalidPrefix(0xc1)
    ));
    assert!(matches!(
        read_value_bytes(&[0xc1]).unwrap_err(),
        Error::InvalidPrefix(0xc1)
    ));
}

#[test]
fn truncated_composites_are_short_bytes() {
    // array16 header claiming 2 elements, no payload bytes at all
    assert!(matches!(
        skip(&[0xdc, 0x00]).unwrap_err(),
        Error::ShortBytes
    ));
    // str8 claiming 5 bytes, only 2 present
    assert!(matches!(
        read_string_zc(&[0xd9, 0x05, b'a', b'b']).unwrap_err(),
        Error::ShortBytes
    ));
}

#[test]
fn bin_values_round_trip_owned() {
    let mut b = Vec::new();
    append_bytes(&mut b, &[0xde, 0xad, 0xbe, 0xef]);
    let (v, rest) = read_value_bytes(&b).unwrap();
    assert_eq!(v, Value::Bin(vec![0xde, 0xad, 0xbe, 0xef]));
    assert!(rest.is_empty());
}

#[test]
fn bool_wire_bytes() {
    let mut b = Vec::new();
    append_bool(&mut b, true);
    append_bool(&mut b, false);
    assert_eq!(b, [0xc3, 0xc2]);
    let (t, rest) = read_bool_bytes(&b).unwrap();
    let (f, rest) = read_bool_bytes(rest).unwrap();
    assert!(t);
    assert!(!f);
    assert!(rest.is_empty());
}
