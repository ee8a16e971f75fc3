use indexmap::IndexMap;
use proptest::prelude::*;
use wirepack::write::append_value;
use wirepack::{read_value_bytes, skip, Value};

fn arb_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Nil),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        any::<u64>().prop_map(Value::Uint),
        (-1.0e9f64..1.0e9).prop_map(Value::F64),
        "[ -~]{0,12}".prop_map(Value::Str),
        proptest::collection::vec(any::<u8>(), 0..24).prop_map(Value::Bin),
    ];
    leaf.prop_recursive(3, 24, 6, |inner| {
        prop_oneof![
            proptest::collection::vec(inner.clone(), 0..5).prop_map(Value::Array),
            proptest::collection::vec(("[a-z]{1,6}", inner), 0..5).prop_map(|pairs| {
                let mut m = IndexMap::new();
                for (k, v) in pairs {
                    m.insert(k, v);
                }
                Value::Map(m)
            }),
        ]
    })
}

/// Small non-negative integers encode as positive fixint, which decodes as
/// `Int`; fold `Uint` into `Int` where both sides can represent the value.
fn canon(v: Value) -> Value {
    match v {
        Value::Uint(u) if u <= i64::MAX as u64 => Value::Int(u as i64),
        Value::Array(a) => Value::Array(a.into_iter().map(canon).collect()),
        Value::Map(m) => Value::Map(m.into_iter().map(|(k, v)| (k, canon(v))).collect()),
        other => other,
    }
}

proptest! {
    #[test]
    fn decode_inverts_encode(v in arb_value()) {
        let mut buf = Vec::new();
        append_value(&mut buf, &v);
        let (back, rest) = read_value_bytes(&buf).unwrap();
        prop_assert!(rest.is_empty());
        prop_assert_eq!(canon(back), canon(v));
    }

    #[test]
    fn skip_consumes_exactly_one_object(v in arb_value()) {
        let mut buf = Vec::new();
        append_value(&mut buf, &v);
        let tail_len = buf.len();
        buf.push(0xc0); // trailing object that must survive the skip
        let rest = skip(&buf).unwrap();
        prop_assert_eq!(rest.len(), buf.len() - tail_len);
        prop_assert_eq!(rest, &[0xc0][..]);
    }

    #[test]
    fn concatenated_objects_skip_cleanly(vs in proptest::collection::vec(arb_value(), 1..5)) {
        let mut buf = Vec::new();
        for v in &vs {
            append_value(&mut buf, v);
        }
        let mut rest: &[u8] = &buf;
        for _ in 0..vs.len() {
            rest = skip(rest).unwrap();
        }
        prop_assert!(rest.is_empty());
    }
}
