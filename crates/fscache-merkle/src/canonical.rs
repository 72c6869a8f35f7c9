// Copyright (c) Kanari Network
// SPDX-License-Identifier: Apache-2.0

use serde_json::{Map, Value};

/// Serializes a metadata mapping to the canonical byte form that is the sole
/// input to a node's own hash. Keys are sorted lexicographically at every
/// nesting level so the same logical mapping always produces the same
/// bytes regardless of insertion order or which JSON library wrote it --
/// this mirrors what Go's `encoding/json` does for `map[string]interface{}`.
pub fn canonical_map_bytes(map: &Map<String, Value>) -> Vec<u8> {
    let mut out = Vec::new();
    write_object(map, &mut out);
    out
}

fn write_value(value: &Value, out: &mut Vec<u8>) {
    match value {
        Value::Null => out.extend_from_slice(b"null"),
        Value::Bool(b) => out.extend_from_slice(if *b { b"true" } else { b"false" }),
        Value::Number(n) => out.extend_from_slice(n.to_string().as_bytes()),
        Value::String(s) => write_string(s, out),
        Value::Array(items) => {
            out.push(b'[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                write_value(item, out);
            }
            out.push(b']');
        }
        Value::Object(map) => write_object(map, out),
    }
}

fn write_object(map: &Map<String, Value>, out: &mut Vec<u8>) {
    let mut keys: Vec<&String> = map.keys().collect();
    keys.sort_unstable();

    out.push(b'{');
    for (i, key) in keys.iter().enumerate() {
        if i > 0 {
            out.push(b',');
        }
        write_string(key, out);
        out.push(b':');
        write_value(&map[key.as_str()], out);
    }
    out.push(b'}');
}

fn write_string(s: &str, out: &mut Vec<u8>) {
    // serde_json's string escaping is already correct and fast; reuse it
    // rather than hand-rolling JSON string escaping.
    let encoded = serde_json::to_string(s).expect("string serialization cannot fail");
    out.extend_from_slice(encoded.as_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obj(pairs: &[(&str, Value)]) -> Map<String, Value> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn sorts_keys_at_every_level() {
        let nested = obj(&[("z", Value::from(1)), ("a", Value::from(2))]);
        let top = obj(&[
            ("b", Value::Object(nested)),
            ("a", Value::String("x".into())),
        ]);

        let bytes = canonical_map_bytes(&top);
        let s = String::from_utf8(bytes).unwrap();
        assert_eq!(s, r#"{"a":"x","b":{"a":2,"z":1}}"#);
    }

    #[test]
    fn insertion_order_does_not_matter() {
        let a = obj(&[("x", Value::from(1)), ("y", Value::from(2))]);
        let b = obj(&[("y", Value::from(2)), ("x", Value::from(1))]);
        assert_eq!(canonical_map_bytes(&a), canonical_map_bytes(&b));
    }

    #[test]
    fn preserves_null_values() {
        let m = obj(&[("size", Value::Null)]);
        assert_eq!(canonical_map_bytes(&m), br#"{"size":null}"#);
    }
}
