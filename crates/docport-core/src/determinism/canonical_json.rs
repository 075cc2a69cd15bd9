//! Canonical JSON encoding.
//!
//! Rules:
//! - object keys sorted by byte order
//! - no insignificant whitespace
//! - strings and numbers use serde_json's encoding
//!
//! Good enough for checksums over documents produced by this crate; it is not
//! an RFC 8785 implementation (float formatting follows serde_json).

use serde_json::Value;

use crate::errors::DocportResult;

/// Encode a value into canonical bytes.
pub fn to_canonical_bytes(value: &Value) -> DocportResult<Vec<u8>> {
    let mut out = Vec::new();
    write_value(value, &mut out)?;
    Ok(out)
}

fn write_value(value: &Value, out: &mut Vec<u8>) -> DocportResult<()> {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push(b'{');
            for (i, k) in keys.iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                out.extend_from_slice(serde_json::to_string(k)?.as_bytes());
                out.push(b':');
                write_value(&map[k.as_str()], out)?;
            }
            out.push(b'}');
        }
        Value::Array(items) => {
            out.push(b'[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                write_value(item, out)?;
            }
            out.push(b']');
        }
        scalar => out.extend_from_slice(serde_json::to_string(scalar)?.as_bytes()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn key_order_does_not_matter() {
        let a = json!({"b": [3, 2, 1], "a": {"y": 2, "x": 1}});
        let b = json!({"a": {"x": 1, "y": 2}, "b": [3, 2, 1]});
        assert_eq!(to_canonical_bytes(&a).unwrap(), to_canonical_bytes(&b).unwrap());
    }

    #[test]
    fn output_is_compact() {
        let v = json!({"z": "q", "a": [true, null, 1.5]});
        let s = String::from_utf8(to_canonical_bytes(&v).unwrap()).unwrap();
        assert_eq!(s, r#"{"a":[true,null,1.5],"z":"q"}"#);
    }
}
