//! Typed lookups into raw API JSON.
//!
//! Every helper takes a JSON pointer (`/data/posts/0/url`) and falls back to a
//! declared default when any segment is missing, null or of the wrong type.

use serde_json::Value;

/// String at `pointer`, if present and non-empty.
pub fn str_at<'a>(value: &'a Value, pointer: &str) -> Option<&'a str> {
    value
        .pointer(pointer)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// String at `pointer`, or an empty string.
pub fn text_at(value: &Value, pointer: &str) -> String {
    str_at(value, pointer).unwrap_or_default().to_string()
}

/// Engagement count at `pointer`, or zero.
///
/// Accepts integers, floats (truncated) and numeric strings.
pub fn count_at(value: &Value, pointer: &str) -> i64 {
    match value.pointer(pointer) {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

/// Boolean at `pointer`, or `false`.
pub fn flag_at(value: &Value, pointer: &str) -> bool {
    value
        .pointer(pointer)
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

/// Array at `pointer`, or an empty slice.
pub fn list_at<'a>(value: &'a Value, pointer: &str) -> &'a [Value] {
    value
        .pointer(pointer)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// First string element of the array at `pointer`.
pub fn first_str_at<'a>(value: &'a Value, pointer: &str) -> Option<&'a str> {
    list_at(value, pointer)
        .first()
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// Decode bytes as UTF-8, dropping invalid sequences instead of substituting them.
#[must_use]
pub fn sanitize_utf8(bytes: &[u8]) -> String {
    bytes.utf8_chunks().map(|chunk| chunk.valid()).collect()
}

/// Remove unpaired UTF-16 surrogate escapes (`\ud83d` without its low half)
/// from raw JSON text. Properly paired escapes and all other escapes are kept.
#[must_use]
pub fn strip_lone_surrogates(json: &str) -> String {
    let bytes = json.as_bytes();
    let mut out = String::with_capacity(json.len());
    let mut copied = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'\\' {
            i += 1;
            continue;
        }
        match escape_unit(bytes, i) {
            Some(0xD800..=0xDBFF)
                if matches!(escape_unit(bytes, i + 6), Some(0xDC00..=0xDFFF)) =>
            {
                i += 12;
            }
            Some(0xD800..=0xDFFF) => {
                out.push_str(&json[copied..i]);
                i += 6;
                copied = i;
            }
            // Any other escape, including `\\`, is two bytes or more and kept.
            _ => i += 2,
        }
    }

    out.push_str(&json[copied..]);
    out
}

/// Code unit of a `\uXXXX` escape starting at `i`.
fn escape_unit(bytes: &[u8], i: usize) -> Option<u16> {
    let escape = bytes.get(i..i + 6)?;
    if escape[0] != b'\\' || escape[1] != b'u' || !escape[2..].iter().all(u8::is_ascii_hexdigit) {
        return None;
    }
    let hex = std::str::from_utf8(&escape[2..]).ok()?;
    u16::from_str_radix(hex, 16).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_str_at_defaults() {
        let value = json!({"a": {"b": "hello", "empty": "", "num": 3}});
        assert_eq!(str_at(&value, "/a/b"), Some("hello"));
        assert_eq!(str_at(&value, "/a/empty"), None);
        assert_eq!(str_at(&value, "/a/num"), None);
        assert_eq!(str_at(&value, "/a/missing/deeper"), None);
        assert_eq!(text_at(&value, "/nope"), "");
    }

    #[test]
    fn test_count_at_variants() {
        let value = json!({
            "int": 42,
            "float": 12.9,
            "string": " 17 ",
            "bad": "many",
            "null": null,
            "obj": {}
        });
        assert_eq!(count_at(&value, "/int"), 42);
        assert_eq!(count_at(&value, "/float"), 12);
        assert_eq!(count_at(&value, "/string"), 17);
        assert_eq!(count_at(&value, "/bad"), 0);
        assert_eq!(count_at(&value, "/null"), 0);
        assert_eq!(count_at(&value, "/obj"), 0);
        assert_eq!(count_at(&value, "/missing"), 0);
    }

    #[test]
    fn test_list_and_first() {
        let value = json!({"urls": ["https://a", "https://b"], "single": "https://c", "empty": []});
        assert_eq!(list_at(&value, "/urls").len(), 2);
        assert_eq!(first_str_at(&value, "/urls"), Some("https://a"));
        assert_eq!(first_str_at(&value, "/single"), None);
        assert_eq!(first_str_at(&value, "/empty"), None);
        assert!(list_at(&value, "/missing").is_empty());
    }

    #[test]
    fn test_flag_at() {
        let value = json!({"yes": true, "text": "true"});
        assert!(flag_at(&value, "/yes"));
        assert!(!flag_at(&value, "/text"));
        assert!(!flag_at(&value, "/missing"));
    }

    #[test]
    fn test_sanitize_utf8_drops_invalid_bytes() {
        assert_eq!(sanitize_utf8(b"plain"), "plain");
        assert_eq!(sanitize_utf8(b"bad\xffbyte"), "badbyte");
        assert_eq!(sanitize_utf8(b"cut \xe2\x82"), "cut ");
        assert_eq!(sanitize_utf8("caf\u{e9}".as_bytes()), "caf\u{e9}");
        assert!(!sanitize_utf8(b"\xc3\x28").contains('\u{FFFD}'));
    }

    #[test]
    fn test_strip_lone_surrogates() {
        // Unpaired high and low halves are dropped
        assert_eq!(strip_lone_surrogates(r#""sunset \ud83d""#), r#""sunset ""#);
        assert_eq!(strip_lone_surrogates(r#""a\uDC00b""#), r#""ab""#);
        assert_eq!(strip_lone_surrogates(r#""\ud83d\u0041""#), r#""\u0041""#);

        // Valid pairs, ordinary escapes and escaped backslashes are kept
        assert_eq!(strip_lone_surrogates(r#""\ud83c\udf05""#), r#""\ud83c\udf05""#);
        assert_eq!(strip_lone_surrogates(r#""caf\u00e9 \n""#), r#""caf\u00e9 \n""#);
        assert_eq!(strip_lone_surrogates(r#""C:\\ud83d""#), r#""C:\\ud83d""#);
        assert_eq!(strip_lone_surrogates("trailing \\"), "trailing \\");
    }

    #[test]
    fn test_stripped_text_decodes() {
        let raw = r#"{"a": "sunset \ud83d", "b": "\ud83c\udf05 ok"}"#;
        assert!(serde_json::from_str::<Value>(raw).is_err());

        let value: Value = serde_json::from_str(&strip_lone_surrogates(raw)).unwrap();
        assert_eq!(value["a"], "sunset ");
        assert_eq!(value["b"], "\u{1F305} ok");
    }
}
