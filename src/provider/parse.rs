//! JSON response parsing
//!
//! The upstream wraps each page in a result envelope (code, message,
//! total count) next to a row list. Rows are flattened losslessly into
//! flat string maps: every leaf value becomes a string, nested objects
//! are prefixed with their parent key, and key collisions get numeric
//! suffixes so no field is ever dropped.

use crate::canonical::Payload;
use crate::provider::FetchError;
use crate::window::PageWindow;
use serde_json::Value;

/// Keys the result envelope may appear under
const RESULT_KEYS: [&str; 2] = ["errorMessage", "RESULT"];

/// Keys the row list may appear under
const ROW_LIST_KEYS: [&str; 2] = ["realtimeArrivalList", "row"];

/// A parsed page response
#[derive(Debug, Clone)]
pub struct ParsedResponse {
    pub code: String,
    pub message: String,
    pub total_count: Option<u32>,
    pub rows: Vec<Payload>,
}

/// Parses one page body into its envelope and flattened rows
///
/// # Arguments
///
/// * `body` - The raw response body
/// * `window` - The requested window, for error context
///
/// # Returns
///
/// * `Ok(ParsedResponse)` - Body parsed; the result code is NOT validated here
/// * `Err(FetchError::Parse)` - Body is not a JSON object or lacks an envelope
pub fn parse_response(body: &str, window: PageWindow) -> Result<ParsedResponse, FetchError> {
    let root: Value = serde_json::from_str(body).map_err(|e| FetchError::Parse {
        window,
        message: format!("invalid JSON: {}", e),
    })?;

    let obj = root.as_object().ok_or_else(|| FetchError::Parse {
        window,
        message: "response root is not an object".to_string(),
    })?;

    let result = RESULT_KEYS
        .iter()
        .find_map(|key| obj.get(*key))
        .and_then(Value::as_object)
        .ok_or_else(|| FetchError::Parse {
            window,
            message: "response has no result envelope".to_string(),
        })?;

    let code = result
        .get("code")
        .or_else(|| result.get("CODE"))
        .and_then(Value::as_str)
        .unwrap_or("")
        .trim()
        .to_string();

    let message = result
        .get("message")
        .or_else(|| result.get("MESSAGE"))
        .and_then(Value::as_str)
        .unwrap_or("")
        .trim()
        .to_string();

    let rows: Vec<Payload> = ROW_LIST_KEYS
        .iter()
        .find_map(|key| obj.get(*key))
        .and_then(Value::as_array)
        .map(|list| list.iter().map(flatten_row).collect())
        .unwrap_or_default();

    // The total may live in the envelope, at the root, or on the first row.
    let total_count = value_as_u32(result.get("total"))
        .or_else(|| value_as_u32(obj.get("totalCount")))
        .or_else(|| {
            rows.first()
                .and_then(|row| row.get("totalCount"))
                .and_then(|s| s.trim().parse().ok())
        });

    Ok(ParsedResponse {
        code,
        message,
        total_count,
        rows,
    })
}

fn value_as_u32(value: Option<&Value>) -> Option<u32> {
    match value? {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Flattens one row value into a flat string map
fn flatten_row(row: &Value) -> Payload {
    let mut payload = Payload::new();
    match row {
        Value::Object(map) => {
            for (key, value) in map {
                flatten_value(key, value, &mut payload);
            }
        }
        other => insert_unique(&mut payload, "value".to_string(), scalar_to_string(other)),
    }
    payload
}

fn flatten_value(key: &str, value: &Value, payload: &mut Payload) {
    match value {
        Value::Object(map) => {
            for (child_key, child) in map {
                flatten_value(&format!("{}_{}", key, child_key), child, payload);
            }
        }
        Value::Array(items) => {
            for item in items {
                flatten_value(key, item, payload);
            }
        }
        scalar => insert_unique(payload, key.to_string(), scalar_to_string(scalar)),
    }
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Inserts a key, suffixing `__1`, `__2`, ... on collision so repeated
/// fields survive flattening
fn insert_unique(payload: &mut Payload, key: String, value: String) {
    if !payload.contains_key(&key) {
        payload.insert(key, value);
        return;
    }
    let mut counter = 1;
    loop {
        let candidate = format!("{}__{}", key, counter);
        if !payload.contains_key(&candidate) {
            payload.insert(candidate, value);
            return;
        }
        counter += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> PageWindow {
        PageWindow::new(0, 999)
    }

    #[test]
    fn test_parse_success_envelope() {
        let body = r#"{
            "errorMessage": {
                "status": 200,
                "code": "INFO-000",
                "message": "정상 처리되었습니다.",
                "total": 472
            },
            "realtimeArrivalList": [
                {"statnNm": "서울역", "trainLineNm": "성수행", "barvlDt": "120"},
                {"statnNm": "시청", "trainLineNm": "신도림행", "barvlDt": "60"}
            ]
        }"#;

        let parsed = parse_response(body, window()).unwrap();
        assert_eq!(parsed.code, "INFO-000");
        assert_eq!(parsed.total_count, Some(472));
        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.rows[0]["statnNm"], "서울역");
        assert_eq!(parsed.rows[1]["barvlDt"], "60");
    }

    #[test]
    fn test_parse_uppercase_result_block() {
        let body = r#"{
            "RESULT": {"CODE": "INFO-000", "MESSAGE": "ok"},
            "row": [{"statnNm": "강남"}],
            "totalCount": 7
        }"#;

        let parsed = parse_response(body, window()).unwrap();
        assert_eq!(parsed.code, "INFO-000");
        assert_eq!(parsed.message, "ok");
        assert_eq!(parsed.total_count, Some(7));
        assert_eq!(parsed.rows.len(), 1);
    }

    #[test]
    fn test_parse_error_code_passthrough() {
        let body = r#"{"errorMessage": {"code": "ERROR-337", "message": "over quota"}}"#;
        let parsed = parse_response(body, window()).unwrap();
        assert_eq!(parsed.code, "ERROR-337");
        assert_eq!(parsed.message, "over quota");
        assert!(parsed.rows.is_empty());
        assert_eq!(parsed.total_count, None);
    }

    #[test]
    fn test_parse_total_count_from_first_row() {
        let body = r#"{
            "errorMessage": {"code": "INFO-000", "message": "ok"},
            "realtimeArrivalList": [{"totalCount": "321", "statnNm": "을지로입구"}]
        }"#;
        let parsed = parse_response(body, window()).unwrap();
        assert_eq!(parsed.total_count, Some(321));
    }

    #[test]
    fn test_parse_invalid_json() {
        let result = parse_response("not json at all", window());
        assert!(matches!(result, Err(FetchError::Parse { .. })));
    }

    #[test]
    fn test_parse_missing_envelope() {
        let result = parse_response(r#"{"rows": []}"#, window());
        assert!(matches!(result, Err(FetchError::Parse { .. })));
    }

    #[test]
    fn test_flatten_nested_object() {
        let row = serde_json::json!({
            "statnNm": "서울역",
            "position": {"lat": 37.55, "lon": 126.97}
        });
        let payload = flatten_row(&row);
        assert_eq!(payload["statnNm"], "서울역");
        assert_eq!(payload["position_lat"], "37.55");
        assert_eq!(payload["position_lon"], "126.97");
    }

    #[test]
    fn test_flatten_repeated_keys_get_suffixes() {
        let row = serde_json::json!({"tag": ["a", "b", "c"]});
        let payload = flatten_row(&row);
        assert_eq!(payload["tag"], "a");
        assert_eq!(payload["tag__1"], "b");
        assert_eq!(payload["tag__2"], "c");
    }

    #[test]
    fn test_flatten_scalar_types() {
        let row = serde_json::json!({"count": 3, "active": true, "gone": null, "name": " padded "});
        let payload = flatten_row(&row);
        assert_eq!(payload["count"], "3");
        assert_eq!(payload["active"], "true");
        assert_eq!(payload["gone"], "");
        // Incidental whitespace is stripped so equal content hashes equally
        assert_eq!(payload["name"], "padded");
    }
}
