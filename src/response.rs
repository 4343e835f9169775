//! The JSON envelope shared by all API responses.
//!
//! Every response body carries a `success` boolean; failures add a `message`
//! and successes merge their payload fields into the top level, matching what
//! the web client expects.

use axum::Json;
use serde_json::{Map, Value, json};

/// Wrap a payload object in a `success: true` envelope.
///
/// The payload's fields are merged into the top level of the response body.
/// A non-object payload is nested under a `data` key instead.
pub fn success(payload: Value) -> Json<Value> {
    let mut body = match payload {
        Value::Object(map) => map,
        other => {
            let mut map = Map::new();
            map.insert("data".to_string(), other);
            map
        }
    };

    body.insert("success".to_string(), Value::Bool(true));

    Json(Value::Object(body))
}

/// A `success: true` envelope carrying only a human-readable message.
pub fn success_message(message: &str) -> Json<Value> {
    Json(json!({
        "success": true,
        "message": message,
    }))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{success, success_message};

    #[test]
    fn success_merges_payload_fields() {
        let axum::Json(body) = success(json!({"usertoken": "abc"}));

        assert_eq!(body["success"], json!(true));
        assert_eq!(body["usertoken"], json!("abc"));
    }

    #[test]
    fn non_object_payload_is_nested_under_data() {
        let axum::Json(body) = success(json!([1, 2, 3]));

        assert_eq!(body["success"], json!(true));
        assert_eq!(body["data"], json!([1, 2, 3]));
    }

    #[test]
    fn success_message_sets_both_fields() {
        let axum::Json(body) = success_message("Budget removed");

        assert_eq!(body["success"], json!(true));
        assert_eq!(body["message"], json!("Budget removed"));
    }
}
