use crate::record::{error_shape, Message, Metadata};
use serde::Serialize;
use serde_json::{json, Value};

/// Normalized payload handed to the notification client, paired with the
/// resolved message text by [`translate`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TelemetryEvent {
    /// Destination-side severity, resolved from the sink's levels map.
    pub severity: String,
    /// The event's metadata bag. Serializes as `metaData`, the key the
    /// backend's notify payload expects.
    #[serde(rename = "metaData")]
    pub meta_data: Metadata,
}

/// Own fields of an attached error object that never land in `custom`.
const STANDARD_ERROR_FIELDS: [&str; 3] = ["stack", "message", "name"];

/// Map one log record onto the notify call's `(message, event)` pair.
///
/// **Parameters**
/// - `severity`: destination severity, already resolved by the caller.
/// - `message`: plain text or a structured error.
/// - `meta`: the record's metadata bag; may carry nested `metadata`/
///   `metaData` bags, an `error` object, `err` and `custom`.
///
/// **Returns**
/// - The forwarded message text (an error message's text when `message` is
///   an error) and the assembled [`TelemetryEvent`].
///
/// The emitted bag keeps every top-level metadata field except the nested
/// bag spellings, folds both `metadata` and `metaData` sub-objects into a
/// single `metadata` key, and collects the attached error's non-standard
/// fields into `custom`. An error-valued message, or a metadata map that is
/// itself error-shaped, surfaces as `err: {stack, message}` unless the
/// caller already attached an `err` object.
pub fn translate(severity: &str, message: Message, meta: Metadata) -> (String, TelemetryEvent) {
    let attached_error = meta
        .get("error")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();

    let custom_error_fields: Metadata = attached_error
        .iter()
        .filter(|(key, _)| !STANDARD_ERROR_FIELDS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    // Both spellings of the nested bag collapse into one `metadata` key;
    // the camel-case one loses on conflicts.
    let mut nested = Metadata::new();
    for spelling in ["metaData", "metadata"] {
        if let Some(sub) = meta.get(spelling).and_then(Value::as_object) {
            nested.extend(sub.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
    }

    let mut custom = meta
        .get("custom")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();
    custom.extend(custom_error_fields);

    let mut bag: Metadata = meta
        .iter()
        .filter(|(key, _)| key.as_str() != "metadata" && key.as_str() != "metaData")
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    bag.insert("metadata".to_string(), Value::Object(nested));
    bag.insert("custom".to_string(), Value::Object(custom));

    if !bag.get("err").map_or(false, Value::is_object) {
        if let Message::Error(err) = &message {
            bag.insert(
                "err".to_string(),
                json!({ "stack": err.stack, "message": err.message }),
            );
        } else if let Some(shape) = error_shape(&meta) {
            bag.insert(
                "err".to_string(),
                json!({ "stack": shape.stack, "message": shape.message }),
            );
        }
    }

    let text = match message {
        Message::Text(text) => text,
        Message::Error(err) => err.message,
    };

    (
        text,
        TelemetryEvent {
            severity: severity.to_string(),
            meta_data: bag,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ErrorLike;
    use serde_json::json;

    fn meta(value: Value) -> Metadata {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn nested_metadata_is_not_duplicated_at_top_level() {
        let (text, event) = translate(
            "info",
            Message::from("hello"),
            meta(json!({ "a": 1, "metadata": { "b": 2 } })),
        );

        assert_eq!(text, "hello");
        assert_eq!(
            Value::Object(event.meta_data),
            json!({ "a": 1, "metadata": { "b": 2 }, "custom": {} })
        );
    }

    #[test]
    fn both_nested_bag_spellings_merge() {
        let (_, event) = translate(
            "info",
            Message::from("hello"),
            meta(json!({ "metaData": { "x": 1, "y": 0 }, "metadata": { "y": 2 } })),
        );

        assert_eq!(event.meta_data["metadata"], json!({ "x": 1, "y": 2 }));
        assert!(event.meta_data.get("metaData").is_none());
    }

    #[test]
    fn custom_collects_non_standard_error_fields() {
        let (_, event) = translate(
            "error",
            Message::from("boom"),
            meta(json!({
                "error": { "stack": "S", "message": "boom", "name": "Error", "code": 42 }
            })),
        );

        assert_eq!(event.meta_data["custom"], json!({ "code": 42 }));
        // the attached error object itself passes through untouched
        assert_eq!(event.meta_data["error"]["code"], json!(42));
    }

    #[test]
    fn custom_merges_with_an_existing_custom_bag() {
        let (_, event) = translate(
            "error",
            Message::from("boom"),
            meta(json!({
                "custom": { "kept": true },
                "error": { "stack": "S", "message": "boom", "name": "Error", "code": 42 }
            })),
        );

        assert_eq!(event.meta_data["custom"], json!({ "kept": true, "code": 42 }));
    }

    #[test]
    fn error_message_fills_err_and_message_text() {
        let err = ErrorLike::new("Error", "boom", "S");
        let (text, event) = translate("error", Message::from(err), Metadata::new());

        assert_eq!(text, "boom");
        assert_eq!(
            event.meta_data["err"],
            json!({ "stack": "S", "message": "boom" })
        );
    }

    #[test]
    fn pre_existing_err_object_is_kept() {
        let err = ErrorLike::new("Error", "boom", "S2");
        let (text, event) = translate(
            "error",
            Message::from(err),
            meta(json!({ "err": { "stack": "S1", "message": "first" } })),
        );

        assert_eq!(text, "boom");
        assert_eq!(
            event.meta_data["err"],
            json!({ "stack": "S1", "message": "first" })
        );
    }

    #[test]
    fn non_object_err_is_replaced() {
        let err = ErrorLike::new("Error", "boom", "S");
        let (_, event) = translate(
            "error",
            Message::from(err),
            meta(json!({ "err": "not an object" })),
        );

        assert_eq!(
            event.meta_data["err"],
            json!({ "stack": "S", "message": "boom" })
        );
    }

    #[test]
    fn error_shaped_metadata_fills_err() {
        let (text, event) = translate(
            "error",
            Message::from("kept text"),
            meta(json!({ "stack": "S", "message": "boom", "name": "Error" })),
        );

        // plain-text message is kept; only err is derived from the metadata
        assert_eq!(text, "kept text");
        assert_eq!(
            event.meta_data["err"],
            json!({ "stack": "S", "message": "boom" })
        );
    }

    #[test]
    fn severity_is_a_typed_field() {
        let (_, event) = translate("warning", Message::from("disk low"), Metadata::new());
        assert_eq!(event.severity, "warning");
        assert!(event.meta_data.get("severity").is_none());
    }
}
