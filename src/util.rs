use serde_json::Value;

pub fn truncate_string(text: &str, max_bytes: usize) -> String {
    if text.len() <= max_bytes {
        return text.to_string();
    }
    let mut truncated = String::new();
    for ch in text.chars() {
        if truncated.len() + ch.len_utf8() > max_bytes {
            break;
        }
        truncated.push(ch);
    }
    truncated
}

/// Pull a human readable error out of a JSON error body.
///
/// Understands `{"error": "..."}`, `{"error": {"message": "..."}}`,
/// `{"message": "..."}` and `{"msg": "..."}`. Anything else yields `None`.
pub fn message_from_body(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body.trim()).ok()?;
    let candidates = [
        value.get("error").and_then(Value::as_str),
        value
            .get("error")
            .and_then(|error| error.get("message"))
            .and_then(Value::as_str),
        value.get("message").and_then(Value::as_str),
        value.get("msg").and_then(Value::as_str),
    ];
    for message in candidates.into_iter().flatten() {
        let message = message.trim();
        if !message.is_empty() {
            return Some(message.to_string());
        }
    }
    None
}
