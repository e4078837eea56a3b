/// JSON body `{"text": message}` for an incoming-webhook post.
///
/// Quotes, backslashes and control characters in `message` are escaped.
#[must_use]
pub fn build_payload(message: &str) -> String {
    serde_json::json!({ "text": message }).to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::build_payload;
    use serde_json::Value;

    #[test]
    fn plain_text_keeps_the_compact_shape() {
        assert_eq!(build_payload("deployed"), r#"{"text":"deployed"}"#);
    }

    #[test]
    fn quotes_and_backslashes_stay_valid_json() {
        let message = r#"deploy "v2" finished \ rollback at C:\tmp"#;
        let parsed: Value = serde_json::from_str(&build_payload(message)).unwrap();
        assert_eq!(parsed["text"], message);
    }

    #[test]
    fn control_characters_are_escaped() {
        let message = "line one\nline two\ttabbed\u{0007}";
        let raw = build_payload(message);
        assert!(!raw.contains('\n'));
        let parsed: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed["text"], message);
    }
}
