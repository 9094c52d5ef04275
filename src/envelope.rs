//! Unwrapping generateContent-style model responses.
//!
//! The model call itself happens elsewhere; this module only digs the
//! candidate text out of the response body and, for JSON-mode requests,
//! parses that text into a [`DocumentNode`].
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;

use crate::node::DocumentNode;

const CANDIDATE_TEXT_POINTER: &str = "/candidates/0/content/parts/0/text";

static CODE_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^\s*```[A-Za-z]*[ \t]*\n?(.*?)\n?\s*```\s*$").expect("static regex")
});

#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("model returned an error: {0}")]
    Upstream(String),
    #[error("model response has no candidates")]
    NoCandidates,
    #[error("model response candidate has no text part")]
    MissingText,
    #[error("model text is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// `candidates[0].content.parts[0].text`.
pub fn candidate_text(response: &Value) -> Result<&str, EnvelopeError> {
    if let Some(message) = response.pointer("/error/message").and_then(Value::as_str) {
        return Err(EnvelopeError::Upstream(message.to_string()));
    }
    let has_candidates = response
        .get("candidates")
        .and_then(Value::as_array)
        .is_some_and(|xs| !xs.is_empty());
    if !has_candidates {
        return Err(EnvelopeError::NoCandidates);
    }
    response
        .pointer(CANDIDATE_TEXT_POINTER)
        .and_then(Value::as_str)
        .ok_or(EnvelopeError::MissingText)
}

/// Parse JSON-mode text. Tolerates a surrounding Markdown code fence.
pub fn parse_document(text: &str) -> Result<DocumentNode, EnvelopeError> {
    let body = match CODE_FENCE.captures(text) {
        Some(caps) => caps.get(1).map_or("", |m| m.as_str()),
        None => text,
    };
    let value = serde_json::from_str::<Value>(body)?;
    Ok(DocumentNode::from(value))
}

/// Candidate text of `response`, parsed as a document.
pub fn document_from_response(response: &Value) -> Result<DocumentNode, EnvelopeError> {
    parse_document(candidate_text(response)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn wrap(text: &str) -> Value {
        json!({"candidates": [{"content": {"role": "model", "parts": [{"text": text}]}}]})
    }

    #[test]
    fn extracts_first_candidate_text() {
        let resp = wrap("hello");
        assert_eq!(candidate_text(&resp).unwrap(), "hello");
    }

    #[test]
    fn reports_missing_pieces() {
        assert!(matches!(candidate_text(&json!({})), Err(EnvelopeError::NoCandidates)));
        assert!(matches!(candidate_text(&json!({"candidates": []})), Err(EnvelopeError::NoCandidates)));
        assert!(matches!(
            candidate_text(&json!({"candidates": [{"content": {"parts": []}}]})),
            Err(EnvelopeError::MissingText)
        ));
        let err = candidate_text(&json!({"error": {"code": 400, "message": "API key not valid"}})).unwrap_err();
        assert_eq!(err.to_string(), "model returned an error: API key not valid");
    }

    #[test]
    fn parses_plain_and_fenced_json() {
        let plain = parse_document(r#"{"keyMessage": "Pay"}"#).unwrap();
        let fenced = parse_document("```json\n{\"keyMessage\": \"Pay\"}\n```\n").unwrap();
        assert_eq!(plain, fenced);
        assert!(plain.as_record().is_some());
    }

    #[test]
    fn document_from_response_keeps_key_order() {
        let resp = wrap(r#"{"zeta": "z", "alpha": "a"}"#);
        let doc = document_from_response(&resp).unwrap();
        let keys: Vec<&str> = doc.as_record().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, ["zeta", "alpha"]);
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(matches!(parse_document("not json"), Err(EnvelopeError::InvalidJson(_))));
    }
}
