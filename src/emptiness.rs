//! Two notions of "nothing here".
//!
//! - [`is_empty`] gates whole top-level sections (omit entirely).
//! - [`is_blank`] is the per-value display rule below the top level
//!   (render an `N/A` placeholder instead of the value).
use crate::node::{DocumentNode, Scalar};

/// Structural emptiness. Lists are checked one level deep (length only);
/// records recurse through every value.
pub fn is_empty(node: &DocumentNode) -> bool {
    match node {
        DocumentNode::Scalar(Scalar::Null) => true,
        DocumentNode::Scalar(Scalar::String(s)) => is_empty_text(s),
        DocumentNode::Scalar(Scalar::Bool(_) | Scalar::Number(_)) => false,
        DocumentNode::List(items) => items.is_empty(),
        DocumentNode::Record(fields) => fields.values().all(is_empty),
    }
}

/// Falsy and not boolean `false`: null, `""`, zero, `[]`, `{}`.
pub fn is_blank(node: &DocumentNode) -> bool {
    match node {
        DocumentNode::Scalar(Scalar::Null) => true,
        DocumentNode::Scalar(Scalar::Bool(_)) => false,
        DocumentNode::Scalar(Scalar::Number(n)) => n.as_f64() == Some(0.0),
        DocumentNode::Scalar(Scalar::String(s)) => s.is_empty(),
        DocumentNode::List(items) => items.is_empty(),
        DocumentNode::Record(fields) => fields.is_empty(),
    }
}

fn is_empty_text(s: &str) -> bool {
    let t = s.trim();
    t.is_empty() || t.eq_ignore_ascii_case("n/a")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn empty(v: serde_json::Value) -> bool { is_empty(&DocumentNode::from(v)) }
    fn blank(v: serde_json::Value) -> bool { is_blank(&DocumentNode::from(v)) }

    #[test]
    fn placeholder_strings_are_empty() {
        assert!(empty(json!("N/A")));
        assert!(empty(json!("n/a")));
        assert!(empty(json!("  N/a  ")));
        assert!(empty(json!("")));
        assert!(empty(json!("   ")));
        assert!(!empty(json!("Renew by Friday")));
    }

    #[test]
    fn lists_check_length_only() {
        assert!(empty(json!([])));
        assert!(!empty(json!(["N/A"])));
        assert!(!empty(json!([null])));
    }

    #[test]
    fn records_recurse() {
        assert!(empty(json!({})));
        assert!(empty(json!({"x": "N/A", "y": []})));
        assert!(!empty(json!({"x": "N/A", "y": ["hi"]})));
        assert!(empty(json!({"a": {"b": {"c": ""}}, "d": null})));
        assert!(!empty(json!({"a": {"b": {"c": "deep"}}})));
    }

    #[test]
    fn numbers_and_booleans_are_content() {
        assert!(!empty(json!(0)));
        assert!(!empty(json!(false)));
        assert!(!empty(json!({"count": 0})));
        assert!(empty(json!(null)));
    }

    #[test]
    fn display_rule_keeps_false_but_blanks_zero() {
        assert!(blank(json!(null)));
        assert!(blank(json!("")));
        assert!(blank(json!(0)));
        assert!(blank(json!(0.0)));
        assert!(blank(json!([])));
        assert!(blank(json!({})));
        assert!(!blank(json!(false)));
        assert!(!blank(json!("N/A")));
        assert!(!blank(json!(" ")));
    }
}
