use email_digest::{DocumentNode, Renderer, RendererConfig, Theme, format_title, is_empty};
use proptest::prelude::*;
use regex::Regex;
use serde_json::Value;

fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        (-1.0e6f64..1.0e6).prop_map(Value::from),
        "[a-zA-Z0-9 <>&\"'/_]{0,12}".prop_map(Value::String),
        prop_oneof![Just("N/A"), Just("n/a"), Just(""), Just("  ")].prop_map(|s| Value::String(s.into())),
    ];
    leaf.prop_recursive(5, 96, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::vec(("[a-z][a-zA-Z_]{0,8}", inner), 0..6)
                .prop_map(|kvs| Value::Object(kvs.into_iter().collect())),
        ]
    })
}

fn arb_record() -> impl Strategy<Value = Value> {
    prop::collection::vec(("[a-z][a-zA-Z]{0,8}", arb_json()), 0..8)
        .prop_map(|kvs| Value::Object(kvs.into_iter().collect()))
}

fn section_headings(html: &str) -> Vec<String> {
    let re = Regex::new(r"<h2[^>]*>(.*?)</h2>").unwrap();
    re.captures_iter(html).map(|c| c[1].to_string()).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn render_is_total_and_deterministic(v in arb_json(), email in any::<bool>()) {
        let theme = if email { Theme::Email } else { Theme::Plain };
        let renderer = Renderer::new(RendererConfig { theme, ..RendererConfig::default() });
        let node = DocumentNode::from(v);
        let first = renderer.render(&node);
        let second = renderer.render(&node);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn empty_sections_never_render(v in arb_record()) {
        let node = DocumentNode::from(v);
        let out = Renderer::default().render(&node);
        for (key, value) in node.as_record().unwrap() {
            prop_assert_eq!(out.breakdown.contains_key(key), !is_empty(value));
        }
    }

    #[test]
    fn section_order_matches_input_order(v in arb_record()) {
        let node = DocumentNode::from(v);
        let out = Renderer::default().render(&node);
        let kept: Vec<&String> = node
            .as_record()
            .unwrap()
            .iter()
            .filter(|(_, value)| !is_empty(value))
            .map(|(key, _)| key)
            .collect();
        prop_assert_eq!(out.breakdown.keys().collect::<Vec<_>>(), kept.clone());
        let titles: Vec<String> = kept.iter().map(|k| format_title(k)).collect();
        prop_assert_eq!(section_headings(&out.full_html), titles);
    }

    #[test]
    fn breakdown_fragments_appear_in_full_document(v in arb_record()) {
        let out = Renderer::default().render(&DocumentNode::from(v));
        for fragment in out.breakdown.values() {
            let inner = fragment
                .strip_prefix("<div class=\"digest-section\">")
                .and_then(|s| s.strip_suffix("</div>"))
                .unwrap();
            prop_assert!(out.full_html.contains(inner));
        }
    }
}
