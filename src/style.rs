//! Inline style sheets for emitted HTML.
//!
//! The front end embeds fragments into pages it does not control, so styling
//! travels as `style` attributes rather than a stylesheet. An empty slot means
//! "emit the bare tag".

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StyleSheet {
    pub container: &'static str,
    pub section: &'static str,
    pub h1: &'static str,
    pub h2: &'static str,
    pub h3: &'static str,
    pub paragraph: &'static str,
    pub ul: &'static str,
    pub li: &'static str,
    pub label: &'static str,
    pub placeholder: &'static str,
    pub checkbox_li: &'static str,
    pub checkbox_input: &'static str,
    pub responsibility: &'static str,
    pub deadline: &'static str,
    pub deadline_date: &'static str,
    pub financial: &'static str,
    pub emoji: &'static str,
}

impl StyleSheet {
    /// No inline styles at all.
    pub const fn plain() -> Self {
        Self {
            container: "",
            section: "",
            h1: "",
            h2: "",
            h3: "",
            paragraph: "",
            ul: "",
            li: "",
            label: "",
            placeholder: "",
            checkbox_li: "",
            checkbox_input: "",
            responsibility: "",
            deadline: "",
            deadline_date: "",
            financial: "",
            emoji: "",
        }
    }

    /// The palette the email client has always shipped with.
    pub const fn email() -> Self {
        Self {
            container: "font-family: -apple-system, BlinkMacSystemFont, \"Segoe UI\", Roboto, sans-serif; line-height: 1.6; color: #333; max-width: 100%; padding: 1.5em; background: #fff;",
            section: "margin: 0 0 1.5em 0;",
            h1: "font-size: 2.2em; font-weight: bold; margin: 0 0 1.5em 0; color: #1a365d; border-bottom: 3px solid #3182ce; padding-bottom: 0.5em;",
            h2: "font-size: 1.6em; font-weight: bold; margin: 2.5em 0 1em 0; color: #2d3748; border-bottom: 2px solid #4299e1; padding-bottom: 0.3em;",
            h3: "font-size: 1.3em; font-weight: 600; margin: 1.8em 0 0.8em 0; color: #4a5568;",
            paragraph: "margin: 0.5em 0;",
            ul: "margin: 1em 0; padding-left: 1.5em; list-style-type: disc;",
            li: "margin: 0.4em 0; line-height: 1.5;",
            label: "color: #2d3748;",
            placeholder: "margin: 0.5em 0; color: #718096; font-style: italic;",
            checkbox_li: "list-style: none; margin: 0.6em 0; position: relative; padding-left: 0; display: flex; align-items: flex-start;",
            checkbox_input: "margin-right: 0.5em; margin-top: 0.1em; transform: scale(1.1); flex-shrink: 0;",
            responsibility: "font-weight: 600; margin: 1.5em 0 0.8em 0; color: #2d3748; font-size: 1.1em; background: #f7fafc; padding: 0.5em; border-radius: 4px; border-left: 3px solid #4299e1;",
            deadline: "margin: 0.8em 0; padding: 0.8em; background: linear-gradient(135deg, #fff5f5, #ffe8e8); border-left: 4px solid #e53e3e; border-radius: 6px; box-shadow: 0 1px 3px rgba(0,0,0,0.1);",
            deadline_date: "font-weight: bold; color: #c53030; font-size: 1.05em;",
            financial: "margin: 0.5em 0; padding: 0.6em; background: #f7fafc; border-radius: 6px; border-left: 3px solid #38b2ac;",
            emoji: "margin-right: 0.6em; font-size: 1.2em;",
        }
    }
}

/// ` style="..."` or nothing.
pub fn style_attr(style: &str) -> String {
    if style.is_empty() {
        String::new()
    } else {
        format!(" style=\"{}\"", escape_attr(style))
    }
}

/// Opening tag with optional class and inline style.
pub fn open_tag(tag: &str, class: Option<&str>, style: &str) -> String {
    match class {
        Some(class) => format!("<{tag} class=\"{class}\"{}>", style_attr(style)),
        None => format!("<{tag}{}>", style_attr(style)),
    }
}

/// Minimal text escaping for element content.
pub fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

fn escape_attr(s: &str) -> String {
    escape_text(s).replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_sheet_emits_bare_tags() {
        let s = StyleSheet::plain();
        assert_eq!(open_tag("h2", None, s.h2), "<h2>");
        assert_eq!(open_tag("div", Some("digest-section"), s.section), "<div class=\"digest-section\">");
    }

    #[test]
    fn email_sheet_quotes_are_escaped_in_attributes() {
        let tag = open_tag("div", None, StyleSheet::email().container);
        assert!(tag.starts_with("<div style=\"font-family: -apple-system"));
        assert!(tag.contains("&quot;Segoe UI&quot;"));
    }

    #[test]
    fn text_escaping() {
        assert_eq!(escape_text("a < b & c > d"), "a &lt; b &amp; c &gt; d");
    }
}
