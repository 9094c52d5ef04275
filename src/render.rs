//! Generic structured-document renderer.
//!
//! Any schema-shaped tree renders through one recursion keyed only on
//! structural type (record / list / scalar). The only schema knowledge is the
//! top-level emptiness gate and the configured ignore set; everything else
//! falls back to stringification, so no input shape can make rendering fail.
use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use crate::config::RendererConfig;
use crate::emptiness::{is_blank, is_empty};
use crate::node::{DocumentNode, Scalar};
use crate::style::{StyleSheet, escape_text, open_tag};
use crate::title::format_title;

pub const DOCUMENT_CLASS: &str = "email-digest";
pub const SECTION_CLASS: &str = "digest-section";
pub const FIELD_CLASS: &str = "digest-field";
pub const PLACEHOLDER_CLASS: &str = "digest-na";
pub const NO_DATA_CLASS: &str = "digest-empty";

/// Level of the per-section heading in the full document; nested records go deeper.
const SECTION_HEADING_LEVEL: u8 = 2;
const MAX_HEADING_LEVEL: u8 = 6;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct RenderedDocument {
    /// Original top-level key → self-contained fragment, in input order.
    pub breakdown: IndexMap<String, String>,
    pub full_html: String,
}

#[derive(Debug, Clone, Default)]
pub struct Renderer {
    config: RendererConfig,
    styles: StyleSheet,
}

// ————————————————————————————————————————————————————————————————————————————
// FRONT API
// ————————————————————————————————————————————————————————————————————————————

impl Renderer {
    pub fn new(config: RendererConfig) -> Self {
        let styles = config.theme.style_sheet();
        Self { config, styles }
    }

    pub fn render(&self, tree: &DocumentNode) -> RenderedDocument {
        let Some(sections) = tree.as_record() else {
            debug!("top-level value is not a record; emitting no-data placeholder");
            return RenderedDocument {
                breakdown: IndexMap::new(),
                full_html: self.no_data_fragment(),
            };
        };

        let mut breakdown = IndexMap::with_capacity(sections.len());
        let mut body = String::new();

        for (key, value) in sections {
            if self.config.is_ignored(key) {
                debug!(section = %key, "section ignored by configuration");
                continue;
            }
            if is_empty(value) {
                debug!(section = %key, "empty section omitted");
                continue;
            }
            let fragment = self.render_section_content(value);
            breakdown.insert(key.clone(), self.wrap(SECTION_CLASS, self.styles.section, &fragment));
            self.push_heading(&mut body, SECTION_HEADING_LEVEL, &format_title(key));
            body.push_str(&fragment);
        }

        debug!(kept = breakdown.len(), total = sections.len(), "document rendered");
        RenderedDocument {
            breakdown,
            full_html: self.wrap(DOCUMENT_CLASS, self.styles.container, &body),
        }
    }

    /// Body of one section, without its heading or container.
    pub fn render_section_content(&self, node: &DocumentNode) -> String {
        let mut out = String::new();
        self.push_content(&mut out, node, SECTION_HEADING_LEVEL + 1);
        out
    }

    /// List renderer. A lone record is treated as a one-item list.
    pub fn render_list_of_dicts(&self, node: &DocumentNode) -> String {
        let mut out = String::new();
        self.push_list(&mut out, node);
        out
    }
}

// ————————————————————————————————————————————————————————————————————————————
// RECURSION
// ————————————————————————————————————————————————————————————————————————————

impl Renderer {
    fn push_content(&self, out: &mut String, node: &DocumentNode, level: u8) {
        match node {
            DocumentNode::Record(fields) => {
                for (key, value) in fields {
                    self.push_heading(out, level, &format_title(key));
                    if is_blank(value) {
                        self.push_placeholder(out);
                        continue;
                    }
                    match value {
                        DocumentNode::List(_) => self.push_list(out, value),
                        DocumentNode::Record(_) => {
                            self.push_content(out, value, (level + 1).min(MAX_HEADING_LEVEL))
                        }
                        DocumentNode::Scalar(s) => self.push_paragraph(out, &self.scalar_text(s)),
                    }
                }
            }
            DocumentNode::List(_) => self.push_list(out, node),
            DocumentNode::Scalar(s) => {
                if is_blank(node) {
                    self.push_placeholder(out);
                } else {
                    self.push_paragraph(out, &self.scalar_text(s));
                }
            }
        }
    }

    fn push_list(&self, out: &mut String, node: &DocumentNode) {
        let items: &[DocumentNode] = match node {
            DocumentNode::Record(_) => std::slice::from_ref(node),
            DocumentNode::List(items) => items,
            DocumentNode::Scalar(s) => {
                self.push_paragraph(out, &self.scalar_text(s));
                return;
            }
        };
        if items.is_empty() {
            self.push_placeholder(out);
            return;
        }

        out.push_str(&open_tag("ul", None, self.styles.ul));
        for item in items {
            out.push_str(&open_tag("li", None, self.styles.li));
            match item {
                DocumentNode::Record(fields) => {
                    for (field, value) in fields {
                        self.push_field(out, field, value);
                    }
                }
                other => out.push_str(&escape_text(&self.display_text(other))),
            }
            out.push_str("</li>");
        }
        out.push_str("</ul>");
    }

    /// One `Label: value` line of a record list entry. List values get one
    /// level of nesting; anything deeper is stringified. Scalars print as-is,
    /// so `0` and `""` survive; only null and empty containers show the placeholder.
    fn push_field(&self, out: &mut String, field: &str, value: &DocumentNode) {
        out.push_str(&open_tag("div", Some(FIELD_CLASS), ""));
        out.push_str(&open_tag("strong", None, self.styles.label));
        out.push_str(&escape_text(&format_title(field)));
        out.push_str(":</strong>");
        match value {
            DocumentNode::List(elems) if !elems.is_empty() => {
                out.push_str(&open_tag("ul", None, self.styles.ul));
                for elem in elems {
                    out.push_str(&open_tag("li", None, self.styles.li));
                    out.push_str(&escape_text(&self.display_text(elem)));
                    out.push_str("</li>");
                }
                out.push_str("</ul>");
            }
            DocumentNode::List(_) | DocumentNode::Record(_) if is_blank(value) => {
                out.push(' ');
                out.push_str(&escape_text(&self.config.placeholder));
            }
            _ => {
                out.push(' ');
                out.push_str(&escape_text(&self.display_text(value)));
            }
        }
        out.push_str("</div>");
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

impl Renderer {
    fn scalar_text(&self, s: &Scalar) -> String {
        match s {
            Scalar::Null => self.config.placeholder.clone(),
            other => other.to_string(),
        }
    }

    fn display_text(&self, node: &DocumentNode) -> String {
        match node {
            DocumentNode::Scalar(s) => self.scalar_text(s),
            other => other.to_string(),
        }
    }

    fn push_heading(&self, out: &mut String, level: u8, text: &str) {
        let style = if level <= SECTION_HEADING_LEVEL { self.styles.h2 } else { self.styles.h3 };
        let tag = format!("h{level}");
        out.push_str(&open_tag(&tag, None, style));
        out.push_str(&escape_text(text));
        out.push_str(&format!("</{tag}>"));
    }

    fn push_paragraph(&self, out: &mut String, text: &str) {
        out.push_str(&open_tag("p", None, self.styles.paragraph));
        out.push_str(&escape_text(text));
        out.push_str("</p>");
    }

    fn push_placeholder(&self, out: &mut String) {
        out.push_str(&open_tag("p", Some(PLACEHOLDER_CLASS), self.styles.placeholder));
        out.push_str(&escape_text(&self.config.placeholder));
        out.push_str("</p>");
    }

    fn wrap(&self, class: &str, style: &str, inner: &str) -> String {
        format!("{}{inner}</div>", open_tag("div", Some(class), style))
    }

    fn no_data_fragment(&self) -> String {
        format!(
            "{}{}</p>",
            open_tag("p", Some(NO_DATA_CLASS), self.styles.placeholder),
            escape_text(&self.config.no_data_message),
        )
    }
}

// ------------------------------- Tests ------------------------------------ //
