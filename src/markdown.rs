//! Markdown summary pipeline, for model responses requested without JSON mode.
//!
//! Models follow a Markdown template only loosely: headings lose their `#`,
//! checkboxes lose their dash, bold markers glue onto neighbouring words.
//! [`clean_markdown`] repairs that line by line; [`markdown_to_html`] converts
//! the result with comrak and then styles the pieces the template cares about
//! (checkboxes, financial emoji lines, responsibility and deadline blocks).
use comrak::{Options, markdown_to_html as comrak_to_html};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::debug;

use crate::style::{StyleSheet, open_tag, style_attr};

pub const NO_SUMMARY: &str = "No summary available";
pub const SUMMARY_CLASS: &str = "email-summary";

const TITLE_MARKER: &str = "Email Analysis Summary";
const MAX_INDENT: usize = 4;
const SUBSECTION_MAX_WORDS: usize = 5;
/// Regular text longer than this under a subsection becomes a list item.
const LIST_PROMOTION_MIN_CHARS: usize = 15;
const FINANCIAL_EMOJIS: [&str; 5] = ["💰", "💸", "📊", "💵", "⏰"];

/// `<li>` whose text starts with a financial emoji, one pattern per emoji.
static FINANCIAL_ITEMS: Lazy<[(&str, Regex); 5]> = Lazy::new(|| {
    FINANCIAL_EMOJIS.map(|emoji| {
        let pattern = format!(
            r"<li>\s*(?:<p>)?\s*{}\s*([^<]+?)\s*(?:</p>)?\s*</li>",
            regex::escape(emoji),
        );
        (emoji, Regex::new(&pattern).expect("escaped emoji pattern"))
    })
});

macro_rules! regex {
    ($re:literal $(,)?) => {{
        static RE: Lazy<Regex> = Lazy::new(|| Regex::new($re).expect("static regex"));
        &*RE
    }};
}

// ------------------------------ Line kinds -------------------------------- //

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    Title,
    SectionHeading,
    SubsectionHeading,
    Checkbox,
    ListItem,
    Responsibility,
    Deadline,
    Metadata,
    RegularText,
}

/// Which heading we are under; drives list promotion of plain text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Context {
    Title,
    Section,
    Subsection,
}

fn classify(line: &str) -> LineKind {
    if line.contains(TITLE_MARKER) {
        LineKind::Title
    } else if regex!(r"^#{0,6}\s*\d+\.\s+").is_match(line) {
        LineKind::SectionHeading
    } else if regex!(r"^#{0,6}\s*[A-Za-z][^:]*$").is_match(line)
        && line.split_whitespace().count() <= SUBSECTION_MAX_WORDS
    {
        LineKind::SubsectionHeading
    } else if regex!(r"(?i)^[-*+]?\s*\[\s*[x\s]*\]\s*").is_match(line) {
        LineKind::Checkbox
    } else if regex!(r"^[-*+]\s+").is_match(line) {
        LineKind::ListItem
    } else if regex!(r"^\*\*[^*]+\*\*:\s*$").is_match(line) {
        LineKind::Responsibility
    } else if regex!(r"^\*\*[^*]+\*\*:\s*.+").is_match(line) {
        LineKind::Deadline
    } else if is_metadata(line) {
        LineKind::Metadata
    } else {
        LineKind::RegularText
    }
}

fn is_metadata(line: &str) -> bool {
    regex!(r"^(Generated|Version|Source):").is_match(line)
}

// ------------------------------- Cleaning --------------------------------- //

/// Repair a raw model summary into well-formed Markdown.
pub fn clean_markdown(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return NO_SUMMARY.to_string();
    }
    let normalized = normalize_lines(raw);
    let fixed = fix_lines(&normalized);
    final_cleanup(&fixed)
}

/// Unify line endings, trim each line, keep at most four spaces of indent.
fn normalize_lines(content: &str) -> Vec<String> {
    content
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .split('\n')
        .map(|line| {
            let stripped = line.trim();
            if stripped.is_empty() {
                return String::new();
            }
            let indent = line.chars().take_while(|c| c.is_whitespace()).count();
            format!("{}{stripped}", " ".repeat(indent.min(MAX_INDENT)))
        })
        .collect()
}

fn fix_lines(lines: &[String]) -> Vec<String> {
    let mut context: Option<Context> = None;
    let mut out = Vec::with_capacity(lines.len());
    for line in lines {
        let stripped = line.trim();
        if stripped.is_empty() {
            out.push(line.clone());
            continue;
        }
        let fixed = match classify(stripped) {
            LineKind::Title => {
                context = Some(Context::Title);
                format!("# {TITLE_MARKER}")
            }
            LineKind::SectionHeading => {
                context = Some(Context::Section);
                fix_section_heading(stripped)
            }
            LineKind::SubsectionHeading => {
                context = Some(Context::Subsection);
                fix_subsection_heading(stripped)
            }
            LineKind::Checkbox => fix_checkbox(stripped),
            LineKind::ListItem => fix_list_item(stripped),
            LineKind::Responsibility => fix_responsibility(stripped),
            LineKind::Deadline => fix_deadline(stripped),
            LineKind::RegularText => fix_regular_text(stripped, context),
            LineKind::Metadata => fix_text_formatting(stripped),
        };
        out.push(fixed);
    }
    out
}

fn fix_section_heading(line: &str) -> String {
    match regex!(r"^#{0,6}\s*(\d+)\.\s*(.+)").captures(line) {
        Some(caps) => format!("## {}. {}", &caps[1], caps[2].trim()),
        None => format!("## {}", line.trim()),
    }
}

fn fix_subsection_heading(line: &str) -> String {
    let title = regex!(r"^#{0,6}\s*").replace(line, "");
    format!("### {}", title.trim())
}

fn fix_checkbox(line: &str) -> String {
    let content = regex!(r"(?i)^[-*+]?\s*\[\s*[x\s]*\]\s*").replace(line, "");
    let checked = regex!(r"(?i)\[x\]").is_match(line);
    let marker = if checked { "- [x]" } else { "- [ ]" };
    format!("{marker} {}", content.trim())
}

fn fix_list_item(line: &str) -> String {
    let content = regex!(r"^[-*+]\s*").replace(line, "");
    format!("- {}", content.trim())
}

fn fix_responsibility(line: &str) -> String {
    match regex!(r"^\*\*([^*]+)\*\*:\s*$").captures(line) {
        Some(caps) => format!("**{}:**", caps[1].trim()),
        None => line.to_string(),
    }
}

fn fix_deadline(line: &str) -> String {
    match regex!(r"^\*\*([^*]+)\*\*:\s*(.+)").captures(line) {
        Some(caps) => format!("**{}:** {}", caps[1].trim(), caps[2].trim()),
        None => line.to_string(),
    }
}

fn fix_regular_text(line: &str, context: Option<Context>) -> String {
    let fixed = fix_text_formatting(line);
    let promote = context == Some(Context::Subsection)
        && fixed.chars().count() > LIST_PROMOTION_MIN_CHARS
        && !fixed.starts_with(['*', '-', '+'])
        && !is_metadata(&fixed);
    if promote { format!("- {fixed}") } else { fixed }
}

/// Inline repairs: bold spacing, glued words, emoji spacing.
fn fix_text_formatting(line: &str) -> String {
    let steps: [(&Regex, &str); 8] = [
        // `** bold **` → `**bold**`
        (regex!(r"\*\*\s*([^*]+?)\s*\*\*"), "**${1}**"),
        // `word**bold**word`
        (regex!(r"(\w)\*\*([^*]+?)\*\*(\w)"), "${1} **${2}** ${3}"),
        // `**bold**word`
        (regex!(r"\*\*([^*]+?)\*\*([a-zA-Z])"), "**${1}** ${2}"),
        // `word**bold**`
        (regex!(r"([a-zA-Z])\*\*([^*]+?)\*\*"), "${1} **${2}**"),
        // `**bold** 's` → `**bold**'s`
        (regex!(r"\*\*([^*]+?)\*\*\s+(['.,;:!?])"), "**${1}**${2}"),
        // `wordWord`
        (regex!(r"([a-z])([A-Z][a-z])"), "${1} ${2}"),
        // `payforACME`
        (regex!(r"(\w)(and|or|on|in|at|to|for|with|by)([A-Z])"), "${1} ${2} ${3}"),
        (regex!(r"([💰💸📊💵⏰])\s*(\S)"), "${1} ${2}"),
    ];
    steps
        .iter()
        .fold(line.to_string(), |acc, (re, rep)| re.replace_all(&acc, *rep).into_owned())
}

/// Collapse blank runs to one line and trim blank edges.
fn final_cleanup(lines: &[String]) -> String {
    let mut out: Vec<&str> = Vec::with_capacity(lines.len());
    let mut prev_blank = false;
    for line in lines {
        let blank = line.trim().is_empty();
        if blank && prev_blank {
            continue;
        }
        out.push(line);
        prev_blank = blank;
    }
    let start = out.iter().position(|l| !l.trim().is_empty()).unwrap_or(out.len());
    let end = out.iter().rposition(|l| !l.trim().is_empty()).map_or(start, |i| i + 1);
    out[start..end].join("\n")
}

// ------------------------------ Conversion -------------------------------- //

fn comrak_options() -> Options<'static> {
    let mut options = Options::default();
    let ext = &mut options.extension;
    ext.strikethrough = true;
    ext.table = true;
    ext.tasklist = true;
    ext.autolink = true;
    options
}

/// Convert cleaned Markdown to styled HTML.
pub fn markdown_to_html(cleaned: &str, styles: &StyleSheet) -> String {
    if cleaned.trim().is_empty() {
        return format!("<p>{NO_SUMMARY}</p>");
    }
    let html = comrak_to_html(cleaned, &comrak_options());
    debug!(bytes = html.len(), "markdown converted");
    let html = fix_checkboxes(&html);
    apply_styles(&html, styles)
}

/// Turn task-list items into `checkbox-item`s and render any `[ ]` / `[x]`
/// markers the converter left as literal text.
fn fix_checkboxes(html: &str) -> String {
    let html = regex!(r#"<li>(\s*<input type="checkbox")"#)
        .replace_all(html, r#"<li class="checkbox-item">${1}"#);
    let html = regex!(r"<p>-?\s*\[\s*\]\s*([^<]+)</p>").replace_all(
        &html,
        r#"<div class="checkbox-item"><input type="checkbox" disabled> <span>${1}</span></div>"#,
    );
    let html = regex!(r"(?i)<p>-?\s*\[x\]\s*([^<]+)</p>").replace_all(
        &html,
        r#"<div class="checkbox-item"><input type="checkbox" checked disabled> <span>${1}</span></div>"#,
    );
    let html = regex!(r"\[\s*\]\s*([^<\n]+)").replace_all(
        &html,
        r#"<input type="checkbox" disabled> <span>${1}</span>"#,
    );
    regex!(r"(?i)\[x\]\s*([^<\n]+)")
        .replace_all(&html, r#"<input type="checkbox" checked disabled> <span>${1}</span>"#)
        .into_owned()
}

fn apply_styles(html: &str, styles: &StyleSheet) -> String {
    let mut html = html.to_string();

    for (tag, style) in [("h1", styles.h1), ("h2", styles.h2), ("h3", styles.h3), ("ul", styles.ul)] {
        html = html.replace(&format!("<{tag}>"), &open_tag(tag, None, style));
    }

    // Financial lines first, while their `<li>` is still bare.
    for (emoji, re) in FINANCIAL_ITEMS.iter() {
        html = re
            .replace_all(&html, |caps: &Captures| {
                format!(
                    "{}{}{emoji}</span><span>{}</span></li>",
                    open_tag("li", Some("financial-item"), styles.financial),
                    open_tag("span", None, styles.emoji),
                    &caps[1],
                )
            })
            .into_owned();
    }

    html = html.replace("<li>", &open_tag("li", None, styles.li));
    html = html.replace(
        r#"<li class="checkbox-item">"#,
        &open_tag("li", Some("checkbox-item"), styles.checkbox_li),
    );
    html = regex!(r#"<input type="checkbox"([^>]*?)\s*/?>"#)
        .replace_all(&html, |caps: &Captures| {
            format!("<input type=\"checkbox\"{}{}>", &caps[1], style_attr(styles.checkbox_input))
        })
        .into_owned();

    // Deadlines carry a time of day; match them before the generic inline label.
    html = regex!(r"<p><strong>([^<]*?(?:PM|AM|UTC)[^<]*?):</strong>\s*([^<]+?)</p>")
        .replace_all(&html, |caps: &Captures| {
            format!(
                "{}{}{}:</span> <span>{}</span></div>",
                open_tag("div", Some("deadline"), styles.deadline),
                open_tag("span", None, styles.deadline_date),
                &caps[1],
                &caps[2],
            )
        })
        .into_owned();

    let responsibility = open_tag("div", Some("responsibility"), styles.responsibility);
    html = regex!(r"<p><strong>([^<]+?):</strong></p>")
        .replace_all(&html, |caps: &Captures| format!("{responsibility}{}:</div>", &caps[1]))
        .into_owned();
    html = regex!(r"<p><strong>([^<]+?)</strong>:\s*</p>")
        .replace_all(&html, |caps: &Captures| format!("{responsibility}{}:</div>", &caps[1]))
        .into_owned();
    html = regex!(r"<p><strong>([^<]+?):</strong>\s*([^<]+?)</p>")
        .replace_all(&html, |caps: &Captures| {
            format!(
                "{responsibility}{}:</div>{}{}</p>",
                &caps[1],
                open_tag("p", None, styles.paragraph),
                &caps[2],
            )
        })
        .into_owned();

    format!("{}{html}</div>", open_tag("div", Some(SUMMARY_CLASS), styles.container))
}

/// Clean, then convert. Returns `(html, cleaned_markdown)`.
pub fn summarize(raw: &str, styles: &StyleSheet) -> (String, String) {
    let cleaned = clean_markdown(raw);
    let html = markdown_to_html(&cleaned, styles);
    (html, cleaned)
}

// ------------------------------- Tests ------------------------------------ //
