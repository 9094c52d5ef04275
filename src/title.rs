/// Identifier-style key → human title.
///
/// `executiveSummary` → `Executive Summary`, `key_message` → `Key Message`.
/// Keys that already contain spaces pass through with each word capitalized.
pub fn format_title(key: &str) -> String {
    let mut spaced = String::with_capacity(key.len() + 8);
    for (i, c) in key.chars().enumerate() {
        if c == '_' {
            spaced.push(' ');
            continue;
        }
        if i > 0 && c.is_uppercase() {
            spaced.push(' ');
        }
        spaced.push(c);
    }
    spaced
        .split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
    }
}
