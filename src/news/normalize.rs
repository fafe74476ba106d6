// Markup stripping for feed text fields.

use std::sync::OnceLock;

use regex::Regex;

fn tag_pattern() -> &'static Regex {
    static TAG: OnceLock<Regex> = OnceLock::new();
    // Non-greedy so `<b>x</b>` drops two tags, not the whole span.
    TAG.get_or_init(|| Regex::new(r"<.*?>").expect("tag pattern is valid"))
}

/// Remove `<...>` tags from `text`.
///
/// Best-effort, not an HTML parser: an unclosed `<` is left in place, entities
/// are not decoded, and a tag spanning a line break is not matched.
pub fn strip_tags(text: &str) -> String {
    tag_pattern().replace_all(text, "").into_owned()
}
