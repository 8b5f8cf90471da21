//! Escaping rules for text embedded in the generated document.

use serde::Serialize;

/// Escapes text for a double-quoted HTML attribute value.
pub fn html_attr(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escapes text for the body of a JavaScript template literal inside an
/// inline `<script>` element.
///
/// Backslashes, backticks and `$` are escaped so the literal evaluates to
/// exactly `text`. Every `<` becomes `\x3C`, so the HTML parser sees no
/// tag, comment opener or closing tag inside the script element.
pub fn template_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 8);
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '`' => out.push_str("\\`"),
            '$' => out.push_str("\\$"),
            '<' => out.push_str("\\x3C"),
            _ => out.push(c),
        }
    }
    out
}

/// Serializes a value as a JavaScript expression safe inside `<script>`.
pub fn script_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    Ok(serde_json::to_string(value)?
        .replace('<', "\\u003c")
        .replace('\u{2028}', "\\u2028")
        .replace('\u{2029}', "\\u2029"))
}
