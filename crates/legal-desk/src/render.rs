//! HTML fragment helpers shared by the workflow view-models.
//!
//! View-models own their markup; every value that may originate from a visitor
//! goes through [`escape_html`] before it is written.

use std::fmt::Write as _;

pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Renders `<ul>` with one escaped `<li>` per entry.
pub(crate) fn unordered_list<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut html = String::from("<ul>");
    for item in items {
        let _ = write!(html, "<li>{}</li>", escape_html(item.as_ref()));
    }
    html.push_str("</ul>");
    html
}

/// Renders a `<p><strong>label:</strong> value</p>` detail line.
pub(crate) fn detail_line(label: &str, value: &str) -> String {
    format!(
        "<p><strong>{}:</strong> {}</p>",
        escape_html(label),
        escape_html(value)
    )
}
