// src/formatting/rich_text.rs
//! Inline rendering of rich-text spans.

use crate::model::RichTextSpan;

/// Renders spans in order with no separators; linked spans become `[text](url)`.
pub fn render_spans(spans: &[RichTextSpan]) -> String {
    let mut output = String::new();
    for span in spans {
        match &span.link {
            Some(url) => {
                output.push('[');
                output.push_str(&span.plain_text);
                output.push_str("](");
                output.push_str(url);
                output.push(')');
            }
            None => output.push_str(&span.plain_text),
        }
    }
    output
}
