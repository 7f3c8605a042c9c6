//! Output generators - each turns a built diagram into a document.

pub mod html;
pub mod svg;

use crate::adapter::Diagram;

/// Trait for all diagram generators.
pub trait Generator {
    /// Name of this generator style.
    fn name(&self) -> &'static str;

    /// Render the diagram.
    /// Returns the output as a string (SVG, HTML).
    fn generate(&self, diagram: &Diagram) -> String;

    /// File extension for this generator's output.
    fn extension(&self) -> &'static str;
}

/// Escape text for XML/HTML content and attribute values.
pub(crate) fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::escape_xml;

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_xml(r#"a<b & "c"'"#), "a&lt;b &amp; &quot;c&quot;&#39;");
        assert_eq!(escape_xml("plain"), "plain");
    }
}
