//! Small XML helpers shared by the deck writer and reader

use quick_xml::events::BytesStart;

/// Escape XML special characters.
pub fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            // Control characters other than tab/newline are not allowed in XML 1.0
            c if (c as u32) < 0x20 && c != '\t' && c != '\n' && c != '\r' => {}
            c => out.push(c),
        }
    }
    out
}

/// Unescaped value of an attribute, matched on its qualified name.
pub fn attr_value(element: &BytesStart<'_>, name: &[u8]) -> Option<String> {
    element
        .attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == name)
        .and_then(|attr| attr.unescape_value().ok().map(|v| v.into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a & b"), "a &amp; b");
        assert_eq!(
            escape_xml("<tag>\"hello\"</tag>"),
            "&lt;tag&gt;&quot;hello&quot;&lt;/tag&gt;"
        );
        assert_eq!(escape_xml("bell\u{7}"), "bell");
        assert_eq!(escape_xml("Gender – point 1"), "Gender – point 1");
    }

    #[test]
    fn test_attr_value() {
        let start = BytesStart::from_content(r#"p:ph type="title" idx="1""#, 4);
        assert_eq!(attr_value(&start, b"type").as_deref(), Some("title"));
        assert_eq!(attr_value(&start, b"idx").as_deref(), Some("1"));
        assert_eq!(attr_value(&start, b"orient"), None);
    }
}
