use std::collections::HashMap;
use encoding_rs::Encoding;
use lol_html::{AsciiCompatibleEncoding, HtmlRewriter, Settings, element};

use crate::error::MirrorError;
use crate::planner::TagKind;

/// New attribute values keyed by tag kind and the raw original attribute value
pub type Rewrites = HashMap<(TagKind, String), String>;

/// One attribute value found in the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagReference {
    /// Text as written in the markup, entities still encoded
    pub raw: String,
    /// Text with character references decoded, the reference to resolve
    pub value: String,
}

impl TagReference {
    fn new(raw: String) -> Self {
        let value = html_escape::decode_html_entities(&raw).into_owned();
        Self { raw, value }
    }
}

/// HTML source of the mirrored page, kept as bytes in its own charset.
///
/// Queries and rewrites are both streamed through `lol_html`, so the raw values
/// returned by [`find_all`](Self::find_all) are exactly the values matched by
/// [`serialize`](Self::serialize). Bytes outside rewritten tags pass through
/// unchanged.
#[derive(Debug, Clone)]
pub struct PageDocument {
    source: Vec<u8>,
    encoding: AsciiCompatibleEncoding,
}

impl PageDocument {
    /// Pages in a charset that is not ASCII compatible are read as UTF-8.
    pub fn parse(source: Vec<u8>, encoding: &'static Encoding) -> Self {
        let encoding = AsciiCompatibleEncoding::new(encoding)
            .unwrap_or_else(AsciiCompatibleEncoding::utf_8);
        Self { source, encoding }
    }

    /// Attribute values of every `kind` element carrying one, in document order
    pub fn find_all(&self, kind: TagKind) -> Result<Vec<TagReference>, MirrorError> {
        let mut found = Vec::new();
        let mut rewriter = HtmlRewriter::new(
            Settings {
                element_content_handlers: vec![element!(selector(kind), |el| {
                    if let Some(raw) = el.get_attribute(kind.attribute()) {
                        found.push(TagReference::new(raw));
                    }
                    Ok(())
                })],
                encoding: self.encoding,
                ..Settings::default()
            },
            |_: &[u8]| {},
        );

        rewriter
            .write(&self.source)
            .map_err(|e| MirrorError::Document(e.to_string()))?;
        rewriter
            .end()
            .map_err(|e| MirrorError::Document(e.to_string()))?;

        Ok(found)
    }

    /// Page bytes with every attribute listed in `rewrites` replaced
    pub fn serialize(&self, rewrites: &Rewrites) -> Result<Vec<u8>, MirrorError> {
        let mut output = Vec::with_capacity(self.source.len());
        let rewrite = |kind: TagKind| {
            element!(selector(kind), move |el| {
                if let Some(raw) = el.get_attribute(kind.attribute()) {
                    if let Some(replacement) = rewrites.get(&(kind, raw)) {
                        el.set_attribute(kind.attribute(), replacement)?;
                    }
                }
                Ok(())
            })
        };

        let mut rewriter = HtmlRewriter::new(
            Settings {
                element_content_handlers: vec![
                    rewrite(TagKind::Image),
                    rewrite(TagKind::Link),
                    rewrite(TagKind::Script),
                ],
                encoding: self.encoding,
                ..Settings::default()
            },
            |c: &[u8]| output.extend_from_slice(c),
        );

        rewriter
            .write(&self.source)
            .map_err(|e| MirrorError::Document(e.to_string()))?;
        rewriter
            .end()
            .map_err(|e| MirrorError::Document(e.to_string()))?;

        Ok(output)
    }
}

fn selector(kind: TagKind) -> String {
    format!("{}[{}]", kind.tag_name(), kind.attribute())
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::{UTF_8, WINDOWS_1252};

    const PAGE: &str = r#"<html>
<head>
    <link rel="stylesheet" href="/css/main.css">
    <link rel="canonical" href="/courses">
    <script src="https://cdn.other.com/jquery.min.js"></script>
    <script>console.log("inline")</script>
</head>
<body>
    <img src="/assets/cat.png" alt="cat">
    <img alt="no source">
    <img src="/assets/dog.jpg">
    <script src="/js/app.js"></script>
</body>
</html>"#;

    fn utf8_page(source: &str) -> PageDocument {
        PageDocument::parse(source.as_bytes().to_vec(), UTF_8)
    }

    fn values(found: Vec<TagReference>) -> Vec<String> {
        found.into_iter().map(|r| r.value).collect()
    }

    #[test]
    fn test_find_all_in_document_order() -> Result<(), Box<dyn std::error::Error>> {
        let doc = utf8_page(PAGE);
        assert_eq!(values(doc.find_all(TagKind::Image)?), vec!["/assets/cat.png", "/assets/dog.jpg"]);
        assert_eq!(values(doc.find_all(TagKind::Link)?), vec!["/css/main.css", "/courses"]);
        assert_eq!(
            values(doc.find_all(TagKind::Script)?),
            vec!["https://cdn.other.com/jquery.min.js", "/js/app.js"]
        );
        Ok(())
    }

    #[test]
    fn test_find_all_decodes_character_references() -> Result<(), Box<dyn std::error::Error>> {
        let doc = utf8_page(r#"<img src="/img?a=1&amp;b=2"><img src="/a&#38;b.png">"#);
        assert_eq!(
            doc.find_all(TagKind::Image)?,
            vec![
                TagReference {
                    raw: "/img?a=1&amp;b=2".to_string(),
                    value: "/img?a=1&b=2".to_string(),
                },
                TagReference {
                    raw: "/a&#38;b.png".to_string(),
                    value: "/a&b.png".to_string(),
                },
            ]
        );
        Ok(())
    }

    #[test]
    fn test_serialize_without_rewrites_is_identity() -> Result<(), Box<dyn std::error::Error>> {
        let doc = utf8_page(PAGE);
        assert_eq!(doc.serialize(&Rewrites::new())?, PAGE.as_bytes());
        Ok(())
    }

    #[test]
    fn test_serialize_rewrites_only_matching_kind() -> Result<(), Box<dyn std::error::Error>> {
        let doc = utf8_page(r#"<img src="/x"><script src="/x"></script>"#);
        let mut rewrites = Rewrites::new();
        rewrites.insert((TagKind::Image, "/x".to_string()), "dir/x".to_string());

        let html = String::from_utf8(doc.serialize(&rewrites)?)?;
        assert!(html.contains(r#"<img src="dir/x">"#));
        assert!(html.contains(r#"<script src="/x"></script>"#));
        Ok(())
    }

    #[test]
    fn test_serialize_rewrites_every_occurrence() -> Result<(), Box<dyn std::error::Error>> {
        let doc = utf8_page(r#"<img src="/a.png"><p>text</p><img src="/a.png">"#);
        let mut rewrites = Rewrites::new();
        rewrites.insert((TagKind::Image, "/a.png".to_string()), "d/a.png".to_string());

        let html = String::from_utf8(doc.serialize(&rewrites)?)?;
        assert_eq!(html.matches(r#"src="d/a.png""#).count(), 2);
        assert!(html.contains("<p>text</p>"));
        Ok(())
    }

    /// Rewrites are keyed by the markup text, not the decoded reference
    #[test]
    fn test_serialize_matches_encoded_value() -> Result<(), Box<dyn std::error::Error>> {
        let doc = utf8_page(r#"<img src="/a&amp;b.png">"#);
        let reference = doc.find_all(TagKind::Image)?.remove(0);
        let mut rewrites = Rewrites::new();
        rewrites.insert((TagKind::Image, reference.raw), "d/a&b.png".to_string());

        let html = String::from_utf8(doc.serialize(&rewrites)?)?;
        assert!(html.contains("d/a"));
        assert!(!html.contains("/a&amp;b.png"));
        Ok(())
    }

    /// Latin-1 text outside rewritten tags keeps its original bytes
    #[test]
    fn test_serialize_keeps_page_charset() -> Result<(), Box<dyn std::error::Error>> {
        let mut source = b"<p>caf".to_vec();
        source.push(0xE9);
        source.extend_from_slice(br#"</p><img src="/a.png">"#);
        let doc = PageDocument::parse(source, WINDOWS_1252);

        let mut rewrites = Rewrites::new();
        rewrites.insert((TagKind::Image, "/a.png".to_string()), "d/a.png".to_string());
        let output = doc.serialize(&rewrites)?;

        let mut expected = b"<p>caf".to_vec();
        expected.push(0xE9);
        expected.extend_from_slice(br#"</p><img src="d/a.png">"#);
        assert_eq!(output, expected);
        Ok(())
    }
}
