use crate::dom::{AssetAttr, AssetRef, Dom};

// A deliberately small tag scanner, not an HTML parser. It only needs to
// find tags carrying src/href attributes, know whether a <source> sits
// inside a <video>, and splice markup before </body>. Everything else
// passes through byte-for-byte.

#[derive(Debug, Clone)]
struct Tag {
    /// Lowercased name; closing tags keep their leading slash (`/body`).
    name: String,
    /// The full `<...>` text, rendered verbatim.
    raw: String,
    in_video: bool,
}

#[derive(Debug, Clone)]
enum Segment {
    Text(String),
    Tag(Tag),
}

/// Static-document implementation of [`Dom`]: the offline equivalent of the
/// page rewrite the browser loader performs on document-ready.
#[derive(Debug, Clone)]
pub struct HtmlDocument {
    segments: Vec<Segment>,
}

fn tag_name(raw: &str) -> String {
    let inner = raw.trim_start_matches('<');
    let (slash, rest) = match inner.strip_prefix('/') {
        Some(r) => ("/", r),
        None => ("", inner),
    };
    let name: String = rest
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect();
    format!("{slash}{}", name.to_ascii_lowercase())
}

/// Byte range of the quoted value of `name="..."` or `name='...'` within a
/// raw tag. Either quote character is valid HTML; the value runs to the
/// mate of whichever quote opened it. Unquoted values are not recognized.
fn attr_value_range(raw: &str, name: &str) -> Option<(usize, usize)> {
    let needle = format!("{name}=");
    let mut from = 0;
    while let Some(pos) = raw[from..].find(&needle) {
        let abs = from + pos;
        let val_at = abs + needle.len();
        // Must be a standalone attribute name, not a suffix like data-src=
        let prev = raw[..abs].chars().next_back();
        if matches!(prev, Some(c) if c.is_whitespace()) {
            let quote = raw[val_at..].chars().next()?;
            if quote == '"' || quote == '\'' {
                let start = val_at + quote.len_utf8();
                let len = raw[start..].find(quote)?;
                return Some((start, start + len));
            }
        }
        from = val_at;
    }
    None
}

impl HtmlDocument {
    pub fn parse(input: &str) -> Self {
        let mut segments = Vec::new();
        let mut video_depth = 0usize;
        let mut text_start = 0usize;
        let bytes = input.as_bytes();
        let mut i = 0usize;

        while i < bytes.len() {
            let tag_open = bytes[i] == b'<'
                && i + 1 < bytes.len()
                && (bytes[i + 1].is_ascii_alphabetic() || bytes[i + 1] == b'/');
            if tag_open {
                if let Some(end) = input[i..].find('>') {
                    let raw_end = i + end + 1;
                    if text_start < i {
                        segments.push(Segment::Text(input[text_start..i].to_string()));
                    }
                    let raw = &input[i..raw_end];
                    let name = tag_name(raw);
                    if name == "/video" {
                        video_depth = video_depth.saturating_sub(1);
                    }
                    segments.push(Segment::Tag(Tag {
                        name: name.clone(),
                        raw: raw.to_string(),
                        in_video: video_depth > 0,
                    }));
                    if name == "video" && !raw.ends_with("/>") {
                        video_depth += 1;
                    }
                    i = raw_end;
                    text_start = i;
                    continue;
                }
            }
            i += 1;
        }
        if text_start < input.len() {
            segments.push(Segment::Text(input[text_start..].to_string()));
        }
        Self { segments }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for seg in &self.segments {
            match seg {
                Segment::Text(t) => out.push_str(t),
                Segment::Tag(t) => out.push_str(&t.raw),
            }
        }
        out
    }

    fn tag(&self, element: usize) -> Option<&Tag> {
        match self.segments.get(element) {
            Some(Segment::Tag(t)) => Some(t),
            _ => None,
        }
    }
}

impl Dom for HtmlDocument {
    fn find_by_attr_prefix(&self, prefix: &str) -> Vec<AssetRef> {
        let mut refs = Vec::new();
        for (i, seg) in self.segments.iter().enumerate() {
            let Segment::Tag(tag) = seg else { continue };
            if tag.name.starts_with('/') {
                continue;
            }
            // src wins when both are present, like the loader's selector
            for attr in [AssetAttr::Src, AssetAttr::Href] {
                if let Some((s, e)) = attr_value_range(&tag.raw, attr.as_str()) {
                    let value = &tag.raw[s..e];
                    if value.starts_with(prefix) {
                        refs.push(AssetRef {
                            element: i,
                            attr,
                            value: value.to_string(),
                        });
                    }
                    break;
                }
            }
        }
        refs
    }

    fn swap_element(&mut self, asset: &AssetRef, new_value: &str) {
        let Some(tag) = self.tag(asset.element) else {
            return;
        };
        let Some((s, e)) = attr_value_range(&tag.raw, asset.attr.as_str()) else {
            return;
        };
        // Rebuild the whole tag rather than patching in place
        let mut raw = String::with_capacity(tag.raw.len());
        raw.push_str(&tag.raw[..s]);
        raw.push_str(new_value);
        raw.push_str(&tag.raw[e..]);
        let replacement = Tag {
            name: tag.name.clone(),
            raw,
            in_video: tag.in_video,
        };
        self.segments[asset.element] = Segment::Tag(replacement);
    }

    fn parent_is_video(&self, asset: &AssetRef) -> bool {
        self.tag(asset.element)
            .map(|t| t.name == "source" && t.in_video)
            .unwrap_or(false)
    }

    fn reload_parent_video(&mut self, _asset: &AssetRef) {
        // Nothing plays in a static document; the swapped markup is enough.
    }

    fn append_to_body(&mut self, html: &str) {
        let close_body = self
            .segments
            .iter()
            .rposition(|s| matches!(s, Segment::Tag(t) if t.name == "/body"));
        match close_body {
            Some(i) => self.segments.insert(i, Segment::Text(html.to_string())),
            None => self.segments.push(Segment::Text(html.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <link rel="stylesheet" href="https://assets.example.com/css/site.css">
  <script src="https://assets.example.com/js/app.js"></script>
  <script src="https://cdn.other.net/lib.js"></script>
</head>
<body>
  <img src="https://assets.example.com/img/logo.png" alt="logo">
  <video controls>
    <source src="https://assets.example.com/media/intro.mp4" type="video/mp4">
  </video>
  <a href="/about">About</a>
</body>
</html>
"#;

    #[test]
    fn parse_render_roundtrip() {
        let doc = HtmlDocument::parse(PAGE);
        assert_eq!(doc.render(), PAGE);
    }

    #[test]
    fn finds_production_assets_only() {
        let doc = HtmlDocument::parse(PAGE);
        let refs = doc.find_by_attr_prefix("https://assets.example.com");
        assert_eq!(refs.len(), 4);
        assert!(refs.iter().all(|r| r.value.starts_with("https://assets.example.com")));
    }

    #[test]
    fn relative_hrefs_not_matched() {
        let doc = HtmlDocument::parse(PAGE);
        let refs = doc.find_by_attr_prefix("https://assets.example.com");
        assert!(!refs.iter().any(|r| r.value == "/about"));
    }

    #[test]
    fn swap_rewrites_single_tag() {
        let mut doc = HtmlDocument::parse(PAGE);
        let refs = doc.find_by_attr_prefix("https://assets.example.com/js");
        assert_eq!(refs.len(), 1);
        doc.swap_element(&refs[0], "https://localhost:3902/js/app.js");
        let out = doc.render();
        assert!(out.contains(r#"<script src="https://localhost:3902/js/app.js">"#));
        assert!(!out.contains("https://assets.example.com/js/app.js"));
        // The unrelated CDN script is untouched
        assert!(out.contains("https://cdn.other.net/lib.js"));
    }

    #[test]
    fn video_source_detected() {
        let doc = HtmlDocument::parse(PAGE);
        let refs = doc.find_by_attr_prefix("https://assets.example.com/media");
        assert_eq!(refs.len(), 1);
        assert!(doc.parent_is_video(&refs[0]));
    }

    #[test]
    fn img_is_not_video_source() {
        let doc = HtmlDocument::parse(PAGE);
        let refs = doc.find_by_attr_prefix("https://assets.example.com/img");
        assert_eq!(refs.len(), 1);
        assert!(!doc.parent_is_video(&refs[0]));
    }

    #[test]
    fn append_lands_before_body_close() {
        let mut doc = HtmlDocument::parse(PAGE);
        doc.append_to_body("<div class=\"dev-notice\">x</div>");
        let out = doc.render();
        let notice = out.find("dev-notice").unwrap();
        let close = out.find("</body>").unwrap();
        assert!(notice < close);
    }

    #[test]
    fn append_without_body_goes_to_end() {
        let mut doc = HtmlDocument::parse("<p>fragment</p>");
        doc.append_to_body("<div>x</div>");
        assert_eq!(doc.render(), "<p>fragment</p><div>x</div>");
    }

    #[test]
    fn single_quoted_src_is_found() {
        let doc = HtmlDocument::parse(r#"<img src='https://assets.example.com/a.png'>"#);
        let refs = doc.find_by_attr_prefix("https://assets.example.com");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].value, "https://assets.example.com/a.png");
    }

    #[test]
    fn single_quoted_swap_keeps_quote_style() {
        let mut doc = HtmlDocument::parse(r#"<img src='https://assets.example.com/a.png'>"#);
        let refs = doc.find_by_attr_prefix("https://assets.example.com");
        doc.swap_element(&refs[0], "https://localhost:3902/a.png");
        assert_eq!(doc.render(), r#"<img src='https://localhost:3902/a.png'>"#);
    }

    #[test]
    fn mixed_quote_styles_in_one_tag() {
        let doc = HtmlDocument::parse(
            r#"<a title="ignore me" href='https://assets.example.com/doc.pdf'>x</a>"#,
        );
        let refs = doc.find_by_attr_prefix("https://assets.example.com");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].value, "https://assets.example.com/doc.pdf");
    }

    #[test]
    fn unquoted_attr_value_is_ignored() {
        let doc = HtmlDocument::parse("<img src=https://assets.example.com/a.png>");
        assert!(doc.find_by_attr_prefix("https://assets.example.com").is_empty());
    }

    #[test]
    fn data_src_attribute_is_not_src() {
        let doc = HtmlDocument::parse(r#"<img data-src="https://assets.example.com/a.png">"#);
        assert!(doc.find_by_attr_prefix("https://assets.example.com").is_empty());
    }

    #[test]
    fn stray_angle_bracket_is_text() {
        let input = "<p>1 < 2 is true</p>";
        let doc = HtmlDocument::parse(input);
        assert_eq!(doc.render(), input);
    }
}
