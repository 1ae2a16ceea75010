//! Locating and editing the end of the document body
//!
//! Works directly on the text of `word/document.xml`. The body's last child is
//! normally the final `w:sectPr`; new content goes right before it.

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::QName;
use quick_xml::Reader;

use crate::automation::BreakKind;
use crate::error::{Error, Result};

/// WordprocessingML main namespace
pub(crate) const WORDPROCESSINGML_NS: &str =
    "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// Where new content goes at the end of the body
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BodyEnd {
    /// Byte offset into the main part
    pub(crate) offset: usize,
    /// Namespace prefix used by the body element, usually `w`
    pub(crate) prefix: Option<String>,
}

fn prefix_of(name: QName<'_>) -> Option<String> {
    name.prefix()
        .map(|prefix| String::from_utf8_lossy(prefix.as_ref()).into_owned())
}

fn is_body(e: &BytesStart<'_>) -> bool {
    e.local_name().as_ref() == b"body"
}

/// Find the insertion point at the end of the body.
///
/// A self-closing `<w:body/>` is expanded in place so that there is somewhere
/// to insert; `xml` is rewritten in that case.
pub(crate) fn locate_body_end(xml: &mut String) -> Result<BodyEnd> {
    let mut reader = Reader::from_str(xml.as_str());
    reader.config_mut().trim_text(false);

    let mut depth = 0usize;
    let mut body_depth: Option<usize> = None;
    let mut prefix = None;
    let mut last_sect_pr: Option<usize> = None;
    let mut empty_body: Option<(usize, usize)> = None;

    loop {
        let start = reader.buffer_position() as usize;
        match reader.read_event()? {
            Event::Start(ref e) => {
                depth += 1;
                if body_depth.is_none() && is_body(e) {
                    body_depth = Some(depth);
                    prefix = prefix_of(e.name());
                } else if body_depth.map(|d| d + 1) == Some(depth) {
                    // Only a trailing sectPr counts
                    last_sect_pr = (e.local_name().as_ref() == b"sectPr").then_some(start);
                }
            }
            Event::Empty(ref e) => {
                if body_depth.is_none() && is_body(e) {
                    prefix = prefix_of(e.name());
                    empty_body = Some((start, reader.buffer_position() as usize));
                    break;
                } else if body_depth == Some(depth) {
                    last_sect_pr = (e.local_name().as_ref() == b"sectPr").then_some(start);
                }
            }
            Event::End(ref e) => {
                if body_depth == Some(depth) && e.local_name().as_ref() == b"body" {
                    return Ok(BodyEnd {
                        offset: last_sect_pr.unwrap_or(start),
                        prefix,
                    });
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    match empty_body {
        Some((start, end)) => {
            let tag = qualified(prefix.as_deref(), "body");
            let replacement = format!("<{tag}></{tag}>");
            let offset = start + tag.len() + 2;
            xml.replace_range(start..end, &replacement);
            Ok(BodyEnd { offset, prefix })
        }
        None => Err(Error::MalformedDocument(
            "main document part has no body".to_string(),
        )),
    }
}

fn qualified(prefix: Option<&str>, local: &str) -> String {
    match prefix {
        Some(prefix) => format!("{prefix}:{local}"),
        None => local.to_string(),
    }
}

/// Markup for a paragraph holding a single break.
pub(crate) fn break_paragraph(prefix: Option<&str>, kind: BreakKind) -> String {
    let p = qualified(prefix, "p");
    let r = qualified(prefix, "r");
    let br = qualified(prefix, "br");
    match kind.ooxml_type() {
        Some(break_type) => {
            // Unprefixed attributes have no namespace, so a default-namespace
            // body needs a locally bound prefix for w:type
            let attr = match prefix {
                Some(prefix) => format!("{prefix}:type=\"{break_type}\""),
                None => format!("xmlns:w=\"{WORDPROCESSINGML_NS}\" w:type=\"{break_type}\""),
            };
            format!("<{p}><{r}><{br} {attr}/></{r}></{p}>")
        }
        None => format!("<{p}><{r}><{br}/></{r}></{p}>"),
    }
}

/// Insert a break paragraph at `at`, returning the offset just after it.
pub(crate) fn insert_break_paragraph(xml: &mut String, at: &BodyEnd, kind: BreakKind) -> Result<usize> {
    if at.offset > xml.len() || !xml.is_char_boundary(at.offset) {
        return Err(Error::MalformedDocument(format!(
            "insertion point {} is outside the main document part",
            at.offset
        )));
    }
    let markup = break_paragraph(at.prefix.as_deref(), kind);
    xml.insert_str(at.offset, &markup);
    Ok(at.offset + markup.len())
}

/// Local names of the body's direct children, in order.
pub(crate) fn body_children(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    let mut depth = 0usize;
    let mut body_depth: Option<usize> = None;
    let mut children = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(ref e) => {
                depth += 1;
                if body_depth.is_none() && is_body(e) {
                    body_depth = Some(depth);
                } else if body_depth.map(|d| d + 1) == Some(depth) {
                    children.push(String::from_utf8_lossy(e.local_name().as_ref()).into_owned());
                }
            }
            Event::Empty(ref e) if body_depth.is_some() && body_depth == Some(depth) => {
                children.push(String::from_utf8_lossy(e.local_name().as_ref()).into_owned());
            }
            Event::End(_) => {
                if body_depth == Some(depth) {
                    break;
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(children)
}

/// Count `w:br` elements of the given kind anywhere in the part.
pub(crate) fn count_breaks(xml: &str, kind: BreakKind) -> Result<usize> {
    let mut reader = Reader::from_str(xml);
    let mut count = 0;

    loop {
        match reader.read_event()? {
            Event::Start(ref e) | Event::Empty(ref e) if e.local_name().as_ref() == b"br" => {
                let break_type = e
                    .attributes()
                    .flatten()
                    .find(|attr| attr.key.local_name().as_ref() == b"type")
                    .map(|attr| attr.value.into_owned());
                let matches = match (kind.ooxml_type(), break_type.as_deref()) {
                    (Some(wanted), Some(found)) => wanted.as_bytes() == found,
                    // A bare w:br, or an explicit textWrapping, is a line break
                    (None, None) => true,
                    (None, Some(found)) => found == b"textWrapping",
                    (Some(_), None) => false,
                };
                if matches {
                    count += 1;
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(count)
}
