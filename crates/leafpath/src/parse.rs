//! XML reader that builds [`Document`] trees.
//!
//! Element names are kept exactly as written (`ns:tag` stays `ns:tag`).
//! Comments, processing instructions, the XML declaration and DOCTYPE are
//! dropped. Text and CDATA sections are concatenated into the enclosing
//! element's text.

use crate::error::{Error, Result};
use crate::types::{Document, Node};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// Parse XML from a string.
///
/// Empty or whitespace-only input is not an error; it produces a document
/// without a root.
///
/// # Example
///
/// ```
/// use leafpath::v1::parse;
///
/// let doc = parse(r#"<root><item id="1">a</item></root>"#).unwrap();
/// let root = doc.root.unwrap();
/// assert_eq!(root.tag, "root");
/// assert_eq!(root.children[0].attribute("id"), Some("1"));
/// assert_eq!(root.children[0].text.as_deref(), Some("a"));
/// ```
///
/// # Errors
///
/// Returns an error for which [`Error::is_parse_failure`] holds if the input
/// is not well-formed.
pub fn parse(content: &str) -> Result<Document> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text_start = false;
    reader.config_mut().trim_text_end = false;

    let mut stack: Vec<Node> = Vec::new();
    let mut root: Option<Node> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                stack.push(start_node(&e, &reader)?);
            }
            Ok(Event::End(e)) => {
                let found = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                let mut node = stack
                    .pop()
                    .ok_or_else(|| Error::UnexpectedEndTag(found.clone()))?;
                if node.tag != found {
                    return Err(Error::MismatchedEndTag {
                        expected: std::mem::take(&mut node.tag),
                        found,
                    });
                }
                attach(node, &mut stack, &mut root)?;
            }
            Ok(Event::Empty(e)) => {
                let node = start_node(&e, &reader)?;
                attach(node, &mut stack, &mut root)?;
            }
            Ok(Event::Text(e)) => {
                let text = e.unescape().map_err(|err| Error::XmlSyntax {
                    message: format!("Invalid text content: {}", err),
                    position: reader.buffer_position(),
                })?;
                push_text(&text, &mut stack)?;
            }
            Ok(Event::CData(e)) => {
                let text = String::from_utf8_lossy(&e.into_inner()).into_owned();
                push_text(&text, &mut stack)?;
            }
            Ok(Event::Comment(_) | Event::PI(_) | Event::Decl(_) | Event::DocType(_)) => {}
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlSyntax {
                    message: e.to_string(),
                    position: reader.error_position(),
                });
            }
        }
    }

    if let Some(mut node) = stack.pop() {
        return Err(Error::UnclosedElement(std::mem::take(&mut node.tag)));
    }

    Ok(Document { root })
}

fn start_node(e: &BytesStart<'_>, reader: &Reader<&[u8]>) -> Result<Node> {
    let tag = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let mut node = Node::new(tag);

    for attr in e.attributes() {
        let attr = attr.map_err(|err| Error::XmlSyntax {
            message: format!("Invalid attribute: {}", err),
            position: reader.buffer_position(),
        })?;
        let name = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value().map_err(|err| Error::XmlSyntax {
            message: format!("Invalid attribute value: {}", err),
            position: reader.buffer_position(),
        })?;
        node.attributes.push((name, value.into_owned()));
    }

    Ok(node)
}

/// Hand a finished element to its parent, or make it the root.
fn attach(mut node: Node, stack: &mut [Node], root: &mut Option<Node>) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
        return Ok(());
    }
    if root.is_some() {
        return Err(Error::MultipleRoots(std::mem::take(&mut node.tag)));
    }
    *root = Some(node);
    Ok(())
}

fn push_text(text: &str, stack: &mut [Node]) -> Result<()> {
    match stack.last_mut() {
        Some(node) => {
            node.text.get_or_insert_with(String::new).push_str(text);
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err(Error::TextOutsideRoot(text.trim().to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NodeKind;

    #[test]
    fn test_parse_nested() {
        let doc = parse("<a><b>1</b><c><d>2</d></c></a>").unwrap();
        let root = doc.root.unwrap();
        assert_eq!(root.tag, "a");
        assert_eq!(root.kind(), NodeKind::Branch);
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children[0].leaf_text(), Some("1"));
        assert_eq!(root.children[1].children[0].tag, "d");
    }

    #[test]
    fn test_parse_attributes_in_order_and_unescaped() {
        let doc = parse(r#"<a x="1" y="&lt;2&gt;"/>"#).unwrap();
        let root = doc.root.unwrap();
        assert_eq!(
            root.attributes,
            vec![
                ("x".to_string(), "1".to_string()),
                ("y".to_string(), "<2>".to_string())
            ]
        );
        assert_eq!(root.kind(), NodeKind::Inert);
    }

    #[test]
    fn test_parse_text_entities_and_cdata() {
        let doc = parse("<a>x &amp; <![CDATA[<y>]]></a>").unwrap();
        assert_eq!(doc.root.unwrap().leaf_text(), Some("x & <y>"));
    }

    #[test]
    fn test_parse_skips_comments_and_declarations() {
        let xml = r#"<?xml version="1.0"?>
<!DOCTYPE a>
<!-- leading -->
<a><!-- inner --><b>1</b><?pi data?></a>
"#;
        let root = parse(xml).unwrap().root.unwrap();
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.children[0].tag, "b");
    }

    #[test]
    fn test_parse_keeps_prefixed_names() {
        let root = parse(r#"<ns:a xmlns:ns="urn:x"><ns:b>1</ns:b></ns:a>"#)
            .unwrap()
            .root
            .unwrap();
        assert_eq!(root.tag, "ns:a");
        assert_eq!(root.children[0].tag, "ns:b");
    }

    #[test]
    fn test_parse_empty_input() {
        assert_eq!(parse("").unwrap(), Document::empty());
        assert_eq!(parse("  \n\t ").unwrap(), Document::empty());
        assert_eq!(parse("<?xml version=\"1.0\"?>\n").unwrap(), Document::empty());
    }

    #[test]
    fn test_parse_unclosed_element() {
        let err = parse("<a><b>1</b>").unwrap_err();
        assert!(err.is_parse_failure());
        assert!(err.to_string().contains('a'));
    }

    #[test]
    fn test_parse_mismatched_end_tag() {
        let err = parse("<a><b>1</c></a>").unwrap_err();
        assert!(err.is_parse_failure());
    }

    #[test]
    fn test_parse_multiple_roots() {
        let err = parse("<a/><b/>").unwrap_err();
        assert!(matches!(err, Error::MultipleRoots(ref tag) if tag == "b"));
    }

    #[test]
    fn test_parse_text_outside_root() {
        let err = parse("stray<a/>").unwrap_err();
        assert!(matches!(err, Error::TextOutsideRoot(_)));
        assert!(err.is_parse_failure());
    }

    #[test]
    fn test_parse_mixed_content_keeps_children() {
        let root = parse("<a>pre<b>1</b>post</a>").unwrap().root.unwrap();
        assert_eq!(root.kind(), NodeKind::Branch);
        assert_eq!(root.text.as_deref(), Some("prepost"));
    }
}
