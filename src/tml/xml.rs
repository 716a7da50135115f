use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An owned XML element: attributes in document order and mixed
/// element/text children.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl Element {
    fn open(start: &BytesStart) -> Result<Self, String> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| e.to_string())?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value().map_err(|e| e.to_string())?;
            attributes.push((key, value.into_owned()));
        }

        Ok(Self {
            name,
            attributes,
            children: Vec::new(),
        })
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn attribute_names(&self) -> Vec<&str> {
        self.attributes.iter().map(|(key, _)| key.as_str()).collect()
    }

    pub fn children_named<'a, 'n>(
        &'a self,
        name: &'n str,
    ) -> impl Iterator<Item = &'a Element> + 'n
    where
        'a: 'n,
    {
        self.children.iter().filter_map(move |node| match node {
            Node::Element(el) if el.name == name => Some(el),
            _ => None,
        })
    }

    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find_map(|node| match node {
            Node::Element(el) if el.name == name => Some(el),
            _ => None,
        })
    }

    /// Direct text and CDATA children, concatenated, untrimmed.
    pub fn raw_text(&self) -> String {
        self.children
            .iter()
            .filter_map(|node| match node {
                Node::Text(text) => Some(text.as_str()),
                Node::Element(_) => None,
            })
            .collect()
    }

    pub fn text(&self) -> String {
        self.raw_text().trim().to_string()
    }

    /// Trimmed text of the first child called `name`, or empty.
    pub fn child_text(&self, name: &str) -> String {
        self.child(name).map(Element::text).unwrap_or_default()
    }

    pub fn inner_xml(&self) -> String {
        let mut out = String::new();
        for node in &self.children {
            write_node(node, &mut out);
        }
        out
    }

    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        write_element(self, &mut out);
        out
    }
}

fn write_node(node: &Node, out: &mut String) {
    match node {
        Node::Element(el) => write_element(el, out),
        Node::Text(text) => out.push_str(&escape(text.as_str())),
    }
}

fn write_element(el: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&el.name);
    for (key, value) in &el.attributes {
        out.push_str(&format!(" {}=\"{}\"", key, escape(value.as_str())));
    }

    if el.children.is_empty() {
        out.push_str(" />");
        return;
    }

    out.push('>');
    for node in &el.children {
        write_node(node, out);
    }
    out.push_str(&format!("</{}>", el.name));
}

/// Parse a complete document into its root element.
pub fn parse_document(source: &str) -> Result<Element, XmlError> {
    let mut reader = Reader::from_str(source);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(e) => {
                return Err(locate(source, reader.buffer_position() as usize, e.to_string()));
            }
        };

        let step = match event {
            Event::Start(start) => Element::open(&start).map(|el| stack.push(el)),
            Event::Empty(start) => {
                Element::open(&start).and_then(|el| attach(&mut stack, &mut root, el))
            }
            Event::End(_) => match stack.pop() {
                Some(el) => attach(&mut stack, &mut root, el),
                None => Err(String::from("closing tag without an open element")),
            },
            Event::Text(text) => match text.unescape() {
                Ok(text) => push_text(&mut stack, &text),
                Err(e) => Err(e.to_string()),
            },
            Event::CData(data) => {
                let text = String::from_utf8_lossy(&data.into_inner()).into_owned();
                push_text(&mut stack, &text)
            }
            Event::Eof => break,
            _ => Ok(()),
        };

        if let Err(message) = step {
            return Err(locate(source, reader.buffer_position() as usize, message));
        }
    }

    if let Some(open) = stack.last() {
        return Err(locate(
            source,
            source.len(),
            format!("element <{}> is never closed", open.name),
        ));
    }

    root.ok_or_else(|| locate(source, source.len(), String::from("document has no root element")))
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, el: Element) -> Result<(), String> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(Node::Element(el));
        Ok(())
    } else if root.is_some() {
        Err(format!("second root element <{}>", el.name))
    } else {
        *root = Some(el);
        Ok(())
    }
}

fn push_text(stack: &mut [Element], text: &str) -> Result<(), String> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(Node::Text(text.to_string()));
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err(String::from("text outside the root element")),
    }
}

fn locate(source: &str, offset: usize, message: String) -> XmlError {
    let offset = offset.min(source.len());
    let before = &source.as_bytes()[..offset];
    let line = before.iter().filter(|&&b| b == b'\n').count() + 1;
    let line_start = before
        .iter()
        .rposition(|&b| b == b'\n')
        .map_or(0, |pos| pos + 1);

    XmlError {
        line,
        column: offset - line_start + 1,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_nested_tree() {
        let root = parse_document(
            r#"<?xml version="1.0"?>
<course id="c1" title="A &amp; B">
  <!-- note -->
  <objective>Learn</objective>
  <module title="M"><lesson title="L"/></module>
</course>"#,
        )
        .unwrap();

        assert_eq!(root.name, "course");
        assert_eq!(root.attr("title"), Some("A & B"));
        assert_eq!(root.attribute_names(), vec!["id", "title"]);
        assert_eq!(root.child_text("objective"), "Learn");

        let module = root.child("module").unwrap();
        assert_eq!(module.children_named("lesson").count(), 1);
    }

    #[test]
    fn child_lookup_outlives_the_name() {
        let root = parse_document("<course><module title=\"M\"/></course>").unwrap();
        let module = {
            let name = String::from("module");
            root.child(&name)
        };
        assert_eq!(module.and_then(|m| m.attr("title")), Some("M"));
        assert!(root.child("lesson").is_none());
    }

    #[test]
    fn cdata_and_entities_become_text() {
        let root = parse_document("<c>a &lt; b <![CDATA[<raw>]]></c>").unwrap();
        assert_eq!(root.text(), "a < b <raw>");
    }

    #[test]
    fn serialises_back_to_xml() {
        let root = parse_document(r#"<q type="odd"><x a="1&quot;"/>t &amp; u</q>"#).unwrap();
        assert_eq!(root.to_xml(), r#"<q type="odd"><x a="1&quot;" />t &amp; u</q>"#);
        assert_eq!(root.inner_xml(), r#"<x a="1&quot;" />t &amp; u"#);
    }

    #[test]
    fn mismatched_tags_are_errors() {
        let err = parse_document("<a>\n  <b></a>").unwrap_err();
        assert_eq!(err.line, 2);
    }

    #[test]
    fn unclosed_root_is_an_error() {
        assert!(parse_document("<a><b/>").is_err());
    }

    #[test]
    fn empty_document_is_an_error() {
        let err = parse_document("   ").unwrap_err();
        assert_eq!(err.message, "document has no root element");
    }

    #[test]
    fn second_root_is_an_error() {
        let err = parse_document("<a/><b/>").unwrap_err();
        assert!(err.message.contains("second root element <b>"));
    }
}
