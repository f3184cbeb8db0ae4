//! # Document Model
//!
//! A [`Document`] is the in-memory form of one list-feed `entry`: a tree of
//! namespace-qualified elements mirroring the Atom wire format.
//!
//! ```xml
//! <entry xmlns="http://www.w3.org/2005/Atom"
//!        xmlns:gsx="http://schemas.google.com/spreadsheets/2006/extended"
//!        xmlns:gd="http://schemas.google.com/g/2005">
//!   <id>https://spreadsheets.google.com/feeds/list/key/od6/private/full/cokwr</id>
//!   <link rel="edit" href="https://spreadsheets.google.com/feeds/list/key/od6/private/full/cokwr/1"/>
//!   <gsx:message>ok</gsx:message>
//! </entry>
//! ```
//!
//! Cells live in the extended-fields (`gsx`) namespace, one element per column.
//! The default-namespace `id` element is the only thing that distinguishes a
//! row that already exists remotely from one that was never pushed.
//!
//! Namespaces are resolved to URIs while parsing, so lookups never depend on
//! the prefix a server happened to use. Prefixes are kept for serialization.

use crate::framework::error::{FeedError, FeedResult};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

/// Default (Atom) namespace of feed entries.
pub const ATOM_NS: &str = "http://www.w3.org/2005/Atom";
/// Extended-fields namespace holding one element per spreadsheet column.
pub const EXTENDED_NS: &str = "http://schemas.google.com/spreadsheets/2006/extended";
/// GData metadata namespace.
pub const METADATA_NS: &str = "http://schemas.google.com/g/2005";

pub const EXTENDED_PREFIX: &str = "gsx";
pub const METADATA_PREFIX: &str = "gd";

const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

type Declarations = Vec<(Option<String>, String)>;

/// An attribute with its resolved namespace. Unprefixed attributes carry none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub prefix: Option<String>,
    pub name: String,
    pub namespace: Option<String>,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// A namespace-qualified element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    prefix: Option<String>,
    name: String,
    namespace: Option<String>,
    declarations: Declarations,
    attributes: Vec<Attribute>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(prefix: Option<&str>, name: impl Into<String>, namespace: Option<&str>) -> Self {
        Self {
            prefix: prefix.map(str::to_string),
            name: name.into(),
            namespace: namespace.map(str::to_string),
            declarations: Vec::new(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Local name, without prefix.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// True if this element is `name` in namespace `ns`.
    pub fn is(&self, ns: &str, name: &str) -> bool {
        self.namespace.as_deref() == Some(ns) && self.name == name
    }

    /// The URI bound to `prefix` by a declaration on this element.
    pub fn declaration(&self, prefix: Option<&str>) -> Option<&str> {
        self.declarations
            .iter()
            .find(|(p, _)| p.as_deref() == prefix)
            .map(|(_, uri)| uri.as_str())
    }

    /// Declares `prefix` on this element, replacing an earlier declaration.
    pub fn declare(&mut self, prefix: Option<&str>, uri: &str) {
        match self
            .declarations
            .iter_mut()
            .find(|(p, _)| p.as_deref() == prefix)
        {
            Some(existing) => existing.1 = uri.to_string(),
            None => self
                .declarations
                .push((prefix.map(str::to_string), uri.to_string())),
        }
    }

    /// Value of an unprefixed attribute.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.prefix.is_none() && a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Value of a namespaced attribute.
    pub fn attribute_ns(&self, ns: &str, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.namespace.as_deref() == Some(ns) && a.name == name)
            .map(|a| a.value.as_str())
    }

    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self
            .attributes
            .iter_mut()
            .find(|a| a.prefix.is_none() && a.name == name)
        {
            Some(existing) => existing.value = value,
            None => self.attributes.push(Attribute {
                prefix: None,
                name: name.to_string(),
                namespace: None,
                value,
            }),
        }
    }

    fn set_attribute_from(&mut self, attribute: &Attribute) {
        self.attributes.retain(|a| {
            !(a.namespace == attribute.namespace && a.name == attribute.name)
        });
        self.attributes.push(attribute.clone());
    }

    /// Text content. Fields are leaf nodes, so this is the single text child.
    pub fn text(&self) -> &str {
        self.children
            .iter()
            .find_map(|child| match child {
                Node::Text(text) => Some(text.as_str()),
                Node::Element(_) => None,
            })
            .unwrap_or("")
    }

    /// Replaces all children with a single text node.
    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.children.clear();
        if !text.is_empty() {
            self.children.push(Node::Text(text));
        }
    }

    pub fn children(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|child| match child {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }

    pub fn child(&self, ns: &str, name: &str) -> Option<&Element> {
        self.children().find(|e| e.is(ns, name))
    }

    fn child_mut(&mut self, ns: &str, name: &str) -> Option<&mut Element> {
        self.children.iter_mut().find_map(|child| match child {
            Node::Element(element) if element.is(ns, name) => Some(element),
            _ => None,
        })
    }

    pub fn push(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    fn retain_children(&mut self, mut keep: impl FnMut(&Element) -> bool) {
        self.children.retain(|child| match child {
            Node::Element(element) => keep(element),
            Node::Text(_) => true,
        });
    }

    fn qualified_name(&self) -> String {
        qualify(self.prefix.as_deref(), &self.name)
    }

    /// Binds unqualified or unbound-prefix nodes to the namespaces a feed
    /// implies for them.
    fn bind_implied_namespaces(&mut self) {
        if self.namespace.is_none() {
            self.namespace = implied_namespace(self.prefix.as_deref()).map(str::to_string);
        }
        for attribute in &mut self.attributes {
            if attribute.namespace.is_none() && attribute.prefix.is_some() {
                attribute.namespace =
                    implied_namespace(attribute.prefix.as_deref()).map(str::to_string);
            }
        }
        for child in &mut self.children {
            if let Node::Element(element) = child {
                element.bind_implied_namespaces();
            }
        }
    }

    fn is_edit_link(&self) -> bool {
        self.is(ATOM_NS, "link") && self.attribute("rel") == Some("edit")
    }
}

fn implied_namespace(prefix: Option<&str>) -> Option<&'static str> {
    match prefix {
        None => Some(ATOM_NS),
        Some(EXTENDED_PREFIX) => Some(EXTENDED_NS),
        Some(METADATA_PREFIX) => Some(METADATA_NS),
        Some(_) => None,
    }
}

fn qualify(prefix: Option<&str>, name: &str) -> String {
    match prefix {
        Some(prefix) => format!("{prefix}:{name}"),
        None => name.to_string(),
    }
}

fn split_qname(qname: &str) -> (Option<String>, String) {
    match qname.split_once(':') {
        Some((prefix, name)) => (Some(prefix.to_string()), name.to_string()),
        None => (None, qname.to_string()),
    }
}

/// One feed entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    root: Element,
}

impl Default for Document {
    fn default() -> Self {
        Self::fresh()
    }
}

impl Document {
    /// An empty `entry` carrying the three feed namespace declarations.
    pub fn fresh() -> Self {
        let mut root = Element::new(None, "entry", Some(ATOM_NS));
        declare_feed_namespaces(&mut root);
        Self { root }
    }

    pub fn from_element(root: Element) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Text of the extended field `field`, or `None` if it was never set.
    pub fn read(&self, field: &str) -> Option<&str> {
        self.root.child(EXTENDED_NS, field).map(Element::text)
    }

    /// Sets the extended field `field`, appending the node on first write.
    pub fn write(&mut self, field: &str, value: impl Into<String>) {
        if self.root.child(EXTENDED_NS, field).is_none() {
            self.root
                .push(Element::new(Some(EXTENDED_PREFIX), field, Some(EXTENDED_NS)));
        }
        if let Some(node) = self.root.child_mut(EXTENDED_NS, field) {
            node.set_text(value);
        }
    }

    /// All extended fields in document order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.root
            .children()
            .filter(|e| e.namespace() == Some(EXTENDED_NS))
            .map(|e| (e.name(), e.text()))
    }

    /// True once the server has assigned this entry an `id`.
    pub fn has_identity(&self) -> bool {
        self.root.child(ATOM_NS, "id").is_some()
    }

    pub fn identity(&self) -> Option<&str> {
        self.root.child(ATOM_NS, "id").map(Element::text)
    }

    pub fn set_identity(&mut self, id: impl Into<String>) {
        self.root.retain_children(|e| !e.is(ATOM_NS, "id"));
        let mut node = Element::new(None, "id", Some(ATOM_NS));
        node.set_text(id);
        self.root.children.insert(0, Node::Element(node));
    }

    /// The `href` of the `link rel="edit"` child: where updates are sent.
    pub fn edit_link(&self) -> Option<&str> {
        self.root
            .children()
            .find(|e| e.is_edit_link())
            .and_then(|e| e.attribute("href"))
    }

    pub fn set_edit_link(&mut self, href: &str) {
        self.root.retain_children(|e| !e.is_edit_link());
        let mut link = Element::new(None, "link", Some(ATOM_NS));
        link.set_attribute("rel", "edit");
        link.set_attribute("type", "application/atom+xml");
        link.set_attribute("href", href);
        self.root.push(link);
    }

    /// The URI the root declares for `prefix` (`None` for the default namespace).
    pub fn namespace_declaration(&self, prefix: Option<&str>) -> Option<&str> {
        self.root.declaration(prefix)
    }

    /// Stamps the feed namespaces onto an entry received from the server.
    ///
    /// Entries cut out of a feed lose the declarations of their ancestors and
    /// some servers omit them altogether. Must run before fields are touched.
    pub fn adopt_server_namespaces(&mut self) {
        declare_feed_namespaces(&mut self.root);
        self.root.bind_implied_namespaces();
    }

    /// Copies the server-assigned `id`, edit link and etag from `response`.
    /// Field nodes are left untouched.
    pub fn adopt_identity(&mut self, response: &Document) {
        if let Some(id) = response.root.child(ATOM_NS, "id") {
            self.root.retain_children(|e| !e.is(ATOM_NS, "id"));
            self.root.children.insert(0, Node::Element(id.clone()));
        }
        if let Some(link) = response.root.children().find(|e| e.is_edit_link()) {
            self.root.retain_children(|e| !e.is_edit_link());
            self.root.push(link.clone());
        }
        if let Some(etag) = response
            .root
            .attributes
            .iter()
            .find(|a| a.namespace.as_deref() == Some(METADATA_NS) && a.name == "etag")
        {
            self.root.set_attribute_from(etag);
        }
    }

    /// Every `entry` of a parsed feed, each as a standalone document.
    pub fn entries(&self) -> Vec<Document> {
        self.root
            .children()
            .filter(|e| e.is(ATOM_NS, "entry"))
            .cloned()
            .map(Document::from_element)
            .collect()
    }

    /// Parses a feed or entry. The first element becomes the root.
    pub fn parse(xml: &str) -> FeedResult<Self> {
        let mut reader = Reader::from_str(xml);
        let mut stack: Vec<Element> = Vec::new();
        let mut scopes: Vec<Declarations> = Vec::new();
        let mut text = String::new();
        let mut root = None;

        loop {
            match reader.read_event()? {
                Event::Start(start) => {
                    flush_text(&mut stack, &mut text);
                    stack.push(open_element(&start, &mut scopes)?);
                }
                Event::Empty(start) => {
                    flush_text(&mut stack, &mut text);
                    let element = open_element(&start, &mut scopes)?;
                    scopes.pop();
                    close_element(element, &mut stack, &mut root)?;
                }
                Event::End(_) => {
                    flush_text(&mut stack, &mut text);
                    scopes.pop();
                    let element = stack
                        .pop()
                        .ok_or_else(|| malformed("unbalanced end tag"))?;
                    close_element(element, &mut stack, &mut root)?;
                }
                Event::Text(raw) if !stack.is_empty() => {
                    text.push_str(&unescape(utf8(&raw)?)?);
                }
                Event::CData(raw) if !stack.is_empty() => {
                    text.push_str(utf8(&raw)?);
                }
                Event::GeneralRef(reference) if !stack.is_empty() => {
                    text.push_str(&unescape(&format!("&{};", utf8(&reference)?))?);
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !stack.is_empty() {
            return Err(malformed("unclosed element"));
        }
        root.map(Document::from_element)
            .ok_or_else(|| malformed("no root element"))
    }

    /// Serializes the entry. Namespaces in use but not declared in scope are
    /// declared where they are first needed.
    pub fn to_xml(&self) -> FeedResult<String> {
        let mut writer = Writer::new(Vec::new());
        let mut scopes = Vec::new();
        write_element(&mut writer, &self.root, &mut scopes)?;
        String::from_utf8(writer.into_inner()).map_err(malformed)
    }
}

fn declare_feed_namespaces(root: &mut Element) {
    root.declare(None, ATOM_NS);
    root.declare(Some(EXTENDED_PREFIX), EXTENDED_NS);
    root.declare(Some(METADATA_PREFIX), METADATA_NS);
}

fn malformed(message: impl std::fmt::Display) -> FeedError {
    FeedError::MalformedDocument(message.to_string())
}

fn utf8(bytes: &[u8]) -> FeedResult<&str> {
    std::str::from_utf8(bytes).map_err(malformed)
}

fn unescape(raw: &str) -> FeedResult<String> {
    quick_xml::escape::unescape(raw)
        .map(|text| text.into_owned())
        .map_err(malformed)
}

fn resolve<'a>(scopes: &'a [Declarations], prefix: Option<&str>) -> Option<&'a str> {
    if prefix == Some("xml") {
        return Some(XML_NS);
    }
    scopes
        .iter()
        .rev()
        .find_map(|scope| scope.iter().find(|(p, _)| p.as_deref() == prefix))
        .map(|(_, uri)| uri.as_str())
        .filter(|uri| !uri.is_empty())
}

fn open_element(start: &BytesStart<'_>, scopes: &mut Vec<Declarations>) -> FeedResult<Element> {
    let (prefix, name) = split_qname(utf8(start.name().as_ref())?);
    let mut declarations = Vec::new();
    let mut raw_attributes = Vec::new();

    for attribute in start.attributes() {
        let attribute = attribute.map_err(malformed)?;
        let key = utf8(attribute.key.as_ref())?;
        let value = unescape(utf8(&attribute.value)?)?;
        if key == "xmlns" {
            declarations.push((None, value));
        } else if let Some(declared) = key.strip_prefix("xmlns:") {
            declarations.push((Some(declared.to_string()), value));
        } else {
            raw_attributes.push((split_qname(key), value));
        }
    }

    scopes.push(declarations.clone());
    let namespace = resolve(scopes, prefix.as_deref()).map(str::to_string);
    let attributes = raw_attributes
        .into_iter()
        .map(|((prefix, name), value)| Attribute {
            namespace: prefix
                .as_deref()
                .and_then(|p| resolve(scopes, Some(p)))
                .map(str::to_string),
            prefix,
            name,
            value,
        })
        .collect();

    Ok(Element {
        prefix,
        name,
        namespace,
        declarations,
        attributes,
        children: Vec::new(),
    })
}

fn flush_text(stack: &mut [Element], text: &mut String) {
    if text.is_empty() {
        return;
    }
    if let Some(current) = stack.last_mut() {
        current.children.push(Node::Text(std::mem::take(text)));
    }
    text.clear();
}

fn close_element(
    mut element: Element,
    stack: &mut [Element],
    root: &mut Option<Element>,
) -> FeedResult<()> {
    // Indentation between child elements is not content.
    if element.children().next().is_some() {
        element.children.retain(|child| match child {
            Node::Text(text) => !text.trim().is_empty(),
            Node::Element(_) => true,
        });
    }
    match stack.last_mut() {
        Some(parent) => parent.children.push(Node::Element(element)),
        None if root.is_none() => *root = Some(element),
        None => return Err(malformed("more than one root element")),
    }
    Ok(())
}

fn write_element(
    writer: &mut Writer<Vec<u8>>,
    element: &Element,
    scopes: &mut Vec<Declarations>,
) -> FeedResult<()> {
    let mut declarations = element.declarations.clone();
    let bound = |declarations: &Declarations, scopes: &[Declarations], prefix: Option<&str>| {
        declarations
            .iter()
            .find(|(p, _)| p.as_deref() == prefix)
            .map(|(_, uri)| uri.clone())
            .or_else(|| resolve(scopes, prefix).map(str::to_string))
            .filter(|uri| !uri.is_empty())
    };

    match (element.prefix.as_deref(), element.namespace.as_deref()) {
        (prefix, Some(uri)) => {
            if bound(&declarations, scopes.as_slice(), prefix).as_deref() != Some(uri) {
                declarations.push((prefix.map(str::to_string), uri.to_string()));
            }
        }
        (None, None) => {
            if bound(&declarations, scopes.as_slice(), None).is_some() {
                declarations.push((None, String::new()));
            }
        }
        (Some(_), None) => {}
    }
    for attribute in &element.attributes {
        if let (Some(prefix), Some(uri)) = (attribute.prefix.as_deref(), attribute.namespace.as_deref()) {
            if prefix != "xml" && bound(&declarations, scopes.as_slice(), Some(prefix)).as_deref() != Some(uri) {
                declarations.push((Some(prefix.to_string()), uri.to_string()));
            }
        }
    }

    let qname = element.qualified_name();
    let mut start = BytesStart::new(qname.as_str());
    for (prefix, uri) in &declarations {
        let key = match prefix {
            Some(prefix) => format!("xmlns:{prefix}"),
            None => "xmlns".to_string(),
        };
        start.push_attribute((key.as_str(), uri.as_str()));
    }
    for attribute in &element.attributes {
        let key = qualify(attribute.prefix.as_deref(), &attribute.name);
        start.push_attribute((key.as_str(), attribute.value.as_str()));
    }

    if element.children.is_empty() {
        return writer.write_event(Event::Empty(start)).map_err(malformed);
    }

    writer.write_event(Event::Start(start)).map_err(malformed)?;
    scopes.push(declarations);
    for child in &element.children {
        match child {
            Node::Text(text) => writer
                .write_event(Event::Text(BytesText::new(text)))
                .map_err(malformed)?,
            Node::Element(child) => write_element(writer, child, scopes)?,
        }
    }
    scopes.pop();
    writer
        .write_event(Event::End(BytesEnd::new(qname.as_str())))
        .map_err(malformed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const HYDRATED: &str = r#"<entry xmlns="http://www.w3.org/2005/Atom" xmlns:gsx="http://schemas.google.com/spreadsheets/2006/extended">
        <id>https://spreadsheets.google.com/feeds/list/key/od6/private/full/cokwr</id>
        <link rel="self" type="application/atom+xml" href="https://spreadsheets.google.com/feeds/list/key/od6/private/full/cokwr"/>
        <link rel="edit" type="application/atom+xml" href="https://spreadsheets.google.com/feeds/list/key/od6/private/full/cokwr/2"/>
        <gsx:id>42</gsx:id>
        <gsx:status>open</gsx:status>
    </entry>"#;

    #[test]
    fn test_write_then_read() {
        let mut doc = Document::fresh();
        assert_eq!(doc.read("message"), None);

        doc.write("message", "ok");
        assert_eq!(doc.read("message"), Some("ok"));
    }

    #[test]
    fn test_write_reuses_node() {
        let mut doc = Document::fresh();
        doc.write("status", "open");
        doc.write("status", "closed");

        assert_eq!(doc.read("status"), Some("closed"));
        assert_eq!(doc.fields().collect::<Vec<_>>(), vec![("status", "closed")]);
    }

    #[test]
    fn test_field_names_are_case_sensitive() {
        let mut doc = Document::fresh();
        doc.write("Total", "1");
        doc.write("total", "2");

        assert_eq!(doc.read("Total"), Some("1"));
        assert_eq!(doc.read("total"), Some("2"));
        assert_eq!(doc.fields().count(), 2);
    }

    #[test]
    fn test_fresh_document_has_no_identity() {
        let doc = Document::fresh();
        assert!(!doc.has_identity());
        assert_eq!(doc.edit_link(), None);
        assert_eq!(doc.namespace_declaration(None), Some(ATOM_NS));
        assert_eq!(doc.namespace_declaration(Some("gsx")), Some(EXTENDED_NS));
        assert_eq!(doc.namespace_declaration(Some("gd")), Some(METADATA_NS));
    }

    #[test]
    fn test_fresh_document_wire_shape() {
        let mut doc = Document::fresh();
        doc.write("timestamp", "2024-01-01 00:00:00");
        doc.write("message", "ok");

        assert_eq!(
            doc.to_xml().unwrap(),
            concat!(
                r#"<entry xmlns="http://www.w3.org/2005/Atom""#,
                r#" xmlns:gsx="http://schemas.google.com/spreadsheets/2006/extended""#,
                r#" xmlns:gd="http://schemas.google.com/g/2005">"#,
                "<gsx:timestamp>2024-01-01 00:00:00</gsx:timestamp>",
                "<gsx:message>ok</gsx:message>",
                "</entry>"
            )
        );
    }

    #[test]
    fn test_parse_hydrated_entry() {
        let doc = Document::parse(HYDRATED).unwrap();

        assert!(doc.has_identity());
        assert_eq!(
            doc.identity(),
            Some("https://spreadsheets.google.com/feeds/list/key/od6/private/full/cokwr")
        );
        assert_eq!(
            doc.edit_link(),
            Some("https://spreadsheets.google.com/feeds/list/key/od6/private/full/cokwr/2")
        );
        assert_eq!(doc.read("id"), Some("42"));
        assert_eq!(doc.read("status"), Some("open"));
    }

    #[test]
    fn test_adopt_server_namespaces_on_bare_entry() {
        let mut doc = Document::parse("<entry><id>1</id><gsx:name>Ann</gsx:name></entry>").unwrap();
        assert!(!doc.has_identity());
        assert_eq!(doc.read("name"), None);

        doc.adopt_server_namespaces();

        assert_eq!(doc.namespace_declaration(None), Some(ATOM_NS));
        assert!(doc.has_identity());
        assert_eq!(doc.read("name"), Some("Ann"));

        let reparsed = Document::parse(&doc.to_xml().unwrap()).unwrap();
        assert!(reparsed.has_identity());
        assert_eq!(reparsed.read("name"), Some("Ann"));
    }

    #[test]
    fn test_text_is_escaped_and_unescaped() {
        let mut doc = Document::fresh();
        doc.write("note", "fish & <chips>");

        let xml = doc.to_xml().unwrap();
        assert!(xml.contains("fish &amp; &lt;chips&gt;"));
        assert_eq!(Document::parse(&xml).unwrap().read("note"), Some("fish & <chips>"));
    }

    #[test]
    fn test_entries_of_feed_serialize_standalone() {
        let feed = r#"<feed xmlns="http://www.w3.org/2005/Atom" xmlns:gsx="http://schemas.google.com/spreadsheets/2006/extended">
            <title>Orders</title>
            <entry><id>a</id><gsx:status>open</gsx:status></entry>
            <entry><id>b</id><gsx:status>paid</gsx:status></entry>
        </feed>"#;
        let entries = Document::parse(feed).unwrap().entries();
        assert_eq!(entries.len(), 2);

        let xml = entries[1].to_xml().unwrap();
        let reparsed = Document::parse(&xml).unwrap();
        assert_eq!(reparsed.identity(), Some("b"));
        assert_eq!(reparsed.read("status"), Some("paid"));
    }

    #[test]
    fn test_adopt_identity_keeps_fields() {
        let mut doc = Document::fresh();
        doc.write("status", "open");

        let mut response = Document::parse(HYDRATED).unwrap();
        response.adopt_server_namespaces();
        doc.adopt_identity(&response);

        assert!(doc.has_identity());
        assert_eq!(doc.edit_link(), response.edit_link());
        assert_eq!(doc.read("status"), Some("open"));
        assert_eq!(doc.read("id"), None);
    }

    #[test]
    fn test_adopt_identity_copies_etag() {
        let response = Document::parse(
            r#"<entry xmlns="http://www.w3.org/2005/Atom" xmlns:gd="http://schemas.google.com/g/2005" gd:etag="&quot;AxQ&quot;"><id>x</id></entry>"#,
        )
        .unwrap();
        let mut doc = Document::fresh();
        doc.adopt_identity(&response);

        assert_eq!(doc.root().attribute_ns(METADATA_NS, "etag"), Some("\"AxQ\""));
        let reparsed = Document::parse(&doc.to_xml().unwrap()).unwrap();
        assert_eq!(reparsed.root().attribute_ns(METADATA_NS, "etag"), Some("\"AxQ\""));
    }

    #[test]
    fn test_set_edit_link_replaces_previous() {
        let mut doc = Document::fresh();
        doc.set_edit_link("https://example.test/row/1");
        doc.set_edit_link("https://example.test/row/2");

        assert_eq!(doc.edit_link(), Some("https://example.test/row/2"));
        assert_eq!(doc.root().children().filter(|e| e.name() == "link").count(), 1);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            Document::parse("<entry><id>1</entry>"),
            Err(FeedError::MalformedDocument(_))
        ));
        assert!(matches!(
            Document::parse(""),
            Err(FeedError::MalformedDocument(_))
        ));
    }
}
