//! Copyable node handle with search, text, and attribute helpers.

use ego_tree::NodeRef;
use scraper::ElementRef;
use scraper::node::{Element, Node as RawNode};

use crate::AttrMatch;
use crate::cursor::SiblingCursor;

/// A handle to one node of a [`Document`](crate::Document).
///
/// Both elements and text nodes are visible through this handle. Comments,
/// doctypes, and processing instructions are skipped by child and descendant
/// traversal; [`SiblingCursor`] yields comments too.
#[derive(Clone, Copy)]
pub struct Node<'a> {
    node: NodeRef<'a, RawNode>,
}

impl<'a> Node<'a> {
    pub(crate) fn new(node: NodeRef<'a, RawNode>) -> Self {
        Self { node }
    }

    /// Whether this node takes part in traversal (element or text).
    pub(crate) fn is_visible(node: &NodeRef<'a, RawNode>) -> bool {
        matches!(
            node.value(),
            RawNode::Element(_) | RawNode::Text(_) | RawNode::Document | RawNode::Fragment
        )
    }

    fn element(&self) -> Option<&'a Element> {
        self.node.value().as_element()
    }

    // -----------------------------------------------------------------------
    // Identity
    // -----------------------------------------------------------------------

    /// Lowercase tag name, or `None` for text nodes.
    pub fn tag_name(&self) -> Option<&'a str> {
        self.element().map(|el| el.name())
    }

    /// Whether this is an element node.
    pub fn is_element(&self) -> bool {
        self.element().is_some()
    }

    /// Whether this is an element with the given tag.
    pub fn is_tag(&self, tag: &str) -> bool {
        self.tag_name() == Some(tag)
    }

    /// Raw attribute value.
    pub fn attribute(&self, name: &str) -> Option<&'a str> {
        self.element().and_then(|el| el.attr(name))
    }

    /// Whether the element carries every whitespace-separated class in `classes`.
    pub fn has_classes(&self, classes: &str) -> bool {
        let Some(el) = self.element() else {
            return false;
        };
        classes
            .split_whitespace()
            .all(|wanted| el.classes().any(|c| c == wanted))
    }

    /// Short label for log and error messages, e.g. `a[name=PP_3]`.
    pub fn describe(&self) -> String {
        match self.element() {
            Some(el) => match el.attr("name").or_else(|| el.attr("class")) {
                Some(label) => format!("{}[{label}]", el.name()),
                None => el.name().to_string(),
            },
            None if self.node.value().is_comment() => "#comment".to_string(),
            None => "#text".to_string(),
        }
    }

    // -----------------------------------------------------------------------
    // Text
    // -----------------------------------------------------------------------

    /// Concatenated visible text of this node and its descendants, trimmed.
    pub fn text(&self) -> String {
        self.raw_text().trim().to_string()
    }

    /// Concatenated visible text without trimming.
    pub fn raw_text(&self) -> String {
        match self.node.value() {
            RawNode::Text(text) => text.to_string(),
            _ => match ElementRef::wrap(self.node) {
                Some(el) => el.text().collect(),
                None => self
                    .node
                    .descendants()
                    .filter_map(|n| n.value().as_text().map(|t| t.to_string()))
                    .collect(),
            },
        }
    }

    /// Each descendant text node trimmed, blanks dropped, joined with `sep`.
    ///
    /// Unlike [`Node::text`], words split by `<br>` stay apart.
    pub fn joined_text(&self, sep: &str) -> String {
        self.node
            .descendants()
            .filter_map(|n| n.value().as_text())
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(sep)
    }

    // -----------------------------------------------------------------------
    // Structure
    // -----------------------------------------------------------------------

    /// Parent node, if any.
    pub fn parent(&self) -> Option<Node<'a>> {
        self.node.parent().map(Node::new)
    }

    /// Direct children in order (elements and text).
    pub fn children(&self) -> impl Iterator<Item = Node<'a>> + use<'a> {
        self.node.children().filter(Self::is_visible).map(Node::new)
    }

    /// Direct element children in order.
    pub fn element_children(&self) -> impl Iterator<Item = Node<'a>> + use<'a> {
        self.children().filter(|n| n.is_element())
    }

    /// First direct element child.
    pub fn first_element_child(&self) -> Option<Node<'a>> {
        self.element_children().next()
    }

    /// Last direct element child with the given tag.
    pub fn last_child_tagged(&self, tag: &str) -> Option<Node<'a>> {
        self.element_children().filter(|n| n.is_tag(tag)).last()
    }

    /// All descendants in document order, excluding this node.
    pub fn descendants(&self) -> impl Iterator<Item = Node<'a>> + use<'a> {
        self.node
            .descendants()
            .skip(1)
            .filter(Self::is_visible)
            .map(Node::new)
    }

    /// Forward cursor over the siblings that follow this node.
    pub fn siblings_after(&self) -> SiblingCursor<'a> {
        SiblingCursor::new(self.describe(), self.node.next_siblings())
    }

    // -----------------------------------------------------------------------
    // Search
    // -----------------------------------------------------------------------

    /// First descendant element with this tag and, if given, classes.
    pub fn find_by_tag(&self, tag: &str, class: Option<&str>) -> Option<Node<'a>> {
        self.descendants()
            .find(|n| n.is_tag(tag) && class.is_none_or(|c| n.has_classes(c)))
    }

    /// Every descendant element with this tag and, if given, classes.
    pub fn find_all_by_tag(&self, tag: &str, class: Option<&str>) -> Vec<Node<'a>> {
        self.descendants()
            .filter(|n| n.is_tag(tag) && class.is_none_or(|c| n.has_classes(c)))
            .collect()
    }

    /// First descendant element with this tag whose attribute satisfies `value`.
    pub fn find_by_attribute(&self, tag: &str, attr: &str, value: AttrMatch<'_>) -> Option<Node<'a>> {
        self.descendants().find(|n| {
            n.is_tag(tag) && n.attribute(attr).is_some_and(|v| value.matches(v))
        })
    }

    /// Every descendant element with this tag whose attribute satisfies `value`.
    pub fn find_all_by_attribute(&self, tag: &str, attr: &str, value: AttrMatch<'_>) -> Vec<Node<'a>> {
        self.descendants()
            .filter(|n| n.is_tag(tag) && n.attribute(attr).is_some_and(|v| value.matches(v)))
            .collect()
    }
}

impl std::fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Node").field(&self.describe()).finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::Document;

    #[test]
    fn text_concatenates_and_trims() {
        let doc = Document::parse("<p class=\"resumo\">\n  Hello <b>world</b>!<br/>  </p>");
        let p = doc.find_by_tag("p", Some("resumo")).unwrap();
        assert_eq!(p.text(), "Hello world!");
        assert_eq!(p.raw_text(), "\n  Hello world!  ");
    }

    #[test]
    fn joined_text_keeps_line_breaks_apart() {
        let doc = Document::parse("<div>http://a.br<br>x@a.br<br> <b>bold</b></div>");
        let div = doc.find_by_tag("div", None).unwrap();
        assert_eq!(div.text(), "http://a.brx@a.br bold");
        assert_eq!(div.joined_text(" "), "http://a.br x@a.br bold");
    }

    #[test]
    fn children_include_text_nodes_but_skip_comments() {
        let doc = Document::parse("<div id=\"x\">a<!-- note --><br/>b<span>c</span></div>");
        let div = doc.find_by_tag("div", None).unwrap();

        let texts: Vec<String> = div.children().map(|n| n.text()).collect();
        assert_eq!(texts, vec!["a", "", "b", "c"]);

        let elements: Vec<_> = div.element_children().filter_map(|n| n.tag_name()).collect();
        assert_eq!(elements, vec!["br", "span"]);
        assert_eq!(div.last_child_tagged("span").unwrap().text(), "c");
    }

    #[test]
    fn first_element_child_skips_whitespace() {
        let doc = Document::parse("<div>\n  <div>inner</div>\n</div>");
        let outer = doc.find_by_tag("div", None).unwrap();
        let first = outer.first_element_child().unwrap();
        assert_eq!(first.text(), "inner");
        assert!(first.parent().unwrap().is_tag("div"));
    }

    #[test]
    fn describe_labels() {
        let doc = Document::parse("<a name=\"PP_3\"></a><i>x</i>");
        assert_eq!(doc.find_by_tag("a", None).unwrap().describe(), "a[PP_3]");
        assert_eq!(doc.find_by_tag("i", None).unwrap().describe(), "i");
    }
}
