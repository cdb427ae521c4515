//! Navigable document model over a parsed curriculum page.
//!
//! Curriculum pages have no schema, so fields are found positionally:
//! locate a marker (a class, a named anchor), then walk children or the
//! siblings that follow it. This crate provides the primitives for that:
//! - [`Document`]: owns the parsed tree
//! - [`Node`]: a copyable handle with search, text, and attribute helpers
//! - [`SiblingCursor`]: a one-shot forward cursor with [`SiblingCursor::next_n`]
//! - [`AttrMatch`]: how an attribute value is compared when searching

mod cursor;
mod node;

use scraper::Html;
use tracing::debug;

pub use cursor::SiblingCursor;
pub use node::Node;

// ---------------------------------------------------------------------------
// Attribute matching
// ---------------------------------------------------------------------------

/// How [`Node::find_by_attribute`] compares an attribute value.
#[derive(Debug, Clone, Copy)]
pub enum AttrMatch<'p> {
    /// The value equals the string.
    Exact(&'p str),
    /// The value starts with the string.
    Prefix(&'p str),
}

impl AttrMatch<'_> {
    /// Whether `value` satisfies this matcher.
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Self::Exact(s) => value == *s,
            Self::Prefix(s) => value.starts_with(s),
        }
    }
}

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// An immutable parsed document.
///
/// All [`Node`] handles borrow from the document, so extraction cannot
/// outlive the snapshot it reads from.
pub struct Document {
    html: Html,
}

impl Document {
    /// Parse raw markup into a navigable tree. Parsing never fails; broken
    /// markup is repaired the way a browser would.
    pub fn parse(raw: &str) -> Self {
        let html = Html::parse_document(raw);
        if !html.errors.is_empty() {
            debug!(count = html.errors.len(), "markup repaired while parsing");
        }
        Self { html }
    }

    /// The tree root (above `<html>`).
    pub fn root(&self) -> Node<'_> {
        Node::new(self.html.tree.root())
    }

    /// First element in document order with this tag and, if given, classes.
    pub fn find_by_tag(&self, tag: &str, class: Option<&str>) -> Option<Node<'_>> {
        self.root().find_by_tag(tag, class)
    }

    /// Every element in document order with this tag and, if given, classes.
    pub fn find_all_by_tag(&self, tag: &str, class: Option<&str>) -> Vec<Node<'_>> {
        self.root().find_all_by_tag(tag, class)
    }

    /// First element with this tag whose attribute satisfies `value`.
    pub fn find_by_attribute(&self, tag: &str, attr: &str, value: AttrMatch<'_>) -> Option<Node<'_>> {
        self.root().find_by_attribute(tag, attr, value)
    }

    /// Every element with this tag whose attribute satisfies `value`.
    pub fn find_all_by_attribute(&self, tag: &str, attr: &str, value: AttrMatch<'_>) -> Vec<Node<'_>> {
        self.root().find_all_by_attribute(tag, attr, value)
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("nodes", &self.html.tree.nodes().count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><body>
<div class="layout-cell layout-cell-12 data-cell" id="first">one</div>
<div class="layout-cell data-cell" id="second">two</div>
<a name="Endereco"></a>
<a name="PP_10"></a><a name="PP_11"></a><a name="XPP_12"></a>
<span data-tipo-ordenacao="ano">2020</span>
</body></html>"#;

    #[test]
    fn find_by_tag_requires_every_class() {
        let doc = Document::parse(PAGE);

        let node = doc.find_by_tag("div", Some("data-cell layout-cell-12")).unwrap();
        assert_eq!(node.attribute("id"), Some("first"));

        let all = doc.find_all_by_tag("div", Some("data-cell"));
        assert_eq!(all.len(), 2);

        assert!(doc.find_by_tag("div", Some("artigo-completo")).is_none());
        assert_eq!(doc.find_all_by_tag("div", None).len(), 2);
    }

    #[test]
    fn find_by_attribute_matchers() {
        let doc = Document::parse(PAGE);

        assert!(doc.find_by_attribute("a", "name", AttrMatch::Exact("Endereco")).is_some());
        assert!(doc.find_by_attribute("a", "name", AttrMatch::Exact("Ender")).is_none());

        let prefixed = doc.find_all_by_attribute("a", "name", AttrMatch::Prefix("PP_"));
        assert_eq!(prefixed.len(), 2);

        let year = doc
            .find_by_attribute("span", "data-tipo-ordenacao", AttrMatch::Exact("ano"))
            .unwrap();
        assert_eq!(year.text(), "2020");
    }

    #[test]
    fn attr_match_compares_from_the_start() {
        assert!(AttrMatch::Prefix("PP_").matches("PP_10"));
        assert!(!AttrMatch::Prefix("PP_").matches("XPP_12"));
        assert!(!AttrMatch::Exact("PP_1").matches("PP_10"));
    }
}
