//! One-shot forward cursor over the siblings following a marker node.

use ego_tree::iter::NextSiblings;
use scraper::node::Node as RawNode;

use lattes_shared::{LattesError, Result};

use crate::node::Node;

/// Forward-only iterator over the siblings after a marker.
///
/// Text and comment nodes count as siblings, so positional templates must
/// account for the whitespace and comments between elements.
pub struct SiblingCursor<'a> {
    marker: String,
    inner: NextSiblings<'a, RawNode>,
}

impl<'a> SiblingCursor<'a> {
    pub(crate) fn new(marker: String, inner: NextSiblings<'a, RawNode>) -> Self {
        Self { marker, inner }
    }

    /// Label of the node this cursor started from.
    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Take exactly `n` siblings, consuming the cursor.
    ///
    /// Fails with [`LattesError::InsufficientSiblings`] if fewer remain.
    pub fn next_n(mut self, n: usize) -> Result<Vec<Node<'a>>> {
        let mut taken = Vec::with_capacity(n);
        while taken.len() < n {
            match self.next() {
                Some(node) => taken.push(node),
                None => {
                    return Err(LattesError::InsufficientSiblings {
                        marker: self.marker,
                        expected: n,
                        found: taken.len(),
                    });
                }
            }
        }
        Ok(taken)
    }
}

impl<'a> Iterator for SiblingCursor<'a> {
    type Item = Node<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(Node::new)
    }
}
