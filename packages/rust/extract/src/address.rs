//! Address section.

use lattes_document::{AttrMatch, Document, Node};
use lattes_shared::{LattesError, Result};

use crate::model::Address;

/// `name` of the anchor that opens the address section.
pub const ADDRESS_ANCHOR: &str = "Endereco";

/// Locate the address block: the data cell next to the `Endereco` anchor.
///
/// The template always carries this section, so a missing anchor is an error.
pub fn locate_address_block(doc: &Document) -> Result<Node<'_>> {
    let anchor = doc
        .find_by_attribute("a", "name", AttrMatch::Exact(ADDRESS_ANCHOR))
        .ok_or_else(|| LattesError::missing(format!("a[name={ADDRESS_ANCHOR}]")))?;
    let section = anchor
        .parent()
        .ok_or_else(|| LattesError::missing("address section"))?;

    section
        .find_by_tag("div", Some("data-cell"))
        .or_else(|| section.find_by_tag("div", None))
        .ok_or_else(|| LattesError::missing("address block"))
}

/// Read an [`Address`] from its block; `None` if the block has no text.
pub fn extract_address(block: Node<'_>) -> Result<Option<Address>> {
    if block.text().is_empty() {
        return Ok(None);
    }

    let kind = block
        .first_element_child()
        .map(|n| n.text())
        .ok_or_else(|| LattesError::malformed("address.type", "address block has no children"))?;

    let institution = block
        .last_child_tagged("div")
        .and_then(|last| last.find_by_tag("div", None))
        .and_then(|inner| inner.children().map(|n| n.text()).find(|t| !t.is_empty()))
        .ok_or_else(|| {
            LattesError::malformed("address.institution", "no text in the last address cell")
        })?;

    Ok(Some(Address { kind, institution }))
}
