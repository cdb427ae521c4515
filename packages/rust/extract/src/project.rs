//! Research projects.
//!
//! Each project is a fixed run of siblings after a `PP_*` anchor:
//! ```text
//! [0] period   [1] ws   [2] title   [3] ws   [4] spacer   [5] ws   [6] details
//! ```
//! The details cell holds `Key: Value` lines separated by `<br>`.

use indexmap::IndexMap;
use tracing::debug;

use lattes_document::{AttrMatch, Document, Node};
use lattes_keywords::TextNormalizer;
use lattes_shared::{LattesError, Result};

use crate::model::ResearchProject;

/// `name` of the anchor that opens the projects section.
pub const PROJECTS_ANCHOR: &str = "ProjetosPesquisa";

/// Prefix of the per-project anchor names.
pub const PROJECT_MARKER_PREFIX: &str = "PP_";

/// Siblings that make up one project entry.
pub const PROJECT_WIDTH: usize = 7;

const PERIOD_SLOT: usize = 0;
const TITLE_SLOT: usize = 2;
const DETAILS_SLOT: usize = 6;

/// Key fragment of the status line, whose value carries a second pair.
const STATUS_KEY: &str = "Situação";

/// The `PP_*` markers, or an empty list when the section is absent.
pub fn locate_project_markers(doc: &Document) -> Result<Vec<Node<'_>>> {
    let Some(anchor) = doc.find_by_attribute("a", "name", AttrMatch::Exact(PROJECTS_ANCHOR)) else {
        debug!("no research projects section");
        return Ok(Vec::new());
    };

    let container = anchor
        .parent()
        .and_then(|section| section.find_by_tag("div", Some("layout-cell layout-cell-12 data-cell")))
        .ok_or_else(|| LattesError::missing(format!("{PROJECTS_ANCHOR} data cell")))?;

    Ok(container.find_all_by_attribute("a", "name", AttrMatch::Prefix(PROJECT_MARKER_PREFIX)))
}

/// Build a [`ResearchProject`] from the siblings after one marker.
pub fn extract_project(marker: Node<'_>, normalizer: &TextNormalizer) -> Result<ResearchProject> {
    let slots = marker.siblings_after().next_n(PROJECT_WIDTH)?;

    let period = slots[PERIOD_SLOT].text();
    let title = slots[TITLE_SLOT].text();

    let details = slots[DETAILS_SLOT];
    let lines = details.find_by_tag("div", None).unwrap_or(details);
    let other_information = parse_information(lines.children().map(|n| n.text()));

    let description = other_information
        .get(ResearchProject::DESCRIPTION_KEY)
        .map(String::as_str)
        .unwrap_or("");
    let keywords = normalizer.extract(&format!("{title}{description}"));

    Ok(ResearchProject {
        period,
        title,
        other_information,
        keywords,
    })
}

/// Parse `Key: Value` lines into an ordered map, skipping blank lines.
///
/// A status line (`Situação: Concluído; Natureza: Pesquisa`) yields two
/// entries: the pair after the last `;`, then the status before it.
pub fn parse_information<I, S>(lines: I) -> IndexMap<String, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut info = IndexMap::new();
    for line in lines {
        let line = line.as_ref().trim();
        if line.is_empty() {
            continue;
        }

        let (key, value) = split_pair(line);
        if key.contains(STATUS_KEY) {
            if let Some((status, trailing)) = value.rsplit_once(';') {
                let (extra_key, extra_value) = split_pair(trailing.trim());
                if !extra_key.is_empty() {
                    info.insert(extra_key.to_string(), extra_value.to_string());
                }
                info.insert(key.to_string(), status.trim().to_string());
                continue;
            }
        }
        info.insert(key.to_string(), value.to_string());
    }
    info
}

/// Split on the first `:`; the value keeps any later colons.
fn split_pair(line: &str) -> (&str, &str) {
    match line.split_once(':') {
        Some((key, value)) => (key.trim(), value.trim()),
        None => (line.trim(), ""),
    }
}
