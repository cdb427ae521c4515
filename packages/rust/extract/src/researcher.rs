//! Researcher aggregation.
//!
//! Header fields, areas of expertise, and emails are read here; the
//! address, projects, and articles come from their own extractors.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, instrument};
use url::Url;

use lattes_document::{AttrMatch, Document, Node};
use lattes_keywords::TextNormalizer;
use lattes_shared::{LattesError, Result};

use crate::address::{extract_address, locate_address_block};
use crate::article::{extract_article, locate_articles};
use crate::model::Researcher;
use crate::project::{extract_project, locate_project_markers};

/// `name` of the anchor that opens the areas-of-expertise section.
pub const AREAS_ANCHOR: &str = "AreasAtuacao";

const AREA_MARKER: &str = "Grande área";

/// Field labels of an area line, each replaced by a breadcrumb separator.
const AREA_LABELS: [&str; 4] = ["Grande área:", "/ Área:", "/ Subárea:", "/Especialidade:"];

const CV_MARKER: &str = "CV:";
const UPDATE_MARKER: &str = "em ";

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("email regex")
});

impl Researcher {
    /// Parse raw markup and extract the researcher it describes.
    pub fn from_html(raw: &str, normalizer: &TextNormalizer) -> Result<Self> {
        extract_researcher(&Document::parse(raw), normalizer)
    }
}

/// Build a [`Researcher`] and everything it owns from one document.
#[instrument(skip_all)]
pub fn extract_researcher(doc: &Document, normalizer: &TextNormalizer) -> Result<Researcher> {
    let name = doc
        .find_by_tag("h2", Some("nome"))
        .map(|n| n.text())
        .ok_or_else(|| LattesError::missing("h2.nome"))?;

    let info = doc
        .find_by_tag("ul", Some("informacoes-autor"))
        .ok_or_else(|| LattesError::missing("ul.informacoes-autor"))?;
    let lattes_id = lattes_id(info)?;
    let last_update = last_update(info)?;

    let bio = doc
        .find_by_tag("p", Some("resumo"))
        .map(|n| n.text())
        .ok_or_else(|| LattesError::missing("p.resumo"))?;

    let areas_of_expertise = areas_of_expertise(doc);

    let address_block = locate_address_block(doc)?;
    let address = extract_address(address_block)?;
    let emails = find_emails(&format!("{bio} {}", address_block.joined_text(" ")));

    let research_projects = locate_project_markers(doc)?
        .into_iter()
        .enumerate()
        .map(|(i, marker)| {
            extract_project(marker, normalizer).map_err(|e| e.within(&format!("research_projects[{i}]")))
        })
        .collect::<Result<Vec<_>>>()?;

    let articles = locate_articles(doc)
        .into_iter()
        .enumerate()
        .map(|(i, block)| {
            extract_article(block, normalizer).map_err(|e| e.within(&format!("articles[{i}]")))
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(
        %lattes_id,
        areas = areas_of_expertise.len(),
        emails = emails.len(),
        projects = research_projects.len(),
        articles = articles.len(),
        "researcher extracted"
    );

    Ok(Researcher {
        name,
        lattes_id,
        last_update,
        bio,
        address,
        areas_of_expertise,
        emails,
        research_projects,
        articles,
    })
}

// ---------------------------------------------------------------------------
// Header
// ---------------------------------------------------------------------------

/// Last path segment of the `CV: <url>` line.
fn lattes_id(info: Node<'_>) -> Result<String> {
    let line = info
        .find_all_by_tag("li", None)
        .into_iter()
        .map(|li| li.text())
        .find(|t| t.contains(CV_MARKER))
        .ok_or_else(|| LattesError::missing("li with CV link"))?;

    let raw_url = line
        .split_once(CV_MARKER)
        .map(|(_, url)| url.trim())
        .unwrap_or_default();

    let id = match Url::parse(raw_url) {
        Ok(url) => url
            .path_segments()
            .and_then(|mut segments| segments.rfind(|s| !s.is_empty()))
            .unwrap_or_default()
            .to_string(),
        Err(_) => raw_url.trim_end_matches('/').rsplit('/').next().unwrap_or_default().to_string(),
    };

    if id.is_empty() {
        return Err(LattesError::malformed("lattes_id", format!("no id in '{line}'")));
    }
    Ok(id)
}

/// Text after the last `em ` of the final info line, or the whole line
/// when it has no marker.
fn last_update(info: Node<'_>) -> Result<String> {
    let line = info
        .last_child_tagged("li")
        .map(|li| li.text())
        .ok_or_else(|| LattesError::missing("ul.informacoes-autor li"))?;

    Ok(line
        .rsplit_once(UPDATE_MARKER)
        .map_or_else(|| line.trim().to_string(), |(_, date)| date.trim().to_string()))
}

// ---------------------------------------------------------------------------
// Areas of expertise
// ---------------------------------------------------------------------------

/// Breadcrumbs for every `Grande área` line; empty without the section.
fn areas_of_expertise(doc: &Document) -> Vec<String> {
    let Some(block) = doc
        .find_by_attribute("a", "name", AttrMatch::Exact(AREAS_ANCHOR))
        .and_then(|anchor| anchor.parent())
        .and_then(|section| section.find_by_tag("div", Some("data-cell")))
    else {
        debug!("no areas of expertise section");
        return Vec::new();
    };

    block
        .children()
        .map(|n| n.text())
        .filter(|t| t.contains(AREA_MARKER))
        .map(|t| area_breadcrumb(&t))
        .collect()
}

/// `Grande área: A / Área: B / Subárea: C` becomes `A > B > C`.
pub fn area_breadcrumb(line: &str) -> String {
    let marked = AREA_LABELS
        .iter()
        .fold(line.to_string(), |acc, label| acc.replace(label, ">"));

    marked
        .split('>')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" > ")
}

// ---------------------------------------------------------------------------
// Emails
// ---------------------------------------------------------------------------

/// Every email-shaped substring, in order of appearance, duplicates kept.
pub fn find_emails(text: &str) -> Vec<String> {
    EMAIL_RE
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}
