//! Tabular reports over parsed researchers.
//!
//! Rows are plain structs; [`render_rows`] turns them into pretty JSON or
//! a Markdown table, and [`write_report`] puts the result on disk.

use std::path::Path;

use serde::Serialize;
use tracing::{debug, info, instrument};

use lattes_extract::Researcher;
use lattes_keywords::rank::tokens;
use lattes_shared::{LattesError, ReportFormat, Result};

/// A row that can be laid out as a table.
pub trait TableRow: Serialize {
    /// Column headers, in cell order.
    fn headers() -> &'static [&'static str];
    /// Cell values, in header order.
    fn cells(&self) -> Vec<String>;
}

// ---------------------------------------------------------------------------
// Rows
// ---------------------------------------------------------------------------

/// One article of one researcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleRow {
    pub researcher_lattes_id: String,
    pub article_title: String,
}

impl TableRow for ArticleRow {
    fn headers() -> &'static [&'static str] {
        &["researcher_lattes_id", "article_title"]
    }

    fn cells(&self) -> Vec<String> {
        vec![self.researcher_lattes_id.clone(), self.article_title.clone()]
    }
}

/// Summary of one researcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResearcherRow {
    pub name: String,
    pub address_institution: Option<String>,
    pub lattes_url: String,
    /// Joined with `", "`.
    pub emails: String,
    pub last_update: String,
    /// Joined with `" | "`.
    pub areas_of_expertise: String,
    /// Top-ranked keyword tokens joined with `", "`.
    pub keywords: String,
}

impl TableRow for ResearcherRow {
    fn headers() -> &'static [&'static str] {
        &[
            "name",
            "address_institution",
            "lattes_url",
            "emails",
            "last_update",
            "areas_of_expertise",
            "keywords",
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.address_institution.clone().unwrap_or_default(),
            self.lattes_url.clone(),
            self.emails.clone(),
            self.last_update.clone(),
            self.areas_of_expertise.clone(),
            self.keywords.clone(),
        ]
    }
}

/// One row per article, researchers in order.
pub fn articles_report(researchers: &[Researcher]) -> Vec<ArticleRow> {
    researchers
        .iter()
        .flat_map(|r| {
            r.articles.iter().map(|a| ArticleRow {
                researcher_lattes_id: r.lattes_id.clone(),
                article_title: a.title.clone(),
            })
        })
        .collect()
}

/// One row per researcher with its `top` combined keywords.
pub fn researchers_report(researchers: &[Researcher], top: usize) -> Vec<ResearcherRow> {
    researchers
        .iter()
        .map(|r| ResearcherRow {
            name: r.name.clone(),
            address_institution: r.address.as_ref().map(|a| a.institution.clone()),
            lattes_url: r.lattes_url(),
            emails: r.emails.join(", "),
            last_update: r.last_update.clone(),
            areas_of_expertise: r.areas_of_expertise.join(" | "),
            keywords: tokens(&r.top_keywords(Some(top))).join(", "),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Render rows as pretty JSON or a Markdown table.
pub fn render_rows<R: TableRow>(rows: &[R], format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Json => serde_json::to_string_pretty(rows)
            .map_err(|e| LattesError::Serialization(format!("report rows: {e}"))),
        ReportFormat::Markdown => Ok(markdown_table(rows)),
    }
}

fn markdown_table<R: TableRow>(rows: &[R]) -> String {
    let headers = R::headers();
    let mut out = String::new();

    out.push_str(&table_line(headers.iter().map(|h| h.to_string())));
    out.push_str(&table_line(headers.iter().map(|_| "---".to_string())));
    for row in rows {
        out.push_str(&table_line(row.cells().iter().map(|c| escape_cell(c))));
    }
    out
}

fn table_line(cells: impl Iterator<Item = String>) -> String {
    format!("| {} |\n", cells.collect::<Vec<_>>().join(" | "))
}

fn escape_cell(cell: &str) -> String {
    cell.replace('|', "\\|").replace(['\r', '\n'], " ")
}

/// Render and write rows to `path`, creating parent directories.
#[instrument(skip_all, fields(path = %path.display(), rows = rows.len(), ?format))]
pub fn write_report<R: TableRow>(path: &Path, rows: &[R], format: ReportFormat) -> Result<()> {
    let content = render_rows(rows, format)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| LattesError::io(parent, e))?;
        debug!(dir = %parent.display(), "report directory ready");
    }

    std::fs::write(path, content).map_err(|e| LattesError::io(path, e))?;
    info!("report written");
    Ok(())
}
