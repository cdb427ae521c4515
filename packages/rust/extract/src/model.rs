//! The researcher entity graph.
//!
//! Every entity is built once by its extractor and is read-only afterward.
//! A [`Researcher`] owns its address, projects, and articles.

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::Serialize;

use lattes_keywords::rank;
use lattes_shared::KeywordCount;

/// Base URL of public curriculum pages.
pub const LATTES_BASE_URL: &str = "http://lattes.cnpq.br/";

// ---------------------------------------------------------------------------
// Address
// ---------------------------------------------------------------------------

/// Professional address block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Address {
    /// Address kind label, e.g. `Endereço Profissional`.
    #[serde(rename = "type")]
    pub kind: String,
    /// First line of the address body.
    pub institution: String,
}

// ---------------------------------------------------------------------------
// Article
// ---------------------------------------------------------------------------

/// A complete article published in a journal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Article {
    pub doi: Option<String>,
    pub year: i32,
    pub jcr: Option<String>,
    pub publisher: String,
    pub title: String,
    /// Empty when the title could not be located.
    pub authors: Vec<String>,
    /// Normalized keywords of the title.
    pub keywords: Vec<String>,
}

// ---------------------------------------------------------------------------
// ResearchProject
// ---------------------------------------------------------------------------

/// A research project entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResearchProject {
    pub period: String,
    pub title: String,
    /// `Key: Value` lines in source order; a repeated key keeps its first
    /// position and takes the later value.
    pub other_information: IndexMap<String, String>,
    /// Normalized keywords of the title and description.
    pub keywords: Vec<String>,
}

impl ResearchProject {
    /// Key holding the free-text project description.
    pub const DESCRIPTION_KEY: &'static str = "Descrição";

    /// The description line, or `""` when absent.
    pub fn description(&self) -> &str {
        self.other_information
            .get(Self::DESCRIPTION_KEY)
            .map(String::as_str)
            .unwrap_or("")
    }
}

impl std::fmt::Display for ResearchProject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<ResearchProject: {}>", self.title)
    }
}

// ---------------------------------------------------------------------------
// Researcher
// ---------------------------------------------------------------------------

/// A researcher and everything extracted from their curriculum.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Researcher {
    pub name: String,
    pub lattes_id: String,
    pub last_update: String,
    pub bio: String,
    /// `None` when the address section exists but is empty.
    pub address: Option<Address>,
    pub areas_of_expertise: Vec<String>,
    /// Addresses found in the bio, then in the address block. Not deduplicated.
    pub emails: Vec<String>,
    pub research_projects: Vec<ResearchProject>,
    pub articles: Vec<Article>,
}

impl Researcher {
    /// Public URL of the curriculum.
    pub fn lattes_url(&self) -> String {
        format!("{LATTES_BASE_URL}{}", self.lattes_id)
    }

    /// `last_update` read as `dd/mm/yyyy`.
    pub fn last_update_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.last_update.trim(), "%d/%m/%Y").ok()
    }

    /// Keywords of every article, in article order.
    pub fn article_keywords(&self) -> Vec<&str> {
        self.articles
            .iter()
            .flat_map(|a| a.keywords.iter().map(String::as_str))
            .collect()
    }

    /// Keywords of every project, in project order.
    pub fn project_keywords(&self) -> Vec<&str> {
        self.research_projects
            .iter()
            .flat_map(|p| p.keywords.iter().map(String::as_str))
            .collect()
    }

    /// Article keywords followed by project keywords.
    pub fn all_keywords(&self) -> Vec<&str> {
        let mut all = self.article_keywords();
        all.extend(self.project_keywords());
        all
    }

    pub fn top_article_keywords(&self, top: Option<usize>) -> Vec<KeywordCount> {
        rank(self.article_keywords(), top)
    }

    pub fn top_project_keywords(&self, top: Option<usize>) -> Vec<KeywordCount> {
        rank(self.project_keywords(), top)
    }

    /// Ranking over articles and projects combined.
    pub fn top_keywords(&self, top: Option<usize>) -> Vec<KeywordCount> {
        rank(self.all_keywords(), top)
    }
}

impl std::fmt::Display for Researcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<Researcher: {}>", self.name)
    }
}
