//! Entity extraction for Lattes curriculum pages.
//!
//! [`extract_researcher`] is the entry point; it composes the address,
//! project, and article extractors into one [`Researcher`].

pub mod address;
pub mod article;
pub mod model;
pub mod project;
pub mod researcher;

pub use address::{ADDRESS_ANCHOR, extract_address, locate_address_block};
pub use article::{ARTICLE_CLASS, extract_article, locate_articles};
pub use model::{Address, Article, LATTES_BASE_URL, ResearchProject, Researcher};
pub use project::{PROJECTS_ANCHOR, extract_project, locate_project_markers, parse_information};
pub use researcher::{AREAS_ANCHOR, extract_researcher};
