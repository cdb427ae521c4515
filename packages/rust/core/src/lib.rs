//! Batch parsing and tabular reports over many curriculum documents.
//!
//! This crate ties the extractors to the filesystem: collect documents,
//! parse them concurrently, and flatten the results into report rows.

pub mod batch;
pub mod report;

pub use batch::{
    BatchResult, ProgressReporter, SilentProgress, SourceDocument, collect_documents,
    parse_directory, parse_documents,
};
pub use report::{
    ArticleRow, ResearcherRow, TableRow, articles_report, render_rows, researchers_report,
    write_report,
};
