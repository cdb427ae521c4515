//! Shared error model, configuration, and result types for the Lattes parser.
//!
//! This crate is the foundation depended on by all other workspace crates.
//! It provides:
//! - [`LattesError`]: the unified error type
//! - [`KeywordCount`]: one entry of a keyword ranking
//! - Configuration ([`AppConfig`] and its sections, config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, BatchConfig, KeywordsConfig, ReportFormat, ReportsConfig, config_dir,
    config_file_path, init_config, load_config, load_config_from,
};
pub use error::{ErrorKind, LattesError, Result};
pub use types::KeywordCount;
