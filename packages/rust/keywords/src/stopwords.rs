//! Stopword sets consumed by the normalizer.
//!
//! The English and Portuguese lists are the NLTK corpora, embedded at build
//! time. Words are stored folded and lowercased so they compare equal to
//! normalized tokens.

use std::collections::HashSet;
use std::path::Path;

use tracing::debug;

use lattes_shared::{KeywordsConfig, LattesError, Result};

use crate::normalize::fold_diacritics;

const ENGLISH: &str = include_str!("../data/english.txt");
const PORTUGUESE: &str = include_str!("../data/portuguese.txt");

/// Names accepted by [`StopwordSet::builtin`].
pub const BUILTIN_LANGUAGES: &[&str] = &["english", "portuguese"];

/// An immutable set of stopwords.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopwordSet {
    words: HashSet<String>,
}

impl StopwordSet {
    /// Build a set from raw words; each is folded and lowercased, blanks dropped.
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| fold_diacritics(&w.as_ref().trim().to_lowercase()))
            .filter(|w| !w.is_empty())
            .collect();
        Self { words }
    }

    /// An empty set (every token survives the stopword filter).
    pub fn empty() -> Self {
        Self {
            words: HashSet::new(),
        }
    }

    /// One of the embedded language lists.
    pub fn builtin(language: &str) -> Result<Self> {
        let source = match language.to_lowercase().as_str() {
            "english" | "en" => ENGLISH,
            "portuguese" | "pt" => PORTUGUESE,
            other => {
                return Err(LattesError::config(format!(
                    "unknown stopword language '{other}': expected one of {}",
                    BUILTIN_LANGUAGES.join(", ")
                )));
            }
        };
        Ok(Self::new(source.lines()))
    }

    /// Read a newline-separated stopword file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| LattesError::io(path, e))?;
        Ok(Self::new(content.lines()))
    }

    /// Union of the configured built-in lists and extra files.
    pub fn from_config(config: &KeywordsConfig) -> Result<Self> {
        let mut set = Self::empty();
        for language in &config.languages {
            set = set.union(&Self::builtin(language)?);
        }
        for path in &config.stopword_files {
            set = set.union(&Self::from_file(path)?);
        }
        debug!(
            languages = ?config.languages,
            files = config.stopword_files.len(),
            words = set.len(),
            "stopword set loaded"
        );
        Ok(set)
    }

    /// Both sets combined.
    pub fn union(&self, other: &StopwordSet) -> Self {
        Self {
            words: self.words.union(&other.words).cloned().collect(),
        }
    }

    /// Whether a normalized token is a stopword.
    pub fn contains(&self, token: &str) -> bool {
        self.words.contains(token)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for StopwordSet {
    /// English and Portuguese combined.
    fn default() -> Self {
        Self::new(ENGLISH.lines().chain(PORTUGUESE.lines()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_lists_are_folded() {
        let pt = StopwordSet::builtin("portuguese").unwrap();
        assert!(pt.contains("nao"));
        assert!(pt.contains("voce"));
        assert!(!pt.contains("não"));

        let en = StopwordSet::builtin("EN").unwrap();
        assert!(en.contains("the"));
        assert!(en.contains("don't"));
    }

    #[test]
    fn unknown_language_is_config_error() {
        let err = StopwordSet::builtin("klingon").unwrap_err();
        assert_eq!(err.kind(), lattes_shared::ErrorKind::Config);
        assert!(err.to_string().contains("klingon"));
    }

    #[test]
    fn default_is_union_of_builtins() {
        let all = StopwordSet::default();
        let en = StopwordSet::builtin("english").unwrap();
        let pt = StopwordSet::builtin("portuguese").unwrap();
        assert_eq!(all, en.union(&pt));
        assert!(all.contains("and"));
        assert!(all.contains("para"));
    }

    #[test]
    fn from_config_reads_extra_files() {
        let path = std::env::temp_dir().join(format!("lattes-stopwords-{}.txt", uuid::Uuid::now_v7()));
        std::fs::write(&path, "Pesquisa\n\n  Análise  \n").unwrap();

        let config = KeywordsConfig {
            top: 10,
            languages: vec!["english".into()],
            stopword_files: vec![path.clone()],
        };
        let set = StopwordSet::from_config(&config).unwrap();
        assert!(set.contains("pesquisa"));
        assert!(set.contains("analise"));
        assert!(set.contains("the"));
        assert!(!set.contains("para"));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn from_config_missing_file_fails() {
        let config = KeywordsConfig {
            top: 10,
            languages: vec![],
            stopword_files: vec!["/nonexistent/lattes/stopwords.txt".into()],
        };
        let err = StopwordSet::from_config(&config).unwrap_err();
        assert_eq!(err.kind(), lattes_shared::ErrorKind::Io);
    }
}
