//! Result types shared across crates.

use serde::{Deserialize, Serialize};

/// One entry of a keyword ranking: a normalized token and how often it occurred.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeywordCount {
    /// The normalized keyword.
    pub token: String,
    /// Number of occurrences in the ranked sequence.
    pub count: usize,
}

impl KeywordCount {
    pub fn new(token: impl Into<String>, count: usize) -> Self {
        Self {
            token: token.into(),
            count,
        }
    }
}

impl std::fmt::Display for KeywordCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.token, self.count)
    }
}
