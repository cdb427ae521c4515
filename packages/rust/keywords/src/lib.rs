//! Keyword extraction shared by every text-bearing entity.
//!
//! - [`TextNormalizer`]: folds, tokenizes, and filters free text
//! - [`rank`]: stable top-k frequency ranking
//! - [`StopwordSet`]: the read-only stopword collaborator

pub mod normalize;
pub mod rank;
pub mod stopwords;

pub use normalize::{TextNormalizer, fold_diacritics, tokenize};
pub use rank::rank;
pub use stopwords::{BUILTIN_LANGUAGES, StopwordSet};
