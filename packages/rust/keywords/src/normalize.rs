//! Text normalization: fold, tokenize, filter.
//!
//! Each filter is a predicate `&str -> bool` applied in sequence to the
//! tokens of the folded, lowercased text. Surviving tokens keep their order.

use std::sync::Arc;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;
use unicode_segmentation::UnicodeSegmentation;

use crate::stopwords::StopwordSet;

/// Strip diacritics: decompose, drop combining marks, expand a few letters
/// that have no decomposition.
pub fn fold_diacritics(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.nfd() {
        if is_combining_mark(c) {
            continue;
        }
        match c {
            'ß' => out.push_str("ss"),
            'æ' => out.push_str("ae"),
            'Æ' => out.push_str("AE"),
            'œ' => out.push_str("oe"),
            'Œ' => out.push_str("OE"),
            'ø' => out.push('o'),
            'Ø' => out.push('O'),
            'đ' => out.push('d'),
            'Đ' => out.push('D'),
            'ł' => out.push('l'),
            'Ł' => out.push('L'),
            'ı' => out.push('i'),
            other => out.push(other),
        }
    }
    out
}

/// Split text on Unicode word boundaries, dropping whitespace-only segments.
///
/// Punctuation comes out as its own segments; intra-word apostrophes and
/// decimal points stay attached (`don't`, `3.5`).
pub fn tokenize(text: &str) -> Vec<&str> {
    text.split_word_bounds()
        .filter(|segment| !segment.trim().is_empty())
        .collect()
}

fn not_only_punctuation(token: &str) -> bool {
    !token.chars().all(|c| !c.is_alphanumeric())
}

fn not_only_numbers(token: &str) -> bool {
    !token.chars().all(|c| c.is_ascii_digit())
}

fn longer_than_one(token: &str) -> bool {
    token.chars().count() > 1
}

const TOKEN_FILTERS: &[fn(&str) -> bool] = &[not_only_punctuation, not_only_numbers, longer_than_one];

/// Turns free text into keyword candidates.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    stopwords: Arc<StopwordSet>,
}

impl TextNormalizer {
    pub fn new(stopwords: Arc<StopwordSet>) -> Self {
        Self { stopwords }
    }

    pub fn stopwords(&self) -> &StopwordSet {
        &self.stopwords
    }

    /// Fold, lowercase, tokenize, then drop punctuation-only, numeric-only,
    /// single-character, and stopword tokens.
    pub fn extract(&self, text: &str) -> Vec<String> {
        let folded = fold_diacritics(&text.to_lowercase());
        tokenize(&folded)
            .into_iter()
            .filter(|token| TOKEN_FILTERS.iter().all(|keep| keep(token)))
            .filter(|token| !self.stopwords.contains(token))
            .map(str::to_string)
            .collect()
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new(Arc::new(StopwordSet::default()))
    }
}
