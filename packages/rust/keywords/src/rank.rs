//! Frequency ranking over keyword sequences.

use std::collections::HashMap;

use lattes_shared::KeywordCount;

/// Count tokens and rank them by frequency.
///
/// Ties keep first-occurrence order from the input, so concatenating two
/// sequences before ranking only affects which of two equally frequent
/// tokens comes first. `top = None` returns every distinct token.
pub fn rank<I, S>(tokens: I, top: Option<usize>) -> Vec<KeywordCount>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut ranked: Vec<KeywordCount> = Vec::new();

    for token in tokens {
        let token = token.as_ref();
        match positions.get(token) {
            Some(&i) => ranked[i].count += 1,
            None => {
                positions.insert(token.to_string(), ranked.len());
                ranked.push(KeywordCount::new(token, 1));
            }
        }
    }

    // Stable: equal counts stay in first-occurrence order.
    ranked.sort_by(|a, b| b.count.cmp(&a.count));

    if let Some(top) = top {
        ranked.truncate(top);
    }
    ranked
}

/// Just the tokens of a ranking, in rank order.
pub fn tokens(ranking: &[KeywordCount]) -> Vec<&str> {
    ranking.iter().map(|k| k.token.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(s: &str) -> Vec<&str> {
        s.split_whitespace().collect()
    }

    #[test]
    fn rank_orders_by_count() {
        let ranking = rank(words("b a b c a b"), None);
        assert_eq!(
            ranking,
            vec![
                KeywordCount::new("b", 3),
                KeywordCount::new("a", 2),
                KeywordCount::new("c", 1),
            ]
        );
    }

    #[test]
    fn ties_break_by_first_occurrence_not_alphabet() {
        let ranking = rank(words("zeta alpha mu alpha zeta mu"), None);
        assert_eq!(tokens(&ranking), vec!["zeta", "alpha", "mu"]);
    }

    #[test]
    fn top_truncates() {
        let ranking = rank(words("a b c d a"), Some(2));
        assert_eq!(tokens(&ranking), vec!["a", "b"]);
        assert!(rank(words("a b"), Some(0)).is_empty());
        assert_eq!(rank(words("a b"), Some(10)).len(), 2);
    }

    #[test]
    fn top_k_is_prefix_of_full_ranking() {
        let input = words("redes neurais redes dados aprendizado dados redes grafos neurais");
        let full = rank(&input, None);
        for k in 0..=full.len() + 1 {
            let partial = rank(&input, Some(k));
            assert!(partial.len() <= k);
            assert_eq!(partial.as_slice(), &full[..partial.len()]);
            assert!(partial.windows(2).all(|w| w[0].count >= w[1].count));
        }
    }

    #[test]
    fn concatenation_order_only_changes_ties() {
        let articles = words("grafos redes");
        let projects = words("redes dados");

        let ap = rank(articles.iter().chain(projects.iter()), None);
        let pa = rank(projects.iter().chain(articles.iter()), None);

        assert_eq!(tokens(&ap), vec!["redes", "grafos", "dados"]);
        assert_eq!(tokens(&pa), vec!["redes", "dados", "grafos"]);
        assert_eq!(ap[0].count, pa[0].count);
    }

    #[test]
    fn empty_input() {
        let empty: Vec<String> = Vec::new();
        assert!(rank(empty, Some(5)).is_empty());
    }
}
