//! Journal article blocks (`div.artigo-completo`).
//!
//! Title and publisher come from the `cvuri` attribute of the citation
//! container, an `&`-joined `key=value` string such as
//! `...&titulo=Some Title&sequencial=1&nomePeriodico=Some Journal`.
//! Authors are whatever precedes the title in the free text after the year.

use lattes_document::{AttrMatch, Document, Node};
use lattes_keywords::TextNormalizer;
use lattes_shared::{LattesError, Result};

use crate::model::Article;

/// Class marking one article block.
pub const ARTICLE_CLASS: &str = "artigo-completo";

const TITLE_KEY: &str = "titulo=";
const TITLE_END: &str = "&sequencial";

/// Every article block in document order.
pub fn locate_articles(doc: &Document) -> Vec<Node<'_>> {
    doc.find_all_by_tag("div", Some(ARTICLE_CLASS))
}

/// Build an [`Article`] from one `artigo-completo` block.
pub fn extract_article(block: Node<'_>, normalizer: &TextNormalizer) -> Result<Article> {
    let year_span = sort_span(block, "ano")
        .ok_or_else(|| LattesError::malformed("year", "no span[data-tipo-ordenacao=ano]"))?;
    let year = parse_year(&year_span.text())?;

    let jcr = sort_span(block, "jcr")
        .map(|n| n.text())
        .filter(|t| !t.is_empty());

    let doi = block.find_by_tag("a", Some("icone-doi")).and_then(|a| {
        a.attribute("href")
            .map(|href| href.trim().to_string())
            .or_else(|| Some(a.text()))
            .filter(|d| !d.is_empty())
    });

    let cvuri = citation_uri(block)?;
    let title = decode_title(cvuri);
    let publisher = decode_publisher(cvuri).to_string();

    let authors = if title.is_empty() {
        Vec::new()
    } else {
        let blob = year_span
            .siblings_after()
            .map(|n| n.text())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        split_authors(&blob, &title)
    };

    let keywords = normalizer.extract(&title);

    Ok(Article {
        doi,
        year,
        jcr,
        publisher,
        title,
        authors,
        keywords,
    })
}

fn sort_span<'a>(block: Node<'a>, key: &str) -> Option<Node<'a>> {
    block.find_by_attribute("span", "data-tipo-ordenacao", AttrMatch::Exact(key))
}

fn parse_year(raw: &str) -> Result<i32> {
    raw.trim()
        .parse()
        .map_err(|_| LattesError::malformed("year", format!("not an integer: '{raw}'")))
}

/// `cvuri` of the `citado` container, or of `citacoes` when there is none.
fn citation_uri<'a>(block: Node<'a>) -> Result<&'a str> {
    let container = block
        .find_by_tag("div", Some("citado"))
        .or_else(|| block.find_by_tag("div", Some("citacoes")))
        .ok_or_else(|| LattesError::missing("div.citado or div.citacoes"))?;

    container
        .attribute("cvuri")
        .ok_or_else(|| LattesError::malformed("cvuri", "citation container without cvuri"))
}

/// Text after `titulo=` up to `&sequencial`, untrimmed; empty if there is
/// no `titulo=`.
pub fn decode_title(cvuri: &str) -> String {
    match cvuri.find(TITLE_KEY) {
        Some(i) => {
            let rest = &cvuri[i + TITLE_KEY.len()..];
            let end = rest.find(TITLE_END).unwrap_or(rest.len());
            rest[..end].to_string()
        }
        None => String::new(),
    }
}

/// Value after the last `=`, taken verbatim.
pub fn decode_publisher(cvuri: &str) -> &str {
    cvuri.rsplit_once('=').map_or(cvuri, |(_, value)| value)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Author names: the part of `blob` before the first occurrence of `title`,
/// split on `;`.
///
/// Whitespace runs in both are collapsed before the search, so line breaks
/// in the markup cannot hide the title. A blank title keeps the whole blob.
pub fn split_authors(blob: &str, title: &str) -> Vec<String> {
    let blob = collapse_whitespace(blob);
    let title = collapse_whitespace(title);
    let head = if title.is_empty() {
        blob.as_str()
    } else {
        blob.split(title.as_str()).next().unwrap_or("")
    };
    head.split(';')
        .map(trim_author)
        .filter(|a| !a.is_empty())
        .map(str::to_string)
        .collect()
}

/// Trim whitespace and the ` .` separator, keeping an initial's own period.
fn trim_author(raw: &str) -> &str {
    let mut name = raw.trim();
    while let Some(rest) = name.strip_suffix('.') {
        if rest.is_empty() || rest.ends_with(char::is_whitespace) || rest.ends_with('.') {
            name = rest.trim_end();
        } else {
            break;
        }
    }
    name.trim_start_matches(|c: char| c == '.' || c.is_whitespace())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article_html(container: &str, spans: &str, tail: &str) -> String {
        format!(
            "<html><body><div class=\"artigo-completo\"><div class=\"layout-cell-11\"><div class=\"layout-cell-pad-5\">\
             {container}{spans}{tail}</div></div></div></body></html>"
        )
    }

    const CVURI: &str = "/buscatextual/servletcitacoes?issn=1&amp;titulo=Machine Learning in Practice&amp;sequencial=1&amp;nomePeriodico=Journal X";

    #[test]
    fn decode_title_stops_at_sequencial() {
        let cvuri = "a=1&titulo=Machine Learning in Practice&sequencial=1&nomePeriodico=J";
        assert_eq!(decode_title(cvuri), "Machine Learning in Practice");
        assert_eq!(decode_title("a=1&sequencial=2"), "");
        assert_eq!(decode_title("titulo=No Tail"), "No Tail");
        assert_eq!(decode_title("titulo= Padded Title &sequencial=1"), " Padded Title ");
    }

    #[test]
    fn decode_publisher_takes_last_value() {
        assert_eq!(decode_publisher("a=1&titulo=T&nomePeriodico=Journal X"), "Journal X");
        assert_eq!(decode_publisher("no pairs"), "no pairs");
    }

    #[test]
    fn split_authors_trims_separator_periods() {
        let blob = "Silva, J.; Souza, M. . Machine Learning in Practice . 2020";
        assert_eq!(
            split_authors(blob, "Machine Learning in Practice"),
            vec!["Silva, J.", "Souza, M."]
        );
    }

    #[test]
    fn split_authors_collapses_title_whitespace() {
        let blob = "SILVA, J.;\n  SOUZA, M. . Deep\n Learning . 2021";
        assert_eq!(split_authors(blob, "Deep  Learning"), vec!["SILVA, J.", "SOUZA, M."]);
        assert_eq!(split_authors(blob, " Deep Learning "), vec!["SILVA, J.", "SOUZA, M."]);
    }

    #[test]
    fn split_authors_with_blank_title_uses_whole_blob() {
        assert_eq!(split_authors("A, B.; C, D", "   "), vec!["A, B.", "C, D"]);
    }

    #[test]
    fn split_authors_without_title_match_uses_whole_blob() {
        assert_eq!(split_authors("A, B.; C, D", "Missing"), vec!["A, B.", "C, D"]);
    }

    #[test]
    fn extracts_full_article() {
        let html = article_html(
            &format!("<div class=\"citado\" cvuri=\"{CVURI}\"></div>"),
            "<span data-tipo-ordenacao=\"jcr\">1.25</span><span data-tipo-ordenacao=\"ano\">2020</span>",
            "<a class=\"icone-producao icone-doi\" href=\"http://dx.doi.org/10.1/x\"></a>\n\
             SILVA, J.; SOUZA, M. . Machine Learning in Practice. Journal X, v. 1, 2020.",
        );
        let doc = Document::parse(&html);
        let block = locate_articles(&doc)[0];
        let article = extract_article(block, &TextNormalizer::default()).unwrap();

        assert_eq!(article.title, "Machine Learning in Practice");
        assert_eq!(article.publisher, "Journal X");
        assert_eq!(article.year, 2020);
        assert_eq!(article.jcr.as_deref(), Some("1.25"));
        assert_eq!(article.doi.as_deref(), Some("http://dx.doi.org/10.1/x"));
        assert_eq!(article.authors, vec!["SILVA, J.", "SOUZA, M."]);
        assert_eq!(article.keywords, vec!["machine", "learning", "practice"]);
    }

    #[test]
    fn title_with_double_space_still_bounds_authors() {
        let cvuri = CVURI.replace("Machine Learning", "Machine  Learning");
        let html = article_html(
            &format!("<div class=\"citado\" cvuri=\"{cvuri}\"></div>"),
            "<span data-tipo-ordenacao=\"ano\">2020</span>",
            "SILVA, J.; SOUZA, M. . Machine Learning in Practice. Journal X, v. 1, 2020.",
        );
        let doc = Document::parse(&html);
        let article = extract_article(locate_articles(&doc)[0], &TextNormalizer::default()).unwrap();

        assert_eq!(article.title, "Machine  Learning in Practice");
        assert_eq!(article.authors, vec!["SILVA, J.", "SOUZA, M."]);
    }

    #[test]
    fn falls_back_to_citacoes_container() {
        let html = article_html(
            &format!("<div class=\"citacoes\" cvuri=\"{CVURI}\"></div>"),
            "<span data-tipo-ordenacao=\"ano\">1999</span>",
            "A, B. . Machine Learning in Practice. Journal X.",
        );
        let doc = Document::parse(&html);
        let article = extract_article(locate_articles(&doc)[0], &TextNormalizer::default()).unwrap();

        assert_eq!(article.year, 1999);
        assert!(article.doi.is_none());
        assert!(article.jcr.is_none());
        assert_eq!(article.authors, vec!["A, B."]);
    }

    #[test]
    fn empty_title_means_no_authors() {
        let html = article_html(
            "<div class=\"citado\" cvuri=\"issn=1&amp;nomePeriodico=J\"></div>",
            "<span data-tipo-ordenacao=\"ano\">2001</span>",
            "A, B.; C, D. . Something. J.",
        );
        let doc = Document::parse(&html);
        let article = extract_article(locate_articles(&doc)[0], &TextNormalizer::default()).unwrap();

        assert_eq!(article.title, "");
        assert_eq!(article.publisher, "J");
        assert!(article.authors.is_empty());
        assert!(article.keywords.is_empty());
    }

    #[test]
    fn missing_year_is_malformed() {
        let html = article_html(&format!("<div class=\"citado\" cvuri=\"{CVURI}\"></div>"), "", "");
        let doc = Document::parse(&html);
        let err = extract_article(locate_articles(&doc)[0], &TextNormalizer::default()).unwrap_err();
        assert_eq!(err.kind(), lattes_shared::ErrorKind::MalformedField);
    }

    #[test]
    fn non_numeric_year_is_malformed() {
        let html = article_html(
            &format!("<div class=\"citado\" cvuri=\"{CVURI}\"></div>"),
            "<span data-tipo-ordenacao=\"ano\">s.d.</span>",
            "",
        );
        let doc = Document::parse(&html);
        let err = extract_article(locate_articles(&doc)[0], &TextNormalizer::default()).unwrap_err();
        assert!(err.to_string().contains("s.d."));
    }

    #[test]
    fn missing_citation_container_is_missing_section() {
        let html = article_html("", "<span data-tipo-ordenacao=\"ano\">2001</span>", "");
        let doc = Document::parse(&html);
        let err = extract_article(locate_articles(&doc)[0], &TextNormalizer::default()).unwrap_err();
        assert_eq!(err.kind(), lattes_shared::ErrorKind::MissingSection);
    }
}
