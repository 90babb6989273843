use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use url::Url;

static ANCHOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("anchor selector is valid"));

/// An anchor found on the listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateLink {
    /// `href` exactly as written in the page.
    pub href: String,
    /// Concatenated text of the anchor.
    pub text: String,
}

impl CandidateLink {
    /// A link qualifies when its href ends with `extension` and its text
    /// contains at least one of `markers`.
    pub fn qualifies(&self, markers: &[String], extension: &str) -> bool {
        self.href.ends_with(extension) && markers.iter().any(|m| self.text.contains(m.as_str()))
    }
}

/// All anchors with an `href`, in document order.
pub fn extract_anchors(html: &str) -> Vec<CandidateLink> {
    let document = Html::parse_document(html);
    document
        .select(&ANCHOR)
        .filter_map(|el| {
            let href = el.value().attr("href")?;
            Some(CandidateLink {
                href: href.to_string(),
                text: el.text().collect(),
            })
        })
        .collect()
}

/// Qualifying links in document order. Duplicates are kept.
pub fn find_candidate_links(html: &str, markers: &[String], extension: &str) -> Vec<CandidateLink> {
    extract_anchors(html)
        .into_iter()
        .filter(|link| link.qualifies(markers, extension))
        .collect()
}

/// Absolute hrefs are used as-is; anything else is joined onto `origin`.
pub fn resolve_link(origin: &Url, href: &str) -> Result<Url, url::ParseError> {
    if href.starts_with("http") {
        Url::parse(href)
    } else {
        origin.join(href)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn markers() -> Vec<String> {
        vec!["Anexo I".into(), "Anexo II".into()]
    }

    #[test]
    fn test_only_marked_pdf_links_qualify() {
        let html = r#"
<html><body>
  <a href="/x/a.pdf">Anexo I - tabela</a>
  <a href="https://other/b.pdf">irrelevant</a>
  <a href="/x/c.xlsx">Anexo II - planilha</a>
  <a href="/x/d.pdf"><span>Anexo</span> <b>II</b> - diretrizes</a>
  <a name="no-href">Anexo I</a>
</body></html>
"#;
        let links = find_candidate_links(html, &markers(), ".pdf");
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].href, "/x/a.pdf");
        assert_eq!(links[0].text, "Anexo I - tabela");
        assert_eq!(links[1].href, "/x/d.pdf");
    }

    #[test]
    fn test_duplicates_are_kept_in_order() {
        let html = r#"<a href="/b.pdf">Anexo II</a><a href="/a.pdf">Anexo I</a><a href="/b.pdf">Anexo II</a>"#;
        let hrefs: Vec<_> = find_candidate_links(html, &markers(), ".pdf")
            .into_iter()
            .map(|l| l.href)
            .collect();
        assert_eq!(hrefs, vec!["/b.pdf", "/a.pdf", "/b.pdf"]);
    }

    #[test]
    fn test_marker_match_is_case_sensitive() {
        let link = CandidateLink {
            href: "/a.pdf".into(),
            text: "ANEXO I".into(),
        };
        assert!(!link.qualifies(&markers(), ".pdf"));
    }

    #[test]
    fn test_extension_must_be_suffix() {
        let link = CandidateLink {
            href: "/a.pdf?download=1".into(),
            text: "Anexo I".into(),
        };
        assert!(!link.qualifies(&markers(), ".pdf"));
    }

    #[test]
    fn test_resolve_link() {
        let origin = Url::parse("https://www.gov.br").unwrap();
        assert_eq!(
            resolve_link(&origin, "/ans/anexo.pdf").unwrap().as_str(),
            "https://www.gov.br/ans/anexo.pdf"
        );
        assert_eq!(
            resolve_link(&origin, "https://cdn.example.org/a.pdf")
                .unwrap()
                .as_str(),
            "https://cdn.example.org/a.pdf"
        );
        assert!(resolve_link(&origin, "http://[broken").is_err());
    }
}
