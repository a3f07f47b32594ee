//! Category link extraction
//!
//! Each category level of a site is parsed by its own extractor. The
//! `CategoryExtractor` trait is the capability interface; the selector
//! implementation covers the common case of "anchors matched by a CSS
//! selector, name is the anchor text".

use crate::config::LevelConfig;
use crate::{CanopyError, Result};
use scraper::{Html, Selector};
use url::Url;

/// One category link found on a listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryLink {
    /// Absolute URL of the category page
    pub url: String,

    /// Category name; becomes a path segment in the site structure
    pub name: String,
}

/// Extracts the category links of one level from a listing page body
///
/// Implementations return links in document order (which fixes discovery
/// order, and with it the traversal order), may return an empty sequence,
/// and must not fail on a well-formed body.
pub trait CategoryExtractor: Send + Sync {
    fn extract(&self, body: &str, page_url: &Url) -> Vec<CategoryLink>;
}

/// CSS-selector based category extractor
pub struct SelectorExtractor {
    link_selector: Selector,
}

impl SelectorExtractor {
    pub fn new(link_selector: &str) -> Result<Self> {
        let selector = Selector::parse(link_selector).map_err(|e| CanopyError::InvalidSelector {
            selector: link_selector.to_string(),
            message: format!("{:?}", e),
        })?;
        Ok(Self {
            link_selector: selector,
        })
    }

    /// Builds one extractor per configured category level
    pub fn from_levels(levels: &[LevelConfig]) -> Result<Vec<Box<dyn CategoryExtractor>>> {
        levels
            .iter()
            .map(|level| {
                let extractor = SelectorExtractor::new(&level.link_selector)?;
                Ok(Box::new(extractor) as Box<dyn CategoryExtractor>)
            })
            .collect()
    }
}

impl CategoryExtractor for SelectorExtractor {
    fn extract(&self, body: &str, page_url: &Url) -> Vec<CategoryLink> {
        let document = Html::parse_document(body);
        let mut links = Vec::new();

        for element in document.select(&self.link_selector) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };
            let Ok(url) = page_url.join(href) else {
                tracing::debug!("Skipping unjoinable href '{}' on {}", href, page_url);
                continue;
            };
            let name = normalize_name(&element.text().collect::<String>());
            if name.is_empty() {
                continue;
            }
            links.push(CategoryLink {
                url: url.to_string(),
                name,
            });
        }

        links
    }
}

/// Collapses whitespace in an anchor text into a single-line name
///
/// Slashes are replaced since they would corrupt slash-joined tree paths.
fn normalize_name(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace('/', "-")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_url() -> Url {
        Url::parse("https://example.com/catalogue/index.html").unwrap()
    }

    #[test]
    fn test_extracts_links_in_document_order() {
        let extractor = SelectorExtractor::new("ul.categories a").unwrap();
        let body = r#"
            <html><body><ul class="categories">
                <li><a href="fiction/index.html">Fiction</a></li>
                <li><a href="travel/index.html">Travel</a></li>
            </ul></body></html>"#;

        let links = extractor.extract(body, &base_url());
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].name, "Fiction");
        assert_eq!(
            links[0].url,
            "https://example.com/catalogue/fiction/index.html"
        );
        assert_eq!(links[1].name, "Travel");
    }

    #[test]
    fn test_no_matches_yields_empty_sequence() {
        let extractor = SelectorExtractor::new("ul.categories a").unwrap();
        let links = extractor.extract("<html><body><p>nothing here</p></body></html>", &base_url());
        assert!(links.is_empty());
    }

    #[test]
    fn test_name_whitespace_is_collapsed() {
        let extractor = SelectorExtractor::new("a").unwrap();
        let body = "<a href=\"x\">\n    Science\n    Fiction\n</a>";
        let links = extractor.extract(body, &base_url());
        assert_eq!(links[0].name, "Science Fiction");
    }

    #[test]
    fn test_slashes_in_names_are_replaced() {
        let extractor = SelectorExtractor::new("a").unwrap();
        let body = r#"<a href="x">Sci/Fi</a>"#;
        let links = extractor.extract(body, &base_url());
        assert_eq!(links[0].name, "Sci-Fi");
    }

    #[test]
    fn test_anchors_without_href_are_skipped() {
        let extractor = SelectorExtractor::new("a").unwrap();
        let body = r#"<a>No href</a><a href="y">Yes</a>"#;
        let links = extractor.extract(body, &base_url());
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].name, "Yes");
    }

    #[test]
    fn test_invalid_selector_is_rejected() {
        assert!(matches!(
            SelectorExtractor::new(":::nope"),
            Err(CanopyError::InvalidSelector { .. })
        ));
    }

    #[test]
    fn test_from_levels_builds_one_extractor_per_level() {
        let levels = vec![
            LevelConfig {
                link_selector: "ul.top a".to_string(),
            },
            LevelConfig {
                link_selector: "ul.sub a".to_string(),
            },
        ];
        let extractors = SelectorExtractor::from_levels(&levels).unwrap();
        assert_eq!(extractors.len(), 2);
    }
}
