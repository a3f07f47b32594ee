//! Single-leaf pagination
//!
//! A leaf category's content is spread over a chain of pages linked by a
//! "next page" anchor. `SitePager` handles exactly one page at a time:
//! fetch it, extract its item links, and report where (or whether) the
//! chain continues. The traversal coordinator owns what happens between
//! pages, so crawl state can be persisted on every advance.

use crate::config::PageConfig;
use crate::crawler::Fetch;
use crate::{CanopyError, Result};
use scraper::{Html, Selector};
use std::sync::Arc;
use url::Url;

/// One item link found on a content page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageItem {
    /// Absolute URL of the item
    pub url: String,

    /// Item title, from the anchor's title attribute or its text
    pub title: String,
}

/// Result of fetching one content page
#[derive(Debug, Clone)]
pub struct PageOutcome {
    /// Items found on the page, in document order
    pub items: Vec<PageItem>,

    /// Absolute URL of the next page; `None` means the leaf is exhausted
    pub next_page_url: Option<String>,
}

/// Fetches and parses one content page of a leaf category
pub struct SitePager {
    fetcher: Arc<dyn Fetch>,
    item_selector: Selector,
    next_page_selector: Selector,
}

impl SitePager {
    pub fn new(fetcher: Arc<dyn Fetch>, config: &PageConfig) -> Result<Self> {
        Ok(Self {
            fetcher,
            item_selector: parse_selector(&config.item_selector)?,
            next_page_selector: parse_selector(&config.next_page_selector)?,
        })
    }

    /// Fetches a content page and extracts its items and next-page link
    pub async fn fetch_page(&self, url: &str) -> Result<PageOutcome> {
        let body = self
            .fetcher
            .fetch(url)
            .await
            .map_err(|source| CanopyError::Fetch {
                url: url.to_string(),
                source,
            })?;
        let page_url = Url::parse(url)?;
        Ok(self.parse_page(&body, &page_url))
    }

    /// Parses a fetched body; split out so tests can skip the fetch
    pub fn parse_page(&self, body: &str, page_url: &Url) -> PageOutcome {
        let document = Html::parse_document(body);

        let mut items = Vec::new();
        for element in document.select(&self.item_selector) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };
            let Ok(url) = page_url.join(href) else {
                continue;
            };
            let title = element
                .value()
                .attr("title")
                .map(str::to_string)
                .unwrap_or_else(|| {
                    element
                        .text()
                        .collect::<String>()
                        .split_whitespace()
                        .collect::<Vec<_>>()
                        .join(" ")
                });
            items.push(PageItem {
                url: url.to_string(),
                title,
            });
        }

        let next_page_url = document
            .select(&self.next_page_selector)
            .next()
            .and_then(|element| element.value().attr("href"))
            .and_then(|href| page_url.join(href).ok())
            .map(|url| url.to_string());

        PageOutcome {
            items,
            next_page_url,
        }
    }
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| CanopyError::InvalidSelector {
        selector: selector.to_string(),
        message: format!("{:?}", e),
    })
}
