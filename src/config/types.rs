use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub site: SiteConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    /// One entry per category level, outermost first. The crawl recurses
    /// exactly as deep as there are levels.
    #[serde(rename = "level", default)]
    pub levels: Vec<LevelConfig>,
    pub page: PageConfig,
    pub output: OutputConfig,
}

/// The site being crawled
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Site name; becomes the root of the category tree
    pub name: String,

    /// URL of the top-level category listing
    #[serde(rename = "start-url")]
    pub start_url: String,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,
}

/// Selector configuration for one category level
#[derive(Debug, Clone, Deserialize)]
pub struct LevelConfig {
    /// CSS selector matching the anchor elements that link to this
    /// level's categories; the category name is the anchor text
    #[serde(rename = "link-selector")]
    pub link_selector: String,
}

/// Selector configuration for leaf content pages
#[derive(Debug, Clone, Deserialize)]
pub struct PageConfig {
    /// CSS selector matching item anchors on a content page
    #[serde(rename = "item-selector")]
    pub item_selector: String,

    /// CSS selector matching the "next page" anchor; no match means the
    /// leaf is exhausted
    #[serde(rename = "next-page-selector")]
    pub next_page_selector: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite database file holding crawl state and items
    #[serde(rename = "database-path")]
    pub database_path: String,
}
