use crate::config::types::{Config, LevelConfig, PageConfig, SiteConfig, UserAgentConfig};
use crate::ConfigError;
use scraper::Selector;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_levels(&config.levels)?;
    validate_page_config(&config.page)?;

    if config.output.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the site section
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    if config.name.is_empty() {
        return Err(ConfigError::Validation(
            "site name cannot be empty".to_string(),
        ));
    }

    if config.start_url.is_empty() {
        return Err(ConfigError::Validation(
            "start-url is required".to_string(),
        ));
    }

    let url = Url::parse(&config.start_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid start-url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "start-url must use http or https, got '{}'",
            url.scheme()
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Ok(())
}

/// Validates the category level list
///
/// A crawl without category levels has nothing to discover; this is a
/// fatal construction-time error rather than an empty crawl.
fn validate_levels(levels: &[LevelConfig]) -> Result<(), ConfigError> {
    if levels.is_empty() {
        return Err(ConfigError::Validation(
            "at least one [[level]] with a link-selector is required".to_string(),
        ));
    }

    for (index, level) in levels.iter().enumerate() {
        validate_selector(&level.link_selector, &format!("level {} link-selector", index))?;
    }

    Ok(())
}

/// Validates the content page selectors
fn validate_page_config(config: &PageConfig) -> Result<(), ConfigError> {
    validate_selector(&config.item_selector, "page item-selector")?;
    validate_selector(&config.next_page_selector, "page next-page-selector")?;
    Ok(())
}

fn validate_selector(selector: &str, context: &str) -> Result<(), ConfigError> {
    if selector.is_empty() {
        return Err(ConfigError::Validation(format!(
            "{} cannot be empty",
            context
        )));
    }

    Selector::parse(selector).map_err(|e| {
        ConfigError::Validation(format!("{} is not a valid CSS selector: {:?}", context, e))
    })?;

    Ok(())
}
