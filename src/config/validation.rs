use crate::compliance::DataField;
use crate::config::types::{
    ComplianceConfig, Config, CrawlerConfig, JurisdictionEntry, UserAgentConfig,
};
use crate::ConfigError;
use std::collections::HashSet;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_compliance_config(&config.compliance)?;
    validate_jurisdictions(&config.jurisdictions)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_pages < 1 || config.max_pages > 50 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be between 1 and 50, got {}",
            config.max_pages
        )));
    }

    if config.max_concurrent_pages < 1 || config.max_concurrent_pages > 10 {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_pages must be between 1 and 10, got {}",
            config.max_concurrent_pages
        )));
    }

    for (name, value) in [
        ("page_timeout", config.page_timeout),
        ("robots_timeout", config.robots_timeout),
        ("link_check_timeout", config.link_check_timeout),
    ] {
        if value < 100 {
            return Err(ConfigError::Validation(format!(
                "{} must be >= 100ms, got {}ms",
                name, value
            )));
        }
    }

    if config.max_redirects > 10 {
        return Err(ConfigError::Validation(format!(
            "max_redirects must be <= 10, got {}",
            config.max_redirects
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Crawler name doubles as the robots.txt token: alphanumeric + hyphens only
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

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Validates compliance limits
fn validate_compliance_config(config: &ComplianceConfig) -> Result<(), ConfigError> {
    if config.max_radius == 0 {
        return Err(ConfigError::Validation(
            "max_radius must be at least 1 mile".to_string(),
        ));
    }

    if config.max_results_per_request == 0 {
        return Err(ConfigError::Validation(
            "max_results_per_request must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates jurisdiction overrides
fn validate_jurisdictions(entries: &[JurisdictionEntry]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();

    for entry in entries {
        let code = entry.code.trim().to_uppercase();
        if code.is_empty() {
            return Err(ConfigError::Validation(
                "jurisdiction code cannot be empty".to_string(),
            ));
        }

        if !seen.insert(code.clone()) {
            return Err(ConfigError::Validation(format!(
                "jurisdiction '{}' is defined more than once",
                code
            )));
        }

        if entry.max_requests_per_day < 1 {
            return Err(ConfigError::Validation(format!(
                "jurisdiction '{}' must allow at least one request per day",
                code
            )));
        }

        for field in &entry.allowed_data_fields {
            if field.parse::<DataField>().is_err() {
                return Err(ConfigError::Validation(format!(
                    "jurisdiction '{}' lists unknown data field '{}'",
                    code, field
                )));
            }
        }
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    };

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !domain.contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
