use crate::error::{Error, Result};

pub const DEFAULT_MAX_DAYS: u32 = 10;
/// Largest accepted `MAX_DAYS`; the page has one column per day.
pub const MAX_DAYS_LIMIT: u32 = 366;
pub const DEFAULT_BASE_URL: &str = "http://cip-paris.fr";
pub const DEFAULT_OBJECT_NAME: &str = "index.html";

#[derive(Debug, Clone)]
pub struct Settings {
    pub max_days: u32,
    pub base_url: String,
    pub start_urls: Vec<String>,
    pub upload_url: Option<String>,
    pub upload_object_name: String,
}

/// Listing categories 2 (showing now) and 3 (coming soon).
pub fn default_start_urls(base_url: &str) -> Vec<String> {
    [2, 3]
        .iter()
        .map(|category| {
            format!(
                "{}/ajax-movies?page=1&category={}&direction=ASC",
                base_url.trim_end_matches('/'),
                category
            )
        })
        .collect()
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let max_days = match lookup("MAX_DAYS") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .map_err(|e| Error::Config(format!("MAX_DAYS={raw:?}: {e}")))?,
            None => DEFAULT_MAX_DAYS,
        };
        if max_days > MAX_DAYS_LIMIT {
            return Err(Error::Config(format!(
                "MAX_DAYS={max_days} exceeds {MAX_DAYS_LIMIT}"
            )));
        }
        let base_url = lookup("CIP_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let start_urls = match lookup("CIP_START_URLS") {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|u| !u.is_empty())
                .map(String::from)
                .collect(),
            None => default_start_urls(&base_url),
        };
        if start_urls.is_empty() {
            return Err(Error::Config("CIP_START_URLS is empty".to_string()));
        }

        Ok(Self {
            max_days,
            base_url,
            start_urls,
            upload_url: lookup("UPLOAD_URL").filter(|u| !u.trim().is_empty()),
            upload_object_name: lookup("UPLOAD_OBJECT_NAME")
                .unwrap_or_else(|| DEFAULT_OBJECT_NAME.to_string()),
        })
    }
}
