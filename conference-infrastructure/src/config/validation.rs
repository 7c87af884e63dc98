use anyhow::{anyhow, Result};
use reqwest::Url;

pub fn validate_base_url(value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(anyhow!("api_base_url is empty"));
    }
    let url = Url::parse(value).map_err(|err| anyhow!("invalid api_base_url: {}", err))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(anyhow!("api_base_url must use http or https"));
    }
    Ok(())
}

pub fn validate_events_path(value: &str) -> Result<()> {
    if value.trim().is_empty() || value == "/" {
        return Err(anyhow!("events_path is empty"));
    }
    if value.contains(char::is_whitespace) {
        return Err(anyhow!("events_path must not contain whitespace"));
    }
    Ok(())
}
