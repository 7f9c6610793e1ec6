use reqwest::Url;
use serde::{de, Deserialize, Deserializer};
use std::time::Duration;

use crate::{Result, StylerError};

pub const DEFAULT_API_URL: &str = "http://inlinestyler.torchboxapps.com/styler/convert/";
pub const DEFAULT_API_PORT: u16 = 80;
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 60;
pub const DEFAULT_USER_AGENT: &str = "InlineStylerAPI/1.0";

/// Where and how to reach the styler. Every field has a default, so a
/// partial config file deserializes into a usable value.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    #[serde(deserialize_with = "http_url")]
    pub api_url: Url,
    /// Overrides the port in `api_url`. When unset, the URL's own port or
    /// its scheme default is used.
    pub api_port: Option<u16>,
    pub timeout_seconds: u64,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            api_url: Url::parse(DEFAULT_API_URL).expect("default API URL is valid"),
            api_port: None,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl ClientConfig {
    /// Point at a different endpoint, port included.
    pub fn with_endpoint(mut self, url: Url) -> Self {
        self.api_url = url;
        self.api_port = None;
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.api_port = Some(port);
        self
    }

    pub fn with_timeout_seconds(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// The port requests go to.
    pub fn port(&self) -> u16 {
        self.api_port
            .or_else(|| self.api_url.port_or_known_default())
            .unwrap_or(DEFAULT_API_PORT)
    }

    /// The URL requests actually go to: `api_url` with `api_port` applied.
    pub fn endpoint(&self) -> Result<Url> {
        check_http(&self.api_url).map_err(|message| StylerError::Config { message })?;

        let mut url = self.api_url.clone();
        if let Some(port) = self.api_port {
            url.set_port(Some(port)).map_err(|()| StylerError::Config {
                message: format!("cannot set port {port} on {}", self.api_url),
            })?;
        }
        Ok(url)
    }
}

fn check_http(url: &Url) -> std::result::Result<(), String> {
    match url.scheme() {
        "http" | "https" if url.has_host() => Ok(()),
        "http" | "https" => Err(format!("API URL has no host: {url}")),
        scheme => Err(format!("API URL must be http or https, got {scheme}: {url}")),
    }
}

fn http_url<'de, D>(deserializer: D) -> std::result::Result<Url, D::Error>
where
    D: Deserializer<'de>,
{
    let url = Url::deserialize(deserializer)?;
    check_http(&url).map_err(de::Error::custom)?;
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.api_url.as_str(), DEFAULT_API_URL);
        assert_eq!(config.port(), 80);
        assert_eq!(config.timeout(), Duration::from_secs(60));
        assert_eq!(config.user_agent, "InlineStylerAPI/1.0");
        assert_eq!(config.endpoint().unwrap().as_str(), DEFAULT_API_URL);
    }

    #[test]
    fn test_port_override() {
        let config = ClientConfig::default().with_port(8080);
        assert_eq!(config.port(), 8080);
        assert_eq!(
            config.endpoint().unwrap().as_str(),
            "http://inlinestyler.torchboxapps.com:8080/styler/convert/"
        );
    }

    #[test]
    fn test_with_endpoint_takes_port() {
        let config = ClientConfig::default()
            .with_port(9000)
            .with_endpoint("http://127.0.0.1:4321/convert".parse().unwrap());
        assert_eq!(config.port(), 4321);
        assert_eq!(
            config.endpoint().unwrap().as_str(),
            "http://127.0.0.1:4321/convert"
        );

        let config =
            ClientConfig::default().with_endpoint("https://styler.example.com/".parse().unwrap());
        assert_eq!(config.port(), 443);
    }

    #[test]
    fn test_deserialize_partial() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"timeout_seconds": 5, "user_agent": "mailer/2.0"}"#).unwrap();
        assert_eq!(config.timeout_seconds, 5);
        assert_eq!(config.user_agent, "mailer/2.0");
        assert_eq!(config.api_port, None);
        assert_eq!(config.api_url.as_str(), DEFAULT_API_URL);
    }

    #[test]
    fn test_deserialize_https_keeps_scheme_port() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"api_url": "https://styler.example.com/convert/"}"#).unwrap();
        assert_eq!(config.port(), 443);
        assert_eq!(
            config.endpoint().unwrap().as_str(),
            "https://styler.example.com/convert/"
        );
    }

    #[test]
    fn test_deserialize_explicit_port() {
        let config: ClientConfig = serde_json::from_str(
            r#"{"api_url": "https://styler.example.com/convert/", "api_port": 8443}"#,
        )
        .unwrap();
        assert_eq!(
            config.endpoint().unwrap().as_str(),
            "https://styler.example.com:8443/convert/"
        );
    }

    #[test]
    fn test_deserialize_rejects_bad_url() {
        let result: std::result::Result<ClientConfig, _> =
            serde_json::from_str(r#"{"api_url": "not a url"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialize_rejects_non_http_url() {
        let result: std::result::Result<ClientConfig, _> =
            serde_json::from_str(r#"{"api_url": "ftp://styler.example.com/convert/"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_endpoint_rejects_non_http_field() {
        let config = ClientConfig {
            api_url: "mailto:styler@example.com".parse().unwrap(),
            ..ClientConfig::default()
        };
        assert!(matches!(config.endpoint(), Err(StylerError::Config { .. })));
    }
}
