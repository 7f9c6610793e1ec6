mod client;
mod config;
mod conversion;
mod error;
mod remote;

pub use client::StylerClient;
pub use config::ClientConfig;
pub use conversion::Conversion;
pub use error::{Result, StylerError, TransportCode};
pub use remote::AsyncStylerClient;

use once_cell::sync::Lazy;
use rand::{distributions::Alphanumeric, Rng};
use regex::Regex;
use reqwest::Url;
use std::path::{Path, PathBuf};
use url::form_urlencoded::byte_serialize;

const TOKEN_LEN: usize = 20;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

static URL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^https?://[a-z0-9-]+(\.[a-z0-9-]+)*(:[0-9]+)?(/.*)?$")
        .expect("URL pattern is valid")
});

/// What a client was built from. Resolved once, when the client is
/// constructed, and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// File contents exactly as read, whatever their encoding.
    FilePath { path: PathBuf, contents: Vec<u8> },
    /// The caller's string, unchanged. It is known to parse as a URL.
    Url(String),
    RawHtml(String),
}

impl Input {
    /// Classify a caller-supplied string. A readable file wins over a URL,
    /// and anything that is neither is taken to be HTML.
    pub fn classify(input: &str) -> Self {
        if let Some(contents) = read_file(Path::new(input)) {
            return Input::FilePath {
                path: PathBuf::from(input),
                contents,
            };
        }

        if URL_PATTERN.is_match(input) && Url::parse(input).is_ok() {
            return Input::Url(input.to_owned());
        }

        Input::RawHtml(input.to_owned())
    }

    /// HTML to send as `source`. Empty in URL mode.
    pub fn payload(&self) -> &[u8] {
        match self {
            Input::FilePath { contents, .. } => contents.as_slice(),
            Input::RawHtml(html) => html.as_bytes(),
            Input::Url(_) => &[],
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            Input::Url(url) => Some(url),
            _ => None,
        }
    }

    pub fn has_data(&self) -> bool {
        !self.payload().is_empty() || self.url().is_some()
    }

    fn kind(&self) -> &'static str {
        match self {
            Input::FilePath { .. } => "file",
            Input::Url(_) => "url",
            Input::RawHtml(_) => "html",
        }
    }
}

/// A completed exchange with the styler.
#[derive(Debug, Clone)]
pub struct StyledResponse {
    pub status: u16,
    pub content_type: Option<mime::Mime>,
    pub body: String,
}

/// Random token sent as `returnraw`. The service treats it as opaque.
pub fn generate_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect()
}

/// The form body the convert endpoint expects. Encoded from raw bytes so
/// non-UTF-8 files go out untouched.
fn form_body(token: &str, input: &Input) -> String {
    let fields: [(&str, &[u8]); 3] = [
        ("returnraw", token.as_bytes()),
        ("source", input.payload()),
        ("source_url", input.url().unwrap_or_default().as_bytes()),
    ];

    fields
        .iter()
        .map(|(name, value)| format!("{name}={}", byte_serialize(value).collect::<String>()))
        .collect::<Vec<_>>()
        .join("&")
}

fn read_file(path: &Path) -> Option<Vec<u8>> {
    if !path.is_file() {
        return None;
    }
    std::fs::read(path).ok()
}

fn content_type(headers: &reqwest::header::HeaderMap) -> Option<mime::Mime> {
    headers
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|s| s.parse().ok())
}
