use thiserror::Error;

/// Everything that can go wrong talking to the styler.
#[derive(Debug, Error)]
pub enum StylerError {
    #[error("There is no data to send. Supply HTML, a readable file, or a URL first.")]
    NoData,

    #[error("Transport error ({code}): {message}")]
    Transport { message: String, code: TransportCode },

    /// The body is kept so callers can inspect what the server said.
    #[error("Unexpected HTTP status {status}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("HTTP client error: {message}")]
    Client { message: String },

    #[error("Invalid configuration: {message}")]
    Config { message: String },
}

/// Rough category of a transport failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportCode {
    Timeout,
    Connect,
    Redirect,
    Body,
    Request,
    Other,
}

impl std::fmt::Display for TransportCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TransportCode::Timeout => "timeout",
            TransportCode::Connect => "connect",
            TransportCode::Redirect => "redirect",
            TransportCode::Body => "body",
            TransportCode::Request => "request",
            TransportCode::Other => "other",
        };
        f.write_str(name)
    }
}

impl From<reqwest::Error> for StylerError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            return StylerError::Client {
                message: err.to_string(),
            };
        }

        let code = if err.is_timeout() {
            TransportCode::Timeout
        } else if err.is_connect() {
            TransportCode::Connect
        } else if err.is_redirect() {
            TransportCode::Redirect
        } else if err.is_body() || err.is_decode() {
            TransportCode::Body
        } else if err.is_request() {
            TransportCode::Request
        } else {
            TransportCode::Other
        };

        StylerError::Transport {
            message: err.to_string(),
            code,
        }
    }
}

pub type Result<T> = std::result::Result<T, StylerError>;
