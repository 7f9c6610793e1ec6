use std::ops::Deref;

use reqwest::blocking;
use reqwest::header::CONTENT_TYPE;
use reqwest::redirect::Policy;
use tracing::instrument;

use crate::{
    content_type, ClientConfig, Conversion, Input, Result, StyledResponse, FORM_CONTENT_TYPE,
};

/// Blocking client for the Inline Styler. Built around one input and meant
/// to be used for a single conversion.
///
/// ```no_run
/// let mut styler = inlinestyler::StylerClient::new("<style>p{color:red}</style><p>hi</p>");
/// let html = styler.submit()?;
/// # Ok::<(), inlinestyler::StylerError>(())
/// ```
#[derive(Debug)]
pub struct StylerClient {
    conversion: Conversion,
}

impl StylerClient {
    /// `input` may be a path to an HTML file, an http(s) URL, or HTML.
    pub fn new(input: &str) -> Self {
        Self::with_config(input, ClientConfig::default())
    }

    pub fn with_config(input: &str, config: ClientConfig) -> Self {
        Self::from_input(Input::classify(input), config)
    }

    pub fn from_input(input: Input, config: ClientConfig) -> Self {
        StylerClient {
            conversion: Conversion::new(input, config),
        }
    }

    /// Send the input to the styler and return the inlined HTML.
    #[instrument(skip(self), fields(kind = self.input().kind()))]
    pub fn submit(&mut self) -> Result<String> {
        let request = self.conversion.request()?;

        let client = blocking::Client::builder()
            .user_agent(self.config().user_agent.as_str())
            .timeout(self.config().timeout())
            .redirect(Policy::default())
            .build()?;

        let res = client
            .post(request.endpoint)
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(request.body)
            .send()?;

        let status = res.status().as_u16();
        let content_type = content_type(res.headers());
        let body = res.text()?;

        self.conversion.finish(StyledResponse {
            status,
            content_type,
            body,
        })
    }
}

impl Deref for StylerClient {
    type Target = Conversion;

    fn deref(&self) -> &Conversion {
        &self.conversion
    }
}
