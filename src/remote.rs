use std::ops::Deref;

use reqwest::header::CONTENT_TYPE;
use reqwest::redirect::Policy;
use tracing::instrument;

use crate::{
    content_type, ClientConfig, Conversion, Input, Result, StyledResponse, FORM_CONTENT_TYPE,
};

/// Async flavour of [`crate::StylerClient`], for callers already on a tokio
/// runtime. Same inputs, same errors.
#[derive(Debug)]
pub struct AsyncStylerClient {
    conversion: Conversion,
}

impl AsyncStylerClient {
    pub fn new(input: &str) -> Self {
        Self::with_config(input, ClientConfig::default())
    }

    pub fn with_config(input: &str, config: ClientConfig) -> Self {
        Self::from_input(Input::classify(input), config)
    }

    pub fn from_input(input: Input, config: ClientConfig) -> Self {
        AsyncStylerClient {
            conversion: Conversion::new(input, config),
        }
    }

    #[instrument(skip(self), fields(kind = self.input().kind()))]
    pub async fn submit(&mut self) -> Result<String> {
        let request = self.conversion.request()?;

        let client = reqwest::Client::builder()
            .user_agent(self.config().user_agent.as_str())
            .timeout(self.config().timeout())
            .redirect(Policy::default())
            .build()?;

        let res = client
            .post(request.endpoint)
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(request.body)
            .send()
            .await?;

        let status = res.status().as_u16();
        let content_type = content_type(res.headers());
        let body = res.text().await?;

        self.conversion.finish(StyledResponse {
            status,
            content_type,
            body,
        })
    }
}

impl Deref for AsyncStylerClient {
    type Target = Conversion;

    fn deref(&self) -> &Conversion {
        &self.conversion
    }
}
