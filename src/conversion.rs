use reqwest::Url;
use tracing::{debug, warn};

use crate::{form_body, generate_token, ClientConfig, Input, Result, StyledResponse, StylerError};

/// State of one conversion: what is being sent, with which token, where to,
/// and what came back. Both clients are thin transports around this.
#[derive(Debug)]
pub struct Conversion {
    input: Input,
    token: String,
    config: ClientConfig,
    last_response: Option<StyledResponse>,
}

/// Everything a transport needs to make the call.
#[derive(Debug)]
pub(crate) struct ConvertRequest {
    pub endpoint: Url,
    pub body: String,
}

impl Conversion {
    pub fn new(input: Input, config: ClientConfig) -> Self {
        debug!(kind = input.kind(), "resolved styler input");
        Conversion {
            input,
            token: generate_token(),
            config,
            last_response: None,
        }
    }

    pub fn input(&self) -> &Input {
        &self.input
    }

    pub fn payload(&self) -> &[u8] {
        self.input.payload()
    }

    pub fn url(&self) -> Option<&str> {
        self.input.url()
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The last completed exchange, including unsuccessful statuses.
    pub fn response(&self) -> Option<&StyledResponse> {
        self.last_response.as_ref()
    }

    /// Fails with `NoData` before anything touches the network.
    pub(crate) fn request(&self) -> Result<ConvertRequest> {
        if !self.input.has_data() {
            return Err(StylerError::NoData);
        }

        let endpoint = self.config.endpoint()?;
        debug!(%endpoint, "sending to styler");
        Ok(ConvertRequest {
            endpoint,
            body: form_body(&self.token, &self.input),
        })
    }

    /// Record the exchange. Anything but 200 is an error.
    pub(crate) fn finish(&mut self, response: StyledResponse) -> Result<String> {
        debug!(
            status = response.status,
            content_type = ?response.content_type,
            "styler responded"
        );
        let status = response.status;
        let body = response.body.clone();
        self.last_response = Some(response);

        if status != 200 {
            warn!(status, "styler returned an unexpected status");
            return Err(StylerError::UnexpectedStatus { status, body });
        }

        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &str) -> StyledResponse {
        StyledResponse {
            status,
            content_type: Some(mime::TEXT_HTML_UTF_8),
            body: body.to_owned(),
        }
    }

    #[test]
    fn test_no_data() {
        let conversion = Conversion::new(Input::RawHtml(String::new()), ClientConfig::default());
        assert!(matches!(conversion.request(), Err(StylerError::NoData)));
    }

    #[test]
    fn test_request_uses_config_endpoint() {
        let config = ClientConfig::default().with_port(8080);
        let conversion = Conversion::new(Input::classify("<b>x</b>"), config);

        let request = conversion.request().unwrap();
        assert_eq!(
            request.endpoint.as_str(),
            "http://inlinestyler.torchboxapps.com:8080/styler/convert/"
        );
        assert_eq!(
            request.body,
            format!("returnraw={}&source=%3Cb%3Ex%3C%2Fb%3E&source_url=", conversion.token())
        );
    }

    #[test]
    fn test_finish_ok_returns_body() {
        let mut conversion = Conversion::new(Input::classify("<p>x</p>"), ClientConfig::default());
        let html = conversion
            .finish(response(200, r#"<p style="color:red">x</p>"#))
            .unwrap();
        assert_eq!(html, r#"<p style="color:red">x</p>"#);
        assert_eq!(conversion.response().map(|r| r.status), Some(200));
    }

    #[test]
    fn test_finish_other_status_keeps_body() {
        let mut conversion = Conversion::new(Input::classify("<p>x</p>"), ClientConfig::default());
        match conversion.finish(response(503, "try later")) {
            Err(StylerError::UnexpectedStatus { status, body }) => {
                assert_eq!(status, 503);
                assert_eq!(body, "try later");
            }
            other => panic!("expected unexpected status, got {other:?}"),
        }
        assert_eq!(
            conversion.response().map(|r| r.body.as_str()),
            Some("try later")
        );
    }
}
