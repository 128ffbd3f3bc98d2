//! Mailer backed by a transactional email HTTP API.

use super::service::{EmailMessage, MailError, Mailer};
use async_trait::async_trait;
use reqwest::{Client, header};
use serde::Serialize;
use std::time::Duration;

/// Request body sent to the mail provider.
#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    from: &'a str,
    from_name: &'a str,
    to: &'a str,
    to_name: &'a str,
    subject: &'a str,
    html: &'a str,
}

/// Sends email by POSTing JSON to a provider endpoint.
///
/// Any non-2xx response is reported as [`MailError::Rejected`] so the worker
/// can retry it.
pub struct HttpMailer {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    from: String,
    from_name: String,
}

impl HttpMailer {
    /// Builds a mailer for `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`MailError::Transport`] if the HTTP client cannot be constructed.
    pub fn new(
        endpoint: String,
        api_key: Option<String>,
        from: String,
        from_name: String,
    ) -> Result<Self, MailError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static(concat!("contacts-api/", env!("CARGO_PKG_VERSION"))),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            endpoint,
            api_key,
            from,
            from_name,
        })
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailError> {
        let body = SendRequest {
            from: &self.from,
            from_name: &self.from_name,
            to: &message.to,
            to_name: &message.to_name,
            subject: &message.subject,
            html: &message.html,
        };

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(ref key) = self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MailError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
