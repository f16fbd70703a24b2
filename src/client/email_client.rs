use std::convert::Infallible;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;

use reqwest::Client;

use serde::Serialize;

use secrecy::Secret;

use url::Url;

use crate::domain::EmailAddress;
use crate::error::{Error, Result};

const POSTMARK_TOKEN_HEADER: &str = "X-Postmark-Server-Token";

#[derive(Debug)]
pub struct EmailClient {
    client: Client,
    sender: EmailAddress,

    api_send_email_url: Url,
    api_auth_token: EmailAuthorizationToken,
}

impl EmailClient {
    pub fn new(
        sender: EmailAddress,
        api_timeout: Duration,
        api_base_url: Url,
        api_auth_token: EmailAuthorizationToken,
    ) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(api_timeout)
            .build()
            .context("Failed to build http client")?;

        let api_send_email_url = api_base_url
            .join("email")
            .context("Failed to create send email endpoint URL")?;

        Ok(Self {
            client,
            sender,
            api_send_email_url,
            api_auth_token,
        })
    }

    /// False when no API token was configured
    pub fn has_credentials(&self) -> bool {
        use secrecy::ExposeSecret;

        !self.api_auth_token.expose_secret().trim().is_empty()
    }

    #[tracing::instrument(name = "Send email", skip(self, text_body))]
    pub async fn send(&self, recipient: &EmailAddress, subject: &str, text_body: &str) -> Result<()> {
        use secrecy::ExposeSecret;

        let body = SendEmailRequest {
            to: recipient.as_ref(),
            from: self.sender.as_ref(),
            subject,
            text_body,
        };

        self.client
            .post(self.api_send_email_url.clone())
            .header(POSTMARK_TOKEN_HEADER, self.api_auth_token.expose_secret())
            .json(&body)
            .send()
            .await
            .and_then(|res| res.error_for_status())
            .map_err(Error::SendEmailError)?;
        Ok(())
    }
}

#[derive(Debug)]
pub struct EmailAuthorizationToken(Secret<String>);

impl FromStr for EmailAuthorizationToken {
    type Err = Infallible;

    fn from_str(value: &str) -> std::result::Result<Self, Infallible> {
        Ok(Self(Secret::new(value.to_string())))
    }
}

impl From<Secret<String>> for EmailAuthorizationToken {
    fn from(value: Secret<String>) -> Self {
        Self(value)
    }
}

impl secrecy::ExposeSecret<String> for EmailAuthorizationToken {
    fn expose_secret(&self) -> &String {
        self.0.expose_secret()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct SendEmailRequest<'a> {
    to: &'a str,
    from: &'a str,
    subject: &'a str,
    text_body: &'a str,
}
