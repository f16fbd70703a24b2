use std::time::Duration;

use anyhow::Context;

use reqwest::Client;

use secrecy::{ExposeSecret, Secret};

use serde::Serialize;

use url::Url;

use crate::domain::PhoneNumber;
use crate::error::{Error, Result};

const CHAT_LINK_BASE: &str = "https://wa.me/";
pub const DEFAULT_TEMPLATE_LANGUAGE: &str = "en_US";

/// Deep link opening a WhatsApp chat with `phone`, pre-filled with `message`.
///
/// Everything but the digits of the phone number is dropped.
pub fn chat_link(phone: &str, message: &str) -> Result<Url> {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return Err(Error::ParsingError(format!(
            "\"{}\" has no digits to dial",
            phone
        )));
    }

    let mut link = Url::parse(CHAT_LINK_BASE)
        .and_then(|base| base.join(&digits))
        .map_err(|e| Error::ParsingError(e.to_string()))?;
    link.query_pairs_mut().append_pair("text", message);
    Ok(link)
}

/// Client for the WhatsApp Business messages API
#[derive(Debug)]
pub struct WhatsAppClient {
    client: Client,
    api_messages_url: Url,
    api_auth_token: Secret<String>,
}

impl WhatsAppClient {
    pub fn new(
        api_timeout: Duration,
        api_base_url: Url,
        phone_number_id: &str,
        api_auth_token: Secret<String>,
    ) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(api_timeout)
            .build()
            .context("Failed to build http client")?;

        let api_messages_url = api_base_url
            .join(&format!("{}/messages", phone_number_id))
            .context("Failed to create WhatsApp messages endpoint URL")?;

        Ok(Self {
            client,
            api_messages_url,
            api_auth_token,
        })
    }

    pub fn has_credentials(&self) -> bool {
        !self.api_auth_token.expose_secret().trim().is_empty()
    }

    #[tracing::instrument(name = "Send WhatsApp template", skip(self))]
    pub async fn send_template(
        &self,
        to: &PhoneNumber,
        template_name: &str,
        language_code: &str,
    ) -> Result<()> {
        let body = TemplateMessage {
            messaging_product: "whatsapp",
            to: to.as_ref(),
            kind: "template",
            template: Template {
                name: template_name,
                language: Language {
                    code: language_code,
                },
            },
        };

        self.client
            .post(self.api_messages_url.clone())
            .bearer_auth(self.api_auth_token.expose_secret())
            .json(&body)
            .send()
            .await
            .and_then(|res| res.error_for_status())
            .map_err(Error::SendWhatsAppError)?;
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct TemplateMessage<'a> {
    messaging_product: &'a str,
    to: &'a str,
    #[serde(rename = "type")]
    kind: &'a str,
    template: Template<'a>,
}

#[derive(Debug, Serialize)]
struct Template<'a> {
    name: &'a str,
    language: Language<'a>,
}

#[derive(Debug, Serialize)]
struct Language<'a> {
    code: &'a str,
}
