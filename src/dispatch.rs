//! Outbound messaging to donors.
//!
//! Every message sent on behalf of a known donor leaves a [`CommunicationRecord`]
//! behind, whether it was delivered or not.
//!
//! [`CommunicationRecord`]: crate::domain::CommunicationRecord

use std::time::Duration;

use serde::Serialize;

use url::Url;

use uuid::Uuid;

use crate::client::{chat_link, EmailClient, WhatsAppClient};
use crate::domain::{Channel, DeliveryStatus, EmailAddress, NewCommunication, PhoneNumber};
use crate::error::Result;
use crate::repo::CommunicationRepo;

const NAME_PLACEHOLDER: &str = "{{name}}";
const DEFAULT_NAME: &str = "Donor";

/// Substitute every `{{name}}` in `template`, falling back to "Donor"
pub fn render_template(template: &str, name: Option<&str>) -> String {
    let name = name
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_NAME);
    template.replace(NAME_PLACEHOLDER, name)
}

/// One addressee of a batch email
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Recipient {
    pub email: Option<String>,
    pub name: Option<String>,
    pub donor_id: Option<Uuid>,
}

/// Pause between two sends of a batch email
#[derive(Debug, Clone, Copy, Default)]
pub struct SendDelay(pub Duration);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub success_count: usize,
    pub fail_count: usize,
}

impl BatchReport {
    /// Nothing went out although something was attempted
    pub fn all_failed(&self) -> bool {
        self.success_count == 0 && self.fail_count > 0
    }
}

pub struct Dispatcher<'a> {
    communications: &'a dyn CommunicationRepo,
}

impl<'a> Dispatcher<'a> {
    pub fn new(communications: &'a dyn CommunicationRepo) -> Self {
        Self { communications }
    }

    /// Send one personalised email per recipient, one at a time.
    ///
    /// Failures are counted and never abort the batch. Recipients without an
    /// email address are skipped entirely.
    #[tracing::instrument(name = "Send batch email", skip_all, fields(recipients = recipients.len()))]
    pub async fn send_batch_email(
        &self,
        email_client: &EmailClient,
        send_delay: Duration,
        recipients: &[Recipient],
        subject_template: &str,
        body_template: &str,
    ) -> BatchReport {
        let mut report = BatchReport::default();
        let mut first = true;

        for recipient in recipients {
            let Some(email) = recipient.email.as_deref().filter(|e| !e.trim().is_empty()) else {
                continue;
            };

            if !first && !send_delay.is_zero() {
                tokio::time::sleep(send_delay).await;
            }
            first = false;

            let subject = render_template(subject_template, recipient.name.as_deref());
            let body = render_template(body_template, recipient.name.as_deref());

            let outcome = match email.parse::<EmailAddress>() {
                Ok(address) => email_client.send(&address, &subject, &body).await,
                Err(error) => Err(error),
            };
            let status = match outcome {
                Ok(()) => {
                    report.success_count += 1;
                    DeliveryStatus::Sent
                }
                Err(error) => {
                    tracing::warn!(error.cause_chain = ?error, "Failed to send email to {}", email);
                    report.fail_count += 1;
                    DeliveryStatus::Failed
                }
            };

            if let Some(donor_id) = recipient.donor_id {
                self.log(NewCommunication {
                    donor_id,
                    channel: Channel::Email,
                    subject: Some(subject),
                    content: body,
                    status,
                })
                .await;
            }
        }

        tracing::info!(
            success_count = report.success_count,
            fail_count = report.fail_count,
            "Finished sending batch email"
        );
        report
    }

    /// Build a chat deep link for the donor and log it as sent.
    ///
    /// The message is only handed to the user's WhatsApp client, so delivery is assumed.
    #[tracing::instrument(name = "Open WhatsApp chat", skip(self, message))]
    pub async fn open_whatsapp_chat(
        &self,
        donor_id: Uuid,
        phone: &str,
        message: &str,
    ) -> Result<Url> {
        let link = chat_link(phone, message)?;
        self.log(NewCommunication {
            donor_id,
            channel: Channel::WhatsApp,
            subject: None,
            content: message.to_string(),
            status: DeliveryStatus::Sent,
        })
        .await;
        Ok(link)
    }

    /// Send a pre-approved template through the WhatsApp API
    #[tracing::instrument(name = "Send WhatsApp template to donor", skip(self, whatsapp_client))]
    pub async fn send_whatsapp_template(
        &self,
        whatsapp_client: &WhatsAppClient,
        donor_id: Uuid,
        phone: &PhoneNumber,
        template_name: &str,
        language_code: &str,
    ) -> Result<()> {
        let outcome = whatsapp_client
            .send_template(phone, template_name, language_code)
            .await;
        let status = if outcome.is_ok() {
            DeliveryStatus::Sent
        } else {
            DeliveryStatus::Failed
        };
        self.log(NewCommunication {
            donor_id,
            channel: Channel::WhatsApp,
            subject: None,
            content: format!("Template: {}", template_name),
            status,
        })
        .await;
        outcome
    }

    /// A lost audit entry is not worth failing the send over
    async fn log(&self, communication: NewCommunication) {
        if let Err(error) = self.communications.insert(&communication).await {
            tracing::error!(
                error.cause_chain = ?error,
                "Failed to log communication for donor {}",
                communication.donor_id
            );
        }
    }
}
