use actix_web::{post, web, HttpResponse, Responder};

use serde::{Deserialize, Serialize};

use uuid::Uuid;

use crate::auth::Administrator;
use crate::client::EmailClient;
use crate::dispatch::{Dispatcher, Recipient, SendDelay};
use crate::error::{RestError, RestResult};
use crate::repo::Repositories;

/// A bare address or an addressee with a name to personalise with
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RecipientBody {
    Address(String),
    Donor {
        email: Option<String>,
        name: Option<String>,
        donor_id: Option<Uuid>,
    },
}

impl From<RecipientBody> for Recipient {
    fn from(body: RecipientBody) -> Self {
        match body {
            RecipientBody::Address(email) => Self {
                email: Some(email),
                ..Self::default()
            },
            RecipientBody::Donor {
                email,
                name,
                donor_id,
            } => Self {
                email,
                name,
                donor_id,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SendEmailBody {
    recipients: Option<Vec<RecipientBody>>,
    #[serde(default)]
    subject: String,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Serialize)]
struct SendEmailResponse {
    success: bool,
    message: String,
}

#[tracing::instrument(
    name = "Send email to donors",
    skip(_admin, repos, email_client, send_delay, body)
)]
#[post("/send-email")]
async fn send_email(
    _admin: Administrator,
    repos: web::Data<Repositories>,
    email_client: web::Data<EmailClient>,
    send_delay: web::Data<SendDelay>,
    body: web::Json<SendEmailBody>,
) -> RestResult<impl Responder> {
    let body = body.into_inner();
    let recipients: Vec<Recipient> = match body.recipients {
        Some(recipients) if !recipients.is_empty() => {
            recipients.into_iter().map(Recipient::from).collect()
        }
        _ => return Err(RestError::ParseError("Recipients required".into())),
    };

    if !email_client.has_credentials() {
        tracing::error!("Missing email credentials in settings");
        return Err(RestError::InternalError(
            "Server configuration error: Missing email credentials".into(),
        ));
    }

    let report = Dispatcher::new(repos.communications.as_ref())
        .send_batch_email(
            &email_client,
            send_delay.0,
            &recipients,
            &body.subject,
            &body.message,
        )
        .await;

    if report.all_failed() {
        return Err(RestError::InternalError("Failed to send all emails".into()));
    }

    Ok(HttpResponse::Ok().json(SendEmailResponse {
        success: true,
        message: format!(
            "Sent {} emails, failed {}",
            report.success_count, report.fail_count
        ),
    }))
}
