use actix_web::dev::HttpServiceFactory;
use actix_web::{get, post, web, HttpResponse, Responder};

use serde::{Deserialize, Serialize};

use uuid::Uuid;

use crate::auth::Administrator;
use crate::client::{WhatsAppClient, DEFAULT_TEMPLATE_LANGUAGE};
use crate::dispatch::Dispatcher;
use crate::domain::{Donor, PhoneNumber};
use crate::error::{Error, RestError, RestResult};
use crate::repo::Repositories;

use super::non_blank;

async fn fetch_donor(repos: &Repositories, id: Uuid) -> RestResult<Donor> {
    let donor = repos.donors.fetch(id).await?;
    donor.ok_or_else(|| Error::NotFound { entity: "Donor", id }.into())
}

#[derive(Debug, Deserialize)]
pub struct ChatBody {
    donor_id: Uuid,
    #[serde(default)]
    message: String,
    /// Overrides the donor's stored number
    phone: Option<String>,
}

#[derive(Debug, Serialize)]
struct ChatLink {
    url: String,
}

#[tracing::instrument(name = "Open a WhatsApp chat", skip(_admin, repos, body))]
#[post("/whatsapp")]
async fn whatsapp_chat(
    _admin: Administrator,
    repos: web::Data<Repositories>,
    body: web::Json<ChatBody>,
) -> RestResult<impl Responder> {
    let body = body.into_inner();
    let donor = fetch_donor(&repos, body.donor_id).await?;
    let phone = non_blank(body.phone)
        .or(donor.phone)
        .ok_or_else(|| RestError::ParseError("Donor has no phone number".into()))?;

    let url = Dispatcher::new(repos.communications.as_ref())
        .open_whatsapp_chat(donor.id, &phone, &body.message)
        .await?;

    Ok(HttpResponse::Ok().json(ChatLink {
        url: url.to_string(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct TemplateBody {
    donor_id: Uuid,
    template_name: String,
    language_code: Option<String>,
}

#[derive(Debug, Serialize)]
struct Success {
    success: bool,
}

#[tracing::instrument(
    name = "Send a WhatsApp template",
    skip(_admin, repos, whatsapp_client, body)
)]
#[post("/whatsapp/template")]
async fn whatsapp_template(
    _admin: Administrator,
    repos: web::Data<Repositories>,
    whatsapp_client: web::Data<WhatsAppClient>,
    body: web::Json<TemplateBody>,
) -> RestResult<impl Responder> {
    if !whatsapp_client.has_credentials() {
        tracing::error!("Missing WhatsApp credentials in settings");
        return Err(RestError::InternalError(
            "Server configuration error: Missing WhatsApp credentials".into(),
        ));
    }

    let body = body.into_inner();
    let donor = fetch_donor(&repos, body.donor_id).await?;
    let phone: PhoneNumber = donor
        .phone
        .as_deref()
        .unwrap_or_default()
        .parse()?;
    let language_code = non_blank(body.language_code)
        .unwrap_or_else(|| DEFAULT_TEMPLATE_LANGUAGE.to_string());

    Dispatcher::new(repos.communications.as_ref())
        .send_whatsapp_template(
            &whatsapp_client,
            donor.id,
            &phone,
            &body.template_name,
            &language_code,
        )
        .await?;

    Ok(HttpResponse::Ok().json(Success { success: true }))
}

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    donor_id: Uuid,
}

#[tracing::instrument(name = "Communication history", skip(_admin, repos))]
#[get("")]
async fn history(
    _admin: Administrator,
    repos: web::Data<Repositories>,
    params: web::Query<HistoryParams>,
) -> RestResult<impl Responder> {
    let records = repos.communications.list_by_donor(params.donor_id).await?;

    Ok(HttpResponse::Ok().json(records))
}

/// Communication API endpoints
pub fn scope() -> impl HttpServiceFactory {
    web::scope("/communications")
        .service(history)
        .service(whatsapp_chat)
        .service(whatsapp_template)
}
