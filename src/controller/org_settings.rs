use actix_web::dev::HttpServiceFactory;
use actix_web::{get, put, web, HttpResponse, Responder};

use serde::Deserialize;

use url::Url;

use crate::auth::Administrator;
use crate::domain::{EmailAddress, OrgSettingsUpdate, ValidationErrors};
use crate::error::{Error, RestError, RestResult, Result};
use crate::repo::Repositories;

use super::non_blank;

/// Organisation profile, integration and notification settings form
#[derive(Debug, Deserialize)]
pub struct SettingsForm {
    org_name: Option<String>,
    org_email: Option<String>,
    org_phone: Option<String>,
    org_address: Option<String>,
    website: Option<String>,
    upi_id: Option<String>,
    razorpay_key: Option<String>,
    notifications_enabled: Option<bool>,
}

impl SettingsForm {
    /// Only the name is required; contact fields are checked when present
    pub fn validate(self) -> Result<OrgSettingsUpdate> {
        let mut errors = ValidationErrors::default();

        let org_name = non_blank(self.org_name);
        if org_name.is_none() {
            errors.add("org_name", "Organization name is required");
        }
        let org_email = non_blank(self.org_email)
            .and_then(|email| errors.check("org_email", email.parse::<EmailAddress>()));
        let website = non_blank(self.website).and_then(|website| {
            let url = Url::parse(&website)
                .ok()
                .filter(|url| matches!(url.scheme(), "http" | "https"));
            if url.is_none() {
                errors.add("website", "Website must be an http(s) URL");
            }
            url
        });

        match org_name {
            Some(org_name) if errors.is_empty() => Ok(OrgSettingsUpdate {
                org_name,
                org_email,
                org_phone: non_blank(self.org_phone),
                org_address: non_blank(self.org_address),
                website,
                upi_id: non_blank(self.upi_id),
                razorpay_key: non_blank(self.razorpay_key),
                notifications_enabled: self.notifications_enabled.unwrap_or(true),
            }),
            _ => Err(Error::ValidationError(errors)),
        }
    }
}

#[tracing::instrument(name = "Fetch organisation settings", skip(_admin, repos))]
#[get("")]
async fn fetch_settings(
    _admin: Administrator,
    repos: web::Data<Repositories>,
) -> RestResult<impl Responder> {
    let settings = repos
        .settings
        .fetch()
        .await?
        .ok_or_else(|| RestError::NotFound("Settings have not been initialised".into()))?;

    Ok(HttpResponse::Ok().json(settings))
}

#[tracing::instrument(name = "Save organisation settings", skip(_admin, repos, form))]
#[put("")]
async fn save_settings(
    _admin: Administrator,
    repos: web::Data<Repositories>,
    form: web::Json<SettingsForm>,
) -> RestResult<impl Responder> {
    let update = form.into_inner().validate()?;
    let settings = repos.settings.update(&update).await?;

    Ok(HttpResponse::Ok().json(settings))
}

/// Organisation settings endpoints
pub fn scope() -> impl HttpServiceFactory {
    web::scope("/settings")
        .service(fetch_settings)
        .service(save_settings)
}
