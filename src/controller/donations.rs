use actix_web::dev::HttpServiceFactory;
use actix_web::{get, post, web, HttpResponse, Responder};

use chrono::NaiveDate;

use rust_decimal::Decimal;

use serde::{Deserialize, Serialize};

use uuid::Uuid;

use crate::auth::Administrator;
use crate::domain::{
    DonationKind, InKindItem, NewDonation, PaymentMethod, ValidationErrors,
};
use crate::error::{Error, RestResult, Result};
use crate::repo::Repositories;

use super::{non_blank, parse_date, today};

#[derive(Debug, Deserialize)]
pub struct InKindItemForm {
    item: Option<String>,
    quantity: Option<Decimal>,
    unit: Option<String>,
}

/// Donation entry form, monetary or in-kind
#[derive(Debug, Deserialize)]
pub struct DonationForm {
    donor_id: Option<Uuid>,
    campaign_id: Option<Uuid>,
    amount: Option<Decimal>,
    donation_type: Option<String>,
    payment_method: Option<String>,
    #[serde(default)]
    items: Vec<InKindItemForm>,
    date: Option<String>,
}

impl DonationForm {
    /// Field checks that need no store lookup; the date defaults to `today`
    pub fn validate(self, today: NaiveDate) -> Result<NewDonation> {
        let mut errors = ValidationErrors::default();

        if self.donor_id.is_none() {
            errors.add("donor_id", "Donor is required");
        }
        if self.amount.is_some_and(|amount| amount < Decimal::ZERO) {
            errors.add("amount", "Amount cannot be negative");
        }
        let date = match non_blank(self.date) {
            Some(raw) => parse_date(&mut errors, "date", Some(&raw)),
            None => Some(today),
        };

        let kind = match non_blank(self.donation_type).as_deref() {
            None | Some("monetary") => {
                if self.amount.is_none() {
                    errors.add("amount", "Amount is required");
                }
                match non_blank(self.payment_method) {
                    Some(method) => errors
                        .check("payment_method", method.parse::<PaymentMethod>())
                        .map(|payment_method| DonationKind::Monetary { payment_method }),
                    None => {
                        errors.add("payment_method", "Payment method is required");
                        None
                    }
                }
            }
            Some("in-kind") => {
                let items: Vec<InKindItem> = self
                    .items
                    .into_iter()
                    .filter_map(|entry| {
                        Some(InKindItem {
                            item: non_blank(entry.item)?,
                            quantity: entry.quantity.unwrap_or(Decimal::ONE),
                            unit: non_blank(entry.unit).unwrap_or_default(),
                        })
                    })
                    .collect();
                if items.is_empty() {
                    errors.add("items", "At least one item is required");
                    None
                } else {
                    Some(DonationKind::InKind { items })
                }
            }
            Some(other) => {
                errors.add(
                    "donation_type",
                    format!("\"{}\" is not a valid donation type", other),
                );
                None
            }
        };

        match (self.donor_id, kind, date) {
            (Some(donor_id), Some(kind), Some(date)) if errors.is_empty() => Ok(NewDonation {
                donor_id,
                campaign_id: self.campaign_id,
                amount: self.amount.unwrap_or(Decimal::ZERO),
                kind,
                date,
            }),
            _ => Err(Error::ValidationError(errors)),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    donor_id: Option<Uuid>,
    campaign_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
struct Created {
    id: Uuid,
}

#[tracing::instrument(name = "List donations", skip(_admin, repos))]
#[get("")]
async fn list(
    _admin: Administrator,
    repos: web::Data<Repositories>,
    params: web::Query<ListParams>,
) -> RestResult<impl Responder> {
    let donations = match (params.donor_id, params.campaign_id) {
        (Some(donor_id), campaign_id) => {
            let mut donations = repos.donations.list_by_donor(donor_id).await?;
            if let Some(campaign_id) = campaign_id {
                donations.retain(|d| d.campaign_id == Some(campaign_id));
            }
            donations
        }
        (None, Some(campaign_id)) => repos.donations.list_by_campaign(campaign_id).await?,
        (None, None) => repos.donations.list().await?,
    };

    Ok(HttpResponse::Ok().json(donations))
}

#[tracing::instrument(name = "Log a donation", skip(_admin, repos, form))]
#[post("")]
async fn create(
    _admin: Administrator,
    repos: web::Data<Repositories>,
    form: web::Json<DonationForm>,
) -> RestResult<impl Responder> {
    let new_donation = form.into_inner().validate(today())?;

    let mut errors = ValidationErrors::default();
    if repos.donors.fetch(new_donation.donor_id).await?.is_none() {
        errors.add("donor_id", "Donor does not exist");
    }
    if let Some(campaign_id) = new_donation.campaign_id {
        if repos.campaigns.fetch(campaign_id).await?.is_none() {
            errors.add("campaign_id", "Campaign does not exist");
        }
    }
    errors.finish()?;

    let id = repos.donations.insert(&new_donation).await?;

    Ok(HttpResponse::Created().json(Created { id }))
}

/// Donation API endpoints
pub fn scope() -> impl HttpServiceFactory {
    web::scope("/donations").service(list).service(create)
}
