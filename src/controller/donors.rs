use actix_web::dev::HttpServiceFactory;
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};

use chrono::NaiveDate;

use serde::{Deserialize, Serialize};

use uuid::Uuid;

use crate::aggregate::DonorProfile;
use crate::auth::Administrator;
use crate::domain::{
    CommunicationRecord, Donation, Donor, DonorName, DonorStatus, DonorType, EmailAddress,
    MemorialDate, NewDonor, PhoneNumber, ValidationErrors,
};
use crate::error::{Error, RestResult, Result};
use crate::query::{DonorColumn, DonorQuery, SortDirection, SortState};
use crate::repo::Repositories;

use super::{non_blank, parse_date, today};

#[derive(Debug, Deserialize)]
pub struct MemorialDateForm {
    tag: Option<String>,
    date: Option<String>,
}

/// Donor registration and edit form
#[derive(Debug, Deserialize)]
pub struct DonorForm {
    #[serde(default)]
    name: String,
    email: Option<String>,
    phone: Option<String>,
    #[serde(rename = "type")]
    donor_type: Option<String>,
    status: Option<String>,
    birth_date: Option<String>,
    anniversary_date: Option<String>,
    social_media_handle: Option<String>,
    #[serde(default)]
    memorial_dates: Vec<MemorialDateForm>,
}

impl DonorForm {
    /// Validate every field, reporting all problems at once
    pub fn validate(self, today: NaiveDate) -> Result<NewDonor> {
        let mut errors = ValidationErrors::default();

        let name = errors.check("name", self.name.parse::<DonorName>());
        let email = errors.check(
            "email",
            self.email.unwrap_or_default().parse::<EmailAddress>(),
        );
        let phone = errors.check(
            "phone",
            self.phone.unwrap_or_default().parse::<PhoneNumber>(),
        );
        let donor_type = match non_blank(self.donor_type) {
            Some(value) => errors.check("type", value.parse::<DonorType>()),
            None => Some(DonorType::Individual),
        };
        let status = match non_blank(self.status) {
            Some(value) => errors.check("status", value.parse::<DonorStatus>()),
            None => Some(DonorStatus::Active),
        };

        let birth_date = parse_date(&mut errors, "birth_date", self.birth_date.as_deref());
        match birth_date {
            None if errors.get("birth_date").is_none() => {
                errors.add("birth_date", "Birth date is required")
            }
            Some(date) if date > today => {
                errors.add("birth_date", "Birth date cannot be in the future")
            }
            _ => {}
        }
        let anniversary_date = parse_date(
            &mut errors,
            "anniversary_date",
            self.anniversary_date.as_deref(),
        );

        let mut memorial_dates = Vec::new();
        for entry in self.memorial_dates {
            let tag = non_blank(entry.tag);
            let raw_date = non_blank(entry.date);
            if tag.is_none() && raw_date.is_none() {
                continue;
            }
            let date = parse_date(&mut errors, "memorial_dates", raw_date.as_deref());
            match (tag, date) {
                (Some(tag), Some(date)) => memorial_dates.push(MemorialDate { tag, date }),
                _ => errors.add(
                    "memorial_dates",
                    "Memorial entries need both a tag and a date",
                ),
            }
        }

        match (name, email, phone, donor_type, status, birth_date) {
            (Some(name), Some(email), Some(phone), Some(donor_type), Some(status), Some(birth_date))
                if errors.is_empty() =>
            {
                Ok(NewDonor {
                    name,
                    email,
                    phone,
                    donor_type,
                    status,
                    birth_date,
                    anniversary_date,
                    social_media_handle: non_blank(self.social_media_handle),
                    memorial_dates,
                })
            }
            _ => Err(Error::ValidationError(errors)),
        }
    }
}

/// Donor table state: search text, the current sort and an optional clicked column header
#[derive(Debug, Deserialize)]
pub struct ListParams {
    search: Option<String>,
    sort: Option<DonorColumn>,
    direction: Option<SortDirection>,
    toggle: Option<DonorColumn>,
}

impl From<ListParams> for DonorQuery {
    fn from(params: ListParams) -> Self {
        let query = DonorQuery::default()
            .with_search(params.search.unwrap_or_default())
            .with_sort(SortState {
                column: params.sort.unwrap_or_default(),
                direction: params.direction.unwrap_or_default(),
            });
        match params.toggle {
            Some(column) => query.sorted_by(column),
            None => query,
        }
    }
}

#[derive(Debug, Serialize)]
struct Created {
    id: Uuid,
}

#[derive(Debug, Serialize)]
struct DonorDetail {
    #[serde(flatten)]
    donor: Donor,
    profile: DonorProfile,
    donations: Vec<Donation>,
    communications: Vec<CommunicationRecord>,
}

#[tracing::instrument(name = "List donors", skip(_admin, repos))]
#[get("")]
async fn list(
    _admin: Administrator,
    repos: web::Data<Repositories>,
    params: web::Query<ListParams>,
) -> RestResult<impl Responder> {
    let donors = repos.donors.list().await?;
    let query: DonorQuery = params.into_inner().into();

    Ok(HttpResponse::Ok().json(query.apply(donors)))
}

#[tracing::instrument(name = "Register a donor", skip(_admin, repos, form))]
#[post("")]
async fn create(
    _admin: Administrator,
    repos: web::Data<Repositories>,
    form: web::Json<DonorForm>,
) -> RestResult<impl Responder> {
    let new_donor = form.into_inner().validate(today())?;
    let id = repos.donors.insert(&new_donor).await?;

    Ok(HttpResponse::Created().json(Created { id }))
}

#[tracing::instrument(name = "Fetch a donor", skip(_admin, repos))]
#[get("/{id}")]
async fn fetch(
    _admin: Administrator,
    repos: web::Data<Repositories>,
    path: web::Path<Uuid>,
) -> RestResult<impl Responder> {
    let id = path.into_inner();
    let donor = repos
        .donors
        .fetch(id)
        .await?
        .ok_or(Error::NotFound { entity: "Donor", id })?;
    let donations = repos.donations.list_by_donor(id).await?;
    let communications = repos.communications.list_by_donor(id).await?;

    Ok(HttpResponse::Ok().json(DonorDetail {
        profile: DonorProfile::new(id, &donations),
        donor,
        donations,
        communications,
    }))
}

#[tracing::instrument(name = "Update a donor", skip(_admin, repos, form))]
#[put("/{id}")]
async fn update(
    _admin: Administrator,
    repos: web::Data<Repositories>,
    path: web::Path<Uuid>,
    form: web::Json<DonorForm>,
) -> RestResult<impl Responder> {
    let donor = form.into_inner().validate(today())?;
    repos.donors.update(path.into_inner(), &donor).await?;

    Ok(HttpResponse::NoContent())
}

#[tracing::instrument(name = "Delete a donor", skip(_admin, repos))]
#[delete("/{id}")]
async fn remove(
    _admin: Administrator,
    repos: web::Data<Repositories>,
    path: web::Path<Uuid>,
) -> RestResult<impl Responder> {
    repos.donors.delete(path.into_inner()).await?;

    Ok(HttpResponse::NoContent())
}

/// Donor API endpoints
pub fn scope() -> impl HttpServiceFactory {
    web::scope("/donors")
        .service(list)
        .service(create)
        .service(fetch)
        .service(update)
        .service(remove)
}
