use actix_web::dev::HttpServiceFactory;
use actix_web::{get, post, web, HttpResponse, Responder};

use chrono::NaiveDate;

use rust_decimal::Decimal;

use serde::{Deserialize, Serialize};

use uuid::Uuid;

use crate::aggregate::{campaign_progress, CampaignProgress, CampaignSummary};
use crate::auth::Administrator;
use crate::domain::{Donation, NewCampaign, ValidationErrors};
use crate::error::{Error, RestResult, Result};
use crate::repo::Repositories;

use super::{non_blank, parse_date, today};

#[derive(Debug, Deserialize)]
pub struct CampaignForm {
    title: Option<String>,
    description: Option<String>,
    goal_amount: Option<Decimal>,
    deadline: Option<String>,
}

impl CampaignForm {
    pub fn validate(self, today: NaiveDate) -> Result<NewCampaign> {
        let mut errors = ValidationErrors::default();

        let title = non_blank(self.title);
        if title.is_none() {
            errors.add("title", "Title is required");
        }
        let description = non_blank(self.description);
        if description.is_none() {
            errors.add("description", "Description is required");
        }
        let goal_amount = self.goal_amount.filter(|goal| *goal > Decimal::ZERO);
        if goal_amount.is_none() {
            errors.add("goal_amount", "Goal amount must be greater than 0");
        }
        let deadline = parse_date(&mut errors, "deadline", self.deadline.as_deref());
        match deadline {
            None => errors.add("deadline", "Deadline is required"),
            Some(date) if date <= today => errors.add("deadline", "Deadline must be in the future"),
            Some(_) => {}
        }

        match (title, description, goal_amount, deadline) {
            (Some(title), Some(description), Some(goal_amount), Some(deadline))
                if errors.is_empty() =>
            {
                Ok(NewCampaign {
                    title,
                    description,
                    goal_amount,
                    deadline,
                })
            }
            _ => Err(Error::ValidationError(errors)),
        }
    }
}

#[derive(Debug, Serialize)]
struct CampaignList {
    summary: CampaignSummary,
    campaigns: Vec<CampaignProgress>,
}

#[derive(Debug, Serialize)]
struct CampaignDetail {
    #[serde(flatten)]
    progress: CampaignProgress,
    /// Goal met while still stored as active
    newly_completed: bool,
    donations: Vec<Donation>,
}

#[derive(Debug, Serialize)]
struct Created {
    id: Uuid,
}

#[tracing::instrument(name = "List campaigns", skip(_admin, repos))]
#[get("")]
async fn list(_admin: Administrator, repos: web::Data<Repositories>) -> RestResult<impl Responder> {
    let campaigns = repos.campaigns.list().await?;
    let donations = repos.donations.list().await?;

    let campaigns = campaign_progress(campaigns, &donations);

    Ok(HttpResponse::Ok().json(CampaignList {
        summary: CampaignSummary::new(&campaigns),
        campaigns,
    }))
}

#[tracing::instrument(name = "Create a campaign", skip(_admin, repos, form))]
#[post("")]
async fn create(
    _admin: Administrator,
    repos: web::Data<Repositories>,
    form: web::Json<CampaignForm>,
) -> RestResult<impl Responder> {
    let new_campaign = form.into_inner().validate(today())?;
    let id = repos.campaigns.insert(&new_campaign).await?;

    Ok(HttpResponse::Created().json(Created { id }))
}

#[tracing::instrument(name = "Fetch a campaign", skip(_admin, repos))]
#[get("/{id}")]
async fn fetch(
    _admin: Administrator,
    repos: web::Data<Repositories>,
    path: web::Path<Uuid>,
) -> RestResult<impl Responder> {
    let id = path.into_inner();
    let campaign = repos.campaigns.fetch(id).await?.ok_or(Error::NotFound {
        entity: "Campaign",
        id,
    })?;
    let donations = repos.donations.list_by_campaign(id).await?;

    let progress = CampaignProgress::new(campaign, &donations);
    Ok(HttpResponse::Ok().json(CampaignDetail {
        newly_completed: progress.is_newly_completed(),
        progress,
        donations,
    }))
}

/// Campaign API endpoints
pub fn scope() -> impl HttpServiceFactory {
    web::scope("/campaigns")
        .service(list)
        .service(create)
        .service(fetch)
}
