use std::collections::BTreeMap;

use actix_web::dev::HttpServiceFactory;
use actix_web::{get, web, HttpResponse, Responder};

use chrono::{Datelike, NaiveDate};

use serde::{Deserialize, Serialize};

use crate::aggregate::{
    campaign_progress, composition, distribution, monthly_totals, progress_bars, recent_activity,
    top_campaigns, totals_by_donor_type, ActivitySplit, CalendarEvent, CampaignBar,
    CampaignSummary, DashboardStats, DonationSummary, EventCalendar, MonthlyTotal, Retention,
    Share, DEFAULT_FEED_LEN,
};
use crate::auth::Administrator;
use crate::error::{RestError, RestResult};
use crate::repo::Repositories;

use super::today;

#[tracing::instrument(name = "Dashboard stats", skip(_admin, repos))]
#[get("/dashboard")]
async fn dashboard_report(
    _admin: Administrator,
    repos: web::Data<Repositories>,
) -> RestResult<impl Responder> {
    let donors = repos.donors.list().await?;
    let donations = repos.donations.list().await?;
    let campaigns = repos.campaigns.list().await?;

    Ok(HttpResponse::Ok().json(DashboardStats::compute(
        &donors,
        &donations,
        &campaigns,
        today(),
    )))
}

#[derive(Debug, Deserialize)]
pub struct YearParams {
    year: Option<i32>,
}

#[derive(Debug, Serialize)]
struct MonthlyReport {
    year: i32,
    months: Vec<MonthlyTotal>,
}

#[tracing::instrument(name = "Monthly donation totals", skip(_admin, repos))]
#[get("/monthly")]
async fn monthly_report(
    _admin: Administrator,
    repos: web::Data<Repositories>,
    params: web::Query<YearParams>,
) -> RestResult<impl Responder> {
    let year = params.year.unwrap_or_else(|| today().year());
    let donations = repos.donations.list().await?;

    Ok(HttpResponse::Ok().json(MonthlyReport {
        year,
        months: monthly_totals(year, &donations),
    }))
}

#[derive(Debug, Serialize)]
struct DonationReport {
    summary: DonationSummary,
    composition: Vec<Share>,
    by_donor_type: Vec<Share>,
}

#[tracing::instrument(name = "Donation report", skip(_admin, repos))]
#[get("/donations")]
async fn donation_report(
    _admin: Administrator,
    repos: web::Data<Repositories>,
) -> RestResult<impl Responder> {
    let donors = repos.donors.list().await?;
    let donations = repos.donations.list().await?;

    Ok(HttpResponse::Ok().json(DonationReport {
        summary: DonationSummary::from_donations(&donations),
        composition: composition(&donations),
        by_donor_type: totals_by_donor_type(&donations, &donors),
    }))
}

#[derive(Debug, Serialize)]
struct Slice {
    name: &'static str,
    value: usize,
}

#[derive(Debug, Serialize)]
struct DonorReport {
    total: usize,
    retention: Retention,
    retention_slices: Vec<Slice>,
    activity: ActivitySplit,
}

#[tracing::instrument(name = "Donor report", skip(_admin, repos))]
#[get("/donors")]
async fn donor_report(
    _admin: Administrator,
    repos: web::Data<Repositories>,
) -> RestResult<impl Responder> {
    let donors = repos.donors.list().await?;
    let donations = repos.donations.list().await?;

    let retention = Retention::compute(&donors, &donations);
    let retention_slices = retention
        .slices()
        .into_iter()
        .map(|(name, value)| Slice { name, value })
        .collect();

    Ok(HttpResponse::Ok().json(DonorReport {
        total: donors.len(),
        retention,
        retention_slices,
        activity: ActivitySplit::compute(&donors),
    }))
}

#[derive(Debug, Serialize)]
struct CampaignReport {
    summary: CampaignSummary,
    top: Vec<CampaignBar>,
    distribution: Vec<Share>,
}

#[tracing::instrument(name = "Campaign report", skip(_admin, repos))]
#[get("/campaigns")]
async fn campaign_report(
    _admin: Administrator,
    repos: web::Data<Repositories>,
) -> RestResult<impl Responder> {
    let campaigns = repos.campaigns.list().await?;
    let donations = repos.donations.list().await?;

    let progress = campaign_progress(campaigns, &donations);
    let top = top_campaigns(&progress);

    Ok(HttpResponse::Ok().json(CampaignReport {
        summary: CampaignSummary::new(&progress),
        top: progress_bars(&top),
        distribution: distribution(&top),
    }))
}

#[derive(Debug, Deserialize)]
pub struct ActivityParams {
    /// Feed length, capped at the full log size
    limit: Option<usize>,
}

#[tracing::instrument(name = "Recent activity", skip(_admin, repos))]
#[get("/activity")]
async fn activity_report(
    _admin: Administrator,
    repos: web::Data<Repositories>,
    params: web::Query<ActivityParams>,
) -> RestResult<impl Responder> {
    let donors = repos.donors.list().await?;
    let donations = repos.donations.list().await?;
    let limit = params.limit.unwrap_or(DEFAULT_FEED_LEN);

    Ok(HttpResponse::Ok().json(recent_activity(&donors, &donations, limit)))
}

#[derive(Debug, Deserialize)]
pub struct CalendarParams {
    date: Option<String>,
}

#[derive(Debug, Serialize)]
struct CalendarReport<'a> {
    year: i32,
    date: NaiveDate,
    /// Events on `date`
    events: Vec<&'a CalendarEvent>,
    /// Event count per day of the year, for calendar badges
    days: BTreeMap<NaiveDate, usize>,
}

#[tracing::instrument(name = "Event calendar", skip(_admin, repos))]
#[get("/calendar")]
async fn calendar_report(
    _admin: Administrator,
    repos: web::Data<Repositories>,
    params: web::Query<CalendarParams>,
) -> RestResult<impl Responder> {
    let date = match params.date.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
        Some(raw) => raw
            .parse::<NaiveDate>()
            .map_err(|_| RestError::ParseError(format!("\"{}\" is not a valid date", raw)))?,
        None => today(),
    };
    let donors = repos.donors.list().await?;

    let calendar = EventCalendar::for_year(&donors, date.year());
    let days = calendar
        .by_day()
        .into_iter()
        .map(|(day, events)| (day, events.len()))
        .collect();

    Ok(HttpResponse::Ok().json(CalendarReport {
        year: calendar.year(),
        date,
        events: calendar.events_on(date),
        days,
    }))
}

/// Reporting API endpoints
pub fn scope() -> impl HttpServiceFactory {
    web::scope("/reports")
        .service(dashboard_report)
        .service(monthly_report)
        .service(donation_report)
        .service(donor_report)
        .service(campaign_report)
        .service(activity_report)
        .service(calendar_report)
}
