use chrono::{Datelike, Months, Utc};

use rust_decimal::Decimal;

use crate::helpers::{amount, TestApp};

#[tokio::test]
async fn monthly_report_buckets_donations_by_month() {
    let app = TestApp::spawn().await;
    let donor = app.create_donor("Asha", "asha@example.com").await;
    app.create_donation(donor, None, 100, "2024-03-05").await;
    app.create_donation(donor, None, 200, "2024-03-20").await;
    app.create_donation(donor, None, 50, "2023-03-10").await;

    let report = app.get_json("api/reports/monthly?year=2024").await;

    assert_eq!(2024, report["year"]);
    let months = report["months"].as_array().unwrap();
    assert_eq!(12, months.len());
    assert_eq!("Mar", months[2]["month"]);
    assert_eq!(Decimal::from(300), amount(&months[2]["amount"]));
    assert_eq!(Decimal::ZERO, amount(&months[0]["amount"]));
}

#[tokio::test]
async fn empty_store_reports_zeroes() {
    let app = TestApp::spawn().await;

    let dashboard = app.get_json("api/reports/dashboard").await;
    assert_eq!(Decimal::ZERO, amount(&dashboard["total_donations"]["value"]));
    assert_eq!("0%", dashboard["total_donations"]["change_label"]);
    assert_eq!("up", dashboard["total_donations"]["change"]["trend"]);

    let donations = app.get_json("api/reports/donations").await;
    assert_eq!(Decimal::ZERO, amount(&donations["summary"]["total"]));
    assert_eq!(Decimal::ZERO, amount(&donations["summary"]["average"]));
    assert_eq!("₹0", donations["summary"]["total_label"]);

    let donors = app.get_json("api/reports/donors").await;
    assert_eq!(Decimal::ZERO, amount(&donors["retention"]["retention_rate"]));

    let activity = app.get_json("api/reports/activity").await;
    assert!(activity.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn dashboard_compares_this_month_with_the_last() {
    let app = TestApp::spawn().await;
    let donor = app.create_donor("Asha", "asha@example.com").await;
    let today = Utc::now().date_naive();
    let last_month = today.checked_sub_months(Months::new(1)).unwrap();
    app.create_donation(donor, None, 50, &last_month.to_string()).await;
    app.create_donation(donor, None, 100, &today.to_string()).await;

    let dashboard = app.get_json("api/reports/dashboard").await;

    let card = &dashboard["total_donations"];
    assert_eq!(Decimal::from(150), amount(&card["value"]));
    assert_eq!(Decimal::from(100), amount(&card["change"]["change"]));
    assert_eq!("up", card["change"]["trend"]);
    assert_eq!(Decimal::ONE, amount(&dashboard["donors"]["value"]));
}

#[tokio::test]
async fn donor_report_classifies_retention() {
    let app = TestApp::spawn().await;
    let never = app.create_donor("Anu", "anu@example.com").await;
    let once = app.create_donor("Bala", "bala@example.com").await;
    let twice = app.create_donor("Chitra", "chitra@example.com").await;
    let thrice = app.create_donor("Dev", "dev@example.com").await;
    let _ = never;
    app.create_donation(once, None, 10, "2024-01-01").await;
    app.create_donation(twice, None, 10, "2024-01-01").await;
    for _ in 0..3 {
        app.create_donation(thrice, None, 10, "2024-01-01").await;
    }

    let report = app.get_json("api/reports/donors").await;

    assert_eq!(4, report["total"]);
    assert_eq!(1, report["retention"]["new"]);
    assert_eq!(2, report["retention"]["one_time"]);
    assert_eq!(1, report["retention"]["recurring"]);
    assert_eq!(Decimal::new(250, 1), amount(&report["retention"]["retention_rate"]));
    assert_eq!(4, report["activity"]["active"]);
}

#[tokio::test]
async fn campaign_report_ranks_the_top_five() {
    let app = TestApp::spawn().await;
    let donor = app.create_donor("Asha", "asha@example.com").await;
    for raised in [100, 600, 300, 0, 500, 200] {
        let campaign = app
            .create_campaign(&format!("A rather long campaign {}", raised), 1_000)
            .await;
        if raised > 0 {
            app.create_donation(donor, Some(campaign), raised, "2024-01-01")
                .await;
        }
    }

    let report = app.get_json("api/reports/campaigns").await;

    let top = report["top"].as_array().unwrap();
    assert_eq!(5, top.len());
    assert_eq!(Decimal::from(600), amount(&top[0]["value"]));
    assert_eq!("A rather long c...", top[0]["name"]);
    assert_eq!(Decimal::from(100), amount(&top[4]["value"]));
    assert_eq!(5, report["distribution"].as_array().unwrap().len());
    assert_eq!(6, report["summary"]["count"]);
}

#[tokio::test]
async fn calendar_lists_events_on_the_requested_day() {
    let app = TestApp::spawn().await;
    app.create_donor("Jane Smith", "jane@example.com").await;
    let year = Utc::now().year();

    let report = app
        .get_json(&format!("api/reports/calendar?date={}-07-04", year))
        .await;

    assert_eq!(year, report["year"]);
    let events = report["events"].as_array().unwrap();
    assert_eq!(1, events.len());
    assert_eq!("Jane Smith's Birthday", events[0]["description"]);
    assert_eq!("birthday", events[0]["kind"]);
    assert_eq!(1, report["days"][format!("{}-07-04", year)]);
}

#[tokio::test]
async fn calendar_rejects_malformed_dates() {
    let app = TestApp::spawn().await;

    let res = app
        .authorized(reqwest::Method::GET, "api/reports/calendar?date=July")
        .send()
        .await
        .unwrap();

    assert_eq!(reqwest::StatusCode::BAD_REQUEST, res.status());
}

#[tokio::test]
async fn activity_feed_is_newest_first() {
    let app = TestApp::spawn().await;
    let donor = app.create_donor("Asha", "asha@example.com").await;
    app.create_donation(donor, None, 10, "2020-01-01").await;

    let feed = app.get_json("api/reports/activity").await;

    let feed = feed.as_array().unwrap();
    assert_eq!(2, feed.len());
    assert_eq!("New Donor Registered", feed[0]["title"]);
    assert_eq!("From Asha", feed[1]["subtitle"]);
}

#[tokio::test]
async fn activity_log_honours_the_requested_length() {
    let app = TestApp::spawn().await;
    let donor = app.create_donor("Asha", "asha@example.com").await;
    for day in 1..=9 {
        app.create_donation(donor, None, 10, &format!("2020-01-0{}", day))
            .await;
    }

    let dashboard_feed = app.get_json("api/reports/activity").await;
    let full_log = app.get_json("api/reports/activity?limit=50").await;

    assert_eq!(5, dashboard_feed.as_array().unwrap().len());
    assert_eq!(10, full_log.as_array().unwrap().len());
}
