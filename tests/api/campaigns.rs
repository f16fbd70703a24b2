use reqwest::StatusCode;

use rust_decimal::Decimal;

use serde_json::{json, Value};

use crate::helpers::{amount, TestApp};

#[tokio::test]
async fn campaigns_report_raised_amount_and_distinct_donors() {
    let app = TestApp::spawn().await;
    let asha = app.create_donor("Asha", "asha@example.com").await;
    let bala = app.create_donor("Bala", "bala@example.com").await;
    let campaign = app.create_campaign("School Kits", 10_000).await;
    app.create_donation(asha, Some(campaign), 2_000, "2024-03-01").await;
    app.create_donation(asha, Some(campaign), 1_000, "2024-03-05").await;
    app.create_donation(bala, Some(campaign), 500, "2024-03-09").await;
    app.create_donation(bala, None, 9_999, "2024-03-09").await;

    let detail = app.get_json(&format!("api/campaigns/{}", campaign)).await;

    assert_eq!(Decimal::from(3_500), amount(&detail["raised_amount"]));
    assert_eq!(2, detail["donor_count"]);
    assert_eq!(Decimal::from(35), amount(&detail["progress_pct"]));
    assert_eq!("Active", detail["effective_status"]);
    assert_eq!(3, detail["donations"].as_array().unwrap().len());
}

#[tokio::test]
async fn campaigns_funded_to_goal_are_completed() {
    let app = TestApp::spawn().await;
    let donor = app.create_donor("Asha", "asha@example.com").await;
    let goals = [1_000, 2_500, 40_000];
    for (i, goal) in goals.iter().enumerate() {
        let campaign = app.create_campaign(&format!("Campaign {}", i), *goal).await;
        app.create_donation(donor, Some(campaign), *goal, "2024-03-01").await;
    }

    let list = app.get_json("api/campaigns").await;

    let campaigns = list["campaigns"].as_array().unwrap();
    assert_eq!(3, campaigns.len());
    for campaign in campaigns {
        assert_eq!(Decimal::from(100), amount(&campaign["progress_pct"]));
        assert_eq!(Decimal::from(100), amount(&campaign["bar_width"]));
        assert_eq!("Completed", campaign["effective_status"]);
        assert_eq!("Active", campaign["status"]);
    }
    assert_eq!(3, list["summary"]["count"]);
    assert_eq!(Decimal::from(43_500), amount(&list["summary"]["total_raised"]));
}

#[tokio::test]
async fn overfunded_campaigns_keep_their_percentage_but_clamp_the_bar() {
    let app = TestApp::spawn().await;
    let donor = app.create_donor("Asha", "asha@example.com").await;
    let campaign = app.create_campaign("Winter Blankets", 1_000).await;
    app.create_donation(donor, Some(campaign), 1_500, "2024-03-01").await;

    let detail = app.get_json(&format!("api/campaigns/{}", campaign)).await;

    assert_eq!(Decimal::from(150), amount(&detail["progress_pct"]));
    assert_eq!(Decimal::from(100), amount(&detail["bar_width"]));
    assert_eq!(true, detail["newly_completed"]);
}

#[tokio::test]
async fn stored_completion_wins_over_progress() {
    let app = TestApp::spawn().await;
    let campaign = app.create_campaign("Closed Early", 1_000).await;
    app.store.mark_completed(campaign);

    let detail = app.get_json(&format!("api/campaigns/{}", campaign)).await;

    assert_eq!("Completed", detail["effective_status"]);
    assert_eq!(Decimal::ZERO, amount(&detail["progress_pct"]));
    assert_eq!(false, detail["newly_completed"]);
}

#[tokio::test]
async fn invalid_campaigns_are_rejected() {
    let app = TestApp::spawn().await;

    let res = app
        .post_json(
            "api/campaigns",
            &json!({
                "title": "Old News",
                "description": "Already over",
                "goal_amount": 0,
                "deadline": "2000-01-01",
            }),
        )
        .await;

    assert_eq!(StatusCode::BAD_REQUEST, res.status());
    let body: Value = res.json().await.unwrap();
    assert_eq!(
        "Goal amount must be greater than 0",
        body["fields"]["goal_amount"]
    );
    assert_eq!("Deadline must be in the future", body["fields"]["deadline"]);
}

#[tokio::test]
async fn unknown_campaigns_are_not_found() {
    let app = TestApp::spawn().await;

    let res = app
        .authorized(
            reqwest::Method::GET,
            &format!("api/campaigns/{}", uuid::Uuid::new_v4()),
        )
        .send()
        .await
        .unwrap();

    assert_eq!(StatusCode::NOT_FOUND, res.status());
}
