use reqwest::StatusCode;

use rust_decimal::Decimal;

use serde_json::{json, Value};

use uuid::Uuid;

use crate::helpers::{amount, TestApp};

#[tokio::test]
async fn monetary_donations_are_logged() {
    let app = TestApp::spawn().await;
    let donor = app.create_donor("Asha", "asha@example.com").await;

    app.create("api/donations", json!({
        "donor_id": donor,
        "amount": "1250.50",
        "payment_method": "Bank Transfer",
        "date": "2024-03-15",
    }))
    .await;

    let donations = app.get_json("api/donations").await;
    let donation = &donations[0];
    assert_eq!(Decimal::new(125050, 2), amount(&donation["amount"]));
    assert_eq!("monetary", donation["donation_type"]);
    assert_eq!("Bank Transfer", donation["payment_method"]);
    assert_eq!("2024-03-15", donation["date"]);
}

#[tokio::test]
async fn in_kind_donations_list_their_items() {
    let app = TestApp::spawn().await;
    let donor = app.create_donor("Asha", "asha@example.com").await;

    app.create("api/donations", json!({
        "donor_id": donor,
        "donation_type": "in-kind",
        "items": [
            { "item": "Rice", "quantity": 25, "unit": "kg" },
            { "item": "", "quantity": 1, "unit": "" }
        ],
        "date": "2024-03-15",
    }))
    .await;

    let donations = app.get_json("api/donations").await;
    let donation = &donations[0];
    assert_eq!("in-kind", donation["donation_type"]);
    assert_eq!(Decimal::ZERO, amount(&donation["amount"]));
    assert_eq!(1, donation["items"].as_array().unwrap().len());
    assert_eq!("Rice", donation["items"][0]["item"]);
}

#[tokio::test]
async fn donations_need_an_existing_donor_and_campaign() {
    let app = TestApp::spawn().await;

    let res = app
        .post_json(
            "api/donations",
            &json!({
                "donor_id": Uuid::new_v4(),
                "campaign_id": Uuid::new_v4(),
                "amount": 100,
                "payment_method": "Cash",
            }),
        )
        .await;

    assert_eq!(StatusCode::BAD_REQUEST, res.status());
    let body: Value = res.json().await.unwrap();
    assert_eq!("Donor does not exist", body["fields"]["donor_id"]);
    assert_eq!("Campaign does not exist", body["fields"]["campaign_id"]);
    assert_eq!(0, app.store.donation_count());
}

#[tokio::test]
async fn invalid_donations_are_rejected() {
    let app = TestApp::spawn().await;
    let donor = app.create_donor("Asha", "asha@example.com").await;

    let test_cases = vec![
        (
            json!({ "donor_id": donor, "amount": 100 }),
            "payment_method",
            "Payment method is required",
        ),
        (
            json!({ "donor_id": donor, "amount": -5, "payment_method": "Cash" }),
            "amount",
            "Amount cannot be negative",
        ),
        (
            json!({ "donor_id": donor, "amount": 10, "payment_method": "Barter" }),
            "payment_method",
            "\"Barter\" is not a valid PaymentMethod",
        ),
        (
            json!({ "donor_id": donor, "donation_type": "in-kind", "items": [] }),
            "items",
            "At least one item is required",
        ),
    ];

    for (body, field, message) in test_cases {
        let res = app.post_json("api/donations", &body).await;

        assert_eq!(StatusCode::BAD_REQUEST, res.status(), "{} was accepted", body);
        let body: Value = res.json().await.unwrap();
        assert_eq!(message, body["fields"][field]);
    }
    assert_eq!(0, app.store.donation_count());
}

#[tokio::test]
async fn donations_can_be_filtered_by_donor_and_campaign() {
    let app = TestApp::spawn().await;
    let asha = app.create_donor("Asha", "asha@example.com").await;
    let bala = app.create_donor("Bala", "bala@example.com").await;
    let campaign = app.create_campaign("School Kits", 10_000).await;
    app.create_donation(asha, Some(campaign), 100, "2024-03-01").await;
    app.create_donation(asha, None, 200, "2024-03-02").await;
    app.create_donation(bala, Some(campaign), 300, "2024-03-03").await;

    let by_donor = app.get_json(&format!("api/donations?donor_id={}", asha)).await;
    let by_campaign = app
        .get_json(&format!("api/donations?campaign_id={}", campaign))
        .await;
    let both = app
        .get_json(&format!(
            "api/donations?donor_id={}&campaign_id={}",
            asha, campaign
        ))
        .await;

    assert_eq!(2, by_donor.as_array().unwrap().len());
    assert_eq!(2, by_campaign.as_array().unwrap().len());
    assert_eq!(1, both.as_array().unwrap().len());
}

#[tokio::test]
async fn malformed_bodies_are_json_errors() {
    let app = TestApp::spawn().await;

    let res = app
        .post_json("api/donations", &json!({ "donor_id": "not-a-uuid" }))
        .await;

    assert_eq!(StatusCode::BAD_REQUEST, res.status());
    let body: Value = res.json().await.unwrap();
    assert!(body["error"].is_string());
}
