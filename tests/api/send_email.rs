use reqwest::StatusCode;

use serde_json::{json, Value};

use wiremock::matchers::*;
use wiremock::{Mock, ResponseTemplate};

use donor_desk::domain::{Channel, DeliveryStatus};

use crate::helpers::TestApp;

#[tokio::test]
async fn personalised_emails_are_sent_to_every_recipient() {
    let app = TestApp::spawn().await;

    Mock::given(path("/email"))
        .and(method("POST"))
        .and(body_partial_json(json!({
            "To": "asha@example.com",
            "Subject": "Thank you Asha",
            "TextBody": "Dear Asha, your gift matters."
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.email_server)
        .await;
    Mock::given(path("/email"))
        .and(body_partial_json(json!({
            "To": "friend@example.com",
            "Subject": "Thank you Donor"
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.email_server)
        .await;

    let res = app
        .post_json(
            "api/send-email",
            &json!({
                "recipients": [
                    { "email": "asha@example.com", "name": "Asha" },
                    "friend@example.com"
                ],
                "subject": "Thank you {{name}}",
                "message": "Dear {{name}}, your gift matters."
            }),
        )
        .await;

    assert_eq!(StatusCode::OK, res.status());
    let body: Value = res.json().await.unwrap();
    assert_eq!(true, body["success"]);
    assert_eq!("Sent 2 emails, failed 0", body["message"]);
}

#[tokio::test]
async fn a_partial_failure_is_still_a_success() {
    let app = TestApp::spawn().await;
    let donor_id = app.create_donor("Bala", "bala@example.com").await;

    Mock::given(body_partial_json(json!({ "To": "bala@example.com" })))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&app.email_server)
        .await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&app.email_server)
        .await;

    let res = app
        .post_json(
            "api/send-email",
            &json!({
                "recipients": [
                    { "email": "asha@example.com", "name": "Asha" },
                    { "email": "bala@example.com", "name": "Bala", "donor_id": donor_id },
                    { "email": "chitra@example.com", "name": "Chitra" }
                ],
                "subject": "Hello",
                "message": "Hi {{name}}"
            }),
        )
        .await;

    assert_eq!(StatusCode::OK, res.status());
    let body: Value = res.json().await.unwrap();
    assert_eq!("Sent 2 emails, failed 1", body["message"]);

    let logged = app.store.communications();
    assert_eq!(1, logged.len());
    assert_eq!(donor_id, logged[0].donor_id);
    assert_eq!(Channel::Email, logged[0].channel);
    assert_eq!(DeliveryStatus::Failed, logged[0].status);
    assert_eq!("Hi Bala", logged[0].content);
}

#[tokio::test]
async fn all_failures_are_a_server_error() {
    let app = TestApp::spawn().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&app.email_server)
        .await;

    let res = app
        .post_json(
            "api/send-email",
            &json!({
                "recipients": ["a@example.com", "b@example.com"],
                "subject": "Hello",
                "message": "Hi"
            }),
        )
        .await;

    assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, res.status());
    let body: Value = res.json().await.unwrap();
    assert_eq!("Failed to send all emails", body["error"]);
}

#[tokio::test]
async fn missing_or_empty_recipients_are_rejected() {
    let app = TestApp::spawn().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.email_server)
        .await;

    let test_cases = vec![
        ("missing recipients", json!({ "subject": "Hi", "message": "Hello" })),
        (
            "empty recipients",
            json!({ "recipients": [], "subject": "Hi", "message": "Hello" }),
        ),
    ];

    for (description, body) in test_cases {
        let res = app.post_json("api/send-email", &body).await;

        assert_eq!(
            StatusCode::BAD_REQUEST,
            res.status(),
            "The API did not reject a request with {}",
            description
        );
        let body: Value = res.json().await.unwrap();
        assert_eq!("Recipients required", body["error"]);
    }
}

#[tokio::test]
async fn recipients_without_an_address_are_skipped() {
    let app = TestApp::spawn().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.email_server)
        .await;

    let res = app
        .post_json(
            "api/send-email",
            &json!({
                "recipients": [{ "name": "No Email" }, "a@example.com"],
                "subject": "Hello",
                "message": "Hi"
            }),
        )
        .await;

    let body: Value = res.json().await.unwrap();
    assert_eq!("Sent 1 emails, failed 0", body["message"]);
}

#[tokio::test]
async fn missing_provider_credentials_are_a_server_error() {
    let app = TestApp::spawn_with_email_token("").await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.email_server)
        .await;

    let res = app
        .post_json(
            "api/send-email",
            &json!({ "recipients": ["a@example.com"], "subject": "Hi", "message": "Hello" }),
        )
        .await;

    assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, res.status());
    let body: Value = res.json().await.unwrap();
    assert_eq!(
        "Server configuration error: Missing email credentials",
        body["error"]
    );
}
