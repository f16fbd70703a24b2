use reqwest::{Method, StatusCode};

use serde_json::{json, Value};

use crate::helpers::TestApp;

async fn put_settings(app: &TestApp, body: &Value) -> reqwest::Response {
    app.authorized(Method::PUT, "api/settings")
        .json(body)
        .send()
        .await
        .expect("Failed to execute request")
}

#[tokio::test]
async fn default_settings_are_served() {
    let app = TestApp::spawn().await;

    let settings = app.get_json("api/settings").await;

    assert_eq!("My Charitable Trust", settings["org_name"]);
    assert_eq!(true, settings["notifications_enabled"]);
}

#[tokio::test]
async fn saved_settings_are_read_back() {
    let app = TestApp::spawn().await;
    let before = app.get_json("api/settings").await;

    let res = put_settings(
        &app,
        &json!({
            "org_name": "Hope Foundation",
            "org_email": "Hello@Hope.org",
            "org_phone": "+91 98765 43210",
            "website": "https://hope.org",
            "upi_id": "hope@upi",
            "notifications_enabled": false,
        }),
    )
    .await;
    assert_eq!(StatusCode::OK, res.status());

    let settings = app.get_json("api/settings").await;
    assert_eq!(before["id"], settings["id"]);
    assert_eq!("Hope Foundation", settings["org_name"]);
    assert_eq!("hello@hope.org", settings["org_email"]);
    assert_eq!("https://hope.org/", settings["website"]);
    assert_eq!(false, settings["notifications_enabled"]);
    assert!(settings["razorpay_key"].is_null());
}

#[tokio::test]
async fn invalid_settings_are_rejected() {
    let app = TestApp::spawn().await;

    let res = put_settings(
        &app,
        &json!({ "org_name": "Hope Foundation", "org_email": "hope.org" }),
    )
    .await;

    assert_eq!(StatusCode::BAD_REQUEST, res.status());
    let body: Value = res.json().await.unwrap();
    assert!(body["fields"]["org_email"].is_string());

    let settings = app.get_json("api/settings").await;
    assert_eq!("My Charitable Trust", settings["org_name"]);
}

#[tokio::test]
async fn settings_require_an_administrator() {
    let app = TestApp::spawn().await;

    let res = app
        .request(Method::GET, "api/settings")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(StatusCode::UNAUTHORIZED, res.status());
}
