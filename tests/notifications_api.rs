mod common;

use common::{test_config, TestApp, MOM};
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn mobile_inbox_limit_is_capped_by_max_page_size() {
    let mut config = test_config();
    config.paging.default_page_size = 2;
    config.paging.max_page_size = 3;
    let app = TestApp::with_config(config);

    for n in 0..5 {
        let row = json!({ "user_id": MOM, "title": format!("Note {n}"), "time": "2024-05-01T10:00:00Z" });
        app.state
            .store
            .insert("mobile_notifications", row.as_object().unwrap().clone())
            .await
            .unwrap();
    }

    let (status, body) = app.get("/api/mobile_notifications?limit=1000", Some(MOM)).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"].as_array().unwrap().len(), 3);

    let (_, body) = app.get("/api/mobile_notifications", Some(MOM)).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn mobile_inbox_requires_a_signed_in_user() {
    let app = TestApp::new();
    let (status, _) = app.get("/api/mobile_notifications", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
