mod common;

use common::{TestApp, DAD, GRAN, MOM};
use reqwest::StatusCode;
use serde_json::json;

async fn note(app: &TestApp, progeny_id: i64, title: &str, level: i32) -> i64 {
    let (status, body) = app
        .post(
            "/api/notes",
            Some(MOM),
            json!({ "progeny_id": progeny_id, "title": title, "access_level": level, "tags": "firsts" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["data"]["id"].as_i64().unwrap()
}

#[tokio::test]
async fn items_above_the_requester_level_stay_hidden() {
    let app = TestApp::new();
    let progeny_id = app.create_progeny(MOM, "Kaya").await;

    let (status, _) = app
        .post("/api/access", Some(MOM), json!({ "progeny_id": progeny_id, "user_id": GRAN, "access_level": 2 }))
        .await;
    assert_eq!(status, StatusCode::OK);

    let private = note(&app, progeny_id, "Family only", 0).await;
    let _shared = note(&app, progeny_id, "Grandparents", 2).await;
    let _public = note(&app, progeny_id, "Everyone", 5).await;

    let (status, body) = app.get(&format!("/api/progeny/{progeny_id}/notes"), Some(GRAN)).await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = body["data"]["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles.len(), 2);
    assert!(!titles.contains(&"Family only"));

    // A single hidden item reads as missing
    let (status, body) = app.get(&format!("/api/notes/{private}"), Some(GRAN)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    let (_, body) = app.get(&format!("/api/progeny/{progeny_id}/timeline"), Some(GRAN)).await;
    assert_eq!(body["data"]["total_items"], 2);

    let (_, body) = app.get(&format!("/api/progeny/{progeny_id}/timeline"), Some(MOM)).await;
    assert_eq!(body["data"]["total_items"], 3);
}

#[tokio::test]
async fn strangers_and_anonymous_users_are_unauthorized() {
    let app = TestApp::new();
    let progeny_id = app.create_progeny(MOM, "Kaya").await;

    let (status, body) = app.get(&format!("/api/progeny/{progeny_id}/notes"), Some(DAD)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], true);

    let (status, _) = app.get(&format!("/api/progeny/{progeny_id}/notes"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.get("/api/progeny/999/notes", Some(MOM)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn the_public_progeny_is_readable_at_the_public_level() {
    let app = TestApp::new();
    app.create_progeny(MOM, "Kaya").await;
    let public_id = app.create_progeny(MOM, "Demo").await;
    assert_eq!(public_id, 2);

    note(&app, public_id, "Hidden", 1).await;
    note(&app, public_id, "Shown", 5).await;

    let (status, body) = app.get(&format!("/api/progeny/{public_id}/notes"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total_items"], 1);
    assert_eq!(body["data"]["items"][0]["title"], "Shown");
}

#[tokio::test]
async fn only_admins_write_content_regardless_of_grants() {
    let app = TestApp::new();
    let progeny_id = app.create_progeny(MOM, "Kaya").await;
    app.post(
        "/api/access",
        Some(MOM),
        json!({ "progeny_id": progeny_id, "user_id": GRAN, "access_level": 1, "can_contribute": true }),
    )
    .await;
    let id = note(&app, progeny_id, "First steps", 1).await;

    let (status, _) = app
        .post("/api/notes", Some(GRAN), json!({ "progeny_id": progeny_id, "title": "Mine", "access_level": 1 }))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.put(&format!("/api/notes/{id}"), Some(GRAN), json!({ "title": "Edited" })).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.delete(&format!("/api/notes/{id}"), Some(GRAN)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (_, body) = app.get(&format!("/api/notes/{id}"), Some(GRAN)).await;
    assert_eq!(body["data"]["title"], "First steps");

    // Contributors may still comment
    let (status, body) = app
        .post(&format!("/api/timeline/note/{id}/comments"), Some(GRAN), json!({ "comment_text": "So proud!" }))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let (_, body) = app.get(&format!("/api/timeline/note/{id}/comments"), Some(MOM)).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn granting_twice_conflicts_and_level_zero_makes_an_admin() {
    let app = TestApp::new();
    let progeny_id = app.create_progeny(MOM, "Kaya").await;

    let grant = json!({ "progeny_id": progeny_id, "user_id": "Dad@Example.com", "access_level": 0 });
    let (status, body) = app.post("/api/access", Some(MOM), grant.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user_id"], DAD);

    let (status, _) = app.post("/api/access", Some(MOM), grant).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = app.get(&format!("/api/progeny/{progeny_id}"), Some(DAD)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["is_admin"], true);
}
