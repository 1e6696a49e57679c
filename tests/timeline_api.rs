mod common;

use common::{TestApp, DAD, GRAN, MOM};
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn creating_content_mirrors_exactly_one_timeline_item() {
    let app = TestApp::new();
    let progeny_id = app.create_progeny(MOM, "Kaya").await;

    let (status, body) = app
        .post(
            "/api/pictures",
            Some(MOM),
            json!({
                "progeny_id": progeny_id,
                "access_level": 3,
                "picture_link": "https://media.example.com/1.jpg",
                "picture_taken": "2024-05-01T10:00:00Z",
                "tags": "beach"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let picture_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = app.get(&format!("/api/timeline/picture/{picture_id}"), Some(MOM)).await;
    assert_eq!(status, StatusCode::OK);
    let item = &body["data"];
    assert_eq!(item["item_id"], picture_id.to_string());
    assert_eq!(item["item_type"], "picture");
    assert_eq!(item["progeny_id"], progeny_id);
    assert_eq!(item["access_level"], 3);

    let (_, body) = app.get(&format!("/api/progeny/{progeny_id}/timeline"), Some(MOM)).await;
    assert_eq!(body["data"]["total_items"], 1);

    // Access level changes follow the item
    let (status, _) = app.put(&format!("/api/pictures/{picture_id}"), Some(MOM), json!({ "access_level": 1 })).await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = app.get(&format!("/api/timeline/picture/{picture_id}"), Some(MOM)).await;
    assert_eq!(body["data"]["access_level"], 1);

    let (status, _) = app.delete(&format!("/api/pictures/{picture_id}"), Some(MOM)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.get(&format!("/api/timeline/picture/{picture_id}"), Some(MOM)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, body) = app.get(&format!("/api/progeny/{progeny_id}/timeline"), Some(MOM)).await;
    assert_eq!(body["data"]["total_items"], 0);
}

#[tokio::test]
async fn calendar_writes_for_progeny_five_require_admin_and_notify_once() {
    let app = TestApp::new();
    let mut progeny_id = 0;
    for name in ["Kaya", "Demo", "Aput", "Nivi", "Ane"] {
        progeny_id = app.create_progeny(MOM, name).await;
    }
    assert_eq!(progeny_id, 5);
    app.post("/api/access", Some(MOM), json!({ "progeny_id": 5, "user_id": GRAN, "access_level": 1 }))
        .await;

    let event = json!({
        "progeny_id": 5,
        "access_level": 1,
        "title": "Swimming lesson",
        "start_time": "2024-06-01T09:00:00Z",
        "end_time": "2024-06-01T10:00:00Z"
    });

    let (status, _) = app.post("/api/calendar", Some(DAD), event.clone()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (_, body) = app.get("/api/progeny/5/timeline", Some(MOM)).await;
    assert_eq!(body["data"]["total_items"], 0);
    assert_eq!(app.push_count(), 0);
    assert_eq!(app.web_count(), 0);

    let (status, body) = app.post("/api/calendar", Some(MOM), event).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let id = body["data"]["id"].as_i64().unwrap();
    assert!(id > 0);
    assert_eq!(body["data"]["author"], MOM);

    let (status, body) = app.get(&format!("/api/timeline/calendar/{id}"), Some(MOM)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["progeny_id"], 5);
    assert_eq!(body["data"]["created_by"], MOM);

    assert_eq!(app.push_count(), 1);
    assert_eq!(app.web_count(), 1);
    let push = app.push.sent.lock().unwrap()[0].clone();
    assert_eq!(push.item.item_id, id.to_string());
    assert_eq!(push.recipients, vec![GRAN.to_string()]);
    assert!(push.title.starts_with("Calendar item added"));
}

#[tokio::test]
async fn feed_pages_number_items_chronologically() {
    let app = TestApp::new();
    let progeny_id = app.create_progeny(MOM, "Kaya").await;
    for day in 1..=25 {
        let (status, _) = app
            .post(
                "/api/vocabulary",
                Some(MOM),
                json!({
                    "progeny_id": progeny_id,
                    "access_level": 0,
                    "word": format!("word{day}"),
                    "date": format!("2024-01-{day:02}T12:00:00Z")
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, body) = app
        .get(&format!("/api/progeny/{progeny_id}/timeline?page=2&page_size=10"), Some(MOM))
        .await;
    let page = &body["data"];
    assert_eq!(page["total_pages"], 3);
    let numbers: Vec<i64> = page["items"].as_array().unwrap().iter().map(|i| i["number"].as_i64().unwrap()).collect();
    assert_eq!(numbers, (6..=15).rev().collect::<Vec<_>>());

    let (_, body) = app
        .get(&format!("/api/progeny/{progeny_id}/timeline?page=2&page_size=10&sort=0"), Some(MOM))
        .await;
    let numbers: Vec<i64> = body["data"]["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["number"].as_i64().unwrap())
        .collect();
    assert_eq!(numbers, (11..=20).collect::<Vec<_>>());
}

#[tokio::test]
async fn deleting_a_progeny_removes_its_content() {
    let app = TestApp::new();
    let progeny_id = app.create_progeny(MOM, "Kaya").await;
    app.post("/api/notes", Some(MOM), json!({ "progeny_id": progeny_id, "title": "Hello" })).await;

    let (status, _) = app.delete(&format!("/api/progeny/{progeny_id}"), Some(DAD)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.delete(&format!("/api/progeny/{progeny_id}"), Some(MOM)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.get(&format!("/api/progeny/{progeny_id}/timeline"), Some(MOM)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(app.state.timeline.list_by_progeny(progeny_id as i32).await.unwrap().len(), 0);
}

#[tokio::test]
async fn post_write_observer_failures_do_not_fail_the_committed_write() {
    let app = TestApp::new();
    let progeny_id = app.create_progeny(MOM, "Kaya").await;

    // A profile row that cannot be decoded breaks the audience lookup
    let row = json!({ "user_email": MOM, "view_child": "not a number" });
    app.state
        .store
        .insert("user_info", row.as_object().unwrap().clone())
        .await
        .unwrap();

    let (status, body) = app
        .post("/api/notes", Some(MOM), json!({ "progeny_id": progeny_id, "title": "Hello" }))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let note_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = app.get(&format!("/api/notes/{note_id}"), Some(MOM)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Hello");
    assert_eq!(app.state.timeline.list_by_progeny(progeny_id as i32).await.unwrap().len(), 1);
}

#[tokio::test]
async fn updates_cannot_move_content_or_rewrite_its_author() {
    let app = TestApp::new();
    let kaya = app.create_progeny(MOM, "Kaya").await;
    let other = app.create_progeny(MOM, "Aput").await;

    let (_, body) = app.post("/api/todos", Some(MOM), json!({ "progeny_id": kaya, "title": "Pack" })).await;
    let todo_id = body["data"]["id"].as_i64().unwrap();
    let created = body["data"]["created_time"].clone();

    let (status, body) = app
        .put(
            &format!("/api/todos/{todo_id}"),
            Some(MOM),
            json!({
                "title": "Pack bags",
                "progeny_id": other,
                "author": DAD,
                "created_time": "2001-01-01T00:00:00Z"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["title"], "Pack bags");
    assert_eq!(body["data"]["progeny_id"], kaya);
    assert_eq!(body["data"]["author"], MOM);
    assert_eq!(body["data"]["created_time"], created);
}
