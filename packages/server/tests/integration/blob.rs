use std::collections::HashSet;

use crate::common::{TestApp, routes};

#[tokio::test]
async fn pages_are_disjoint_and_the_last_has_no_token() {
    let app = TestApp::spawn().await;
    let token = app.token();
    app.seed_blobs("episodes", 45);

    let mut seen = HashSet::new();
    let mut page_lengths = Vec::new();
    let mut continuation: Option<String> = None;
    loop {
        let res = app
            .get_with_token(
                &routes::blobs("episodes", continuation.as_deref(), None),
                &token,
            )
            .await;
        assert_eq!(res.status, 200, "{}", res.text);

        let blobs = res.body["blobs"].as_array().unwrap();
        page_lengths.push(blobs.len());
        for blob in blobs {
            let name = blob["name"].as_str().unwrap().to_string();
            assert!(seen.insert(name.clone()), "{name} returned twice");
        }

        match res.body["next_continuation_token"].as_str() {
            Some(next) => continuation = Some(next.to_string()),
            None => break,
        }
    }

    assert_eq!(page_lengths, vec![20, 20, 5]);
    assert_eq!(seen.len(), 45);
}

#[tokio::test]
async fn page_size_is_clamped() {
    let app = TestApp::spawn().await;
    let token = app.token();
    app.seed_blobs("episodes", 150);

    let tiny = app
        .get_with_token(&routes::blobs("episodes", None, Some(0)), &token)
        .await;
    let huge = app
        .get_with_token(&routes::blobs("episodes", None, Some(500)), &token)
        .await;

    assert_eq!(tiny.status, 200, "{}", tiny.text);
    assert_eq!(tiny.body["blobs"].as_array().unwrap().len(), 1);
    assert_eq!(huge.body["blobs"].as_array().unwrap().len(), 100);
    assert!(huge.body["next_continuation_token"].is_string());
}

#[tokio::test]
async fn blob_entries_carry_metadata() {
    let app = TestApp::spawn().await;
    app.seed_blobs("episodes", 1);

    let res = app
        .get_with_token(&routes::blobs("episodes", None, None), &app.token())
        .await;

    let blob = &res.body["blobs"][0];
    assert_eq!(blob["name"], "file-000");
    assert_eq!(blob["content_length"], 1024);
    assert_eq!(blob["content_type"], "audio/mpeg");
    assert!(blob["last_modified"].is_string());
    assert!(res.body.get("next_continuation_token").is_none());
}

#[tokio::test]
async fn empty_container_name_is_rejected() {
    let app = TestApp::spawn().await;

    let res = app
        .get_with_token(&routes::blobs("", None, None), &app.token())
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn unknown_container_is_not_found() {
    let app = TestApp::spawn().await;

    let res = app
        .get_with_token(&routes::blobs("nope", None, None), &app.token())
        .await;

    assert_eq!(res.status, 404);
    assert_eq!(res.body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn garbage_token_is_rejected() {
    let app = TestApp::spawn().await;
    app.seed_blobs("episodes", 3);

    let res = app
        .get_with_token(&routes::blobs("episodes", Some("zz-not-hex"), None), &app.token())
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn containers_are_listed() {
    let app = TestApp::spawn().await;
    app.blobs.create_container("uploads");
    app.seed_blobs("episodes", 1);

    let res = app.get_with_token(routes::CONTAINERS, &app.token()).await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body, serde_json::json!(["episodes", "uploads"]));
}

#[tokio::test]
async fn backend_outage_is_service_unavailable() {
    let app = TestApp::spawn().await;
    app.seed_blobs("episodes", 1);
    app.blobs.set_offline(true);

    let containers = app.get_with_token(routes::CONTAINERS, &app.token()).await;
    let blobs = app
        .get_with_token(&routes::blobs("episodes", None, None), &app.token())
        .await;

    assert_eq!(containers.status, 503);
    assert_eq!(containers.body["code"], "STORAGE_UNAVAILABLE");
    assert_eq!(blobs.status, 503);
}

#[tokio::test]
async fn listing_requires_a_token() {
    let app = TestApp::spawn().await;
    app.seed_blobs("episodes", 1);

    let containers = app.get_without_token(routes::CONTAINERS).await;
    let blobs = app.get_without_token(&routes::blobs("episodes", None, None)).await;

    assert_eq!(containers.status, 401);
    assert_eq!(blobs.status, 401);
}

#[tokio::test]
async fn malformed_query_is_a_json_validation_error() {
    let app = TestApp::spawn().await;
    let token = app.token();

    let missing = app.get_with_token(routes::BLOBS, &token).await;
    let negative = app
        .get_with_token(
            &format!("{}?container_name=episodes&page_size=-5", routes::BLOBS),
            &token,
        )
        .await;

    assert_eq!(missing.status, 400, "{}", missing.text);
    assert_eq!(missing.body["code"], "VALIDATION_ERROR");
    assert!(missing.body["message"].as_str().unwrap().contains("container_name"));
    assert_eq!(negative.status, 400, "{}", negative.text);
    assert_eq!(negative.body["code"], "VALIDATION_ERROR");
}
