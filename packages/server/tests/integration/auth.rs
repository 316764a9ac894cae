use sea_orm::{DatabaseBackend, MockDatabase};
use serde_json::json;

use crate::common::{TestApp, routes};

#[tokio::test]
async fn session_is_null_without_a_token() {
    let app = TestApp::spawn().await;

    let res = app.get_without_token(routes::SESSION).await;

    assert_eq!(res.status, 200);
    assert_eq!(res.text, "null");
}

#[tokio::test]
async fn session_is_null_with_a_bad_token() {
    let app = TestApp::spawn().await;

    let res = app.get_with_token(routes::SESSION, "not-a-jwt").await;

    assert_eq!(res.status, 200);
    assert_eq!(res.text, "null");
}

#[tokio::test]
async fn session_reports_the_caller() {
    let app = TestApp::spawn().await;

    let res = app.get_with_token(routes::SESSION, &app.token()).await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body["user_id"], "host-1");
    assert_eq!(res.body["name"], "Host One");
}

#[tokio::test]
async fn secret_message_requires_a_token() {
    let app = TestApp::spawn().await;

    let denied = app.get_without_token(routes::SECRET).await;
    let allowed = app.get_with_token(routes::SECRET, &app.token()).await;

    assert_eq!(denied.status, 401);
    assert_eq!(denied.body["code"], "TOKEN_MISSING");
    assert_eq!(allowed.status, 200);
    assert!(allowed.body["message"].is_string());
}

#[tokio::test]
async fn malformed_authorization_header_is_invalid() {
    let app = TestApp::spawn().await;

    let res = app
        .client
        .get(format!("http://{}{}", app.addr, routes::SECRET))
        .header("Authorization", "Basic dXNlcjpwYXNz")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status().as_u16(), 401);
}

/// Rejected requests must not reach the database at all.
#[tokio::test]
async fn rejected_requests_issue_no_queries() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let app = TestApp::spawn_with_db(db.clone()).await;
    let rating = json!({"name": "Gold Star", "value": 5.0});

    let unauthorized = app.post_without_token(routes::RATINGS, &rating).await;
    let forged = app
        .delete_with_token(&routes::banger("some-id"), "forged.token.value")
        .await;
    let invalid = app
        .post_with_token(
            routes::BANGERS,
            &json!({"title": "Maniac", "artist": "Sembello", "url": "relative/path"}),
            &app.token(),
        )
        .await;
    let homework = app
        .put_without_token(&routes::assignment_homework("a-1"), &json!({"homework": true}))
        .await;

    assert_eq!(unauthorized.status, 401);
    assert_eq!(forged.status, 401);
    assert_eq!(invalid.status, 400);
    assert_eq!(homework.status, 401);
    assert!(db.into_transaction_log().is_empty());
}
