use serde_json::json;

use crate::common::{TestApp, routes};

mod reads {
    use super::*;

    #[tokio::test]
    async fn created_rating_can_be_read_back_without_a_token() {
        let app = TestApp::spawn().await;
        let token = app.token();

        let created = app
            .post_with_token(
                routes::RATINGS,
                &json!({"name": "Gold Star", "value": 5.0, "icon": "star", "category": "movie"}),
                &token,
            )
            .await;
        assert_eq!(created.status, 201, "{}", created.text);
        let id = created.id();

        let res = app.get_without_token(&routes::rating(&id)).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["id"], id.as_str());
        assert_eq!(res.body["name"], "Gold Star");
        assert_eq!(res.body["value"], 5.0);
        assert_eq!(res.body["icon"], "star");
        assert_eq!(res.body["category"], "movie");
        assert!(res.body["sound"].is_null());
    }

    #[tokio::test]
    async fn unknown_rating_reads_as_null() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(&routes::rating("does-not-exist")).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.text, "null");
    }

    #[tokio::test]
    async fn ratings_are_listed_by_value_descending() {
        let app = TestApp::spawn().await;
        let token = app.token();
        app.create_rating(&token, "Meh", 2.0).await;
        app.create_rating(&token, "Great", 9.5).await;
        app.create_rating(&token, "Awful", -1.0).await;
        app.create_rating(&token, "Fine", 5.0).await;

        let res = app.get_without_token(routes::RATINGS).await;

        assert_eq!(res.status, 200);
        let values: Vec<f64> = res
            .body
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["value"].as_f64().unwrap())
            .collect();
        assert_eq!(values, vec![9.5, 5.0, 2.0, -1.0]);
    }
}

mod writes {
    use super::*;

    #[tokio::test]
    async fn update_replaces_every_field_and_keeps_the_id() {
        let app = TestApp::spawn().await;
        let token = app.token();
        let id = app.create_rating(&token, "Meh", 2.0).await;

        let res = app
            .put_with_token(
                &routes::rating(&id),
                &json!({"id": "ignored", "name": "Okay", "value": 3.0, "sound": "ding.mp3"}),
                &token,
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["id"], id.as_str());
        assert_eq!(res.body["name"], "Okay");
        assert_eq!(res.body["value"], 3.0);
        assert_eq!(res.body["sound"], "ding.mp3");

        let read = app.get_without_token(&routes::rating(&id)).await;
        assert_eq!(read.body["name"], "Okay");
    }

    #[tokio::test]
    async fn updating_an_unknown_rating_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app
            .put_with_token(
                &routes::rating("missing"),
                &json!({"name": "Okay", "value": 3.0}),
                &app.token(),
            )
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn remove_returns_the_deleted_rating() {
        let app = TestApp::spawn().await;
        let token = app.token();
        let id = app.create_rating(&token, "Meh", 2.0).await;

        let res = app.delete_with_token(&routes::rating(&id), &token).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["id"], id.as_str());
        assert_eq!(res.body["name"], "Meh");

        let read = app.get_without_token(&routes::rating(&id)).await;
        assert_eq!(read.text, "null");
    }

    #[tokio::test]
    async fn removing_an_unknown_rating_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app
            .delete_with_token(&routes::rating("missing"), &app.token())
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn blank_name_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .post_with_token(
                routes::RATINGS,
                &json!({"name": "   ", "value": 1.0}),
                &app.token(),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert_eq!(app.row_counts().await, [0; 5]);
    }

    #[tokio::test]
    async fn non_numeric_value_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .post_with_token(
                routes::RATINGS,
                &json!({"name": "Gold", "value": "lots"}),
                &app.token(),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod access {
    use super::*;

    #[tokio::test]
    async fn writes_without_a_token_are_unauthorized_and_write_nothing() {
        let app = TestApp::spawn().await;
        let body = json!({"name": "Gold Star", "value": 5.0});

        let add = app.post_without_token(routes::RATINGS, &body).await;
        let update = app.put_without_token(&routes::rating("x"), &body).await;
        let remove = app.delete_without_token(&routes::rating("x")).await;

        for res in [&add, &update, &remove] {
            assert_eq!(res.status, 401);
            assert_eq!(res.body["code"], "TOKEN_MISSING");
        }
        assert_eq!(app.row_counts().await, [0; 5]);
    }

    #[tokio::test]
    async fn a_forged_token_is_rejected() {
        let app = TestApp::spawn().await;
        let forged = catalog_server::utils::jwt::sign("host-1", "Host One", "some-other-secret")
            .unwrap();

        let res = app
            .post_with_token(routes::RATINGS, &json!({"name": "Gold", "value": 1.0}), &forged)
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_INVALID");
    }
}
