use std::net::SocketAddr;
use std::sync::Arc;

use ::common::storage::BlobItem;
use ::common::storage::memory::MemoryBlobCatalog;
use reqwest::Client;
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};
use serde_json::Value;

use catalog_server::config::{
    AppConfig, AuthConfig, CorsConfig, DatabaseConfig, ServerConfig, StorageBackend,
    StorageConfig,
};
use catalog_server::entity::{assignment, episode, movie, rating, review, user};
use catalog_server::state::AppState;
use catalog_server::utils::jwt;

pub const JWT_SECRET: &str = "test-secret-for-integration-tests";

pub mod routes {
    pub const RATINGS: &str = "/api/v1/ratings";
    pub const BANGERS: &str = "/api/v1/bangers";
    pub const USERS: &str = "/api/v1/users";
    pub const EPISODES: &str = "/api/v1/episodes";
    pub const MOVIES: &str = "/api/v1/movies";
    pub const ASSIGNMENTS: &str = "/api/v1/assignments";
    pub const CONTAINERS: &str = "/api/v1/blobs/containers";
    pub const BLOBS: &str = "/api/v1/blobs";
    pub const SESSION: &str = "/api/v1/auth/session";
    pub const SECRET: &str = "/api/v1/auth/secret";

    pub fn rating(id: &str) -> String {
        format!("/api/v1/ratings/{id}")
    }

    pub fn banger(id: &str) -> String {
        format!("/api/v1/bangers/{id}")
    }

    pub fn user(id: &str) -> String {
        format!("/api/v1/users/{id}")
    }

    pub fn episode(id: &str) -> String {
        format!("/api/v1/episodes/{id}")
    }

    pub fn movie(id: &str) -> String {
        format!("/api/v1/movies/{id}")
    }

    pub fn assignment(id: &str) -> String {
        format!("/api/v1/assignments/{id}")
    }

    pub fn assignment_homework(id: &str) -> String {
        format!("/api/v1/assignments/{id}/homework")
    }

    pub fn episode_assignments(episode_id: &str) -> String {
        format!("/api/v1/episodes/{episode_id}/assignments")
    }

    pub fn blobs(container: &str, token: Option<&str>, page_size: Option<u32>) -> String {
        let mut url = format!("/api/v1/blobs?container_name={container}");
        if let Some(token) = token {
            url.push_str(&format!("&continuation_token={token}"));
        }
        if let Some(size) = page_size {
            url.push_str(&format!("&page_size={size}"));
        }
        url
    }
}

/// A running test server.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub db: DatabaseConnection,
    pub blobs: Arc<MemoryBlobCatalog>,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
}

fn test_config() -> AppConfig {
    AppConfig {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors: CorsConfig {
                allow_origins: vec![],
                max_age: 3600,
            },
        },
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
        },
        auth: AuthConfig {
            jwt_secret: JWT_SECRET.to_string(),
        },
        storage: StorageConfig {
            backend: StorageBackend::Memory,
            s3: None,
        },
    }
}

impl TestApp {
    /// Spawn against a fresh in-memory SQLite database with the schema synced.
    pub async fn spawn() -> Self {
        // A single pooled connection keeps the in-memory database alive and shared.
        let mut opts = ConnectOptions::new("sqlite::memory:");
        opts.max_connections(1).min_connections(1);
        let db = Database::connect(opts)
            .await
            .expect("Failed to open in-memory database");
        catalog_server::database::sync_schema(&db)
            .await
            .expect("Failed to sync schema");

        Self::spawn_with_db(db).await
    }

    /// Spawn against an arbitrary connection, e.g. a `MockDatabase`.
    pub async fn spawn_with_db(db: DatabaseConnection) -> Self {
        let blobs = Arc::new(MemoryBlobCatalog::new());
        let state = AppState {
            db: db.clone(),
            config: test_config(),
            blobs: blobs.clone(),
        };

        let app = catalog_server::build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            client: Client::new(),
            db,
            blobs,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// A bearer token for a caller that need not exist in the database.
    pub fn token(&self) -> String {
        jwt::sign("host-1", "Host One", JWT_SECRET).expect("Failed to sign test token")
    }

    pub async fn post_with_token(&self, path: &str, body: &Value, token: &str) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn post_without_token(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn get_with_token(&self, path: &str, token: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn get_without_token(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn put_with_token(&self, path: &str, body: &Value, token: &str) -> TestResponse {
        let res = self
            .client
            .put(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .json(body)
            .send()
            .await
            .expect("Failed to send PUT request");

        TestResponse::from_response(res).await
    }

    pub async fn put_without_token(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .put(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send PUT request");

        TestResponse::from_response(res).await
    }

    pub async fn delete_with_token(&self, path: &str, token: &str) -> TestResponse {
        let res = self
            .client
            .delete(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await
            .expect("Failed to send DELETE request");

        TestResponse::from_response(res).await
    }

    pub async fn delete_without_token(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .delete(self.url(path))
            .send()
            .await
            .expect("Failed to send DELETE request");

        TestResponse::from_response(res).await
    }

    /// Create a user via the API and return its `id`.
    pub async fn create_user(&self, name: &str, email: &str) -> String {
        let res = self
            .post_without_token(
                routes::USERS,
                &serde_json::json!({"name": name, "email": email}),
            )
            .await;
        assert_eq!(res.status, 201, "create_user failed: {}", res.text);
        res.id()
    }

    /// Create a rating via the API and return its `id`.
    pub async fn create_rating(&self, token: &str, name: &str, value: f64) -> String {
        let res = self
            .post_with_token(
                routes::RATINGS,
                &serde_json::json!({"name": name, "value": value}),
                token,
            )
            .await;
        assert_eq!(res.status, 201, "create_rating failed: {}", res.text);
        res.id()
    }

    /// Insert an episode under a fixed ID.
    pub async fn seed_episode(&self, id: &str, number: i32, title: &str) {
        episode::ActiveModel {
            id: Set(id.to_string()),
            number: Set(number),
            title: Set(title.to_string()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .expect("Failed to seed episode");
    }

    /// Insert a movie under a fixed ID.
    pub async fn seed_movie(&self, id: &str, title: &str, year: i32) {
        movie::ActiveModel {
            id: Set(id.to_string()),
            title: Set(title.to_string()),
            year: Set(year),
            poster: Set(None),
            url: Set(None),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .expect("Failed to seed movie");
    }

    /// Create an episode via the API and return its `id`.
    pub async fn create_episode(&self, number: i32, title: &str) -> String {
        let res = self
            .post_without_token(
                routes::EPISODES,
                &serde_json::json!({"number": number, "title": title}),
            )
            .await;
        assert_eq!(res.status, 201, "create_episode failed: {}", res.text);
        res.id()
    }

    /// Insert a review directly; reviews have no write endpoint.
    pub async fn seed_review(
        &self,
        id: &str,
        assignment_id: &str,
        user_id: &str,
        rating_id: Option<&str>,
    ) {
        review::ActiveModel {
            id: Set(id.to_string()),
            assignment_id: Set(assignment_id.to_string()),
            user_id: Set(user_id.to_string()),
            rating_id: Set(rating_id.map(str::to_string)),
            created_at: Set(chrono::Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .expect("Failed to seed review");
    }

    /// Seed a user, episode and movie, and return `(user_id, episode_id, movie_id)`.
    pub async fn seed_assignment_refs(&self) -> (String, String, String) {
        let user_id = self.create_user("Host One", "host@example.com").await;
        self.seed_episode("ep-1", 1, "Pilot").await;
        self.seed_movie("mv-1", "Hackers", 1995).await;
        (user_id, "ep-1".to_string(), "mv-1".to_string())
    }

    /// Put `count` objects named `file-000`, `file-001`, ... into `container`.
    pub fn seed_blobs(&self, container: &str, count: usize) {
        for i in 0..count {
            self.blobs.insert(
                container,
                BlobItem {
                    name: format!("file-{i:03}"),
                    created_on: None,
                    last_modified: Some(chrono::Utc::now()),
                    content_length: 1024,
                    content_type: Some("audio/mpeg".into()),
                },
            );
        }
    }

    /// Row counts of every table, for asserting that nothing was written.
    pub async fn row_counts(&self) -> [u64; 5] {
        use sea_orm::{EntityTrait, PaginatorTrait};
        [
            user::Entity::find().count(&self.db).await.unwrap(),
            rating::Entity::find().count(&self.db).await.unwrap(),
            catalog_server::entity::banger::Entity::find()
                .count(&self.db)
                .await
                .unwrap(),
            assignment::Entity::find().count(&self.db).await.unwrap(),
            review::Entity::find().count(&self.db).await.unwrap(),
        ]
    }
}

impl TestResponse {
    pub async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let text = res.text().await.unwrap_or_default();
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self { status, text, body }
    }

    pub fn id(&self) -> String {
        self.body["id"]
            .as_str()
            .expect("response body should contain 'id'")
            .to_string()
    }
}
