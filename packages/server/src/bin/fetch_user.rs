//! Print the ID of a user to drive the API with, creating a test user on an
//! empty database.
//!
//! ```text
//! fetch-user            # UserID: 0192...
//! fetch-user --token    # also prints a bearer token for that user
//! ```

use anyhow::Context;
use clap::Parser;
use sea_orm::*;
use tracing_subscriber::EnvFilter;

use catalog_server::config::{AuthConfig, DatabaseConfig, load_section};
use catalog_server::database::init_db;
use catalog_server::entity::user;
use catalog_server::models::shared::new_id;
use catalog_server::utils::jwt;

const TEST_USER_NAME: &str = "Test User";
const TEST_USER_EMAIL: &str = "test@example.com";

#[derive(Parser, Debug)]
#[command(name = "fetch-user", about = "Fetch or create a test user")]
struct Args {
    /// Also print a signed bearer token for the user.
    #[arg(long)]
    token: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    let args = Args::parse();
    let database: DatabaseConfig =
        load_section("database").context("Failed to load database config")?;
    let db = init_db(&database.url)
        .await
        .context("Failed to connect to database")?;

    let user = fetch_or_create(&db).await?;
    println!("UserID: {}", user.id);

    if args.token {
        let auth: AuthConfig = load_section("auth").context("Failed to load auth config")?;
        let token = jwt::sign(&user.id, &user.name, &auth.jwt_secret)
            .context("Failed to sign token")?;
        println!("Token: {token}");
    }

    Ok(())
}

/// Return the first user, inserting the test user when the table is empty.
async fn fetch_or_create(db: &DatabaseConnection) -> anyhow::Result<user::Model> {
    if let Some(existing) = user::Entity::find()
        .order_by_asc(user::Column::CreatedAt)
        .one(db)
        .await
        .context("Failed to query users")?
    {
        return Ok(existing);
    }

    create_test_user(db).await
}

/// Insert the test user.
///
/// A concurrent run may insert the same e-mail first; that unique violation is
/// resolved by reading the winner back. Every other failure propagates.
async fn create_test_user(db: &DatabaseConnection) -> anyhow::Result<user::Model> {
    let new_user = user::ActiveModel {
        id: Set(new_id()),
        name: Set(TEST_USER_NAME.into()),
        email: Set(TEST_USER_EMAIL.into()),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    match new_user.insert(db).await {
        Ok(created) => {
            tracing::info!(id = %created.id, "Created test user");
            Ok(created)
        }
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            tracing::info!("Test user already exists, fetching by e-mail");
            user::Entity::find()
                .filter(user::Column::Email.eq(TEST_USER_EMAIL))
                .one(db)
                .await
                .context("Failed to query test user")?
                .context("Test user vanished after a unique violation")
        }
        Err(e) => Err(e).context("Failed to create test user"),
    }
}
