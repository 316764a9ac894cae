pub mod assignment;
pub mod auth;
pub mod banger;
pub mod blob;
pub mod episode;
pub mod movie;
pub mod rating;
pub mod user;

use sea_orm::DbErr;

use crate::error::AppError;

/// Map a primary-key update that matched nothing to `NotFound`.
///
/// SeaORM reports `RecordNotUpdated` when an `UPDATE ... WHERE id = ?` touches
/// zero rows, so the update itself doubles as the existence check.
pub(crate) fn not_found_if_unmatched(kind: &'static str, id: &str) -> impl FnOnce(DbErr) -> AppError {
    let id = id.to_string();
    move |err| match err {
        DbErr::RecordNotUpdated => AppError::NotFound(format!("{kind} '{id}' not found")),
        other => other.into(),
    }
}
