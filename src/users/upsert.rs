use axum::{
    Json, debug_handler,
    extract::{Path, State},
};
use sqlx::{Sqlite, SqlitePool, Transaction};
use uuid::Uuid;

use crate::{AppError, AppResult};

use super::patch::{PatchValue, Target, UserPatch, route};
use super::view::{UserView, fetch_user_view};

/// Create-or-update keyed by the identity token. Creation and update both
/// run inside a single transaction; the response is a fresh fetch so it
/// reflects exactly what was persisted.
pub async fn upsert_user(
    db_pool: &SqlitePool,
    auth_user_uuid: Uuid,
    patch: &UserPatch,
) -> AppResult<UserView> {
    let mut tx = db_pool.begin().await?;

    let existing: Option<(i64, i64)> =
        sqlx::query_as("SELECT user_id, queue_id FROM users WHERE auth_user_uuid = ?")
            .bind(auth_user_uuid.to_string())
            .fetch_optional(&mut *tx)
            .await?;

    match existing {
        None => create_user(&mut tx, auth_user_uuid, patch).await?,
        Some((user_id, queue_id)) => update_user(&mut tx, user_id, queue_id, patch).await?,
    }

    tx.commit().await?;
    fetch_user_view(db_pool, auth_user_uuid).await
}

/// New user: a personal queue, the user row referencing it, and the
/// membership linking the two. All four descriptive fields are required.
async fn create_user(
    tx: &mut Transaction<'_, Sqlite>,
    auth_user_uuid: Uuid,
    patch: &UserPatch,
) -> AppResult<()> {
    let (user_name, user_locale, languages, region) = patch
        .require_all()
        .map_err(AppError::MissingRequired)?;

    let queue_id: i64 = sqlx::query_scalar(
        "INSERT INTO queues (name, languages, region) VALUES (?, ?, ?) RETURNING queue_id",
    )
    .bind(user_name)
    .bind(languages)
    .bind(region)
    .fetch_one(&mut **tx)
    .await?;

    let user_id: i64 = sqlx::query_scalar(
        "INSERT INTO users (auth_user_uuid, locale, queue_id) VALUES (?, ?, ?) RETURNING user_id",
    )
    .bind(auth_user_uuid.to_string())
    .bind(user_locale)
    .bind(queue_id)
    .fetch_one(&mut **tx)
    .await?;

    sqlx::query("INSERT INTO queue_members (queue_id, user_id) VALUES (?, ?)")
        .bind(queue_id)
        .bind(user_id)
        .execute(&mut **tx)
        .await?;

    tracing::info!(%auth_user_uuid, user_id, queue_id, "created user with personal queue");
    Ok(())
}

/// Existing user: route each present field to the user row or to the queue
/// the user currently references. Absent fields stay untouched.
async fn update_user(
    tx: &mut Transaction<'_, Sqlite>,
    user_id: i64,
    queue_id: i64,
    patch: &UserPatch,
) -> AppResult<()> {
    let mut user_sets = Vec::new();
    let mut queue_sets = Vec::new();

    for (field, value) in patch.fields() {
        match route(field)? {
            Target::User(column) => user_sets.push((column, value)),
            Target::Queue(column) => queue_sets.push((column, value)),
        }
    }

    if !queue_sets.is_empty() {
        apply_sets(tx, "queues", "queue_id", queue_id, queue_sets).await?;
    }
    if !user_sets.is_empty() {
        apply_sets(tx, "users", "user_id", user_id, user_sets).await?;
    }
    Ok(())
}

async fn apply_sets(
    tx: &mut Transaction<'_, Sqlite>,
    table: &str,
    key_column: &str,
    key: i64,
    sets: Vec<(&'static str, PatchValue)>,
) -> AppResult<()> {
    let clause = sets
        .iter()
        .map(|(column, _)| format!("{column} = ?"))
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!("UPDATE {table} SET {clause} WHERE {key_column} = ?");

    let mut query = sqlx::query(&sql);
    for (_, value) in sets {
        query = match value {
            PatchValue::Text(text) => query.bind(text),
            PatchValue::Id(id) => query.bind(id),
        };
    }
    query.bind(key).execute(&mut **tx).await?;
    Ok(())
}

#[debug_handler]
pub(crate) async fn put_user(
    State(db_pool): State<SqlitePool>,
    Path(auth_user_uuid): Path<Uuid>,
    Json(patch): Json<UserPatch>,
) -> AppResult<Json<UserView>> {
    Ok(Json(upsert_user(&db_pool, auth_user_uuid, &patch).await?))
}
