use axum::{
    Json, debug_handler,
    extract::{Path, State},
};
use serde::Serialize;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{AppError, AppResult};

/// The user-facing record. Deliberately denormalized: `user_name`,
/// `languages` and `region` are read off the user's current queue, so a
/// caller fetching a single user never sees a separate queue object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserView {
    pub auth_user_uuid: Uuid,
    pub user_id: i64,
    pub queue_id: i64,
    pub user_name: String,
    pub user_locale: String,
    pub languages: String,
    pub region: String,
}

pub async fn fetch_user_view(db_pool: &SqlitePool, auth_user_uuid: Uuid) -> AppResult<UserView> {
    let Some((user_id, queue_id, locale, name, languages, region)): Option<(
        i64,
        i64,
        String,
        String,
        String,
        String,
    )> = sqlx::query_as(
        "SELECT u.user_id, u.queue_id, u.locale, q.name, q.languages, q.region \
         FROM users u JOIN queues q ON q.queue_id = u.queue_id \
         WHERE u.auth_user_uuid = ?",
    )
    .bind(auth_user_uuid.to_string())
    .fetch_optional(db_pool)
    .await?
    else {
        return Err(AppError::NotFound("User"));
    };

    Ok(UserView {
        auth_user_uuid,
        user_id,
        queue_id,
        user_name: name,
        user_locale: locale,
        languages,
        region,
    })
}

#[debug_handler]
pub(crate) async fn get_user(
    State(db_pool): State<SqlitePool>,
    Path(auth_user_uuid): Path<Uuid>,
) -> AppResult<Json<UserView>> {
    Ok(Json(fetch_user_view(&db_pool, auth_user_uuid).await?))
}
