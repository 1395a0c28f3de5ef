use axum::{
    Json, debug_handler,
    extract::{Path, State},
    routing::get,
    Router,
};
use serde::Serialize;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{AppError, AppResult, AppState};

pub fn router() -> Router<AppState> {
    Router::new().route("/queues/by_user/{auth_user_uuid}", get(get_user_queues))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueueSummary {
    pub personal: bool,
    pub queue_id: i64,
    pub name: String,
    pub languages: String,
    pub region: String,
}

/// Every queue the user is a member of, personal queue first, then ascending
/// by name.
pub async fn list_queues_for_user(
    db_pool: &SqlitePool,
    auth_user_uuid: Uuid,
) -> AppResult<Vec<QueueSummary>> {
    let Some((user_id, own_queue_id)): Option<(i64, Option<i64>)> =
        sqlx::query_as("SELECT user_id, queue_id FROM users WHERE auth_user_uuid = ?")
            .bind(auth_user_uuid.to_string())
            .fetch_optional(db_pool)
            .await?
    else {
        return Err(AppError::NotFound("User"));
    };

    let rows: Vec<(i64, String, String, String)> = sqlx::query_as(
        "SELECT q.queue_id, q.name, q.languages, q.region \
         FROM queues q JOIN queue_members m ON m.queue_id = q.queue_id \
         WHERE m.user_id = ?",
    )
    .bind(user_id)
    .fetch_all(db_pool)
    .await?;

    let mut queues: Vec<QueueSummary> = rows
        .into_iter()
        .map(|(queue_id, name, languages, region)| QueueSummary {
            personal: own_queue_id == Some(queue_id),
            queue_id,
            name,
            languages,
            region,
        })
        .collect();

    queues.sort_by(|a, b| b.personal.cmp(&a.personal).then_with(|| a.name.cmp(&b.name)));
    Ok(queues)
}

#[debug_handler]
pub(crate) async fn get_user_queues(
    State(db_pool): State<SqlitePool>,
    Path(auth_user_uuid): Path<Uuid>,
) -> AppResult<Json<Vec<QueueSummary>>> {
    Ok(Json(list_queues_for_user(&db_pool, auth_user_uuid).await?))
}
