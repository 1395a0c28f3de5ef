use axum::{
    Json, debug_handler,
    extract::{Path, State},
};
use serde_json::{Value, json};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{AppError, AppResult};

/// Remove a user, their membership rows, and their queue if they were its
/// last member. The count and the conditional queue delete share the
/// membership delete's transaction, so two concurrent last-member deletes
/// cannot strand a membership; deleting a queue row a racer already removed
/// is a no-op.
pub async fn delete_user(db_pool: &SqlitePool, auth_user_uuid: Uuid) -> AppResult<()> {
    let mut tx = db_pool.begin().await?;

    let Some((user_id, queue_id)): Option<(i64, Option<i64>)> =
        sqlx::query_as("SELECT user_id, queue_id FROM users WHERE auth_user_uuid = ?")
            .bind(auth_user_uuid.to_string())
            .fetch_optional(&mut *tx)
            .await?
    else {
        return Err(AppError::NotFound("User"));
    };

    sqlx::query("DELETE FROM queue_members WHERE user_id = ?")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    if let Some(queue_id) = queue_id {
        let remaining: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM queue_members WHERE queue_id = ?")
                .bind(queue_id)
                .fetch_one(&mut *tx)
                .await?;

        if remaining == 0 {
            sqlx::query("DELETE FROM queues WHERE queue_id = ?")
                .bind(queue_id)
                .execute(&mut *tx)
                .await?;
            tracing::info!(queue_id, "collected queue with no remaining members");
        }
    }

    sqlx::query("DELETE FROM users WHERE user_id = ?")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    tracing::info!(%auth_user_uuid, user_id, "deleted user");
    Ok(())
}

#[debug_handler]
pub(crate) async fn del_user(
    State(db_pool): State<SqlitePool>,
    Path(auth_user_uuid): Path<Uuid>,
) -> AppResult<Json<Value>> {
    delete_user(&db_pool, auth_user_uuid).await?;
    Ok(Json(json!({ "message": "User deleted successfully" })))
}
