//! Table descriptors applied by the storage adapter at start-up.
//!
//! `queue_movies` is schema-only: nothing in the service layer reads or
//! writes it, movies live in an external catalog and are referenced by an
//! opaque id. Row-level security policies are owned by the deployment, not
//! applied here.

use sqlx::SqlitePool;

pub struct TableDef {
    pub name: &'static str,
    pub ddl: &'static str,
    pub indexes: &'static [&'static str],
}

pub const TABLES: &[TableDef] = &[
    TableDef {
        name: "queues",
        ddl: "CREATE TABLE IF NOT EXISTS queues (
            queue_id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            languages TEXT NOT NULL,
            region TEXT NOT NULL
        )",
        indexes: &[],
    },
    TableDef {
        name: "users",
        // auth_user_uuid comes from the identity provider, never minted here
        ddl: "CREATE TABLE IF NOT EXISTS users (
            user_id INTEGER PRIMARY KEY AUTOINCREMENT,
            auth_user_uuid TEXT NOT NULL UNIQUE,
            queue_id INTEGER DEFAULT NULL,
            locale TEXT NOT NULL,
            FOREIGN KEY (queue_id) REFERENCES queues(queue_id) ON DELETE SET NULL
        )",
        indexes: &[
            "CREATE INDEX IF NOT EXISTS idx_users_by_auth_user_uuid ON users (auth_user_uuid)",
        ],
    },
    TableDef {
        name: "queue_members",
        ddl: "CREATE TABLE IF NOT EXISTS queue_members (
            queue_id INTEGER NOT NULL,
            user_id INTEGER NOT NULL,
            PRIMARY KEY (queue_id, user_id),
            FOREIGN KEY (queue_id) REFERENCES queues(queue_id) ON DELETE CASCADE,
            FOREIGN KEY (user_id) REFERENCES users(user_id) ON DELETE CASCADE
        )",
        indexes: &["CREATE INDEX IF NOT EXISTS idx_queue_by_user ON queue_members (user_id)"],
    },
    TableDef {
        name: "queue_movies",
        ddl: "CREATE TABLE IF NOT EXISTS queue_movies (
            queue_id INTEGER NOT NULL,
            movie_id TEXT NOT NULL,
            sort_order TEXT NOT NULL,
            PRIMARY KEY (queue_id, sort_order),
            FOREIGN KEY (queue_id) REFERENCES queues(queue_id) ON DELETE CASCADE
        )",
        indexes: &[
            "CREATE INDEX IF NOT EXISTS idx_queue_by_movie ON queue_movies (movie_id, queue_id)",
        ],
    },
];

pub async fn apply_schema(db_pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for table in TABLES {
        sqlx::query(table.ddl).execute(db_pool).await?;
        for index in table.indexes {
            sqlx::query(index).execute(db_pool).await?;
        }
        tracing::debug!(table = table.name, "schema applied");
    }
    Ok(())
}
