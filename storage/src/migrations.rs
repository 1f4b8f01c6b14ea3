//! Versioned schema migrations.
//!
//! Each migration runs once, inside a transaction, and is recorded in `schema_migrations`.
//! A database that was written by a newer build, or an `interactions` table that predates the
//! migration table and lacks required columns, is rejected with
//! [`StorageError::IncompatibleSchema`] instead of being patched in place.

use chrono::Utc;
use sqlx::{Row, SqlitePool};
use tracing::info;

use crate::error::StorageError;

/// One schema step. Statements are executed in order.
pub struct Migration {
    pub version: i64,
    pub description: &'static str,
    pub statements: &'static [&'static str],
}

/// Columns the history queries rely on.
const INTERACTION_COLUMNS: &[&str] = &[
    "user_id",
    "category",
    "user_message",
    "bot_response",
    "timestamp",
];

pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        description: "create interactions",
        statements: &[
            r#"
            CREATE TABLE IF NOT EXISTS interactions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                category TEXT NOT NULL,
                user_message TEXT NOT NULL,
                bot_response TEXT NOT NULL,
                timestamp TEXT NOT NULL
            )
            "#,
            "CREATE INDEX IF NOT EXISTS idx_interactions_user_category ON interactions(user_id, category)",
        ],
    },
    Migration {
        version: 2,
        description: "create reminders",
        statements: &[
            r#"
            CREATE TABLE IF NOT EXISTS reminders (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                chat_id INTEGER NOT NULL,
                task_text TEXT NOT NULL,
                target_time TEXT NOT NULL,
                created_at TEXT NOT NULL,
                fired_at TEXT
            )
            "#,
            "CREATE INDEX IF NOT EXISTS idx_reminders_fired_at ON reminders(fired_at)",
        ],
    },
];

/// Highest version this build knows about.
pub fn latest_version() -> i64 {
    MIGRATIONS.last().map(|m| m.version).unwrap_or(0)
}

/// Applies all pending migrations. Safe to call on every startup.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), StorageError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            description TEXT NOT NULL,
            applied_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    let current = current_version(pool).await?;
    let latest = latest_version();
    if current > latest {
        return Err(StorageError::IncompatibleSchema(format!(
            "database schema version {} is newer than supported version {}",
            current, latest
        )));
    }

    if current == 0 {
        check_legacy_interactions(pool).await?;
    }

    for migration in MIGRATIONS.iter().filter(|m| m.version > current) {
        info!(
            version = migration.version,
            description = migration.description,
            "Applying schema migration"
        );
        let mut tx = pool.begin().await?;
        for statement in migration.statements {
            sqlx::query(statement).execute(&mut *tx).await?;
        }
        sqlx::query("INSERT INTO schema_migrations (version, description, applied_at) VALUES (?, ?, ?)")
            .bind(migration.version)
            .bind(migration.description)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
    }

    info!(version = latest, "Database schema up to date");
    Ok(())
}

/// Returns the highest applied migration version, or 0 for a fresh database.
pub async fn current_version(pool: &SqlitePool) -> Result<i64, StorageError> {
    let (version,): (Option<i64>,) = sqlx::query_as("SELECT MAX(version) FROM schema_migrations")
        .fetch_one(pool)
        .await?;
    Ok(version.unwrap_or(0))
}

/// An `interactions` table created before migrations existed is adopted only if it already
/// has every column the queries use.
async fn check_legacy_interactions(pool: &SqlitePool) -> Result<(), StorageError> {
    let exists = sqlx::query("SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'interactions'")
        .fetch_optional(pool)
        .await?
        .is_some();
    if !exists {
        return Ok(());
    }

    let rows = sqlx::query("PRAGMA table_info(interactions)")
        .fetch_all(pool)
        .await?;
    let columns: Vec<String> = rows
        .iter()
        .map(|row| row.try_get::<String, _>("name"))
        .collect::<Result<_, _>>()?;

    let missing: Vec<&str> = INTERACTION_COLUMNS
        .iter()
        .copied()
        .filter(|c| !columns.iter().any(|existing| existing == c))
        .collect();
    if !missing.is_empty() {
        return Err(StorageError::IncompatibleSchema(format!(
            "existing interactions table is missing columns: {}",
            missing.join(", ")
        )));
    }

    info!("Adopting existing interactions table");
    Ok(())
}
