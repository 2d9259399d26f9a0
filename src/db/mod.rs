//! Database module for SQLite persistence.
//!
//! SQLite is the source of truth for all application data.

mod repository;

pub use repository::*;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;

/// Initialize the database connection pool and run migrations.
pub async fn init_database(db_path: &Path) -> Result<SqlitePool, sqlx::Error> {
    // Ensure the parent directory exists
    if let Some(parent) = db_path.parent() {
        tokio::fs::create_dir_all(parent).await.ok();
    }

    let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

    let options = SqliteConnectOptions::from_str(&db_url)?
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
        .foreign_keys(true)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    // Run embedded migrations
    run_migrations(&pool).await?;

    Ok(pool)
}

/// Run database migrations.
async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    // Create tables if they don't exist
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS periods (
            id TEXT PRIMARY KEY,
            period_start TEXT NOT NULL,
            period_end TEXT NOT NULL,
            period_name TEXT NOT NULL,
            is_active INTEGER NOT NULL DEFAULT 0,
            is_locked INTEGER NOT NULL DEFAULT 0,
            locked_at TEXT,
            data_snapshot TEXT,
            UNIQUE (period_start, period_end)
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS projects (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT,
            business_lead TEXT,
            initiator TEXT,
            dev_team_lead TEXT,
            project_start_date TEXT,
            current_project_stage TEXT NOT NULL DEFAULT '',
            current_ai_stage TEXT NOT NULL DEFAULT '',
            target_next_stage_date TEXT,
            target_completion_date TEXT,
            budget TEXT,
            benefits TEXT NOT NULL DEFAULT '{}',
            key_risks TEXT,
            key_updates TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS project_data (
            id TEXT PRIMARY KEY,
            project_id TEXT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
            period_id TEXT NOT NULL REFERENCES periods(id) ON DELETE CASCADE,
            field_name TEXT NOT NULL,
            field_value TEXT NOT NULL,
            UNIQUE (project_id, period_id, field_name)
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS next_steps (
            id TEXT PRIMARY KEY,
            project_id TEXT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
            period_id TEXT NOT NULL REFERENCES periods(id) ON DELETE CASCADE,
            description TEXT NOT NULL,
            owner TEXT,
            due_date TEXT,
            completed INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    // At most one period may be active; the partial index closes the race
    // window that application-level checks alone would leave open.
    sqlx::query(
        r#"
        CREATE UNIQUE INDEX IF NOT EXISTS idx_periods_single_active
            ON periods(is_active) WHERE is_active = 1;
        CREATE INDEX IF NOT EXISTS idx_periods_start ON periods(period_start);
        CREATE INDEX IF NOT EXISTS idx_project_data_period ON project_data(period_id);
        CREATE INDEX IF NOT EXISTS idx_project_data_project ON project_data(project_id);
        CREATE INDEX IF NOT EXISTS idx_next_steps_scope ON next_steps(project_id, period_id);
        CREATE INDEX IF NOT EXISTS idx_projects_name ON projects(name);
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
