use crate::repository::DbPool;
use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;

pub async fn establish_connection(database_url: &str) -> Result<DbPool> {
    // Ensure the database URL has the correct format
    let db_url = if database_url.starts_with("sqlite:") {
        database_url.to_string()
    } else {
        format!("sqlite:{}", database_url)
    };

    let options = SqliteConnectOptions::from_str(&db_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    // Every connection to an in-memory database sees its own database
    let max_connections = if db_url.contains(":memory:") { 1 } else { 5 };
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    migrate(&pool).await?;

    Ok(pool)
}

async fn migrate(pool: &DbPool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            is_superuser BOOLEAN NOT NULL DEFAULT 0,
            created TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS groups (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE
        );

        CREATE TABLE IF NOT EXISTS user_groups (
            user_id INTEGER NOT NULL,
            group_id INTEGER NOT NULL,
            PRIMARY KEY (user_id, group_id),
            FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE,
            FOREIGN KEY (group_id) REFERENCES groups(id) ON DELETE CASCADE
        );

        CREATE TABLE IF NOT EXISTS sessions (
            token TEXT PRIMARY KEY,
            user_id INTEGER NOT NULL,
            created TEXT NOT NULL,
            expires TEXT NOT NULL,
            FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
        );

        CREATE TABLE IF NOT EXISTS job_permissions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            permission INTEGER NOT NULL,
            created TEXT NOT NULL,
            updated TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS job_permission_member_users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            permission_id INTEGER NOT NULL,
            UNIQUE (user_id, permission_id),
            FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE,
            FOREIGN KEY (permission_id) REFERENCES job_permissions(id) ON DELETE CASCADE
        );

        CREATE TABLE IF NOT EXISTS job_permission_member_groups (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            group_id INTEGER NOT NULL,
            permission_id INTEGER NOT NULL,
            UNIQUE (group_id, permission_id),
            FOREIGN KEY (group_id) REFERENCES groups(id) ON DELETE CASCADE,
            FOREIGN KEY (permission_id) REFERENCES job_permissions(id) ON DELETE CASCADE
        );

        CREATE TABLE IF NOT EXISTS jobs (
            job_id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            inventory TEXT NOT NULL,
            playbook TEXT NOT NULL,
            schedule TEXT NOT NULL DEFAULT '',
            permission_id INTEGER,
            created TEXT NOT NULL,
            updated TEXT NOT NULL,
            FOREIGN KEY (permission_id) REFERENCES job_permissions(id) ON DELETE SET NULL
        );

        CREATE TABLE IF NOT EXISTS job_errors (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            short TEXT NOT NULL,
            med TEXT,
            logfile TEXT NOT NULL,
            created TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS job_warnings (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            short TEXT NOT NULL,
            med TEXT,
            logfile TEXT NOT NULL,
            created TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS job_executions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            job_id INTEGER NOT NULL,
            user_id INTEGER,
            start TEXT NOT NULL,
            fin TEXT,
            error_id INTEGER,
            warning_id INTEGER,
            result_ok INTEGER NOT NULL DEFAULT 0,
            result_changed INTEGER NOT NULL DEFAULT 0,
            result_unreachable INTEGER NOT NULL DEFAULT 0,
            result_failed INTEGER NOT NULL DEFAULT 0,
            result_skipped INTEGER NOT NULL DEFAULT 0,
            result_rescued INTEGER NOT NULL DEFAULT 0,
            result_ignored INTEGER NOT NULL DEFAULT 0,
            FOREIGN KEY (job_id) REFERENCES jobs(job_id) ON DELETE CASCADE,
            FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE SET NULL,
            FOREIGN KEY (error_id) REFERENCES job_errors(id) ON DELETE SET NULL,
            FOREIGN KEY (warning_id) REFERENCES job_warnings(id) ON DELETE SET NULL
        );

        CREATE TABLE IF NOT EXISTS repositories (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            rtype INTEGER NOT NULL,
            static_path TEXT,
            git_origin TEXT,
            git_branch TEXT,
            git_isolate BOOLEAN NOT NULL DEFAULT 0,
            git_playbook_base TEXT,
            created TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_job_executions_job_id ON job_executions(job_id);
        CREATE INDEX IF NOT EXISTS idx_sessions_user_id ON sessions(user_id);
        CREATE INDEX IF NOT EXISTS idx_jobs_permission_id ON jobs(permission_id);
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
