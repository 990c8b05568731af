//! SQLite-backed storage for matches, challenges and users.

mod challenges;
mod matches;
mod users;

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::SqlitePool;

use crate::infrastructure::ports::RepoError;

pub use challenges::SqliteChallengeRepo;
pub use matches::SqliteMatchRepo;
pub use users::SqliteUserStore;

/// Shared connection pool plus schema setup.
#[derive(Clone)]
pub struct SqliteDatabase {
    pool: SqlitePool,
}

impl SqliteDatabase {
    pub async fn open(db_path: &str) -> Result<Self, RepoError> {
        let pool = SqlitePool::connect(&format!("sqlite:{}?mode=rwc", db_path))
            .await
            .map_err(|e| RepoError::database("connect", e))?;
        let db = Self { pool };
        db.ensure_schema().await?;
        tracing::info!(path = %db_path, "SQLite storage ready");
        Ok(db)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn matches(&self) -> SqliteMatchRepo {
        SqliteMatchRepo::new(self.pool.clone())
    }

    pub fn challenges(&self) -> SqliteChallengeRepo {
        SqliteChallengeRepo::new(self.pool.clone())
    }

    pub fn users(&self) -> SqliteUserStore {
        SqliteUserStore::new(self.pool.clone())
    }

    async fn ensure_schema(&self) -> Result<(), RepoError> {
        let statements = [
            r#"
            CREATE TABLE IF NOT EXISTS users (
                tg_id INTEGER PRIMARY KEY,
                username TEXT NOT NULL,
                level INTEGER NOT NULL DEFAULT 0,
                rank TEXT NOT NULL DEFAULT 'E',
                currency INTEGER NOT NULL DEFAULT 0,
                wins INTEGER NOT NULL DEFAULT 0,
                losses INTEGER NOT NULL DEFAULT 0,
                ranking_points INTEGER NOT NULL DEFAULT 0,
                strength INTEGER NOT NULL DEFAULT 10,
                agility INTEGER NOT NULL DEFAULT 10,
                intelligence INTEGER NOT NULL DEFAULT 10,
                vitality INTEGER NOT NULL DEFAULT 10,
                sense INTEGER NOT NULL DEFAULT 10
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS inventory (
                id TEXT PRIMARY KEY,
                owner INTEGER NOT NULL,
                category TEXT NOT NULL,
                name TEXT NOT NULL,
                quantity INTEGER NOT NULL DEFAULT 1
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS matches (
                id TEXT PRIMARY KEY,
                kind TEXT NOT NULL,
                participant_a INTEGER NOT NULL,
                participant_b INTEGER NOT NULL,
                pair_low INTEGER NOT NULL,
                pair_high INTEGER NOT NULL,
                max_hp_a INTEGER NOT NULL,
                max_hp_b INTEGER NOT NULL,
                hp_a INTEGER NOT NULL,
                hp_b INTEGER NOT NULL,
                turn_holder INTEGER NOT NULL,
                status TEXT NOT NULL,
                winner INTEGER,
                loser INTEGER,
                version INTEGER NOT NULL,
                created_at TEXT NOT NULL,
                ended_at TEXT
            )
            "#,
            r#"
            CREATE UNIQUE INDEX IF NOT EXISTS idx_matches_active_pair
                ON matches (pair_low, pair_high) WHERE status = 'active'
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS challenges (
                id TEXT PRIMARY KEY,
                challenger INTEGER NOT NULL,
                challenged INTEGER NOT NULL,
                status TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            "#,
        ];

        for statement in statements {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| RepoError::database("schema", e))?;
        }
        Ok(())
    }
}

/// Fixed-width timestamps so text ordering matches time ordering.
fn encode_time(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn decode_time(raw: &str) -> Result<DateTime<Utc>, RepoError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| RepoError::serialization(format!("bad timestamp {:?}: {}", raw, e)))
}

fn is_unique_violation(error: &sqlx::Error) -> bool {
    matches!(error, sqlx::Error::Database(db) if db.is_unique_violation())
}
