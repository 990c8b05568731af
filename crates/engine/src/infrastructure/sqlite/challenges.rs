//! SQLite challenge storage.

use async_trait::async_trait;
use duelbot_domain::{Challenge, ChallengeId, ParticipantId};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::{decode_time, encode_time};
use crate::infrastructure::ports::{ChallengeRepo, RepoError};

pub struct SqliteChallengeRepo {
    pool: SqlitePool,
}

impl SqliteChallengeRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_challenge(row: &SqliteRow) -> Result<Challenge, RepoError> {
        let column = |e: sqlx::Error| RepoError::serialization(e);

        let id: String = row.try_get("id").map_err(column)?;
        let status: String = row.try_get("status").map_err(column)?;
        let created_at: String = row.try_get("created_at").map_err(column)?;

        Ok(Challenge::restore(
            id.parse().map_err(RepoError::serialization)?,
            ParticipantId::new(row.try_get("challenger").map_err(column)?),
            ParticipantId::new(row.try_get("challenged").map_err(column)?),
            decode_time(&created_at)?,
            status.parse().map_err(RepoError::serialization)?,
        ))
    }
}

#[async_trait]
impl ChallengeRepo for SqliteChallengeRepo {
    async fn create(&self, challenge: &Challenge) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO challenges (id, challenger, challenged, status, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(challenge.id().to_string())
        .bind(challenge.challenger().get())
        .bind(challenge.challenged().get())
        .bind(challenge.status().as_str())
        .bind(encode_time(challenge.created_at()))
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("create_challenge", e))?;
        Ok(())
    }

    async fn get(&self, id: ChallengeId) -> Result<Option<Challenge>, RepoError> {
        let row = sqlx::query(
            "SELECT id, challenger, challenged, status, created_at FROM challenges WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::database("get_challenge", e))?;

        row.as_ref().map(Self::row_to_challenge).transpose()
    }

    async fn find_pending(
        &self,
        challenger: ParticipantId,
        challenged: ParticipantId,
    ) -> Result<Option<Challenge>, RepoError> {
        let row = sqlx::query(
            r#"
            SELECT id, challenger, challenged, status, created_at FROM challenges
            WHERE challenger = ? AND challenged = ? AND status = 'pending'
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(challenger.get())
        .bind(challenged.get())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::database("find_pending_challenge", e))?;

        row.as_ref().map(Self::row_to_challenge).transpose()
    }

    async fn save(&self, challenge: &Challenge) -> Result<(), RepoError> {
        let result =
            sqlx::query("UPDATE challenges SET status = ? WHERE id = ? AND status = 'pending'")
                .bind(challenge.status().as_str())
                .bind(challenge.id().to_string())
                .execute(&self.pool)
                .await
                .map_err(|e| RepoError::database("save_challenge", e))?;

        if result.rows_affected() == 0 {
            return match self.get(challenge.id()).await? {
                Some(_) => Err(RepoError::conflict("Challenge", challenge.id(), 0)),
                None => Err(RepoError::not_found("Challenge", challenge.id())),
            };
        }
        Ok(())
    }
}
