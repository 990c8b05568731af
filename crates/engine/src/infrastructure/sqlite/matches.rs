//! SQLite match storage with compare-and-swap saves.

use async_trait::async_trait;
use duelbot_domain::{Match, MatchId, MatchParts, ParticipantId};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::{decode_time, encode_time, is_unique_violation};
use crate::infrastructure::ports::{MatchRepo, RepoError};

const SELECT_COLUMNS: &str = "SELECT id, kind, participant_a, participant_b, max_hp_a, max_hp_b, \
     hp_a, hp_b, turn_holder, status, winner, loser, version, created_at, ended_at FROM matches";

pub struct SqliteMatchRepo {
    pool: SqlitePool,
}

impl SqliteMatchRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_match(row: &SqliteRow) -> Result<Match, RepoError> {
        let column = |e: sqlx::Error| RepoError::serialization(e);

        let id: String = row.try_get("id").map_err(column)?;
        let kind: String = row.try_get("kind").map_err(column)?;
        let status: String = row.try_get("status").map_err(column)?;
        let version: i64 = row.try_get("version").map_err(column)?;
        let created_at: String = row.try_get("created_at").map_err(column)?;
        let ended_at: Option<String> = row.try_get("ended_at").map_err(column)?;
        let winner: Option<i64> = row.try_get("winner").map_err(column)?;
        let loser: Option<i64> = row.try_get("loser").map_err(column)?;

        let parts = MatchParts {
            id: id.parse().map_err(RepoError::serialization)?,
            kind: kind.parse().map_err(RepoError::serialization)?,
            participant_a: ParticipantId::new(row.try_get("participant_a").map_err(column)?),
            participant_b: ParticipantId::new(row.try_get("participant_b").map_err(column)?),
            max_hp_a: row.try_get("max_hp_a").map_err(column)?,
            max_hp_b: row.try_get("max_hp_b").map_err(column)?,
            hp_a: row.try_get("hp_a").map_err(column)?,
            hp_b: row.try_get("hp_b").map_err(column)?,
            turn_holder: ParticipantId::new(row.try_get("turn_holder").map_err(column)?),
            status: status.parse().map_err(RepoError::serialization)?,
            winner: winner.map(ParticipantId::new),
            loser: loser.map(ParticipantId::new),
            version: u64::try_from(version).map_err(RepoError::serialization)?,
            created_at: decode_time(&created_at)?,
            ended_at: ended_at.as_deref().map(decode_time).transpose()?,
        };

        Match::from_parts(parts).map_err(RepoError::serialization)
    }

    async fn exists(&self, id: MatchId) -> Result<bool, RepoError> {
        let row = sqlx::query("SELECT 1 FROM matches WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("match_exists", e))?;
        Ok(row.is_some())
    }
}

fn version_column(version: u64) -> Result<i64, RepoError> {
    i64::try_from(version).map_err(RepoError::serialization)
}

#[async_trait]
impl MatchRepo for SqliteMatchRepo {
    async fn create(&self, arena_match: &Match) -> Result<(), RepoError> {
        let parts = arena_match.to_parts();
        let low = parts.participant_a.min(parts.participant_b);
        let high = parts.participant_a.max(parts.participant_b);

        sqlx::query(
            r#"
            INSERT INTO matches (
                id, kind, participant_a, participant_b, pair_low, pair_high,
                max_hp_a, max_hp_b, hp_a, hp_b, turn_holder, status,
                winner, loser, version, created_at, ended_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(parts.id.to_string())
        .bind(parts.kind.as_str())
        .bind(parts.participant_a.get())
        .bind(parts.participant_b.get())
        .bind(low.get())
        .bind(high.get())
        .bind(parts.max_hp_a)
        .bind(parts.max_hp_b)
        .bind(parts.hp_a)
        .bind(parts.hp_b)
        .bind(parts.turn_holder.get())
        .bind(parts.status.as_str())
        .bind(parts.winner.map(ParticipantId::get))
        .bind(parts.loser.map(ParticipantId::get))
        .bind(version_column(parts.version)?)
        .bind(encode_time(parts.created_at))
        .bind(parts.ended_at.map(encode_time))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                RepoError::constraint(format!(
                    "active match already exists between {} and {}",
                    parts.participant_a, parts.participant_b
                ))
            } else {
                RepoError::database("create_match", e)
            }
        })?;

        Ok(())
    }

    async fn get(&self, id: MatchId) -> Result<Option<Match>, RepoError> {
        let row = sqlx::query(&format!("{} WHERE id = ?", SELECT_COLUMNS))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("get_match", e))?;

        row.as_ref().map(Self::row_to_match).transpose()
    }

    async fn find_active_by_pair(
        &self,
        a: ParticipantId,
        b: ParticipantId,
    ) -> Result<Option<Match>, RepoError> {
        let row = sqlx::query(&format!(
            "{} WHERE pair_low = ? AND pair_high = ? AND status = 'active'",
            SELECT_COLUMNS
        ))
        .bind(a.min(b).get())
        .bind(a.max(b).get())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::database("find_active_match", e))?;

        row.as_ref().map(Self::row_to_match).transpose()
    }

    async fn save(&self, arena_match: &Match) -> Result<(), RepoError> {
        let parts = arena_match.to_parts();

        let result = sqlx::query(
            r#"
            UPDATE matches SET
                hp_a = ?, hp_b = ?, turn_holder = ?, status = ?,
                winner = ?, loser = ?, version = ?, ended_at = ?
            WHERE id = ? AND version = ?
            "#,
        )
        .bind(parts.hp_a)
        .bind(parts.hp_b)
        .bind(parts.turn_holder.get())
        .bind(parts.status.as_str())
        .bind(parts.winner.map(ParticipantId::get))
        .bind(parts.loser.map(ParticipantId::get))
        .bind(version_column(parts.version)?)
        .bind(parts.ended_at.map(encode_time))
        .bind(parts.id.to_string())
        .bind(version_column(arena_match.previous_version())?)
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("save_match", e))?;

        if result.rows_affected() == 0 {
            if self.exists(parts.id).await? {
                return Err(RepoError::conflict(
                    "Match",
                    parts.id,
                    arena_match.previous_version(),
                ));
            }
            return Err(RepoError::not_found("Match", parts.id));
        }
        Ok(())
    }

    async fn list_active_containing(
        &self,
        participant: ParticipantId,
    ) -> Result<Vec<Match>, RepoError> {
        let rows = sqlx::query(&format!(
            "{} WHERE status = 'active' AND (participant_a = ? OR participant_b = ?) \
             ORDER BY created_at",
            SELECT_COLUMNS
        ))
        .bind(participant.get())
        .bind(participant.get())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::database("list_active_matches", e))?;

        rows.iter().map(Self::row_to_match).collect()
    }
}
