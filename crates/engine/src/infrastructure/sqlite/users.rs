//! SQLite user store: profiles, ledger counters and inventory.

use async_trait::async_trait;
use duelbot_domain::{Attributes, ItemCategory, ItemHandle, ItemId, ParticipantId, Profile, Rank};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::infrastructure::ports::{
    InventoryError, InventoryPort, LedgerError, LedgerPort, LedgerRecord, ProfileRepo, RepoError,
    UserRegistry,
};

pub struct SqliteUserStore {
    pool: SqlitePool,
}

impl SqliteUserStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert or replace a profile, keeping ledger counters.
    pub async fn upsert_profile(&self, profile: &Profile) -> Result<(), RepoError> {
        let attrs = &profile.attributes;
        sqlx::query(
            r#"
            INSERT INTO users (
                tg_id, username, level, rank,
                strength, agility, intelligence, vitality, sense
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(tg_id) DO UPDATE SET
                username = excluded.username,
                level = excluded.level,
                rank = excluded.rank,
                strength = excluded.strength,
                agility = excluded.agility,
                intelligence = excluded.intelligence,
                vitality = excluded.vitality,
                sense = excluded.sense
            "#,
        )
        .bind(profile.id.get())
        .bind(&profile.display_name)
        .bind(i64::from(profile.level))
        .bind(profile.rank.to_string())
        .bind(i64::from(attrs.strength))
        .bind(i64::from(attrs.agility))
        .bind(i64::from(attrs.intelligence))
        .bind(i64::from(attrs.vitality))
        .bind(i64::from(attrs.sense))
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("upsert_profile", e))?;
        Ok(())
    }

    pub async fn add_item(
        &self,
        owner: ParticipantId,
        category: ItemCategory,
        name: &str,
        quantity: u32,
    ) -> Result<ItemHandle, RepoError> {
        let handle = ItemHandle {
            id: ItemId::new(),
            owner,
            category,
            name: name.to_string(),
        };
        sqlx::query(
            "INSERT INTO inventory (id, owner, category, name, quantity) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(handle.id.to_string())
        .bind(owner.get())
        .bind(handle.category.as_str())
        .bind(&handle.name)
        .bind(i64::from(quantity))
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("add_item", e))?;
        Ok(handle)
    }

    pub async fn ledger(&self, participant: ParticipantId) -> Result<Option<LedgerRecord>, RepoError> {
        let row = sqlx::query(
            "SELECT currency, wins, losses, ranking_points FROM users WHERE tg_id = ?",
        )
        .bind(participant.get())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::database("get_ledger", e))?;

        row.map(|row| {
            let column = |e: sqlx::Error| RepoError::serialization(e);
            Ok(LedgerRecord {
                currency: row.try_get("currency").map_err(column)?,
                wins: row.try_get("wins").map_err(column)?,
                losses: row.try_get("losses").map_err(column)?,
                ranking_points: row.try_get("ranking_points").map_err(column)?,
            })
        })
        .transpose()
    }

    fn row_to_profile(row: &SqliteRow) -> Result<Profile, RepoError> {
        let column = |e: sqlx::Error| RepoError::serialization(e);
        let stat = |name: &str| -> Result<u32, RepoError> {
            let raw: i64 = row.try_get(name).map_err(column)?;
            u32::try_from(raw).map_err(RepoError::serialization)
        };

        let id: i64 = row.try_get("tg_id").map_err(column)?;
        let username: String = row.try_get("username").map_err(column)?;
        let rank: String = row.try_get("rank").map_err(column)?;

        Ok(Profile::new(ParticipantId::new(id), username)
            .with_level(stat("level")?)
            .with_rank(Rank::parse(&rank))
            .with_attributes(Attributes {
                strength: stat("strength")?,
                agility: stat("agility")?,
                intelligence: stat("intelligence")?,
                vitality: stat("vitality")?,
                sense: stat("sense")?,
            }))
    }

    /// Apply one counter update; zero affected rows means the user is unknown.
    async fn bump(
        &self,
        operation: &'static str,
        sql: &'static str,
        participant: ParticipantId,
        amount: i64,
    ) -> Result<(), LedgerError> {
        let result = sqlx::query(sql)
            .bind(amount)
            .bind(participant.get())
            .execute(&self.pool)
            .await
            .map_err(|e| LedgerError::Backend(format!("{}: {}", operation, e)))?;
        if result.rows_affected() == 0 {
            return Err(LedgerError::UnknownParticipant(participant));
        }
        Ok(())
    }
}

#[async_trait]
impl ProfileRepo for SqliteUserStore {
    async fn get(&self, participant: ParticipantId) -> Result<Option<Profile>, RepoError> {
        let row = sqlx::query(
            r#"
            SELECT tg_id, username, level, rank,
                   strength, agility, intelligence, vitality, sense
            FROM users WHERE tg_id = ?
            "#,
        )
        .bind(participant.get())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::database("get_profile", e))?;

        row.as_ref().map(Self::row_to_profile).transpose()
    }
}

#[async_trait]
impl UserRegistry for SqliteUserStore {
    async fn register_if_missing(
        &self,
        participant: ParticipantId,
        display_name: &str,
    ) -> Result<bool, RepoError> {
        let result = sqlx::query("INSERT OR IGNORE INTO users (tg_id, username) VALUES (?, ?)")
            .bind(participant.get())
            .bind(display_name)
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::database("register_user", e))?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl LedgerPort for SqliteUserStore {
    async fn credit_currency(
        &self,
        participant: ParticipantId,
        amount: i64,
    ) -> Result<(), LedgerError> {
        self.bump(
            "credit_currency",
            "UPDATE users SET currency = currency + ? WHERE tg_id = ?",
            participant,
            amount,
        )
        .await
    }

    async fn debit_currency(
        &self,
        participant: ParticipantId,
        amount: i64,
    ) -> Result<(), LedgerError> {
        let result =
            sqlx::query("UPDATE users SET currency = currency - ? WHERE tg_id = ? AND currency >= ?")
                .bind(amount)
                .bind(participant.get())
                .bind(amount)
                .execute(&self.pool)
                .await
                .map_err(|e| LedgerError::Backend(format!("debit_currency: {}", e)))?;
        if result.rows_affected() > 0 {
            return Ok(());
        }

        let available: Option<i64> = sqlx::query_scalar("SELECT currency FROM users WHERE tg_id = ?")
            .bind(participant.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| LedgerError::Backend(format!("debit_currency: {}", e)))?;
        match available {
            Some(available) => Err(LedgerError::InsufficientFunds {
                requested: amount,
                available,
            }),
            None => Err(LedgerError::UnknownParticipant(participant)),
        }
    }

    async fn increment_wins(&self, participant: ParticipantId) -> Result<(), LedgerError> {
        self.bump(
            "increment_wins",
            "UPDATE users SET wins = wins + ? WHERE tg_id = ?",
            participant,
            1,
        )
        .await
    }

    async fn increment_losses(&self, participant: ParticipantId) -> Result<(), LedgerError> {
        self.bump(
            "increment_losses",
            "UPDATE users SET losses = losses + ? WHERE tg_id = ?",
            participant,
            1,
        )
        .await
    }

    async fn increment_ranking_points(
        &self,
        participant: ParticipantId,
        amount: i64,
    ) -> Result<(), LedgerError> {
        self.bump(
            "increment_ranking_points",
            "UPDATE users SET ranking_points = ranking_points + ? WHERE tg_id = ?",
            participant,
            amount,
        )
        .await
    }
}

#[async_trait]
impl InventoryPort for SqliteUserStore {
    async fn peek_first_usable(
        &self,
        participant: ParticipantId,
        category: Option<ItemCategory>,
    ) -> Result<Option<ItemHandle>, InventoryError> {
        let rows = sqlx::query(
            r#"
            SELECT id, category, name FROM inventory
            WHERE owner = ? AND quantity > 0
            ORDER BY rowid
            "#,
        )
        .bind(participant.get())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| InventoryError::Backend(e.to_string()))?;

        for row in rows {
            let backend = |e: sqlx::Error| InventoryError::Backend(e.to_string());
            let raw_category: String = row.try_get("category").map_err(backend)?;
            let item_category = ItemCategory::parse(&raw_category);
            if category.as_ref().is_some_and(|wanted| *wanted != item_category) {
                continue;
            }
            let id: String = row.try_get("id").map_err(backend)?;
            return Ok(Some(ItemHandle {
                id: id
                    .parse()
                    .map_err(|e: duelbot_domain::DomainError| InventoryError::Backend(e.to_string()))?,
                owner: participant,
                category: item_category,
                name: row.try_get("name").map_err(backend)?,
            }));
        }
        Ok(None)
    }

    async fn consume_one(&self, item: &ItemHandle) -> Result<(), InventoryError> {
        let result =
            sqlx::query("UPDATE inventory SET quantity = quantity - 1 WHERE id = ? AND quantity > 0")
                .bind(item.id.to_string())
                .execute(&self.pool)
                .await
                .map_err(|e| InventoryError::Backend(e.to_string()))?;
        if result.rows_affected() == 0 {
            return Err(InventoryError::Exhausted(item.id.to_string()));
        }

        sqlx::query("DELETE FROM inventory WHERE id = ? AND quantity <= 0")
            .bind(item.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| InventoryError::Backend(e.to_string()))?;
        Ok(())
    }
}
