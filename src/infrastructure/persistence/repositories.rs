use crate::domain::repositories::RoundRepository;
use crate::domain::round::Round;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use tracing::debug;

pub struct SqliteRoundRepository {
    pool: SqlitePool,
}

impl SqliteRoundRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn to_db_id(id: u64) -> Result<i64> {
        i64::try_from(id).with_context(|| format!("Round id {} does not fit in SQLite INTEGER", id))
    }

    fn map_rows_to_rounds(rows: Vec<sqlx::sqlite::SqliteRow>) -> Result<Vec<Round>> {
        let mut rounds = Vec::with_capacity(rows.len());
        for row in rows {
            let id: i64 = row.try_get("id")?;
            let number: i64 = row.try_get("number")?;
            let id = u64::try_from(id).with_context(|| format!("Negative round id {}", id))?;
            let number = u8::try_from(number)
                .with_context(|| format!("Stored number {} for round {} is out of range", number, id))?;
            rounds.push(Round::new(id, number)?);
        }
        Ok(rounds)
    }
}

#[async_trait]
impl RoundRepository for SqliteRoundRepository {
    async fn save(&self, round: &Round) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO rounds (id, number, class, observed_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                number = excluded.number,
                class = excluded.class
            "#,
        )
        .bind(Self::to_db_id(round.id())?)
        .bind(i64::from(round.number()))
        .bind(round.class().to_string())
        .bind(Utc::now().timestamp())
        .execute(&self.pool)
        .await
        .context("Failed to save round")?;

        Ok(())
    }

    async fn save_all(&self, rounds: &[Round]) -> Result<()> {
        let mut tx = self.pool.begin().await.context("Failed to begin transaction")?;
        let observed_at = Utc::now().timestamp();

        for round in rounds {
            sqlx::query(
                r#"
                INSERT INTO rounds (id, number, class, observed_at)
                VALUES (?, ?, ?, ?)
                ON CONFLICT(id) DO UPDATE SET
                    number = excluded.number,
                    class = excluded.class
                "#,
            )
            .bind(Self::to_db_id(round.id())?)
            .bind(i64::from(round.number()))
            .bind(round.class().to_string())
            .bind(observed_at)
            .execute(&mut *tx)
            .await
            .context("Failed to save round")?;
        }

        tx.commit().await.context("Failed to commit rounds")?;
        debug!("Persisted {} rounds", rounds.len());
        Ok(())
    }

    async fn load_recent(&self, limit: usize) -> Result<Vec<Round>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = sqlx::query(
            r#"
            SELECT id, number FROM (
                SELECT id, number FROM rounds ORDER BY id DESC LIMIT ?
            ) ORDER BY id ASC
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .context("Failed to load recent rounds")?;

        Self::map_rows_to_rounds(rows)
    }

    async fn count(&self) -> Result<usize> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM rounds")
            .fetch_one(&self.pool)
            .await?;
        let count: i64 = row.try_get("count")?;
        Ok(count as usize)
    }
}
