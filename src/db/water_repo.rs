use sqlx::SqlitePool;
use uuid::Uuid;

use super::{now_rfc3339, parse_date, parse_id};
use crate::models::WaterLogItem;

pub struct WaterRepository {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct WaterRow {
    id: String,
    amount: i64,
    timestamp: String,
    date: String,
}

impl WaterRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn upsert(&self, user_id: &str, item: &WaterLogItem) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO water_logs (id, user_id, amount, timestamp, date, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                amount = excluded.amount,
                timestamp = excluded.timestamp,
                date = excluded.date
            WHERE water_logs.user_id = excluded.user_id
            "#,
        )
        .bind(item.id.to_string())
        .bind(user_id)
        .bind(item.amount as i64)
        .bind(&item.timestamp)
        .bind(item.date.to_string())
        .bind(now_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn list(&self, user_id: &str) -> Result<Vec<WaterLogItem>, sqlx::Error> {
        let rows: Vec<WaterRow> = sqlx::query_as(
            "SELECT id, amount, timestamp, date FROM water_logs WHERE user_id = ? ORDER BY date DESC, timestamp DESC, created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                Ok(WaterLogItem {
                    id: parse_id(&row.id)?,
                    amount: row.amount.clamp(0, u32::MAX as i64) as u32,
                    timestamp: row.timestamp,
                    date: parse_date(&row.date)?,
                })
            })
            .collect()
    }

    pub async fn delete(&self, user_id: &str, id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM water_logs WHERE user_id = ? AND id = ?")
            .bind(user_id)
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::setup_db;

    #[tokio::test]
    async fn test_upsert_list_delete() {
        let db = setup_db().await;
        let repo = WaterRepository::new(db.pool.clone());

        let glass = WaterLogItem::new(250);
        repo.upsert("user1", &glass).await.unwrap();
        assert_eq!(repo.list("user1").await.unwrap(), vec![glass.clone()]);

        repo.delete("user1", glass.id).await.unwrap();
        assert!(repo.list("user1").await.unwrap().is_empty());
    }
}
