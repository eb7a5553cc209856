use sqlx::SqlitePool;
use uuid::Uuid;

use super::{now_rfc3339, parse_date, parse_id, parse_instant};
use crate::models::FastingLog;

pub struct FastingRepository {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct FastingRow {
    id: String,
    duration: String,
    start_time: String,
    end_time: String,
    date: String,
}

impl FastingRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn upsert(&self, user_id: &str, log: &FastingLog) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO fasting_logs (id, user_id, duration, start_time, end_time, date, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                duration = excluded.duration,
                start_time = excluded.start_time,
                end_time = excluded.end_time,
                date = excluded.date
            WHERE fasting_logs.user_id = excluded.user_id
            "#,
        )
        .bind(log.id.to_string())
        .bind(user_id)
        .bind(&log.duration)
        .bind(log.start_time.to_rfc3339())
        .bind(log.end_time.to_rfc3339())
        .bind(log.date.to_string())
        .bind(now_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn list(&self, user_id: &str) -> Result<Vec<FastingLog>, sqlx::Error> {
        let rows: Vec<FastingRow> = sqlx::query_as(
            "SELECT id, duration, start_time, end_time, date FROM fasting_logs WHERE user_id = ? ORDER BY end_time DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                Ok(FastingLog {
                    id: parse_id(&row.id)?,
                    duration: row.duration,
                    start_time: parse_instant(&row.start_time)?,
                    end_time: parse_instant(&row.end_time)?,
                    date: parse_date(&row.date)?,
                })
            })
            .collect()
    }

    pub async fn delete(&self, user_id: &str, id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM fasting_logs WHERE user_id = ? AND id = ?")
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
    use chrono::{TimeZone, Utc};

    #[tokio::test]
    async fn test_list_newest_first() {
        let db = setup_db().await;
        let repo = FastingRepository::new(db.pool.clone());

        let start = Utc.with_ymd_and_hms(2024, 5, 1, 20, 0, 0).unwrap();
        let older = FastingLog::completed(start, start + chrono::Duration::hours(14));
        let next_start = start + chrono::Duration::days(1);
        let newer = FastingLog::completed(next_start, next_start + chrono::Duration::hours(16));
        repo.upsert("user1", &older).await.unwrap();
        repo.upsert("user1", &newer).await.unwrap();

        let logs = repo.list("user1").await.unwrap();
        assert_eq!(logs, vec![newer, older]);
    }
}
