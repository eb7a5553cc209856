use sqlx::SqlitePool;
use uuid::Uuid;

use super::{now_rfc3339, parse_date, parse_id};
use crate::models::{ActivityKind, ActivityLog};

pub struct ActivityRepository {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct ActivityRow {
    id: String,
    kind: String,
    title: String,
    icon: String,
    duration: String,
    timestamp: String,
    date: String,
    calories: Option<i64>,
    color: Option<String>,
}

impl ActivityRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn upsert(&self, user_id: &str, log: &ActivityLog) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO activity_logs (id, user_id, kind, title, icon, duration, timestamp, date, calories, color, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                kind = excluded.kind,
                title = excluded.title,
                icon = excluded.icon,
                duration = excluded.duration,
                timestamp = excluded.timestamp,
                date = excluded.date,
                calories = excluded.calories,
                color = excluded.color
            WHERE activity_logs.user_id = excluded.user_id
            "#,
        )
        .bind(log.id.to_string())
        .bind(user_id)
        .bind(log.kind.to_string())
        .bind(&log.title)
        .bind(&log.icon)
        .bind(&log.duration)
        .bind(&log.timestamp)
        .bind(log.date.to_string())
        .bind(log.calories.map(i64::from))
        .bind(&log.color)
        .bind(now_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Workouts and meditations together, newest day first.
    pub async fn list(&self, user_id: &str) -> Result<Vec<ActivityLog>, sqlx::Error> {
        let rows: Vec<ActivityRow> = sqlx::query_as(
            "SELECT * FROM activity_logs WHERE user_id = ? ORDER BY date DESC, timestamp DESC, created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(hydrate).collect()
    }

    pub async fn delete(&self, user_id: &str, id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM activity_logs WHERE user_id = ? AND id = ?")
            .bind(user_id)
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

fn hydrate(row: ActivityRow) -> Result<ActivityLog, sqlx::Error> {
    let kind: ActivityKind = row
        .kind
        .parse()
        .map_err(|e: String| sqlx::Error::Decode(e.into()))?;

    Ok(ActivityLog {
        id: parse_id(&row.id)?,
        kind,
        title: row.title,
        icon: row.icon,
        duration: row.duration,
        timestamp: row.timestamp,
        date: parse_date(&row.date)?,
        calories: row.calories.map(|c| c.clamp(0, u32::MAX as i64) as u32),
        color: row.color,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::setup_db;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn test_upsert_list_delete() {
        let db = setup_db().await;
        let repo = ActivityRepository::new(db.pool.clone());
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();

        let workout = ActivityLog::new(ActivityKind::Workout, "Intervals", "25:00")
            .with_calories(280)
            .with_color("red")
            .with_date(date);
        let meditation =
            ActivityLog::new(ActivityKind::Meditation, "Body Scan", "12:00").with_date(date);
        repo.upsert("user1", &workout).await.unwrap();
        repo.upsert("user1", &meditation).await.unwrap();

        let logs = repo.list("user1").await.unwrap();
        assert_eq!(logs.len(), 2);
        assert!(logs.contains(&workout));
        assert!(logs.contains(&meditation));

        repo.delete("user1", workout.id).await.unwrap();
        assert_eq!(repo.list("user1").await.unwrap(), vec![meditation]);
    }
}
