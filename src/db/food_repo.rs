use sqlx::SqlitePool;
use std::collections::BTreeMap;
use uuid::Uuid;

use super::{now_rfc3339, parse_date, parse_id};
use crate::models::{FoodLogItem, Macros};

pub struct FoodRepository {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct FoodRow {
    id: String,
    name: String,
    calories: i64,
    protein: f64,
    carbs: f64,
    fat: f64,
    micros: Option<String>,
    icon: String,
    timestamp: String,
    date: String,
    display_amount: Option<String>,
    category: Option<String>,
    feedback: Option<String>,
    zpd_status: Option<String>,
}

impl FoodRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Inserts the item, or overwrites the row with the same id.
    pub async fn upsert(&self, user_id: &str, item: &FoodLogItem) -> Result<(), sqlx::Error> {
        let micros = match &item.micros {
            Some(m) => Some(
                serde_json::to_string(m).map_err(|e| sqlx::Error::Encode(Box::new(e)))?,
            ),
            None => None,
        };

        sqlx::query(
            r#"
            INSERT INTO food_logs (id, user_id, name, calories, protein, carbs, fat, micros, icon, timestamp, date, display_amount, category, feedback, zpd_status, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                calories = excluded.calories,
                protein = excluded.protein,
                carbs = excluded.carbs,
                fat = excluded.fat,
                micros = excluded.micros,
                icon = excluded.icon,
                timestamp = excluded.timestamp,
                date = excluded.date,
                display_amount = excluded.display_amount,
                category = excluded.category,
                feedback = excluded.feedback,
                zpd_status = excluded.zpd_status
            WHERE food_logs.user_id = excluded.user_id
            "#,
        )
        .bind(item.id.to_string())
        .bind(user_id)
        .bind(&item.name)
        .bind(item.calories as i64)
        .bind(item.macros.protein)
        .bind(item.macros.carbs)
        .bind(item.macros.fat)
        .bind(&micros)
        .bind(&item.icon)
        .bind(&item.timestamp)
        .bind(item.date.to_string())
        .bind(&item.display_amount)
        .bind(&item.category)
        .bind(&item.feedback)
        .bind(&item.zpd_status)
        .bind(now_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// All of a user's food logs, newest day first.
    pub async fn list(&self, user_id: &str) -> Result<Vec<FoodLogItem>, sqlx::Error> {
        let rows: Vec<FoodRow> = sqlx::query_as(
            "SELECT * FROM food_logs WHERE user_id = ? ORDER BY date DESC, timestamp DESC, created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(hydrate).collect()
    }

    pub async fn delete(&self, user_id: &str, id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM food_logs WHERE user_id = ? AND id = ?")
            .bind(user_id)
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

fn hydrate(row: FoodRow) -> Result<FoodLogItem, sqlx::Error> {
    let micros: Option<BTreeMap<String, f64>> = row
        .micros
        .as_deref()
        .and_then(|json| serde_json::from_str(json).ok());

    Ok(FoodLogItem {
        id: parse_id(&row.id)?,
        name: row.name,
        calories: row.calories.clamp(0, u32::MAX as i64) as u32,
        macros: Macros::new(row.protein, row.carbs, row.fat),
        micros,
        icon: row.icon,
        timestamp: row.timestamp,
        date: parse_date(&row.date)?,
        display_amount: row.display_amount,
        category: row.category,
        feedback: row.feedback,
        zpd_status: row.zpd_status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::setup_db;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn test_upsert_and_list() {
        let db = setup_db().await;
        let repo = FoodRepository::new(db.pool.clone());

        let mut micros = BTreeMap::new();
        micros.insert("iron".to_string(), 2.5);
        let item = FoodLogItem::new("Spinach Salad", 180)
            .with_macros(Macros::new(6.0, 12.0, 11.0))
            .with_micros(micros)
            .with_display_amount("1 bowl")
            .with_date(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        repo.upsert("user1", &item).await.unwrap();

        let logs = repo.list("user1").await.unwrap();
        assert_eq!(logs, vec![item]);
        assert!(repo.list("someone-else").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upsert_overwrites_existing_row() {
        let db = setup_db().await;
        let repo = FoodRepository::new(db.pool.clone());

        let mut item = FoodLogItem::new("Pasta", 600);
        repo.upsert("user1", &item).await.unwrap();
        item.calories = 450;
        repo.upsert("user1", &item).await.unwrap();

        let logs = repo.list("user1").await.unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].calories, 450);
    }

    #[tokio::test]
    async fn test_upsert_leaves_other_users_row_alone() {
        let db = setup_db().await;
        let repo = FoodRepository::new(db.pool.clone());

        let mut item = FoodLogItem::new("Pasta", 600);
        repo.upsert("user1", &item).await.unwrap();
        item.calories = 1;
        repo.upsert("user2", &item).await.unwrap();

        let logs = repo.list("user1").await.unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].calories, 600);
        assert!(repo.list("user2").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete() {
        let db = setup_db().await;
        let repo = FoodRepository::new(db.pool.clone());

        let item = FoodLogItem::new("Cookie", 200);
        repo.upsert("user1", &item).await.unwrap();
        repo.delete("user1", Uuid::new_v4()).await.unwrap();
        assert_eq!(repo.list("user1").await.unwrap().len(), 1);

        repo.delete("user1", item.id).await.unwrap();
        assert!(repo.list("user1").await.unwrap().is_empty());
    }
}
