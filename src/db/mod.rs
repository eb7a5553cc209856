mod activity_repo;
mod fasting_repo;
mod food_repo;
mod profile_repo;
mod water_repo;
mod weight_repo;

pub use activity_repo::ActivityRepository;
pub use fasting_repo::FastingRepository;
pub use food_repo::FoodRepository;
pub use profile_repo::ProfileRepository;
pub use water_repo::WaterRepository;
pub use weight_repo::WeightRepository;

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;
use uuid::Uuid;

/// Initialize the database connection pool and run migrations
pub async fn init_db(path: &Path) -> Result<SqlitePool, sqlx::Error> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite:{}?mode=rwc", path.display());

    let options = SqliteConnectOptions::from_str(&db_url)?
        .foreign_keys(true)
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

fn decode_err(column: &str, value: &str) -> sqlx::Error {
    sqlx::Error::Decode(format!("invalid {} value '{}'", column, value).into())
}

pub(crate) fn parse_id(value: &str) -> Result<Uuid, sqlx::Error> {
    Uuid::parse_str(value).map_err(|_| decode_err("id", value))
}

pub(crate) fn parse_date(value: &str) -> Result<NaiveDate, sqlx::Error> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| decode_err("date", value))
}

pub(crate) fn parse_instant(value: &str) -> Result<DateTime<Utc>, sqlx::Error> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| decode_err("timestamp", value))
}

pub(crate) fn now_rfc3339() -> String {
    Utc::now().to_rfc3339()
}


#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_init_db_creates_tables() {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("nested").join("test.db");

        let pool = init_db(&db_path).await.unwrap();

        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' AND name NOT LIKE '_sqlx_%' ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .unwrap();

        let table_names: Vec<&str> = tables.iter().map(|t| t.0.as_str()).collect();
        for table in [
            "activity_logs",
            "fasting_logs",
            "food_logs",
            "user_profiles",
            "water_logs",
            "weight_logs",
        ] {
            assert!(table_names.contains(&table), "missing table {}", table);
        }
    }

    #[test]
    fn test_parse_helpers_reject_garbage() {
        assert!(parse_id("not-a-uuid").is_err());
        assert!(parse_date("2024-13-40").is_err());
        assert!(parse_instant("yesterday").is_err());
        assert!(parse_date("2024-05-01").is_ok());
    }
}
