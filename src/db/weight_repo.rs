use sqlx::SqlitePool;
use uuid::Uuid;

use super::{now_rfc3339, parse_date, parse_id};
use crate::models::{Dimensions, UnitSystem, WeightLog};

pub struct WeightRepository {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct WeightRow {
    id: String,
    date: String,
    value: f64,
    unit: String,
    waist: Option<f64>,
    chest: Option<f64>,
    arms: Option<f64>,
    thighs: Option<f64>,
    dimensions_unit: String,
}

impl WeightRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn upsert(&self, user_id: &str, log: &WeightLog) -> Result<(), sqlx::Error> {
        let d = &log.dimensions;
        sqlx::query(
            r#"
            INSERT INTO weight_logs (id, user_id, date, value, unit, waist, chest, arms, thighs, dimensions_unit, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                date = excluded.date,
                value = excluded.value,
                unit = excluded.unit,
                waist = excluded.waist,
                chest = excluded.chest,
                arms = excluded.arms,
                thighs = excluded.thighs,
                dimensions_unit = excluded.dimensions_unit
            WHERE weight_logs.user_id = excluded.user_id
            "#,
        )
        .bind(log.id.to_string())
        .bind(user_id)
        .bind(log.date.to_string())
        .bind(log.value)
        .bind(log.unit.to_string())
        .bind(d.waist)
        .bind(d.chest)
        .bind(d.arms)
        .bind(d.thighs)
        .bind(d.unit.to_string())
        .bind(now_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn list(&self, user_id: &str) -> Result<Vec<WeightLog>, sqlx::Error> {
        let rows: Vec<WeightRow> = sqlx::query_as(
            "SELECT id, date, value, unit, waist, chest, arms, thighs, dimensions_unit FROM weight_logs WHERE user_id = ? ORDER BY date DESC, created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(hydrate).collect()
    }

    pub async fn delete(&self, user_id: &str, id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM weight_logs WHERE user_id = ? AND id = ?")
            .bind(user_id)
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

fn parse_units(value: &str) -> Result<UnitSystem, sqlx::Error> {
    value
        .parse()
        .map_err(|e: String| sqlx::Error::Decode(e.into()))
}

fn hydrate(row: WeightRow) -> Result<WeightLog, sqlx::Error> {
    Ok(WeightLog {
        id: parse_id(&row.id)?,
        date: parse_date(&row.date)?,
        value: row.value,
        unit: parse_units(&row.unit)?,
        dimensions: Dimensions {
            waist: row.waist,
            chest: row.chest,
            arms: row.arms,
            thighs: row.thighs,
            unit: parse_units(&row.dimensions_unit)?,
        },
    })
}
