use chrono::{DateTime, Utc};
use fitquest_core::Progression;
use sqlx::SqlitePool;

use super::{now_rfc3339, parse_instant};
use crate::models::{UnitSystem, UserStats};

/// One profile row per user. The row also carries the start time of the
/// running fast so a restart can resume it.
pub struct ProfileRepository {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct ProfileRow {
    name: String,
    age: Option<i64>,
    height: String,
    weight: String,
    goal: String,
    calorie_target: i64,
    water_target_ml: i64,
    fasting_plan_hours: i64,
    units: String,
    character_id: String,
    level: i64,
    xp: i64,
    max_xp: i64,
    accessory: Option<String>,
}

fn to_u32(value: i64) -> u32 {
    value.clamp(0, u32::MAX as i64) as u32
}

impl ProfileRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// The stored profile, or `None` for a user who never saved one.
    pub async fn get(&self, user_id: &str) -> Result<Option<UserStats>, sqlx::Error> {
        let row: Option<ProfileRow> = sqlx::query_as(
            r#"
            SELECT name, age, height, weight, goal, calorie_target, water_target_ml,
                   fasting_plan_hours, units, character_id, level, xp, max_xp, accessory
            FROM user_profiles WHERE user_id = ?
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| {
            let units: UnitSystem = row
                .units
                .parse()
                .map_err(|e: String| sqlx::Error::Decode(e.into()))?;
            Ok(UserStats {
                name: row.name,
                age: row.age.map(to_u32),
                height: row.height,
                weight: row.weight,
                goal: row.goal,
                calorie_target: to_u32(row.calorie_target),
                water_target_ml: to_u32(row.water_target_ml),
                fasting_plan_hours: to_u32(row.fasting_plan_hours),
                units,
                character_id: row.character_id,
                progression: Progression {
                    level: to_u32(row.level),
                    xp: to_u32(row.xp),
                    max_xp: to_u32(row.max_xp),
                },
                accessory: row.accessory,
            })
        })
        .transpose()
    }

    /// Like `get`, falling back to the default profile.
    pub async fn get_or_default(&self, user_id: &str) -> Result<UserStats, sqlx::Error> {
        Ok(self.get(user_id).await?.unwrap_or_default())
    }

    pub async fn save(&self, user_id: &str, stats: &UserStats) -> Result<(), sqlx::Error> {
        let now = now_rfc3339();
        sqlx::query(
            r#"
            INSERT INTO user_profiles (user_id, name, age, height, weight, goal, calorie_target,
                water_target_ml, fasting_plan_hours, units, character_id, level, xp, max_xp,
                accessory, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(user_id) DO UPDATE SET
                name = excluded.name,
                age = excluded.age,
                height = excluded.height,
                weight = excluded.weight,
                goal = excluded.goal,
                calorie_target = excluded.calorie_target,
                water_target_ml = excluded.water_target_ml,
                fasting_plan_hours = excluded.fasting_plan_hours,
                units = excluded.units,
                character_id = excluded.character_id,
                level = excluded.level,
                xp = excluded.xp,
                max_xp = excluded.max_xp,
                accessory = excluded.accessory,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(user_id)
        .bind(&stats.name)
        .bind(stats.age.map(i64::from))
        .bind(&stats.height)
        .bind(&stats.weight)
        .bind(&stats.goal)
        .bind(i64::from(stats.calorie_target))
        .bind(i64::from(stats.water_target_ml))
        .bind(i64::from(stats.fasting_plan_hours))
        .bind(stats.units.to_string())
        .bind(&stats.character_id)
        .bind(i64::from(stats.progression.level))
        .bind(i64::from(stats.progression.xp))
        .bind(i64::from(stats.progression.max_xp))
        .bind(&stats.accessory)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn fasting_started_at(
        &self,
        user_id: &str,
    ) -> Result<Option<DateTime<Utc>>, sqlx::Error> {
        let value: Option<Option<String>> =
            sqlx::query_scalar("SELECT fasting_started_at FROM user_profiles WHERE user_id = ?")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;

        value.flatten().as_deref().map(parse_instant).transpose()
    }

    /// Records (or clears, with `None`) the running fast. Creates a default
    /// profile row when the user has none yet.
    pub async fn set_fasting_started_at(
        &self,
        user_id: &str,
        start: Option<DateTime<Utc>>,
    ) -> Result<(), sqlx::Error> {
        if self.get(user_id).await?.is_none() {
            self.save(user_id, &UserStats::default()).await?;
        }

        sqlx::query(
            "UPDATE user_profiles SET fasting_started_at = ?, updated_at = ? WHERE user_id = ?",
        )
        .bind(start.map(|s| s.to_rfc3339()))
        .bind(now_rfc3339())
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
