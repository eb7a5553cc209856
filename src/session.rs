//! A user's working session: the in-memory log store plus the profile and
//! running fast, mirrored to SQLite.
//!
//! Loading pulls every row for the user into a fresh `DailyLogStore`. Each
//! write is applied locally first and then pushed. A failed push is logged
//! and reported as pending; the local change is kept.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::SqlitePool;
use std::fmt;
use uuid::Uuid;

use crate::db::{
    ActivityRepository, FastingRepository, FoodRepository, ProfileRepository, WaterRepository,
    WeightRepository,
};
use crate::models::{
    ActivityLog, FastingLog, FoodLogItem, UnitSystem, UserStats, WaterLogItem, WeightLog,
};
use fitquest_core::progress::xp_reward;
use fitquest_core::{
    day_key, DailyLogStore, FastingError, FastingSession, LogCategory, LogCollection, SharedClock,
};

/// Whether a local change reached the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncStatus {
    Synced,
    Pending(String),
}

impl SyncStatus {
    pub fn is_synced(&self) -> bool {
        matches!(self, SyncStatus::Synced)
    }

    fn merge(self, other: SyncStatus) -> SyncStatus {
        match self {
            SyncStatus::Synced => other,
            pending => pending,
        }
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncStatus::Synced => write!(f, "synced"),
            SyncStatus::Pending(reason) => write!(f, "sync pending ({})", reason),
        }
    }
}

/// Result of logging a new entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogOutcome {
    pub xp_gained: u32,
    pub levels_gained: u32,
    pub sync: SyncStatus,
}

struct Repos {
    food: FoodRepository,
    activity: ActivityRepository,
    water: WaterRepository,
    fasting: FastingRepository,
    weight: WeightRepository,
    profile: ProfileRepository,
}

impl Repos {
    fn new(pool: SqlitePool) -> Self {
        Self {
            food: FoodRepository::new(pool.clone()),
            activity: ActivityRepository::new(pool.clone()),
            water: WaterRepository::new(pool.clone()),
            fasting: FastingRepository::new(pool.clone()),
            weight: WeightRepository::new(pool.clone()),
            profile: ProfileRepository::new(pool),
        }
    }
}

fn settle(result: Result<(), sqlx::Error>, what: &str) -> SyncStatus {
    match result {
        Ok(()) => {
            tracing::debug!(what, "pushed");
            SyncStatus::Synced
        }
        Err(e) => {
            tracing::warn!(what, error = %e, "push failed, change kept locally");
            SyncStatus::Pending(e.to_string())
        }
    }
}

pub struct Session {
    user_id: String,
    repos: Repos,
    clock: SharedClock,
    store: DailyLogStore,
    profile: UserStats,
    fasting: FastingSession,
}

impl Session {
    /// Pulls all of `user_id`'s rows into a new session.
    pub async fn load(
        pool: SqlitePool,
        user_id: impl Into<String>,
        clock: SharedClock,
    ) -> Result<Self, sqlx::Error> {
        let user_id = user_id.into();
        let repos = Repos::new(pool);

        let mut store = DailyLogStore::new();
        // Repos list newest first; `add` prepends, so feed oldest first.
        for item in repos.food.list(&user_id).await?.into_iter().rev() {
            store.food_mut().add(item);
        }
        for log in repos.activity.list(&user_id).await?.into_iter().rev() {
            store.add_activity(log);
        }
        for item in repos.water.list(&user_id).await?.into_iter().rev() {
            store.water_mut().add(item);
        }
        *store.fasting_mut() = LogCollection::from_entries(repos.fasting.list(&user_id).await?);
        *store.weight_mut() = LogCollection::from_entries(repos.weight.list(&user_id).await?);

        let profile = repos.profile.get_or_default(&user_id).await?;
        let fasting = FastingSession::from_start(repos.profile.fasting_started_at(&user_id).await?);

        tracing::info!(
            user_id = %user_id,
            food = store.len(LogCategory::Food),
            water = store.len(LogCategory::Water),
            fasts = store.len(LogCategory::Fasting),
            fasting = fasting.is_active(),
            "session loaded"
        );

        Ok(Self {
            user_id,
            repos,
            clock,
            store,
            profile,
            fasting,
        })
    }

    pub fn store(&self) -> &DailyLogStore {
        &self.store
    }

    pub fn profile(&self) -> &UserStats {
        &self.profile
    }

    pub fn fasting(&self) -> &FastingSession {
        &self.fasting
    }

    pub fn clock(&self) -> SharedClock {
        self.clock.clone()
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn today(&self) -> NaiveDate {
        day_key(self.now())
    }

    async fn award(&mut self, category: LogCategory, sync: SyncStatus) -> LogOutcome {
        let xp_gained = xp_reward(category);
        let levels_gained = self.profile.progression.gain(xp_gained);
        if levels_gained > 0 {
            tracing::info!(level = self.profile.progression.level, "level up");
        }
        let pushed = self.repos.profile.save(&self.user_id, &self.profile).await;
        LogOutcome {
            xp_gained,
            levels_gained,
            sync: sync.merge(settle(pushed, "profile")),
        }
    }

    pub async fn add_food(&mut self, item: FoodLogItem) -> LogOutcome {
        self.store.food_mut().add(item.clone());
        let sync = settle(self.repos.food.upsert(&self.user_id, &item).await, "food");
        self.award(LogCategory::Food, sync).await
    }

    /// Applies `patch` to a food entry. `None` when the id is unknown.
    pub async fn update_food<F>(&mut self, id: Uuid, patch: F) -> Option<SyncStatus>
    where
        F: FnOnce(&mut FoodLogItem),
    {
        if !self.store.food_mut().update(id, patch) {
            return None;
        }
        let item = self.store.food().get(id)?.clone();
        Some(settle(
            self.repos.food.upsert(&self.user_id, &item).await,
            "food",
        ))
    }

    pub async fn add_activity(&mut self, log: ActivityLog) -> LogOutcome {
        let category = LogCategory::from(log.kind);
        self.store.add_activity(log.clone());
        let sync = settle(
            self.repos.activity.upsert(&self.user_id, &log).await,
            "activity",
        );
        self.award(category, sync).await
    }

    pub async fn add_water(&mut self, item: WaterLogItem) -> LogOutcome {
        self.store.water_mut().add(item.clone());
        let sync = settle(self.repos.water.upsert(&self.user_id, &item).await, "water");
        self.award(LogCategory::Water, sync).await
    }

    pub async fn add_weight(&mut self, log: WeightLog) -> LogOutcome {
        self.store.weight_mut().add(log.clone());
        let sync = settle(
            self.repos.weight.upsert(&self.user_id, &log).await,
            "weight",
        );
        self.award(LogCategory::Weight, sync).await
    }

    pub async fn update_weight<F>(&mut self, id: Uuid, patch: F) -> Option<SyncStatus>
    where
        F: FnOnce(&mut WeightLog),
    {
        if !self.store.weight_mut().update(id, patch) {
            return None;
        }
        let log = self.store.weight().get(id)?.clone();
        Some(settle(
            self.repos.weight.upsert(&self.user_id, &log).await,
            "weight",
        ))
    }

    /// Deletes an entry by id. `None` when nothing in `category` has that id.
    pub async fn remove(&mut self, category: LogCategory, id: Uuid) -> Option<SyncStatus> {
        if !self.store.remove(category, id) {
            return None;
        }
        let result = match category {
            LogCategory::Workout | LogCategory::Meditation => {
                self.repos.activity.delete(&self.user_id, id).await
            }
            LogCategory::Food => self.repos.food.delete(&self.user_id, id).await,
            LogCategory::Water => self.repos.water.delete(&self.user_id, id).await,
            LogCategory::Fasting => self.repos.fasting.delete(&self.user_id, id).await,
            LogCategory::Weight => self.repos.weight.delete(&self.user_id, id).await,
        };
        Some(settle(result, "delete"))
    }

    /// Starts a fast now. Rejected while another fast is running.
    pub async fn start_fast(&mut self) -> Result<SyncStatus, FastingError> {
        let now = self.now();
        self.fasting.start(now)?;
        tracing::info!(start = %now, "fast started");
        Ok(settle(
            self.repos
                .profile
                .set_fasting_started_at(&self.user_id, Some(now))
                .await,
            "fast start",
        ))
    }

    /// Stops the running fast, logging it. `None` when no fast is running.
    pub async fn stop_fast(&mut self) -> Option<(FastingLog, LogOutcome)> {
        let now = self.now();
        let log = self.fasting.stop(now, &mut self.store)?;
        tracing::info!(duration = %log.duration, "fast completed");

        let sync = settle(
            self.repos.fasting.upsert(&self.user_id, &log).await,
            "fasting",
        )
        .merge(settle(
            self.repos
                .profile
                .set_fasting_started_at(&self.user_id, None)
                .await,
            "fast stop",
        ));
        let outcome = self.award(LogCategory::Fasting, sync).await;
        Some((log, outcome))
    }

    /// Edits the profile and saves it.
    pub async fn update_profile<F>(&mut self, patch: F) -> SyncStatus
    where
        F: FnOnce(&mut UserStats),
    {
        patch(&mut self.profile);
        settle(
            self.repos.profile.save(&self.user_id, &self.profile).await,
            "profile",
        )
    }

    /// Switches units on the profile and every weight log.
    pub async fn switch_units(&mut self, units: UnitSystem) -> SyncStatus {
        if units == self.profile.units {
            return SyncStatus::Synced;
        }
        self.profile.switch_units(units);
        self.store.convert_weights(units);

        let mut sync = settle(
            self.repos.profile.save(&self.user_id, &self.profile).await,
            "profile",
        );
        for log in self.store.weight().iter() {
            sync = sync.merge(settle(
                self.repos.weight.upsert(&self.user_id, log).await,
                "weight",
            ));
        }
        sync
    }
}
