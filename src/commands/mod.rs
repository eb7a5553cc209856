mod achievements;
mod activity;
mod briefing;
mod character;
mod config_cmd;
mod fast;
mod food;
mod profile;
mod stats;
mod water;
mod weight;

pub use achievements::AchievementsCommand;
pub use activity::ActivityCommand;
pub use briefing::BriefingCommand;
pub use character::CharacterCommand;
pub use config_cmd::ConfigCommand;
pub use fast::FastCommand;
pub use food::FoodCommand;
pub use profile::ProfileCommand;
pub use stats::StatsCommand;
pub use water::WaterCommand;
pub use weight::WeightCommand;

use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use serde::Serialize;
use uuid::Uuid;

use crate::session::{LogOutcome, SyncStatus};
use fitquest_core::clock::parse_day_key;

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Day selection shared by the list commands
#[derive(Args, Clone, Default)]
pub struct DateFilter {
    /// Single day (YYYY-MM-DD)
    #[arg(long, short, conflicts_with_all = ["from", "to"])]
    pub date: Option<String>,

    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,

    /// End date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub to: Option<String>,
}

impl DateFilter {
    /// Inclusive day range. With no flags the range ends today and spans
    /// `default_days` earlier days.
    pub fn resolve(
        &self,
        today: NaiveDate,
        default_days: i64,
    ) -> Result<(NaiveDate, NaiveDate), String> {
        if let Some(d) = &self.date {
            let day = parse_day_key(d)?;
            return Ok((day, day));
        }

        let to = match &self.to {
            Some(d) => parse_day_key(d)?,
            None => today,
        };
        let from = match &self.from {
            Some(d) => parse_day_key(d)?,
            None => to - chrono::Duration::days(default_days),
        };
        if from > to {
            return Err(format!("Start date {} is after end date {}", from, to));
        }
        Ok((from, to))
    }
}

pub(crate) fn parse_id(id: &str) -> Result<Uuid, String> {
    Uuid::parse_str(id.trim()).map_err(|_| format!("Invalid ID: {}", id))
}

pub(crate) fn parse_optional_day(date: &Option<String>) -> Result<Option<NaiveDate>, String> {
    date.as_deref().map(parse_day_key).transpose()
}

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub(crate) fn print_sync(status: &SyncStatus) {
    if !status.is_synced() {
        eprintln!("Warning: saved locally, {}", status);
    }
}

pub(crate) fn print_outcome(outcome: &LogOutcome, level: u32) {
    println!("+{} XP", outcome.xp_gained);
    if outcome.levels_gained > 0 {
        println!("Level up! You are now level {}.", level);
    }
    print_sync(&outcome.sync);
}

/// Prints a delete/edit result. Unknown ids are reported, not errors.
pub(crate) fn print_change(status: Option<SyncStatus>, what: &str, id: Uuid) {
    match status {
        Some(sync) => {
            println!("{} {}", what, id);
            print_sync(&sync);
        }
        None => println!("No entry found with ID {}", id),
    }
}
