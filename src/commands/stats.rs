use clap::Args;

use super::{parse_optional_day, print_json, OutputFormat};
use crate::session::Session;
use fitquest_core::progress::current_streak;
use fitquest_core::DailySummary;

/// Today's numbers (or another day's)
#[derive(Args)]
pub struct StatsCommand {
    /// Day to summarize (YYYY-MM-DD), defaults to today
    #[arg(long, short)]
    pub date: Option<String>,

    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Summary for `day`. The running fast only counts toward today.
pub fn summarize(session: &Session, day: chrono::NaiveDate) -> DailySummary {
    let fast_elapsed = if day == session.today() {
        session.fasting().elapsed(session.now())
    } else {
        None
    };
    DailySummary::compute(
        &session.store().day_snapshot(day),
        session.profile(),
        fast_elapsed,
    )
}

impl StatsCommand {
    pub fn run(&self, session: &Session) -> Result<(), Box<dyn std::error::Error>> {
        let today = session.today();
        let day = parse_optional_day(&self.date)?.unwrap_or(today);
        let summary = summarize(session, day);

        match self.format {
            OutputFormat::Json => print_json(&summary)?,
            OutputFormat::Text => {
                println!("{}", summary);
                let progression = &session.profile().progression;
                println!(
                    "Level:     {} ({}/{} XP, {:.0}%)",
                    progression.level,
                    progression.xp,
                    progression.max_xp,
                    progression.percent_to_next()
                );
                println!(
                    "Streak:    {} day(s)",
                    current_streak(session.store(), today)
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::setup_db;
    use crate::models::{FoodLogItem, WaterLogItem};
    use chrono::{TimeZone, Utc};
    use fitquest_core::{day_key, ManualClock, SharedClock};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_summary_switches_with_the_day() {
        let db = setup_db().await;
        let now = Utc.with_ymd_and_hms(2024, 5, 2, 12, 0, 0).unwrap();
        let clock: SharedClock = Arc::new(ManualClock::new(now));
        let mut session = Session::load(db.pool.clone(), "user1", clock).await.unwrap();

        let today = day_key(now);
        let yesterday = today.pred_opt().unwrap();
        session
            .add_food(FoodLogItem::new("Pizza", 800).with_date(yesterday))
            .await;
        session
            .add_food(FoodLogItem::new("Salad", 300).with_date(today))
            .await;
        session
            .add_water(WaterLogItem::new(500).with_date(today))
            .await;
        session.start_fast().await.unwrap();

        let current = summarize(&session, today);
        assert_eq!(current.calories_consumed, 300);
        assert_eq!(current.water_ml, 500);
        assert!(current.fast_elapsed.is_some());

        let previous = summarize(&session, yesterday);
        assert_eq!(previous.calories_consumed, 800);
        assert_eq!(previous.water_ml, 0);
        assert!(previous.fast_elapsed.is_none());
    }
}
