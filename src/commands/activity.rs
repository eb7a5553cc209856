use clap::{Args, Subcommand};

use super::{
    parse_id, parse_optional_day, print_change, print_json, print_outcome, DateFilter,
    OutputFormat,
};
use crate::models::{ActivityKind, ActivityLog};
use crate::session::Session;
use fitquest_core::stats::{parse_mm_ss, total_active_calories, total_active_minutes};
use fitquest_core::LogCategory;

#[derive(Args)]
pub struct ActivityCommand {
    #[command(subcommand)]
    pub command: ActivitySubcommand,
}

#[derive(Subcommand)]
pub enum ActivitySubcommand {
    /// Log a workout or meditation
    Log {
        /// Kind of activity (workout, meditation)
        kind: String,

        /// Title, e.g. "Morning Run"
        title: String,

        /// Duration as MM:SS
        #[arg(long)]
        duration: String,

        /// Calories burned
        #[arg(long)]
        calories: Option<u32>,

        /// Display color tag
        #[arg(long)]
        color: Option<String>,

        /// Day to file the entry under (YYYY-MM-DD), defaults to today
        #[arg(long, short)]
        date: Option<String>,
    },

    /// Delete an activity
    Delete {
        /// Entry ID
        id: String,
    },

    /// List activities
    List {
        /// Only this kind (workout, meditation)
        #[arg(long, short)]
        kind: Option<String>,

        #[command(flatten)]
        range: DateFilter,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

impl ActivityCommand {
    pub async fn run(&self, session: &mut Session) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ActivitySubcommand::Log {
                kind,
                title,
                duration,
                calories,
                color,
                date,
            } => {
                let kind: ActivityKind = kind.parse().map_err(|e: String| e)?;
                if parse_mm_ss(duration) == 0 {
                    return Err(format!(
                        "Invalid duration '{}'. Use MM:SS, e.g. 25:00.",
                        duration
                    )
                    .into());
                }

                let mut log =
                    ActivityLog::recorded_at(kind, title.as_str(), duration.as_str(), session.now());
                if let Some(day) = parse_optional_day(date)? {
                    log = log.with_date(day);
                }
                if let Some(c) = calories {
                    log = log.with_calories(*c);
                }
                if let Some(c) = color {
                    log = log.with_color(c);
                }

                let outcome = session.add_activity(log.clone()).await;
                println!("Logged {}:", log.kind);
                println!("  {}", log);
                println!("  ID: {}", log.id);
                print_outcome(&outcome, session.profile().progression.level);
                Ok(())
            }

            ActivitySubcommand::Delete { id } => {
                let id = parse_id(id)?;
                let status = match session.store().category_of(id) {
                    Some(category @ (LogCategory::Workout | LogCategory::Meditation)) => {
                        session.remove(category, id).await
                    }
                    _ => None,
                };
                print_change(status, "Deleted activity", id);
                Ok(())
            }

            ActivitySubcommand::List {
                kind,
                range,
                format,
            } => {
                let kinds = match kind {
                    Some(k) => vec![k.parse::<ActivityKind>().map_err(|e: String| e)?],
                    None => vec![ActivityKind::Workout, ActivityKind::Meditation],
                };
                let (from, to) = range.resolve(session.today(), 0)?;

                let mut logs: Vec<&ActivityLog> = kinds
                    .iter()
                    .flat_map(|k| session.store().activities(*k).filter_by_range(from, to))
                    .collect();
                logs.sort_by(|a, b| b.date.cmp(&a.date).then(b.timestamp.cmp(&a.timestamp)));

                match format {
                    OutputFormat::Json => print_json(&logs)?,
                    OutputFormat::Text => {
                        if logs.is_empty() {
                            println!("No activities logged for {} to {}", from, to);
                            return Ok(());
                        }
                        for log in &logs {
                            println!("{}", log);
                            println!("        {}", log.id);
                        }
                        println!(
                            "\nTotal: {} min, {} kcal",
                            total_active_minutes(logs.iter().copied()),
                            total_active_calories(logs.iter().copied())
                        );
                    }
                }
                Ok(())
            }
        }
    }
}
