use clap::{Args, Subcommand};

use super::{
    parse_id, parse_optional_day, print_change, print_json, print_outcome, print_sync,
    DateFilter, OutputFormat,
};
use crate::models::{Dimensions, WeightLog};
use crate::session::Session;
use fitquest_core::units::round1;
use fitquest_core::LogCategory;

#[derive(Args)]
pub struct WeightCommand {
    #[command(subcommand)]
    pub command: WeightSubcommand,
}

/// Optional body measurements, in the profile's length unit
#[derive(Args, Clone, Default)]
pub struct MeasurementArgs {
    #[arg(long)]
    pub waist: Option<f64>,

    #[arg(long)]
    pub chest: Option<f64>,

    #[arg(long)]
    pub arms: Option<f64>,

    #[arg(long)]
    pub thighs: Option<f64>,
}

impl MeasurementArgs {
    fn apply(&self, dimensions: &mut Dimensions) {
        if self.waist.is_some() {
            dimensions.waist = self.waist;
        }
        if self.chest.is_some() {
            dimensions.chest = self.chest;
        }
        if self.arms.is_some() {
            dimensions.arms = self.arms;
        }
        if self.thighs.is_some() {
            dimensions.thighs = self.thighs;
        }
    }
}

#[derive(Subcommand)]
pub enum WeightSubcommand {
    /// Log a weigh-in, in the profile's weight unit
    Log {
        /// Body weight
        value: f64,

        #[command(flatten)]
        measurements: MeasurementArgs,

        /// Day of the weigh-in (YYYY-MM-DD), defaults to today
        #[arg(long, short)]
        date: Option<String>,
    },

    /// Edit a weigh-in
    Edit {
        /// Entry ID
        id: String,

        /// New body weight
        #[arg(long)]
        value: Option<f64>,

        #[command(flatten)]
        measurements: MeasurementArgs,
    },

    /// Delete a weigh-in
    Delete {
        /// Entry ID
        id: String,
    },

    /// List weigh-ins
    List {
        #[command(flatten)]
        range: DateFilter,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

fn validate_weight(value: f64) -> Result<f64, String> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(format!("Invalid weight '{}'. Must be a positive number.", value))
    }
}

impl WeightCommand {
    pub async fn run(&self, session: &mut Session) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            WeightSubcommand::Log {
                value,
                measurements,
                date,
            } => {
                let value = validate_weight(*value)?;
                let units = session.profile().units;
                let today = session.today();
                let day = parse_optional_day(date)?.unwrap_or(today);

                let mut log = WeightLog::new(value, units).with_date(day);
                measurements.apply(&mut log.dimensions);

                let outcome = session.add_weight(log.clone()).await;
                println!("Logged weigh-in:");
                println!("  {}", log);
                println!("  ID: {}", log.id);
                print_outcome(&outcome, session.profile().progression.level);

                // Today's weigh-in becomes the profile weight used for BMI
                if day == today {
                    let text = round1(value).to_string();
                    let sync = session.update_profile(|p| p.weight = text).await;
                    print_sync(&sync);
                }
                Ok(())
            }

            WeightSubcommand::Edit {
                id,
                value,
                measurements,
            } => {
                let id = parse_id(id)?;
                let value = value.map(validate_weight).transpose()?;
                let status = session
                    .update_weight(id, |log| {
                        if let Some(v) = value {
                            log.value = v;
                        }
                        measurements.apply(&mut log.dimensions);
                    })
                    .await;
                print_change(status, "Updated weigh-in", id);
                Ok(())
            }

            WeightSubcommand::Delete { id } => {
                let id = parse_id(id)?;
                let status = session.remove(LogCategory::Weight, id).await;
                print_change(status, "Deleted weigh-in", id);
                Ok(())
            }

            WeightSubcommand::List { range, format } => {
                let (from, to) = range.resolve(session.today(), 30)?;
                let mut logs = session.store().weight().filter_by_range(from, to);
                logs.sort_by(|a, b| b.date.cmp(&a.date));

                match format {
                    OutputFormat::Json => print_json(&logs)?,
                    OutputFormat::Text => {
                        if logs.is_empty() {
                            println!("No weigh-ins for {} to {}", from, to);
                            return Ok(());
                        }
                        for log in &logs {
                            println!("{}  {}", log, log.id);
                        }
                        if let (Some(newest), Some(oldest)) = (logs.first(), logs.last()) {
                            if logs.len() > 1 && newest.unit == oldest.unit {
                                println!(
                                    "\nChange: {:+.1} {} since {}",
                                    newest.value - oldest.value,
                                    newest.unit.weight_unit(),
                                    oldest.date
                                );
                            }
                        }
                    }
                }
                Ok(())
            }
        }
    }
}
