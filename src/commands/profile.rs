use clap::{Args, Subcommand};

use super::{print_json, print_sync, OutputFormat};
use crate::models::UnitSystem;
use crate::session::{Session, SyncStatus};

#[derive(Args)]
pub struct ProfileCommand {
    #[command(subcommand)]
    pub command: ProfileSubcommand,
}

#[derive(Subcommand)]
pub enum ProfileSubcommand {
    /// Show your profile
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Update profile fields
    Set {
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        age: Option<u32>,

        /// Height: cm (metric), or inches / feet'inches like 5'10 (imperial)
        #[arg(long)]
        height: Option<String>,

        /// Weight in kg (metric) or lb (imperial)
        #[arg(long)]
        weight: Option<String>,

        #[arg(long)]
        goal: Option<String>,

        /// Daily calorie target (kcal)
        #[arg(long)]
        calories: Option<u32>,

        /// Daily water target (ml)
        #[arg(long)]
        water: Option<u32>,

        /// Fasting plan length in hours
        #[arg(long)]
        fasting_hours: Option<u32>,

        /// Unit system (metric, imperial). Existing height, weight and
        /// weigh-ins are converted.
        #[arg(long)]
        units: Option<String>,
    },
}

impl ProfileCommand {
    pub async fn run(&self, session: &mut Session) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ProfileSubcommand::Show { format } => {
                match format {
                    OutputFormat::Json => print_json(session.profile())?,
                    OutputFormat::Text => print!("{}", session.profile()),
                }
                Ok(())
            }

            ProfileSubcommand::Set {
                name,
                age,
                height,
                weight,
                goal,
                calories,
                water,
                fasting_hours,
                units,
            } => {
                let units: Option<UnitSystem> = units
                    .as_deref()
                    .map(|u| u.parse::<UnitSystem>().map_err(|e: String| e))
                    .transpose()?;
                if let Some(h) = fasting_hours {
                    if *h == 0 || *h > 72 {
                        return Err("Fasting plan must be between 1 and 72 hours".into());
                    }
                }

                // Units first, so explicit height/weight are read in the new system
                let mut sync = match units {
                    Some(u) => session.switch_units(u).await,
                    None => SyncStatus::Synced,
                };

                let status = session
                    .update_profile(|p| {
                        if let Some(v) = name {
                            p.name = v.clone();
                        }
                        if age.is_some() {
                            p.age = *age;
                        }
                        if let Some(v) = height {
                            p.height = v.trim().to_string();
                        }
                        if let Some(v) = weight {
                            p.weight = v.trim().to_string();
                        }
                        if let Some(v) = goal {
                            p.goal = v.clone();
                        }
                        if let Some(v) = calories {
                            p.calorie_target = *v;
                        }
                        if let Some(v) = water {
                            p.water_target_ml = *v;
                        }
                        if let Some(v) = fasting_hours {
                            p.fasting_plan_hours = *v;
                        }
                    })
                    .await;
                if sync.is_synced() {
                    sync = status;
                }

                println!("Profile updated.\n");
                print!("{}", session.profile());
                print_sync(&sync);
                Ok(())
            }
        }
    }
}
