use chrono::{DateTime, NaiveDate, Utc};
use clap::{Args, Subcommand};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use super::{
    parse_id, parse_optional_day, print_change, print_json, print_outcome, DateFilter,
    OutputFormat,
};
use crate::ai::{mime_for_path, GenAiClient};
use crate::config::Config;
use crate::models::{Character, FoodLogItem, Macros};
use crate::session::Session;
use fitquest_core::stats::{macro_totals, total_calories};
use fitquest_core::LogCategory;

#[derive(Args)]
pub struct FoodCommand {
    #[command(subcommand)]
    pub command: FoodSubcommand,
}

#[derive(Subcommand)]
pub enum FoodSubcommand {
    /// Log something you ate
    Add {
        /// Food name
        name: String,

        /// Calories (kcal)
        #[arg(long)]
        calories: u32,

        /// Protein (g)
        #[arg(long, default_value_t = 0.0)]
        protein: f64,

        /// Carbohydrates (g)
        #[arg(long, default_value_t = 0.0)]
        carbs: f64,

        /// Fat (g)
        #[arg(long, default_value_t = 0.0)]
        fat: f64,

        /// Portion, e.g. "1 cup"
        #[arg(long)]
        amount: Option<String>,

        /// Day to file the entry under (YYYY-MM-DD), defaults to today
        #[arg(long, short)]
        date: Option<String>,
    },

    /// Log a meal from a photo, estimated by the AI coach
    Scan {
        /// Image file (jpg, png, webp, heic, gif)
        image: PathBuf,

        /// Portion, e.g. "1 plate"
        #[arg(long)]
        amount: Option<String>,
    },

    /// Edit a food entry
    Edit {
        /// Entry ID
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        calories: Option<u32>,

        #[arg(long)]
        protein: Option<f64>,

        #[arg(long)]
        carbs: Option<f64>,

        #[arg(long)]
        fat: Option<f64>,

        #[arg(long)]
        amount: Option<String>,
    },

    /// Delete a food entry
    Delete {
        /// Entry ID
        id: String,
    },

    /// List food entries
    List {
        #[command(flatten)]
        range: DateFilter,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

impl FoodCommand {
    pub async fn run(
        &self,
        session: &mut Session,
        config: &Config,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            FoodSubcommand::Add {
                name,
                calories,
                protein,
                carbs,
                fat,
                amount,
                date,
            } => {
                let mut item = FoodLogItem::recorded_at(name.as_str(), *calories, session.now())
                    .with_macros(Macros::new(*protein, *carbs, *fat));
                if let Some(day) = parse_optional_day(date)? {
                    item = item.with_date(day);
                }
                if let Some(a) = amount {
                    item = item.with_display_amount(a);
                }

                let outcome = session.add_food(item.clone()).await;
                println!("Logged food:");
                println!("  {}", item);
                println!("  ID: {}", item.id);
                print_outcome(&outcome, session.profile().progression.level);
                Ok(())
            }

            FoodSubcommand::Scan { image, amount } => {
                let mime_type = mime_for_path(image)
                    .ok_or_else(|| format!("Unsupported image type: {}", image.display()))?;
                let bytes = tokio::fs::read(image).await?;
                let persona = Character::find_or_default(&session.profile().character_id);

                let analysis = match GenAiClient::from_config(&config.ai) {
                    Ok(client) => match client.analyze_food(&bytes, mime_type, &persona).await {
                        Ok(analysis) => Some(analysis),
                        Err(e) => {
                            tracing::warn!(error = %e, "food analysis failed");
                            None
                        }
                    },
                    Err(e) => {
                        tracing::warn!(error = %e, "food analysis unavailable");
                        None
                    }
                };

                let analyzed = analysis.is_some();
                let mut item = match analysis {
                    Some(analysis) => analysis.into_food_log(session.now()),
                    None => unanalyzed_scan(image, session.now()),
                };
                if let Some(a) = amount {
                    item = item.with_display_amount(a);
                }

                let outcome = session.add_food(item.clone()).await;
                if analyzed {
                    println!("{} estimates:", persona.name);
                } else {
                    println!("Could not analyze {}, logged without nutrition:", image.display());
                }
                println!("  {}", item);
                if let Some(feedback) = &item.feedback {
                    println!("  \"{}\"", feedback);
                }
                println!("  ID: {}", item.id);
                if !analyzed {
                    println!("  Set calories with 'fitquest food edit {} --calories <N>'", item.id);
                }
                print_outcome(&outcome, session.profile().progression.level);
                Ok(())
            }

            FoodSubcommand::Edit {
                id,
                name,
                calories,
                protein,
                carbs,
                fat,
                amount,
            } => {
                let id = parse_id(id)?;
                let status = session
                    .update_food(id, |item| {
                        if let Some(n) = name {
                            item.name = n.clone();
                        }
                        if let Some(c) = calories {
                            item.calories = *c;
                        }
                        if let Some(p) = protein {
                            item.macros.protein = *p;
                        }
                        if let Some(c) = carbs {
                            item.macros.carbs = *c;
                        }
                        if let Some(f) = fat {
                            item.macros.fat = *f;
                        }
                        if let Some(a) = amount {
                            item.display_amount = Some(a.clone());
                        }
                    })
                    .await;
                print_change(status, "Updated food entry", id);
                Ok(())
            }

            FoodSubcommand::Delete { id } => {
                let id = parse_id(id)?;
                let status = session.remove(LogCategory::Food, id).await;
                print_change(status, "Deleted food entry", id);
                Ok(())
            }

            FoodSubcommand::List { range, format } => {
                let (from, to) = range.resolve(session.today(), 0)?;
                let items = session.store().food().filter_by_range(from, to);

                match format {
                    OutputFormat::Json => print_json(&items)?,
                    OutputFormat::Text => print_food_by_day(&items, from, to),
                }
                Ok(())
            }
        }
    }
}

/// Zero-calorie entry named after the photo, for when analysis is unavailable.
fn unanalyzed_scan(image: &Path, at: DateTime<Utc>) -> FoodLogItem {
    let name = image
        .file_stem()
        .map(|stem| stem.to_string_lossy().replace(['_', '-'], " "))
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| "Scanned food".to_string());
    FoodLogItem::recorded_at(name, 0, at).with_icon("camera")
}

fn print_food_by_day(items: &[&FoodLogItem], from: NaiveDate, to: NaiveDate) {
    if items.is_empty() {
        println!("No food logged for {} to {}", from, to);
        return;
    }

    let days: BTreeSet<NaiveDate> = items.iter().map(|i| i.date).collect();

    for (n, day) in days.iter().rev().enumerate() {
        if n > 0 {
            println!();
        }
        let day_items: Vec<&FoodLogItem> =
            items.iter().copied().filter(|i| i.date == *day).collect();

        println!("{}", day);
        println!("{}", "-".repeat(60));
        for item in &day_items {
            let amount = item
                .display_amount
                .as_deref()
                .map(|a| format!(" ({})", a))
                .unwrap_or_default();
            println!(
                "  {} {}{} - {} kcal",
                item.timestamp, item.name, amount, item.calories
            );
            println!("        {}", item.id);
        }
        println!("  {}", "-".repeat(56));
        println!(
            "  Daily Total: {} kcal | {}",
            total_calories(day_items.iter().copied()),
            macro_totals(day_items.iter().copied())
        );
    }

    println!("\nTotal: {} entr{}", items.len(), if items.len() == 1 { "y" } else { "ies" });
}
