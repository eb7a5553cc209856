use clap::{Args, Subcommand};

use super::{parse_id, print_change, print_json, print_outcome, DateFilter, OutputFormat};
use crate::models::WaterLogItem;
use crate::session::Session;
use fitquest_core::stats::{hydration_percent, total_water_ml};
use fitquest_core::LogCategory;

#[derive(Args)]
pub struct WaterCommand {
    #[command(subcommand)]
    pub command: WaterSubcommand,
}

#[derive(Subcommand)]
pub enum WaterSubcommand {
    /// Log a drink
    Add {
        /// Amount in ml
        #[arg(default_value_t = 250)]
        amount: u32,
    },

    /// Delete a water entry
    Delete {
        /// Entry ID
        id: String,
    },

    /// List water entries
    List {
        #[command(flatten)]
        range: DateFilter,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

impl WaterCommand {
    pub async fn run(&self, session: &mut Session) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            WaterSubcommand::Add { amount } => {
                if *amount == 0 {
                    return Err("Amount must be greater than 0 ml".into());
                }
                let item = WaterLogItem::recorded_at(*amount, session.now());
                let outcome = session.add_water(item.clone()).await;

                let today = session.store().water().filter_by_date(item.date);
                let total = total_water_ml(today);
                let target = session.profile().water_target_ml;
                println!("Logged {} ml ({})", item.amount, item.id);
                println!(
                    "Today: {} / {} ml ({:.0}%)",
                    total,
                    target,
                    hydration_percent(total, target)
                );
                print_outcome(&outcome, session.profile().progression.level);
                Ok(())
            }

            WaterSubcommand::Delete { id } => {
                let id = parse_id(id)?;
                let status = session.remove(LogCategory::Water, id).await;
                print_change(status, "Deleted water entry", id);
                Ok(())
            }

            WaterSubcommand::List { range, format } => {
                let (from, to) = range.resolve(session.today(), 0)?;
                let items = session.store().water().filter_by_range(from, to);

                match format {
                    OutputFormat::Json => print_json(&items)?,
                    OutputFormat::Text => {
                        if items.is_empty() {
                            println!("No water logged for {} to {}", from, to);
                            return Ok(());
                        }
                        for item in &items {
                            println!("{}  {}", item, item.id);
                        }
                        println!(
                            "\nTotal: {} ml in {} entries",
                            total_water_ml(items.iter().copied()),
                            items.len()
                        );
                    }
                }
                Ok(())
            }
        }
    }
}
