use clap::Args;

use super::{print_json, OutputFormat};
use crate::session::Session;
use fitquest_core::evaluate_achievements;
use fitquest_core::progress::{current_streak, longest_streak};

/// Show unlocked and locked achievements
#[derive(Args)]
pub struct AchievementsCommand {
    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl AchievementsCommand {
    pub fn run(&self, session: &Session) -> Result<(), Box<dyn std::error::Error>> {
        let achievements = evaluate_achievements(session.store(), session.profile());

        match self.format {
            OutputFormat::Json => print_json(&achievements)?,
            OutputFormat::Text => {
                let unlocked = achievements.iter().filter(|a| a.unlocked).count();
                println!("Achievements ({}/{})", unlocked, achievements.len());
                println!("{}", "=".repeat(30));
                for achievement in &achievements {
                    println!("{}", achievement);
                }

                let days: Vec<_> = session.store().active_days().into_iter().collect();
                println!();
                println!(
                    "Current streak: {} day(s), best: {} day(s)",
                    current_streak(session.store(), session.today()),
                    longest_streak(&days)
                );
            }
        }
        Ok(())
    }
}
