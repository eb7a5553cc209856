use clap::Args;
use rand::Rng;

use super::character::active_character;
use super::stats::summarize;
use crate::ai::GenAiClient;
use crate::config::Config;
use crate::session::Session;

/// A motivational briefing from your coach on today's numbers
#[derive(Args)]
pub struct BriefingCommand {}

impl BriefingCommand {
    pub async fn run(
        &self,
        session: &Session,
        config: &Config,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let summary = summarize(session, session.today());
        let character = active_character(session);

        let briefing = match GenAiClient::from_config(&config.ai) {
            Ok(client) => match client
                .briefing(&summary, &session.profile().goal, &character)
                .await
            {
                Ok(text) => Some(text),
                Err(e) => {
                    tracing::warn!(error = %e, "briefing unavailable");
                    None
                }
            },
            Err(e) => {
                tracing::debug!(error = %e, "briefing skipped");
                None
            }
        };

        println!("{}", summary);
        println!();
        match briefing {
            Some(text) => println!("{}: {}", character.name, text),
            None if !character.quotes.is_empty() => {
                let index = rand::rng().random_range(0..character.quotes.len());
                if let Some(quote) = character.quote(index) {
                    println!("{}: \"{}\"", character.name, quote);
                }
            }
            None => {}
        }
        Ok(())
    }
}
