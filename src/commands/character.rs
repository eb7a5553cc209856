use clap::{Args, Subcommand};
use rand::Rng;

use super::{print_json, print_sync, OutputFormat};
use crate::models::{Character, ACCESSORIES};
use crate::session::Session;

#[derive(Args)]
pub struct CharacterCommand {
    #[command(subcommand)]
    pub command: CharacterSubcommand,
}

#[derive(Subcommand)]
pub enum CharacterSubcommand {
    /// List the characters you can coach with
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Pick your coach
    Select {
        /// Character ID (e.g. blaze, sage, nova)
        id: String,
    },

    /// Equip an accessory, or take it off when none is given
    Equip {
        /// Accessory name
        accessory: Option<String>,
    },

    /// Hear from your coach
    Quote,
}

/// The selected character with the user's progression and accessory.
pub fn active_character(session: &Session) -> Character {
    let profile = session.profile();
    let mut character =
        Character::find_or_default(&profile.character_id).with_progression(profile.progression);
    character.accessory = profile.accessory.clone();
    character
}

impl CharacterCommand {
    pub async fn run(&self, session: &mut Session) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            CharacterSubcommand::List { format } => {
                let active = active_character(session);
                let roster: Vec<Character> = Character::roster()
                    .into_iter()
                    .map(|c| if c.id == active.id { active.clone() } else { c })
                    .collect();

                match format {
                    OutputFormat::Json => print_json(&roster)?,
                    OutputFormat::Text => {
                        for c in &roster {
                            let marker = if c.id == active.id { "*" } else { " " };
                            println!("{} {:8} {}", marker, c.id, c);
                        }
                    }
                }
                Ok(())
            }

            CharacterSubcommand::Select { id } => {
                let character = Character::find(id).ok_or_else(|| {
                    let ids: Vec<String> = Character::roster().into_iter().map(|c| c.id).collect();
                    format!("Unknown character '{}'. Valid options: {}", id, ids.join(", "))
                })?;

                let new_id = character.id.clone();
                let sync = session
                    .update_profile(|p| p.character_id = new_id)
                    .await;

                println!("{} is now your coach.", character.name);
                for message in &character.onboarding_messages {
                    println!("  {}", message);
                }
                print_sync(&sync);
                Ok(())
            }

            CharacterSubcommand::Equip { accessory } => {
                let mut character = active_character(session);
                character.equip(accessory.as_deref())?;

                let equipped = character.accessory.clone();
                let sync = session
                    .update_profile(|p| p.accessory = equipped)
                    .await;

                match &character.accessory {
                    Some(a) => println!("{} equipped the {}.", character.name, a),
                    None => println!(
                        "{} has nothing equipped. Options: {}",
                        character.name,
                        ACCESSORIES.join(", ")
                    ),
                }
                print_sync(&sync);
                Ok(())
            }

            CharacterSubcommand::Quote => {
                let character = active_character(session);
                if character.quotes.is_empty() {
                    println!("{} has nothing to say.", character.name);
                    return Ok(());
                }
                let index = rand::rng().random_range(0..character.quotes.len());
                if let Some(quote) = character.quote(index) {
                    println!("{}: \"{}\"", character.name, quote);
                }
                Ok(())
            }
        }
    }
}
