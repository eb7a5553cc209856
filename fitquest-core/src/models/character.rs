use serde::{Deserialize, Serialize};
use std::fmt;

use crate::progress::Progression;

/// A companion persona. Characters come from a fixed roster and are selected,
/// never created; only the progression and accessory change at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub id: String,
    pub name: String,
    pub role: String,
    pub image: String,
    pub theme_color: String,
    pub quotes: Vec<String>,
    pub onboarding_messages: Vec<String>,
    #[serde(flatten)]
    pub progression: Progression,
    pub accessory: Option<String>,
}

struct Persona {
    id: &'static str,
    name: &'static str,
    role: &'static str,
    image: &'static str,
    theme_color: &'static str,
    quotes: &'static [&'static str],
    onboarding: &'static [&'static str],
}

const ROSTER: &[Persona] = &[
    Persona {
        id: "blaze",
        name: "Blaze",
        role: "Drill Sergeant",
        image: "avatars/blaze.png",
        theme_color: "orange",
        quotes: &[
            "Sweat now, shine later.",
            "No excuses. Only reps.",
            "Your comfort zone called. I hung up.",
        ],
        onboarding: &[
            "Listen up, recruit. We start today.",
            "Tell me your goal and I'll make you earn it.",
        ],
    },
    Persona {
        id: "sage",
        name: "Sage",
        role: "Mindful Mentor",
        image: "avatars/sage.png",
        theme_color: "teal",
        quotes: &[
            "Breathe in strength, breathe out doubt.",
            "Small steps are still steps.",
            "Rest is part of the path.",
        ],
        onboarding: &[
            "Welcome. Let's walk this path together.",
            "Every habit begins with a single breath.",
        ],
    },
    Persona {
        id: "nova",
        name: "Nova",
        role: "Science Coach",
        image: "avatars/nova.png",
        theme_color: "violet",
        quotes: &[
            "Data beats guesswork.",
            "Progressive overload, progressive results.",
            "Hydration is a performance multiplier.",
        ],
        onboarding: &[
            "Hi! I track the numbers so you can focus on the work.",
            "Log consistently and the trends will speak for themselves.",
        ],
    },
];

pub const DEFAULT_CHARACTER_ID: &str = "blaze";

pub const ACCESSORIES: &[&str] = &["headband", "sunglasses", "cape", "crown"];

impl Character {
    /// Every selectable character, at level one.
    pub fn roster() -> Vec<Character> {
        ROSTER.iter().map(Character::from_persona).collect()
    }

    pub fn find(id: &str) -> Option<Character> {
        ROSTER
            .iter()
            .find(|p| p.id.eq_ignore_ascii_case(id))
            .map(Character::from_persona)
    }

    /// Looks up `id`, falling back to the default character.
    pub fn find_or_default(id: &str) -> Character {
        Character::find(id).unwrap_or_else(|| {
            Character::find(DEFAULT_CHARACTER_ID)
                .unwrap_or_else(|| Character::from_persona(&ROSTER[0]))
        })
    }

    pub fn with_progression(mut self, progression: Progression) -> Self {
        self.progression = progression;
        self
    }

    /// Equips an accessory. Unknown accessories are rejected.
    pub fn equip(&mut self, accessory: Option<&str>) -> Result<(), String> {
        match accessory {
            None => {
                self.accessory = None;
                Ok(())
            }
            Some(a) if ACCESSORIES.contains(&a) => {
                self.accessory = Some(a.to_string());
                Ok(())
            }
            Some(a) => Err(format!(
                "Unknown accessory '{}'. Valid options: {}",
                a,
                ACCESSORIES.join(", ")
            )),
        }
    }

    /// Quote at `index`, wrapping around the list.
    pub fn quote(&self, index: usize) -> Option<&str> {
        if self.quotes.is_empty() {
            return None;
        }
        self.quotes
            .get(index % self.quotes.len())
            .map(String::as_str)
    }

    fn from_persona(p: &Persona) -> Character {
        Character {
            id: p.id.to_string(),
            name: p.name.to_string(),
            role: p.role.to_string(),
            image: p.image.to_string(),
            theme_color: p.theme_color.to_string(),
            quotes: p.quotes.iter().map(|q| q.to_string()).collect(),
            onboarding_messages: p.onboarding.iter().map(|m| m.to_string()).collect(),
            progression: Progression::default(),
            accessory: None,
        }
    }
}

impl fmt::Display for Character {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} the {} (Lv {}, {}/{} XP)",
            self.name,
            self.role,
            self.progression.level,
            self.progression.xp,
            self.progression.max_xp
        )?;
        if let Some(accessory) = &self.accessory {
            write!(f, " wearing {}", accessory)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_ids_are_unique() {
        let roster = Character::roster();
        let mut ids: Vec<&str> = roster.iter().map(|c| c.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), roster.len());
        assert!(Character::find(DEFAULT_CHARACTER_ID).is_some());
    }

    #[test]
    fn test_find_is_case_insensitive() {
        assert_eq!(Character::find("SAGE").unwrap().name, "Sage");
        assert!(Character::find("unknown").is_none());
        assert_eq!(Character::find_or_default("unknown").id, DEFAULT_CHARACTER_ID);
    }

    #[test]
    fn test_equip_accessory() {
        let mut character = Character::find_or_default("nova");
        character.equip(Some("cape")).unwrap();
        assert_eq!(character.accessory.as_deref(), Some("cape"));

        assert!(character.equip(Some("jetpack")).is_err());
        assert_eq!(character.accessory.as_deref(), Some("cape"));

        character.equip(None).unwrap();
        assert!(character.accessory.is_none());
    }

    #[test]
    fn test_quote_wraps() {
        let character = Character::find_or_default("sage");
        let n = character.quotes.len();
        assert_eq!(character.quote(0), character.quote(n));
    }

    #[test]
    fn test_progression_flattens_into_character_json() {
        let character = Character::find_or_default("blaze");
        let json = serde_json::to_value(&character).unwrap();
        assert_eq!(json["level"], 1);
        assert_eq!(json["xp"], 0);
        assert_eq!(json["max_xp"], 100);
    }
}
