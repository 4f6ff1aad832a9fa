//! Character Roster: the suspects and witnesses surrounding the victim.

use super::{normalize_name, require_text, StageRecord};
use crate::types::Stage;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const MIN_ROSTER_SIZE: usize = 5;
pub const MAX_ROSTER_SIZE: usize = 7;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    pub occupation: String,
    pub connection_to_victim: String,
    pub potential_motive: String,
    pub secret: String,
    pub alibi: String,
}

/// Ordered cast generated from the core premise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterRoster {
    pub characters: Vec<Character>,
}

impl CharacterRoster {
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.characters.iter().map(|c| c.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }
}

impl StageRecord for CharacterRoster {
    const STAGE: Stage = Stage::CharacterRoster;

    const TEMPLATE: &'static str = r#"{
    "characters": [
        {
            "name": string,
            "occupation": string,
            "connection_to_victim": string,
            "potential_motive": string,
            "secret": string,
            "alibi": string
        }
    ]
}"#;

    fn schema_violations(&self) -> Vec<String> {
        let mut violations = Vec::new();

        if !(MIN_ROSTER_SIZE..=MAX_ROSTER_SIZE).contains(&self.characters.len()) {
            violations.push(format!(
                "characters must contain {}-{} entries, found {}",
                MIN_ROSTER_SIZE,
                MAX_ROSTER_SIZE,
                self.characters.len()
            ));
        }

        let mut seen = HashSet::new();
        for (i, character) in self.characters.iter().enumerate() {
            let fields = [
                ("name", &character.name),
                ("occupation", &character.occupation),
                ("connection_to_victim", &character.connection_to_victim),
                ("potential_motive", &character.potential_motive),
                ("secret", &character.secret),
                ("alibi", &character.alibi),
            ];
            for (field, value) in fields {
                require_text(&mut violations, &format!("characters[{}].{}", i, field), value);
            }
            if !character.name.trim().is_empty() && !seen.insert(normalize_name(&character.name)) {
                violations.push(format!(
                    "characters[{}].name '{}' is duplicated",
                    i, character.name
                ));
            }
        }

        violations
    }
}
