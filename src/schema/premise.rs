//! Core Premise: the root record every later stage is grounded in.

use super::{require_text, StageRecord};
use crate::types::Stage;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorePremise {
    pub setting: Setting,
    pub victim: Victim,
    pub murderer: Murderer,
    pub murder_method: MurderMethod,
    pub key_twist: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Setting {
    pub location: String,
    pub time_period: String,
    /// Time of the murder; the timeline spans two hours either side of it.
    pub specific_time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Victim {
    pub name: String,
    pub occupation: String,
    pub reason_targeted: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Murderer {
    pub name: String,
    pub occupation: String,
    pub motive: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MurderMethod {
    pub weapon: String,
    pub circumstances: String,
}

impl StageRecord for CorePremise {
    const STAGE: Stage = Stage::CorePremise;

    const TEMPLATE: &'static str = r#"{
    "setting": {
        "location": string,
        "time_period": string,
        "specific_time": string
    },
    "victim": {
        "name": string,
        "occupation": string,
        "reason_targeted": string
    },
    "murderer": {
        "name": string,
        "occupation": string,
        "motive": string
    },
    "murder_method": {
        "weapon": string,
        "circumstances": string
    },
    "key_twist": string
}"#;

    fn schema_violations(&self) -> Vec<String> {
        let mut violations = Vec::new();
        let fields = [
            ("setting.location", &self.setting.location),
            ("setting.time_period", &self.setting.time_period),
            ("setting.specific_time", &self.setting.specific_time),
            ("victim.name", &self.victim.name),
            ("victim.occupation", &self.victim.occupation),
            ("victim.reason_targeted", &self.victim.reason_targeted),
            ("murderer.name", &self.murderer.name),
            ("murderer.occupation", &self.murderer.occupation),
            ("murderer.motive", &self.murderer.motive),
            ("murder_method.weapon", &self.murder_method.weapon),
            ("murder_method.circumstances", &self.murder_method.circumstances),
            ("key_twist", &self.key_twist),
        ];
        for (field, value) in fields {
            require_text(&mut violations, field, value);
        }
        violations
    }
}
