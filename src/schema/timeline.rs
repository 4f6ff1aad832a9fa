//! Timeline: time-ordered events spanning two hours either side of the murder.

use super::{require_text, StageRecord};
use crate::types::Stage;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub time: String,
    pub event: String,
    pub characters_involved: Vec<String>,
    pub location: String,
    pub significance: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeline {
    #[serde(rename = "timeline")]
    pub events: Vec<TimelineEvent>,
}

impl Timeline {
    /// Every (event index, name) pair referenced by the timeline.
    pub fn references(&self) -> impl Iterator<Item = (usize, &str)> {
        self.events.iter().enumerate().flat_map(|(i, event)| {
            event
                .characters_involved
                .iter()
                .map(move |name| (i, name.as_str()))
        })
    }
}

impl StageRecord for Timeline {
    const STAGE: Stage = Stage::Timeline;

    const TEMPLATE: &'static str = r#"{
    "timeline": [
        {
            "time": string,
            "event": string,
            "characters_involved": [string],
            "location": string,
            "significance": string
        }
    ]
}"#;

    fn schema_violations(&self) -> Vec<String> {
        let mut violations = Vec::new();
        if self.events.is_empty() {
            violations.push("timeline must contain at least one event".to_string());
        }
        for (i, event) in self.events.iter().enumerate() {
            require_text(&mut violations, &format!("timeline[{}].time", i), &event.time);
            require_text(&mut violations, &format!("timeline[{}].event", i), &event.event);
            for (j, name) in event.characters_involved.iter().enumerate() {
                require_text(
                    &mut violations,
                    &format!("timeline[{}].characters_involved[{}]", i, j),
                    name,
                );
            }
        }
        violations
    }
}
