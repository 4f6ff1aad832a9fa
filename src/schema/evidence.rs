//! Evidence Graph: evidence items as nodes, connections as directed edges.

use super::{normalize_name, require_text, StageRecord};
use crate::types::Stage;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceItem {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub location: String,
    pub description: String,
    pub initial_interpretation: String,
    pub true_significance: String,
    #[serde(default)]
    pub requirements: EvidenceRequirements,
    /// Other evidence names or free-text conclusions this item points to.
    #[serde(default)]
    pub leads_to: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceRequirements {
    #[serde(default)]
    pub items_needed: Vec<String>,
    #[serde(default)]
    pub knowledge_needed: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceConnection {
    pub evidence_a: String,
    pub evidence_b: String,
    pub connection_type: String,
    pub revelation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceGraph {
    #[serde(rename = "evidence")]
    pub items: Vec<EvidenceItem>,
    #[serde(rename = "evidence_connections", default)]
    pub connections: Vec<EvidenceConnection>,
}

impl EvidenceGraph {
    /// Map from normalized item name to its index.
    pub fn name_index(&self) -> HashMap<String, usize> {
        self.items
            .iter()
            .enumerate()
            .map(|(i, item)| (normalize_name(&item.name), i))
            .collect()
    }

    /// Items that need no other evidence item before they can be found.
    ///
    /// Tool or knowledge prerequisites that are not themselves evidence items
    /// do not block discovery.
    pub fn discoverable(&self) -> Vec<usize> {
        let index = self.name_index();
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| {
                !item
                    .requirements
                    .items_needed
                    .iter()
                    .any(|needed| index.contains_key(&normalize_name(needed)))
            })
            .map(|(i, _)| i)
            .collect()
    }

    /// Outgoing edges per item: connections a -> b plus `leads_to` entries
    /// naming another item.
    pub fn adjacency(&self) -> Vec<Vec<usize>> {
        let index = self.name_index();
        let mut edges = vec![Vec::new(); self.items.len()];

        for connection in &self.connections {
            let from = index.get(&normalize_name(&connection.evidence_a));
            let to = index.get(&normalize_name(&connection.evidence_b));
            if let (Some(&from), Some(&to)) = (from, to) {
                edges[from].push(to);
            }
        }
        for (i, item) in self.items.iter().enumerate() {
            for target in &item.leads_to {
                if let Some(&to) = index.get(&normalize_name(target)) {
                    edges[i].push(to);
                }
            }
        }

        edges
    }

    /// Items reachable from the discoverable set, including the set itself.
    pub fn reachable(&self) -> HashSet<usize> {
        let edges = self.adjacency();
        let mut visited: HashSet<usize> = HashSet::new();
        let mut queue: VecDeque<usize> = self.discoverable().into_iter().collect();

        while let Some(node) = queue.pop_front() {
            if !visited.insert(node) {
                continue;
            }
            for &next in &edges[node] {
                if !visited.contains(&next) {
                    queue.push_back(next);
                }
            }
        }

        visited
    }
}

impl StageRecord for EvidenceGraph {
    const STAGE: Stage = Stage::EvidenceGraph;

    const TEMPLATE: &'static str = r#"{
    "evidence": [
        {
            "name": string,
            "type": string,
            "location": string,
            "description": string,
            "initial_interpretation": string,
            "true_significance": string,
            "requirements": {
                "items_needed": [string],
                "knowledge_needed": [string]
            },
            "leads_to": [string]
        }
    ],
    "evidence_connections": [
        {
            "evidence_a": string,
            "evidence_b": string,
            "connection_type": string,
            "revelation": string
        }
    ]
}"#;

    fn schema_violations(&self) -> Vec<String> {
        let mut violations = Vec::new();
        if self.items.is_empty() {
            violations.push("evidence must contain at least one item".to_string());
        }

        let mut names = HashSet::new();
        for (i, item) in self.items.iter().enumerate() {
            require_text(&mut violations, &format!("evidence[{}].name", i), &item.name);
            require_text(&mut violations, &format!("evidence[{}].type", i), &item.kind);
            require_text(
                &mut violations,
                &format!("evidence[{}].description", i),
                &item.description,
            );
            require_text(
                &mut violations,
                &format!("evidence[{}].true_significance", i),
                &item.true_significance,
            );
            if !item.name.trim().is_empty() && !names.insert(normalize_name(&item.name)) {
                violations.push(format!("evidence[{}].name '{}' is duplicated", i, item.name));
            }
        }

        for (i, connection) in self.connections.iter().enumerate() {
            for (field, value) in [
                ("evidence_a", &connection.evidence_a),
                ("evidence_b", &connection.evidence_b),
            ] {
                if !names.contains(&normalize_name(value)) {
                    violations.push(format!(
                        "evidence_connections[{}].{} '{}' does not name an evidence item",
                        i, field, value
                    ));
                }
            }
        }

        violations
    }
}
