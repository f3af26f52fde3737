//! Read-side graph vocabulary: traversal direction, query results and the
//! pure algorithms the engine runs over fetched subgraphs.

mod cycles;
mod subgraph;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::entities::{Node, Relationship};
use crate::error::DomainError;
use crate::ids::NodeId;

pub use cycles::find_cycles;
pub use subgraph::Subgraph;

/// Deepest traversal or path search the engine will run.
pub const MAX_TRAVERSAL_DEPTH: usize = 10;

/// Which end of a relationship counts as "forward".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Incoming,
    Outgoing,
    #[default]
    Both,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Incoming => "incoming",
            Self::Outgoing => "outgoing",
            Self::Both => "both",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "incoming" | "in" => Ok(Self::Incoming),
            "outgoing" | "out" => Ok(Self::Outgoing),
            "both" => Ok(Self::Both),
            _ => Err(DomainError::parse(format!("Unknown direction: {}", s))),
        }
    }
}

/// A single-hop neighbor: the node at the far end and the edge that reached it.
///
/// `direction` is relative to the node the lookup started from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NeighborRecord {
    pub node: Node,
    pub relationship: Relationship,
    pub direction: Direction,
}

/// Nodes (in breadth-first order) and relationships reached by a traversal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraversalResult {
    pub nodes: Vec<Node>,
    pub relationships: Vec<Relationship>,
}

impl TraversalResult {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.nodes.iter().any(|n| n.id == id)
    }
}

/// Whole-graph counts, recomputed on every call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphStatistics {
    pub node_count: u64,
    pub relationship_count: u64,
    pub nodes_by_type: BTreeMap<String, u64>,
    pub relationships_by_type: BTreeMap<String, u64>,
}

/// Error message added when any progression cycle is found.
pub const CIRCULAR_DEPENDENCY_ERROR: &str = "Circular dependency detected";
/// Warning added when unconnected, non-exempt nodes exist.
pub const ORPHANED_NODES_WARNING: &str = "Orphaned nodes detected";

/// Outcome of a whole-graph structural validation. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub orphaned_nodes: Vec<NodeId>,
    pub circular_dependencies: Vec<Vec<NodeId>>,
}

impl ValidationReport {
    /// Assemble a report from the three independent checks.
    ///
    /// `integrity_errors` are the per-relationship compatibility violations.
    pub fn from_checks(
        circular_dependencies: Vec<Vec<NodeId>>,
        orphaned_nodes: Vec<NodeId>,
        integrity_errors: Vec<String>,
    ) -> Self {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        if !circular_dependencies.is_empty() {
            errors.push(CIRCULAR_DEPENDENCY_ERROR.to_string());
        }
        if !orphaned_nodes.is_empty() {
            warnings.push(ORPHANED_NODES_WARNING.to_string());
        }
        errors.extend(integrity_errors);

        Self {
            is_valid: errors.is_empty(),
            errors,
            warnings,
            orphaned_nodes,
            circular_dependencies,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_parses_and_displays() {
        assert_eq!("OUTGOING".parse::<Direction>().unwrap(), Direction::Outgoing);
        assert_eq!("in".parse::<Direction>().unwrap(), Direction::Incoming);
        assert_eq!(Direction::Both.to_string(), "both");
        assert!("sideways".parse::<Direction>().is_err());
    }

    #[test]
    fn empty_report_is_valid() {
        let report = ValidationReport::from_checks(vec![], vec![], vec![]);
        assert!(report.is_valid);
        assert!(report.errors.is_empty());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn orphans_warn_without_invalidating() {
        let report = ValidationReport::from_checks(vec![], vec![NodeId::new()], vec![]);
        assert!(report.is_valid);
        assert_eq!(report.warnings, vec![ORPHANED_NODES_WARNING.to_string()]);
    }

    #[test]
    fn cycles_and_integrity_errors_invalidate() {
        let a = NodeId::new();
        let report =
            ValidationReport::from_checks(vec![vec![a]], vec![], vec!["bad edge".to_string()]);
        assert!(!report.is_valid);
        assert_eq!(
            report.errors,
            vec![CIRCULAR_DEPENDENCY_ERROR.to_string(), "bad edge".to_string()]
        );
    }

    #[test]
    fn report_serializes_camel_case() {
        let report = ValidationReport::from_checks(vec![], vec![], vec![]);
        let value = serde_json::to_value(&report).unwrap();
        assert!(value.get("isValid").is_some());
        assert!(value.get("orphanedNodes").is_some());
        assert!(value.get("circularDependencies").is_some());
    }
}
