//! Relationship type catalogue.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// What a relationship type expresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationshipCategory {
    Progression,
    Causal,
    Appearance,
    Requirement,
    Location,
    Structural,
}

/// A relationship type from the closed catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationshipType {
    /// Story flow between scenes and choices
    LeadsTo,
    /// Causal trigger from an event or choice
    Triggers,
    /// Ordering among narrative-structure nodes
    Precedes,
    /// A character appears in a scene or event
    AppearsIn,
    /// A choice or scene requires an item or event
    Requires,
    /// Placement at a location
    LocatedAt,
    /// Hierarchical containment
    Contains,
    /// Character possession of an item
    Owns,
    /// Character-to-character relation
    RelatesTo,
}

impl RelationshipType {
    pub fn all() -> &'static [RelationshipType] {
        &[
            RelationshipType::LeadsTo,
            RelationshipType::Triggers,
            RelationshipType::Precedes,
            RelationshipType::AppearsIn,
            RelationshipType::Requires,
            RelationshipType::LocatedAt,
            RelationshipType::Contains,
            RelationshipType::Owns,
            RelationshipType::RelatesTo,
        ]
    }

    /// Relationship types whose directed subgraph must stay acyclic.
    pub fn progression() -> &'static [RelationshipType] {
        &[
            RelationshipType::LeadsTo,
            RelationshipType::Triggers,
            RelationshipType::Precedes,
        ]
    }

    /// Wire and storage name (also the Neo4j relationship type).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LeadsTo => "LEADS_TO",
            Self::Triggers => "TRIGGERS",
            Self::Precedes => "PRECEDES",
            Self::AppearsIn => "APPEARS_IN",
            Self::Requires => "REQUIRES",
            Self::LocatedAt => "LOCATED_AT",
            Self::Contains => "CONTAINS",
            Self::Owns => "OWNS",
            Self::RelatesTo => "RELATES_TO",
        }
    }

    pub fn category(&self) -> RelationshipCategory {
        match self {
            Self::LeadsTo | Self::Precedes => RelationshipCategory::Progression,
            Self::Triggers => RelationshipCategory::Causal,
            Self::AppearsIn => RelationshipCategory::Appearance,
            Self::Requires => RelationshipCategory::Requirement,
            Self::LocatedAt => RelationshipCategory::Location,
            Self::Contains | Self::Owns | Self::RelatesTo => RelationshipCategory::Structural,
        }
    }

    pub fn is_progression(&self) -> bool {
        Self::progression().contains(self)
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelationshipType {
    type Err = DomainError;

    /// Accepts the wire name in any case (`LEADS_TO`, `leads_to`) and its
    /// camelCase form (`leadsTo`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        RelationshipType::all()
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(wanted) || camel_case(t.as_str()) == wanted)
            .ok_or_else(|| DomainError::parse(format!("Unknown relationship type: {}", s)))
    }
}

// `APPEARS_IN` -> `appearsIn`
fn camel_case(wire: &str) -> String {
    let mut out = String::with_capacity(wire.len());
    for (i, word) in wire.split('_').enumerate() {
        let word = word.to_ascii_lowercase();
        match word.chars().next() {
            Some(first) if i > 0 => {
                out.push(first.to_ascii_uppercase());
                out.push_str(&word[1..]);
            }
            _ => out.push_str(&word),
        }
    }
    out
}
