//! Node type catalogue.
//!
//! The closed set of node labels the graph admits. Narrative-structure types
//! (`StoryPhase`, `PacingBeat`, `Panel`) are ordinary catalogue members: they
//! carry payload schemas and take part in traversal like any other node.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Broad grouping of node types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeKind {
    /// Hierarchical container (story, act, chapter)
    Container,
    /// Core narrative entity
    Narrative,
    /// Narrative-structure declaration with no analytic logic of its own
    Structure,
}

/// A node label from the closed catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NodeType {
    Story,
    Act,
    Chapter,
    Scene,
    Character,
    Choice,
    Event,
    Location,
    Item,
    StoryPhase,
    PacingBeat,
    Panel,
}

impl NodeType {
    /// Every member of the catalogue, in contract order.
    pub fn all() -> &'static [NodeType] {
        &[
            NodeType::Story,
            NodeType::Act,
            NodeType::Chapter,
            NodeType::Scene,
            NodeType::Character,
            NodeType::Choice,
            NodeType::Event,
            NodeType::Location,
            NodeType::Item,
            NodeType::StoryPhase,
            NodeType::PacingBeat,
            NodeType::Panel,
        ]
    }

    /// Wire and storage name (also the Neo4j label).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Story => "Story",
            Self::Act => "Act",
            Self::Chapter => "Chapter",
            Self::Scene => "Scene",
            Self::Character => "Character",
            Self::Choice => "Choice",
            Self::Event => "Event",
            Self::Location => "Location",
            Self::Item => "Item",
            Self::StoryPhase => "StoryPhase",
            Self::PacingBeat => "PacingBeat",
            Self::Panel => "Panel",
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Story | Self::Act | Self::Chapter => NodeKind::Container,
            Self::Scene
            | Self::Character
            | Self::Choice
            | Self::Event
            | Self::Location
            | Self::Item => NodeKind::Narrative,
            Self::StoryPhase | Self::PacingBeat | Self::Panel => NodeKind::Structure,
        }
    }

    /// Whether an unconnected node of this type is legitimate.
    ///
    /// Only the top-level container is exempt: a story exists before any act
    /// is attached to it. Every other type is expected to be wired into the
    /// graph, including the lower containers.
    pub fn is_orphan_exempt(&self) -> bool {
        matches!(self, Self::Story)
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeType {
    type Err = DomainError;

    /// Accepts the wire name in any case (`StoryPhase`, `storyphase`) and its
    /// snake_case form (`story_phase`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        NodeType::all()
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(wanted) || snake_case(t.as_str()) == wanted)
            .ok_or_else(|| DomainError::parse(format!("Unknown node type: {}", s)))
    }
}

// `PacingBeat` -> `pacing_beat`
fn snake_case(wire: &str) -> String {
    let mut out = String::with_capacity(wire.len() + 2);
    for (i, c) in wire.chars().enumerate() {
        if c.is_ascii_uppercase() && i > 0 {
            out.push('_');
        }
        out.push(c.to_ascii_lowercase());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_wire_name() {
        for t in NodeType::all() {
            assert_eq!(t.as_str().parse::<NodeType>().unwrap(), *t);
        }
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("scene".parse::<NodeType>().unwrap(), NodeType::Scene);
        assert_eq!("story_phase".parse::<NodeType>().unwrap(), NodeType::StoryPhase);
    }

    #[test]
    fn rejects_scattered_underscores() {
        for raw in ["S_c_e_n_e", "_scene", "story__phase", "STORY_PHASE"] {
            assert!(raw.parse::<NodeType>().is_err(), "{raw} parsed");
        }
        assert_eq!("pacing_beat".parse::<NodeType>().unwrap(), NodeType::PacingBeat);
    }

    #[test]
    fn rejects_types_outside_catalogue() {
        assert!(matches!(
            "Monster".parse::<NodeType>(),
            Err(DomainError::Parse(_))
        ));
    }

    #[test]
    fn serde_uses_wire_names() {
        let json = serde_json::to_string(&NodeType::PacingBeat).unwrap();
        assert_eq!(json, "\"PacingBeat\"");
    }

    #[test]
    fn only_story_is_orphan_exempt() {
        let exempt: Vec<_> = NodeType::all()
            .iter()
            .filter(|t| t.is_orphan_exempt())
            .collect();
        assert_eq!(exempt, vec![&NodeType::Story]);
    }
}
