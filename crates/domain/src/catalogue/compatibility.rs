//! Static relationship compatibility table.
//!
//! A relationship is legal only when its `(type, fromType, toType)` triple is
//! covered by one of the rules below. A type may have several rules when its
//! legal pairings are not a full cross product (`CONTAINS`, `PRECEDES`).

use serde::Serialize;

use super::{NodeType, RelationshipType};
use crate::error::DomainError;

/// One row of the compatibility table: any `from` type to any `to` type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompatibilityRule {
    pub relationship_type: RelationshipType,
    pub from: &'static [NodeType],
    pub to: &'static [NodeType],
}

impl CompatibilityRule {
    pub fn allows(&self, from: NodeType, to: NodeType) -> bool {
        self.from.contains(&from) && self.to.contains(&to)
    }
}

use NodeType::*;
use RelationshipType as R;

const fn rule(
    relationship_type: RelationshipType,
    from: &'static [NodeType],
    to: &'static [NodeType],
) -> CompatibilityRule {
    CompatibilityRule {
        relationship_type,
        from,
        to,
    }
}

pub const COMPATIBILITY_TABLE: &[CompatibilityRule] = &[
    rule(R::LeadsTo, &[Scene, Choice], &[Scene, Choice]),
    rule(R::Triggers, &[Event, Choice], &[Event, Scene]),
    rule(R::Precedes, &[StoryPhase], &[StoryPhase]),
    rule(R::Precedes, &[PacingBeat], &[PacingBeat]),
    rule(R::Precedes, &[Panel], &[Panel]),
    rule(R::AppearsIn, &[Character], &[Scene, Event]),
    rule(R::Requires, &[Choice, Scene], &[Item, Event]),
    rule(R::LocatedAt, &[Scene, Event, Character, Item], &[Location]),
    rule(R::Contains, &[Story], &[Act, StoryPhase]),
    rule(R::Contains, &[Act], &[Chapter]),
    rule(R::Contains, &[Chapter], &[Scene]),
    rule(R::Contains, &[Location], &[Location]),
    rule(R::Contains, &[Scene], &[Panel, PacingBeat]),
    rule(R::Owns, &[Character], &[Item]),
    rule(R::RelatesTo, &[Character], &[Character]),
];

/// Rules governing one relationship type.
pub fn rules_for(relationship_type: RelationshipType) -> impl Iterator<Item = &'static CompatibilityRule> {
    COMPATIBILITY_TABLE
        .iter()
        .filter(move |r| r.relationship_type == relationship_type)
}

pub fn is_compatible(relationship_type: RelationshipType, from: NodeType, to: NodeType) -> bool {
    rules_for(relationship_type).any(|r| r.allows(from, to))
}

/// Human-readable list of the pairings a type allows, e.g. `Character -> Scene|Event`.
pub fn expected_pairings(relationship_type: RelationshipType) -> String {
    rules_for(relationship_type)
        .map(|r| format!("{} -> {}", join_types(r.from), join_types(r.to)))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Check a triple against the table.
///
/// Returns `DomainError::Constraint` naming the offending pairing and the
/// pairings the type does allow.
pub fn check_compatibility(
    relationship_type: RelationshipType,
    from: NodeType,
    to: NodeType,
) -> Result<(), DomainError> {
    if is_compatible(relationship_type, from, to) {
        return Ok(());
    }
    Err(DomainError::constraint(format!(
        "{} cannot connect {} -> {}; expected {}",
        relationship_type,
        from,
        to,
        expected_pairings(relationship_type)
    )))
}

fn join_types(types: &[NodeType]) -> String {
    types
        .iter()
        .map(NodeType::as_str)
        .collect::<Vec<_>>()
        .join("|")
}
