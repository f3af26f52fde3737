//! Per-type payload schemas.
//!
//! Payloads travel and are stored as JSON objects. Before a node or
//! relationship is admitted each key is checked against the field list of
//! its type (unknown keys and wrong JSON types are reported and dropped), the
//! rest is deserialized into the schema struct and run through the derived
//! `validator` rules plus any enum-membership checks. Every violation is
//! collected; callers get the full list in one [`DomainError::Validation`].

mod node_payloads;
mod relationship_payloads;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use validator::{Validate, ValidationErrors};

use crate::catalogue::{NodeType, RelationshipType};
use crate::error::DomainError;

/// A node or relationship payload: a JSON object of typed per-type fields.
pub type Payload = Map<String, Value>;

/// JSON shape expected for a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldKind {
    Text,
    Integer,
    Number,
}

impl FieldKind {
    fn accepts(self, value: &Value) -> bool {
        match self {
            Self::Text => value.is_string(),
            Self::Integer => value.is_i64(),
            Self::Number => value.is_number(),
        }
    }

    fn expected(self) -> &'static str {
        match self {
            Self::Text => "must be a string",
            Self::Integer => "must be an integer",
            Self::Number => "must be a number",
        }
    }
}

/// A payload schema: derived range/length/required rules plus membership checks.
pub(crate) trait PayloadSchema: DeserializeOwned + Validate {
    /// Wire names and JSON kinds of every field the schema accepts.
    const FIELDS: &'static [(&'static str, FieldKind)];

    /// Violations the derive macros cannot express (closed string sets).
    fn membership_violations(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Validate a node payload against the schema of `node_type`.
pub fn validate_node_payload(node_type: NodeType, payload: &Payload) -> Result<(), DomainError> {
    use node_payloads::*;
    match node_type {
        NodeType::Story => check::<StoryPayload>(payload),
        NodeType::Act => check::<ActPayload>(payload),
        NodeType::Chapter => check::<ChapterPayload>(payload),
        NodeType::Scene => check::<ScenePayload>(payload),
        NodeType::Character => check::<CharacterPayload>(payload),
        NodeType::Choice => check::<ChoicePayload>(payload),
        NodeType::Event => check::<EventPayload>(payload),
        NodeType::Location => check::<LocationPayload>(payload),
        NodeType::Item => check::<ItemPayload>(payload),
        NodeType::StoryPhase => check::<StoryPhasePayload>(payload),
        NodeType::PacingBeat => check::<PacingBeatPayload>(payload),
        NodeType::Panel => check::<PanelPayload>(payload),
    }
}

/// Validate a relationship payload against the schema of `relationship_type`.
pub fn validate_relationship_payload(
    relationship_type: RelationshipType,
    payload: &Payload,
) -> Result<(), DomainError> {
    use relationship_payloads::*;
    match relationship_type {
        RelationshipType::LeadsTo | RelationshipType::Precedes => {
            check::<ProgressionProps>(payload)
        }
        RelationshipType::Triggers => check::<TriggerProps>(payload),
        RelationshipType::AppearsIn => check::<AppearanceProps>(payload),
        RelationshipType::Requires => check::<RequirementProps>(payload),
        RelationshipType::Contains => check::<ContainmentProps>(payload),
        RelationshipType::RelatesTo => check::<RelationProps>(payload),
        RelationshipType::LocatedAt | RelationshipType::Owns => check::<WeightOnlyProps>(payload),
    }
}

/// Shallow-merge `patch` onto `base`. A `null` in the patch removes the field.
pub fn merge_payload(base: &Payload, patch: &Payload) -> Payload {
    let mut merged = base.clone();
    for (key, value) in patch {
        if value.is_null() {
            merged.remove(key);
        } else {
            merged.insert(key.clone(), value.clone());
        }
    }
    merged
}

fn check<T: PayloadSchema>(payload: &Payload) -> Result<(), DomainError> {
    let (accepted, mut violations) = shape_violations(T::FIELDS, payload);

    match serde_json::from_value::<T>(Value::Object(accepted)) {
        Ok(parsed) => {
            if let Err(errors) = parsed.validate() {
                violations.extend(describe(&errors));
            }
            violations.extend(parsed.membership_violations());
        }
        Err(e) => violations.push(format!("payload: {}", e)),
    }

    if violations.is_empty() {
        Ok(())
    } else {
        violations.sort();
        Err(DomainError::validation_all(violations))
    }
}

/// Split a payload into the fields of the right shape and one violation per
/// unknown or wrongly typed field. A `null` counts as absent.
fn shape_violations(fields: &[(&str, FieldKind)], payload: &Payload) -> (Payload, Vec<String>) {
    let mut accepted = Payload::new();
    let mut violations = Vec::new();
    for (key, value) in payload {
        match fields.iter().find(|(name, _)| name == key) {
            None => violations.push(format!("{}: unknown field", key)),
            Some(_) if value.is_null() => {}
            Some((_, kind)) if !kind.accepts(value) => {
                violations.push(format!("{}: {}", key, kind.expected()))
            }
            Some(_) => {
                accepted.insert(key.clone(), value.clone());
            }
        }
    }
    (accepted, violations)
}

fn describe(errors: &ValidationErrors) -> Vec<String> {
    let mut out = Vec::new();
    for (field, field_errors) in errors.field_errors() {
        let field = camel_case(&field.to_string());
        for error in field_errors.iter() {
            let reason = error
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| error.code.to_string());
            out.push(format!("{}: {}", field, reason));
        }
    }
    out
}

/// Report `value` when it is set and not one of `allowed`.
pub(crate) fn one_of(field: &str, value: &Option<String>, allowed: &[&str]) -> Option<String> {
    match value {
        Some(v) if !allowed.contains(&v.as_str()) => Some(format!(
            "{}: must be one of {}",
            field,
            allowed.join(", ")
        )),
        _ => None,
    }
}

// Schema structs use snake_case fields, the wire uses camelCase.
fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}
