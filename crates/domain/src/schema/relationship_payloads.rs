// Schema structs are only deserialized and validated; their fields are never read directly.
#![allow(dead_code)]

//! Relationship payload schemas. Every type accepts a non-negative `weight`.

use serde::Deserialize;
use validator::Validate;

use super::{one_of, FieldKind, PayloadSchema};

const APPEARANCE_ROLES: &[&str] = &["major", "minor", "cameo"];

/// `LEADS_TO` and `PRECEDES`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub(crate) struct ProgressionProps {
    #[validate(range(min = 0.0, message = "must not be negative"))]
    weight: Option<f64>,
    #[validate(length(max = 1000, message = "must be at most 1000 characters"))]
    condition: Option<String>,
    #[validate(length(max = 200, message = "must be at most 200 characters"))]
    label: Option<String>,
}

impl PayloadSchema for ProgressionProps {
    const FIELDS: &'static [(&'static str, FieldKind)] = &[
        ("weight", FieldKind::Number),
        ("condition", FieldKind::Text),
        ("label", FieldKind::Text),
    ];
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub(crate) struct TriggerProps {
    #[validate(range(min = 0.0, message = "must not be negative"))]
    weight: Option<f64>,
    #[validate(range(min = 0.0, max = 1.0, message = "must be between 0 and 1"))]
    probability: Option<f64>,
    #[validate(range(min = 0, message = "must not be negative"))]
    delay_minutes: Option<i64>,
}

impl PayloadSchema for TriggerProps {
    const FIELDS: &'static [(&'static str, FieldKind)] = &[
        ("weight", FieldKind::Number),
        ("probability", FieldKind::Number),
        ("delayMinutes", FieldKind::Integer),
    ];
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub(crate) struct AppearanceProps {
    #[validate(range(min = 0.0, message = "must not be negative"))]
    weight: Option<f64>,
    role: Option<String>,
}

impl PayloadSchema for AppearanceProps {
    const FIELDS: &'static [(&'static str, FieldKind)] = &[
        ("weight", FieldKind::Number),
        ("role", FieldKind::Text),
    ];

    fn membership_violations(&self) -> Vec<String> {
        one_of("role", &self.role, APPEARANCE_ROLES)
            .into_iter()
            .collect()
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub(crate) struct RequirementProps {
    #[validate(range(min = 0.0, message = "must not be negative"))]
    weight: Option<f64>,
    #[validate(range(min = 1, message = "must be at least 1"))]
    quantity: Option<i64>,
}

impl PayloadSchema for RequirementProps {
    const FIELDS: &'static [(&'static str, FieldKind)] = &[
        ("weight", FieldKind::Number),
        ("quantity", FieldKind::Integer),
    ];
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub(crate) struct ContainmentProps {
    #[validate(range(min = 0.0, message = "must not be negative"))]
    weight: Option<f64>,
    #[validate(range(min = 0, message = "must not be negative"))]
    order: Option<i64>,
}

impl PayloadSchema for ContainmentProps {
    const FIELDS: &'static [(&'static str, FieldKind)] = &[
        ("weight", FieldKind::Number),
        ("order", FieldKind::Integer),
    ];
}

/// `RELATES_TO`: edges of the character network.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub(crate) struct RelationProps {
    #[validate(range(min = 0.0, message = "must not be negative"))]
    weight: Option<f64>,
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    kind: Option<String>,
    #[validate(range(min = -10, max = 10, message = "must be between -10 and 10"))]
    strength: Option<i64>,
}

impl PayloadSchema for RelationProps {
    const FIELDS: &'static [(&'static str, FieldKind)] = &[
        ("weight", FieldKind::Number),
        ("kind", FieldKind::Text),
        ("strength", FieldKind::Integer),
    ];
}

/// `LOCATED_AT` and `OWNS`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub(crate) struct WeightOnlyProps {
    #[validate(range(min = 0.0, message = "must not be negative"))]
    weight: Option<f64>,
}

impl PayloadSchema for WeightOnlyProps {
    const FIELDS: &'static [(&'static str, FieldKind)] = &[
        ("weight", FieldKind::Number),
    ];
}
