// Schema structs are only deserialized and validated; their fields are never read directly.
#![allow(dead_code)]

//! Node payload schemas, one per catalogue member.

use serde::Deserialize;
use validator::Validate;

use super::{one_of, FieldKind, PayloadSchema};

const MOODS: &[&str] = &["tense", "calm", "mysterious", "joyful", "somber", "action"];
const CHARACTER_ROLES: &[&str] = &["protagonist", "antagonist", "supporting", "minor"];
const RARITIES: &[&str] = &["common", "uncommon", "rare", "legendary"];
const PANEL_TRANSITIONS: &[&str] = &[
    "moment",
    "action",
    "subject",
    "scene",
    "aspect",
    "non_sequitur",
];

// -----------------------------------------------------------------------------
// Containers
// -----------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub(crate) struct StoryPayload {
    #[validate(
        required(message = "is required"),
        length(min = 1, max = 200, message = "must be 1-200 characters")
    )]
    title: Option<String>,
    #[validate(length(max = 5000, message = "must be at most 5000 characters"))]
    synopsis: Option<String>,
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    genre: Option<String>,
}

impl PayloadSchema for StoryPayload {
    const FIELDS: &'static [(&'static str, FieldKind)] = &[
        ("title", FieldKind::Text),
        ("synopsis", FieldKind::Text),
        ("genre", FieldKind::Text),
    ];
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub(crate) struct ActPayload {
    #[validate(
        required(message = "is required"),
        length(min = 1, max = 200, message = "must be 1-200 characters")
    )]
    title: Option<String>,
    #[validate(
        required(message = "is required"),
        range(min = 1, max = 100, message = "must be between 1 and 100")
    )]
    order: Option<i64>,
}

impl PayloadSchema for ActPayload {
    const FIELDS: &'static [(&'static str, FieldKind)] = &[
        ("title", FieldKind::Text),
        ("order", FieldKind::Integer),
    ];
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub(crate) struct ChapterPayload {
    #[validate(
        required(message = "is required"),
        length(min = 1, max = 200, message = "must be 1-200 characters")
    )]
    title: Option<String>,
    #[validate(
        required(message = "is required"),
        range(min = 1, max = 1000, message = "must be between 1 and 1000")
    )]
    order: Option<i64>,
    #[validate(length(max = 5000, message = "must be at most 5000 characters"))]
    summary: Option<String>,
}

impl PayloadSchema for ChapterPayload {
    const FIELDS: &'static [(&'static str, FieldKind)] = &[
        ("title", FieldKind::Text),
        ("order", FieldKind::Integer),
        ("summary", FieldKind::Text),
    ];
}

// -----------------------------------------------------------------------------
// Narrative entities
// -----------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub(crate) struct ScenePayload {
    #[validate(
        required(message = "is required"),
        length(min = 1, max = 200, message = "must be 1-200 characters")
    )]
    title: Option<String>,
    #[validate(length(max = 5000, message = "must be at most 5000 characters"))]
    description: Option<String>,
    mood: Option<String>,
    #[validate(range(min = 0, max = 10, message = "must be between 0 and 10"))]
    tension: Option<i64>,
}

impl PayloadSchema for ScenePayload {
    const FIELDS: &'static [(&'static str, FieldKind)] = &[
        ("title", FieldKind::Text),
        ("description", FieldKind::Text),
        ("mood", FieldKind::Text),
        ("tension", FieldKind::Integer),
    ];

    fn membership_violations(&self) -> Vec<String> {
        one_of("mood", &self.mood, MOODS).into_iter().collect()
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub(crate) struct CharacterPayload {
    #[validate(
        required(message = "is required"),
        length(min = 1, max = 200, message = "must be 1-200 characters")
    )]
    name: Option<String>,
    role: Option<String>,
    #[validate(range(min = 0, max = 10000, message = "must be between 0 and 10000"))]
    age: Option<i64>,
    #[validate(length(max = 5000, message = "must be at most 5000 characters"))]
    description: Option<String>,
}

impl PayloadSchema for CharacterPayload {
    const FIELDS: &'static [(&'static str, FieldKind)] = &[
        ("name", FieldKind::Text),
        ("role", FieldKind::Text),
        ("age", FieldKind::Integer),
        ("description", FieldKind::Text),
    ];

    fn membership_violations(&self) -> Vec<String> {
        one_of("role", &self.role, CHARACTER_ROLES)
            .into_iter()
            .collect()
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub(crate) struct ChoicePayload {
    #[validate(
        required(message = "is required"),
        length(min = 1, max = 1000, message = "must be 1-1000 characters")
    )]
    text: Option<String>,
    #[validate(length(max = 5000, message = "must be at most 5000 characters"))]
    consequence: Option<String>,
}

impl PayloadSchema for ChoicePayload {
    const FIELDS: &'static [(&'static str, FieldKind)] = &[
        ("text", FieldKind::Text),
        ("consequence", FieldKind::Text),
    ];
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub(crate) struct EventPayload {
    #[validate(
        required(message = "is required"),
        length(min = 1, max = 200, message = "must be 1-200 characters")
    )]
    name: Option<String>,
    #[validate(length(max = 5000, message = "must be at most 5000 characters"))]
    description: Option<String>,
    #[validate(range(min = 1, max = 5, message = "must be between 1 and 5"))]
    importance: Option<i64>,
}

impl PayloadSchema for EventPayload {
    const FIELDS: &'static [(&'static str, FieldKind)] = &[
        ("name", FieldKind::Text),
        ("description", FieldKind::Text),
        ("importance", FieldKind::Integer),
    ];
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub(crate) struct LocationPayload {
    #[validate(
        required(message = "is required"),
        length(min = 1, max = 200, message = "must be 1-200 characters")
    )]
    name: Option<String>,
    #[validate(length(max = 5000, message = "must be at most 5000 characters"))]
    description: Option<String>,
    #[validate(length(max = 200, message = "must be at most 200 characters"))]
    region: Option<String>,
}

impl PayloadSchema for LocationPayload {
    const FIELDS: &'static [(&'static str, FieldKind)] = &[
        ("name", FieldKind::Text),
        ("description", FieldKind::Text),
        ("region", FieldKind::Text),
    ];
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub(crate) struct ItemPayload {
    #[validate(
        required(message = "is required"),
        length(min = 1, max = 200, message = "must be 1-200 characters")
    )]
    name: Option<String>,
    #[validate(length(max = 5000, message = "must be at most 5000 characters"))]
    description: Option<String>,
    rarity: Option<String>,
    #[validate(range(min = 0.0, message = "must not be negative"))]
    value: Option<f64>,
}

impl PayloadSchema for ItemPayload {
    const FIELDS: &'static [(&'static str, FieldKind)] = &[
        ("name", FieldKind::Text),
        ("description", FieldKind::Text),
        ("rarity", FieldKind::Text),
        ("value", FieldKind::Number),
    ];

    fn membership_violations(&self) -> Vec<String> {
        one_of("rarity", &self.rarity, RARITIES).into_iter().collect()
    }
}

// -----------------------------------------------------------------------------
// Narrative structure
// -----------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub(crate) struct StoryPhasePayload {
    #[validate(
        required(message = "is required"),
        length(min = 1, max = 200, message = "must be 1-200 characters")
    )]
    name: Option<String>,
    #[validate(
        required(message = "is required"),
        range(min = 1, max = 12, message = "must be between 1 and 12")
    )]
    phase_order: Option<i64>,
}

impl PayloadSchema for StoryPhasePayload {
    const FIELDS: &'static [(&'static str, FieldKind)] = &[
        ("name", FieldKind::Text),
        ("phaseOrder", FieldKind::Integer),
    ];
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub(crate) struct PacingBeatPayload {
    #[validate(
        required(message = "is required"),
        length(min = 1, max = 200, message = "must be 1-200 characters")
    )]
    label: Option<String>,
    #[validate(range(min = 0, max = 10, message = "must be between 0 and 10"))]
    intensity: Option<i64>,
}

impl PayloadSchema for PacingBeatPayload {
    const FIELDS: &'static [(&'static str, FieldKind)] = &[
        ("label", FieldKind::Text),
        ("intensity", FieldKind::Integer),
    ];
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub(crate) struct PanelPayload {
    #[validate(
        required(message = "is required"),
        range(min = 1, message = "must be at least 1")
    )]
    sequence: Option<i64>,
    #[validate(length(max = 1000, message = "must be at most 1000 characters"))]
    caption: Option<String>,
    transition: Option<String>,
}

impl PayloadSchema for PanelPayload {
    const FIELDS: &'static [(&'static str, FieldKind)] = &[
        ("sequence", FieldKind::Integer),
        ("caption", FieldKind::Text),
        ("transition", FieldKind::Text),
    ];

    fn membership_violations(&self) -> Vec<String> {
        one_of("transition", &self.transition, PANEL_TRANSITIONS)
            .into_iter()
            .collect()
    }
}
