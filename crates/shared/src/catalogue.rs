//! Versioned type contract.
//!
//! Clients validate input against the same catalogue and compatibility table
//! the engine enforces. Bump [`CONTRACT_VERSION`] whenever a type, a kind or a
//! pairing changes.

use serde::{Deserialize, Serialize};

use storygraph_domain::{
    NodeKind, NodeType, RelationshipCategory, RelationshipType, COMPATIBILITY_TABLE,
};

pub const CONTRACT_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeTypeInfo {
    pub name: String,
    pub kind: NodeKind,
    pub orphan_exempt: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipTypeInfo {
    pub name: String,
    pub category: RelationshipCategory,
    /// Part of the acyclic progression subgraph checked by validation.
    pub progression: bool,
}

/// One compatibility rule: any `from` type may connect to any `to` type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompatibilityEntry {
    pub relationship_type: String,
    pub from: Vec<String>,
    pub to: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeCatalogue {
    pub version: String,
    pub node_types: Vec<NodeTypeInfo>,
    pub relationship_types: Vec<RelationshipTypeInfo>,
    pub compatibility: Vec<CompatibilityEntry>,
}

impl TypeCatalogue {
    /// The catalogue this build of the engine enforces.
    pub fn current() -> Self {
        let names = |types: &[NodeType]| -> Vec<String> { types.iter().map(|t| t.to_string()).collect() };

        Self {
            version: CONTRACT_VERSION.to_string(),
            node_types: NodeType::all()
                .iter()
                .map(|t| NodeTypeInfo {
                    name: t.to_string(),
                    kind: t.kind(),
                    orphan_exempt: t.is_orphan_exempt(),
                })
                .collect(),
            relationship_types: RelationshipType::all()
                .iter()
                .map(|t| RelationshipTypeInfo {
                    name: t.to_string(),
                    category: t.category(),
                    progression: t.is_progression(),
                })
                .collect(),
            compatibility: COMPATIBILITY_TABLE
                .iter()
                .map(|rule| CompatibilityEntry {
                    relationship_type: rule.relationship_type.to_string(),
                    from: names(rule.from),
                    to: names(rule.to),
                })
                .collect(),
        }
    }

    /// Check a pairing using wire names only.
    pub fn allows(&self, relationship_type: &str, from: &str, to: &str) -> bool {
        self.compatibility.iter().any(|entry| {
            entry.relationship_type == relationship_type
                && entry.from.iter().any(|t| t == from)
                && entry.to.iter().any(|t| t == to)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_covers_the_whole_catalogue() {
        let catalogue = TypeCatalogue::current();
        assert_eq!(catalogue.version, CONTRACT_VERSION);
        assert_eq!(catalogue.node_types.len(), NodeType::all().len());
        assert_eq!(
            catalogue.relationship_types.len(),
            RelationshipType::all().len()
        );
        assert_eq!(catalogue.compatibility.len(), COMPATIBILITY_TABLE.len());
    }

    #[test]
    fn allows_matches_domain_table() {
        let catalogue = TypeCatalogue::current();
        assert!(catalogue.allows("APPEARS_IN", "Character", "Scene"));
        assert!(catalogue.allows("PRECEDES", "Panel", "Panel"));
        assert!(!catalogue.allows("PRECEDES", "Panel", "PacingBeat"));
        assert!(!catalogue.allows("OWNS", "Item", "Character"));
    }

    #[test]
    fn serializes_with_wire_names() {
        let value = serde_json::to_value(TypeCatalogue::current()).unwrap();
        assert_eq!(value["version"], "1.0.0");
        assert_eq!(value["nodeTypes"][0]["name"], "Story");
        assert_eq!(value["nodeTypes"][0]["orphanExempt"], true);
        assert_eq!(value["relationshipTypes"][0]["name"], "LEADS_TO");
        assert_eq!(value["relationshipTypes"][0]["progression"], true);
    }
}
