//! Conversions between Bolt values and domain/JSON values.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use neo4rs::{BoltMap, BoltNull, BoltType};
use serde_json::Value;

use storygraph_domain::{Node, Payload, Relationship};

use crate::infrastructure::ports::QueryError;

/// Map projection of a node variable, read back by [`node_from_map`].
pub(super) fn node_projection(var: &str) -> String {
    format!("{var} {{.id, .type, .payload, .created_at, .updated_at}}")
}

/// Map projection of a relationship variable, read back by [`relationship_from_map`].
pub(super) fn relationship_projection(var: &str) -> String {
    format!(
        "{var} {{.id, .payload, .created_at, .updated_at, type: type({var}), \
         from: startNode({var}).id, to: endNode({var}).id}}"
    )
}

fn text(map: &BoltMap, entity: &str, key: &str) -> Result<String, QueryError> {
    map.get::<String>(key)
        .map_err(|e| QueryError::decode(format!("{entity}.{key}: {e}")))
}

fn parse_time(entity: &str, key: &str, raw: &str) -> Result<DateTime<Utc>, QueryError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| QueryError::decode(format!("{entity}.{key}: {e}")))
}

fn parse_payload(entity: &str, raw: &str) -> Result<Payload, QueryError> {
    if raw.is_empty() {
        return Ok(Payload::new());
    }
    serde_json::from_str(raw).map_err(|e| QueryError::decode(format!("{entity}.payload: {e}")))
}

pub(super) fn node_from_map(map: &BoltMap) -> Result<Node, QueryError> {
    let created_at = text(map, "node", "created_at")?;
    let updated_at = text(map, "node", "updated_at")?;
    Ok(Node {
        id: text(map, "node", "id")?.parse().map_err(QueryError::decode)?,
        node_type: text(map, "node", "type")?
            .parse()
            .map_err(QueryError::decode)?,
        payload: parse_payload("node", &text(map, "node", "payload")?)?,
        created_at: parse_time("node", "created_at", &created_at)?,
        updated_at: parse_time("node", "updated_at", &updated_at)?,
    })
}

pub(super) fn relationship_from_map(map: &BoltMap) -> Result<Relationship, QueryError> {
    let e = "relationship";
    let created_at = text(map, e, "created_at")?;
    let updated_at = text(map, e, "updated_at")?;
    Ok(Relationship {
        id: text(map, e, "id")?.parse().map_err(QueryError::decode)?,
        relationship_type: text(map, e, "type")?.parse().map_err(QueryError::decode)?,
        from_node_id: text(map, e, "from")?.parse().map_err(QueryError::decode)?,
        to_node_id: text(map, e, "to")?.parse().map_err(QueryError::decode)?,
        payload: parse_payload(e, &text(map, e, "payload")?)?,
        created_at: parse_time(e, "created_at", &created_at)?,
        updated_at: parse_time(e, "updated_at", &updated_at)?,
    })
}

/// Payloads are stored as a JSON string property.
pub(super) fn payload_json(payload: &Payload) -> Result<String, QueryError> {
    serde_json::to_string(payload).map_err(QueryError::decode)
}

/// Convert a JSON parameter value into a Bolt value for raw queries.
pub(super) fn to_bolt(value: &Value) -> BoltType {
    match value {
        Value::Null => BoltType::Null(BoltNull),
        Value::Bool(b) => (*b).into(),
        Value::Number(n) => match n.as_i64() {
            Some(i) => i.into(),
            None => n.as_f64().unwrap_or_default().into(),
        },
        Value::String(s) => s.clone().into(),
        Value::Array(items) => items.iter().map(to_bolt).collect::<Vec<BoltType>>().into(),
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| (k.clone(), to_bolt(v)))
            .collect::<HashMap<String, BoltType>>()
            .into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn to_bolt_maps_json_shapes() {
        assert!(matches!(to_bolt(&json!(null)), BoltType::Null(_)));
        assert!(matches!(to_bolt(&json!(true)), BoltType::Boolean(_)));
        assert!(matches!(to_bolt(&json!(7)), BoltType::Integer(_)));
        assert!(matches!(to_bolt(&json!(0.5)), BoltType::Float(_)));
        assert!(matches!(to_bolt(&json!("x")), BoltType::String(_)));
        assert!(matches!(to_bolt(&json!([1, 2])), BoltType::List(_)));
        assert!(matches!(to_bolt(&json!({"a": 1})), BoltType::Map(_)));
    }

    #[test]
    fn projections_name_every_stored_property() {
        let node = node_projection("n");
        for key in ["id", "type", "payload", "created_at", "updated_at"] {
            assert!(node.contains(&format!(".{key}")));
        }
        assert!(relationship_projection("r").contains("startNode(r).id"));
    }
}
