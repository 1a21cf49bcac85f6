//! Attribute Unmarshaller
//!
//! Converts a fetched affiliation document into the object handed to the host.

use super::catalog::{self, AttributeDefinition, Cardinality, OBJECT_CLASS, UID_FIELD};
use super::marshal::ResourceDocument;
use crate::error::{ConnectorError, ConnectorResult};
use crate::framework::{AttributeSet, AttributeValue, ConnectorObject, ScalarKind, Uid};
use serde_json::Value;

/// Read the identifier the server assigned to a document
pub fn extract_uid(document: &ResourceDocument) -> ConnectorResult<Uid> {
    document
        .get(UID_FIELD)
        .and_then(Value::as_str)
        .map(Uid::new)
        .ok_or_else(|| {
            ConnectorError::transport(format!("Response does not contain {} as a string", UID_FIELD))
        })
}

/// Convert a document into a connector object.
///
/// Uid and name both come from the unique identifier field.
pub fn unmarshal(document: &ResourceDocument) -> ConnectorResult<ConnectorObject> {
    let uid = extract_uid(document)?;
    let mut attributes = AttributeSet::new();

    for def in catalog::definitions() {
        let Some(value) = document.get(def.name) else {
            continue;
        };
        if value.is_null() {
            continue;
        }
        attributes.set_values(def.name, decode(def, value)?);
    }

    tracing::debug!(
        "unmarshalled affiliation {} with {} attributes",
        uid,
        attributes.len()
    );

    Ok(ConnectorObject {
        object_class: OBJECT_CLASS.to_string(),
        name: uid.value().to_string(),
        uid,
        attributes,
    })
}

fn decode(def: &AttributeDefinition, value: &Value) -> ConnectorResult<Vec<AttributeValue>> {
    match (def.cardinality, value) {
        (Cardinality::Multi, Value::Array(items)) => items
            .iter()
            .map(|item| decode_scalar(def, item))
            .collect(),
        // Some responses carry a bare scalar where a list is declared
        (Cardinality::Multi, scalar) => decode_scalar(def, scalar)
            .map(|v| vec![v])
            .map_err(|_| unsupported_value(def, value)),
        (Cardinality::Single, scalar) => decode_scalar(def, scalar).map(|v| vec![v]),
    }
}

fn decode_scalar(def: &AttributeDefinition, value: &Value) -> ConnectorResult<AttributeValue> {
    match (def.kind, value) {
        (ScalarKind::String, Value::String(s)) => Ok(AttributeValue::String(s.clone())),
        (ScalarKind::Integer, Value::Number(n)) => n
            .as_i64()
            .map(AttributeValue::Integer)
            .ok_or_else(|| unsupported_value(def, value)),
        (ScalarKind::Integer, Value::String(s)) => s
            .trim()
            .parse::<i64>()
            .map(AttributeValue::Integer)
            .map_err(|_| unsupported_value(def, value)),
        _ => Err(unsupported_value(def, value)),
    }
}

fn unsupported_value(def: &AttributeDefinition, value: &Value) -> ConnectorError {
    ConnectorError::InvalidValue(format!(
        "Unsupported value '{}' for attribute name '{}'",
        value, def.name
    ))
}
