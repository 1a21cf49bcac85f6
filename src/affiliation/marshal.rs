//! Attribute Marshaller
//!
//! Builds the JSON document sent on create (POST) and update (PUT).

use super::catalog::{self, AttributeDefinition, Cardinality, SCHEMAS_KEY, SCHEMA_URN};
use crate::error::{ConnectorError, ConnectorResult};
use crate::framework::{AttributeSet, AttributeValue, ScalarKind};
use serde_json::{Map, Number, Value};

/// Wire representation of one affiliation record
pub type ResourceDocument = Map<String, Value>;

/// Build the request document from the host's attributes.
///
/// Without `existing` this is a create: mandatory fields are checked first.
/// With `existing` this is an update: the result starts as a copy of the
/// stored document, so fields the host did not send are kept.
pub fn marshal(
    existing: Option<&ResourceDocument>,
    incoming: &AttributeSet,
) -> ConnectorResult<ResourceDocument> {
    let mut document = match existing {
        Some(existing) => existing.clone(),
        None => {
            check_mandatory(incoming)?;
            Map::new()
        }
    };

    document.insert(
        SCHEMAS_KEY.to_string(),
        Value::Array(vec![Value::String(SCHEMA_URN.to_string())]),
    );

    for def in catalog::definitions() {
        let Some(values) = incoming.get(def.name) else {
            continue;
        };
        if let Some(value) = encode(def, values)? {
            document.insert(def.name.to_string(), value);
        }
    }

    Ok(document)
}

/// Fail on the first mandatory field without a usable value.
pub fn check_mandatory(incoming: &AttributeSet) -> ConnectorResult<()> {
    for def in catalog::required(Cardinality::Single) {
        let value = incoming
            .get(def.name)
            .and_then(|values| values.iter().find(|v| !v.is_null()));

        let blank = match value {
            Some(AttributeValue::String(s)) => s.trim().is_empty(),
            Some(_) => false,
            None => true,
        };
        if blank {
            return Err(ConnectorError::InvalidValue(format!(
                "Missing mandatory attribute {}",
                def.name
            )));
        }
    }

    for def in catalog::required(Cardinality::Multi) {
        let count = incoming
            .get(def.name)
            .map_or(0, |values| values.iter().filter(|v| !v.is_null()).count());

        if count == 0 {
            return Err(ConnectorError::InvalidValue(format!(
                "Missing mandatory attribute {}, at least one value is required",
                def.name
            )));
        }
    }

    Ok(())
}

/// JSON value for one field, or `None` when there is nothing to write.
fn encode(def: &AttributeDefinition, values: &[AttributeValue]) -> ConnectorResult<Option<Value>> {
    match def.cardinality {
        Cardinality::Single => {
            let mut present = values.iter().filter(|v| !v.is_null());
            let Some(value) = present.next() else {
                return Ok(None);
            };
            if present.next().is_some() {
                return Err(ConnectorError::InvalidValue(format!(
                    "Attribute {} is single-valued but {} values were given",
                    def.name,
                    values.len()
                )));
            }
            encode_scalar(def, value).map(Some)
        }
        Cardinality::Multi => {
            let encoded = values
                .iter()
                .map(|value| {
                    if value.is_null() {
                        return Err(ConnectorError::InvalidValue(format!(
                            "Value null must be not null for attribute {}",
                            def.name
                        )));
                    }
                    encode_scalar(def, value)
                })
                .collect::<ConnectorResult<Vec<_>>>()?;
            Ok(Some(Value::Array(encoded)))
        }
    }
}

fn encode_scalar(def: &AttributeDefinition, value: &AttributeValue) -> ConnectorResult<Value> {
    match (def.kind, value) {
        (ScalarKind::String, AttributeValue::String(s)) => Ok(Value::String(s.clone())),
        (ScalarKind::Integer, AttributeValue::Integer(i)) => Ok(Value::Number(Number::from(*i))),
        (ScalarKind::Integer, AttributeValue::String(s)) => {
            s.trim().parse::<i64>().map(|i| Value::Number(Number::from(i))).map_err(|_| {
                ConnectorError::InvalidValue(format!(
                    "Value '{}' of attribute {} is not an integer",
                    s, def.name
                ))
            })
        }
        _ => Err(ConnectorError::InvalidValue(format!(
            "Value '{}' of attribute {} is not a {:?}",
            value, def.name, def.kind
        ))),
    }
}
