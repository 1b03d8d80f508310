//! Conversion between `PhysicalItem` and DynamoDB attribute values.
//!
//! Key columns map to string attributes; passthrough attributes map between
//! JSON values and the corresponding `AttributeValue` variants. Pure
//! functions, testable without DynamoDB access.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use podium_core::codec::DecodingError;
use podium_core::storage::RepositoryError;
use podium_core::table::{
    KeyAttrs, PhysicalItem, ATTR_GSI_SK, ATTR_LSI, ATTR_PK, ATTR_SK_GSI,
};
use serde_json::{Number, Value};

/// Convert a `PhysicalItem` to a DynamoDB item.
pub fn item_to_attribute_values(item: &PhysicalItem) -> HashMap<String, AttributeValue> {
    let mut attrs = HashMap::new();
    attrs.insert(ATTR_PK.to_string(), AttributeValue::S(item.keys.pk.clone()));
    attrs.insert(
        ATTR_SK_GSI.to_string(),
        AttributeValue::S(item.keys.sk_gsi.clone()),
    );
    if let Some(lsi) = &item.keys.lsi {
        attrs.insert(ATTR_LSI.to_string(), AttributeValue::S(lsi.clone()));
    }
    if let Some(gsi_sk) = &item.keys.gsi_sk {
        attrs.insert(ATTR_GSI_SK.to_string(), AttributeValue::S(gsi_sk.clone()));
    }
    for (name, value) in &item.rest {
        attrs.insert(name.clone(), json_to_attribute_value(value));
    }
    attrs
}

/// Convert a DynamoDB item back to a `PhysicalItem`.
pub fn attribute_values_to_item(
    attrs: &HashMap<String, AttributeValue>,
) -> Result<PhysicalItem, RepositoryError> {
    let keys = KeyAttrs {
        pk: required_string(attrs, ATTR_PK)?,
        sk_gsi: required_string(attrs, ATTR_SK_GSI)?,
        lsi: optional_string(attrs, ATTR_LSI)?,
        gsi_sk: optional_string(attrs, ATTR_GSI_SK)?,
    };
    let mut item = PhysicalItem::new(keys);
    for (name, value) in attrs {
        if matches!(name.as_str(), ATTR_PK | ATTR_SK_GSI | ATTR_LSI | ATTR_GSI_SK) {
            continue;
        }
        item.rest
            .insert(name.clone(), attribute_value_to_json(name, value)?);
    }
    Ok(item)
}

fn json_to_attribute_value(value: &Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(flag) => AttributeValue::Bool(*flag),
        Value::Number(number) => AttributeValue::N(number.to_string()),
        Value::String(text) => AttributeValue::S(text.clone()),
        Value::Array(items) => {
            AttributeValue::L(items.iter().map(json_to_attribute_value).collect())
        }
        Value::Object(map) => AttributeValue::M(
            map.iter()
                .map(|(key, value)| (key.clone(), json_to_attribute_value(value)))
                .collect(),
        ),
    }
}

fn attribute_value_to_json(name: &str, value: &AttributeValue) -> Result<Value, RepositoryError> {
    let malformed = |reason: &str| {
        RepositoryError::Decoding(DecodingError::MalformedAttribute {
            attribute: name.to_string(),
            reason: reason.to_string(),
        })
    };
    match value {
        AttributeValue::Null(_) => Ok(Value::Null),
        AttributeValue::Bool(flag) => Ok(Value::Bool(*flag)),
        AttributeValue::S(text) => Ok(Value::String(text.clone())),
        AttributeValue::N(raw) => parse_number(raw).ok_or_else(|| malformed("unparseable number")),
        AttributeValue::L(items) => items
            .iter()
            .map(|item| attribute_value_to_json(name, item))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        AttributeValue::M(map) => map
            .iter()
            .map(|(key, value)| Ok((key.clone(), attribute_value_to_json(name, value)?)))
            .collect::<Result<serde_json::Map<_, _>, RepositoryError>>()
            .map(Value::Object),
        _ => Err(malformed("unsupported attribute value type")),
    }
}

fn parse_number(raw: &str) -> Option<Value> {
    if let Ok(integer) = raw.parse::<i64>() {
        return Some(Value::Number(Number::from(integer)));
    }
    raw.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
}

fn required_string(
    attrs: &HashMap<String, AttributeValue>,
    attribute: &'static str,
) -> Result<String, RepositoryError> {
    attrs
        .get(attribute)
        .and_then(|value| value.as_s().ok())
        .map(|text| text.to_string())
        .ok_or(RepositoryError::Decoding(DecodingError::MissingAttribute {
            attribute,
        }))
}

fn optional_string(
    attrs: &HashMap<String, AttributeValue>,
    attribute: &'static str,
) -> Result<Option<String>, RepositoryError> {
    match attrs.get(attribute) {
        None => Ok(None),
        Some(value) => value
            .as_s()
            .map(|text| Some(text.to_string()))
            .map_err(|_| {
                RepositoryError::Decoding(DecodingError::MalformedAttribute {
                    attribute: attribute.to_string(),
                    reason: "expected a string key column".to_string(),
                })
            }),
    }
}
