use crate::{
    filter::ast::{CompareOp, FilterNode, FilterValue, GroupOp},
    types::{ObjectId, PropertyDefId},
};
use serde_json::{Map, Value as Json};
use tracing::debug;

///
/// Payload decoding
///
/// Persisted filter payloads are JSON documents in one of three shapes: a
/// bare array (implicit AND group), an object with `operator` + `conditions`
/// (explicit group), or a leaf object. Decoding is lenient by contract:
/// malformed payloads and unrecognized node shapes degrade to "no filter" /
/// dropped nodes with a debug log, never an error.
///

/// Decode a view's persisted filter payload into a filter tree.
///
/// Returns `None` when the payload is absent, blank, unparseable, or not a
/// recognized node shape.
#[must_use]
pub fn decode_filter(payload: Option<&str>) -> Option<FilterNode> {
    let text = payload.map(str::trim).filter(|t| !t.is_empty())?;

    let json: Json = match serde_json::from_str(text) {
        Ok(json) => json,
        Err(err) => {
            debug!(error = %err, "filter payload is not valid JSON; treating as no filter");
            return None;
        }
    };

    decode_node(&json)
}

fn decode_node(json: &Json) -> Option<FilterNode> {
    match json {
        // A bare array is an implicit AND group.
        Json::Array(items) => Some(FilterNode::and(decode_children(items))),
        Json::Object(fields) => decode_object(fields),
        other => {
            debug!(node = %other, "unrecognized filter node shape; dropping node");
            None
        }
    }
}

fn decode_children(items: &[Json]) -> Vec<FilterNode> {
    items.iter().filter_map(decode_node).collect()
}

fn decode_object(fields: &Map<String, Json>) -> Option<FilterNode> {
    if fields.contains_key("conditions") || fields.contains_key("operator") {
        return Some(decode_group(fields));
    }
    if fields.contains_key("propertyDefId") {
        return decode_property(fields);
    }
    if let Some(role) = fields.get("linkRole").and_then(Json::as_str) {
        return decode_link(fields, role).map(|target| FilterNode::Link {
            role: role.to_string(),
            target,
        });
    }
    if let Some(role) = fields.get("reverseLinkRole").and_then(Json::as_str) {
        return decode_link(fields, role).map(|source| FilterNode::ReverseLink {
            role: role.to_string(),
            source,
        });
    }

    debug!("unrecognized filter leaf shape; dropping node");
    None
}

fn decode_group(fields: &Map<String, Json>) -> FilterNode {
    let op = match fields.get("operator").and_then(Json::as_str) {
        Some(tag) => GroupOp::from_tag(tag).unwrap_or_else(|| {
            debug!(operator = tag, "unknown group operator; defaulting to AND");
            GroupOp::And
        }),
        None => GroupOp::And,
    };

    let children = fields
        .get("conditions")
        .and_then(Json::as_array)
        .map(|items| decode_children(items))
        .unwrap_or_default();

    FilterNode::Group { op, children }
}

fn decode_property(fields: &Map<String, Json>) -> Option<FilterNode> {
    let Some(id) = fields.get("propertyDefId").and_then(Json::as_i64) else {
        debug!("property leaf without a numeric propertyDefId; dropping node");
        return None;
    };

    let property = PropertyDefId(id);
    let value = decode_value(fields.get("value"));

    // Sentinel id 0 marks a free-text leaf; its value is the search term.
    if property == PropertyDefId::FULL_TEXT_SENTINEL {
        let Some(query) = value.to_query_text() else {
            debug!("full-text leaf without a usable query; dropping node");
            return None;
        };
        return Some(FilterNode::FullText { query });
    }

    let op = match fields.get("op").and_then(Json::as_str) {
        Some(tag) => CompareOp::from_tag(tag).unwrap_or_else(|| {
            debug!(op = tag, property = %property, "unknown leaf operator; defaulting to EQ");
            CompareOp::Eq
        }),
        None => CompareOp::Eq,
    };

    let declared_kind = fields
        .get("dataType")
        .and_then(Json::as_str)
        .map(str::to_string);

    Some(FilterNode::Property {
        property,
        op,
        value,
        declared_kind,
    })
}

fn decode_link(fields: &Map<String, Json>, role: &str) -> Option<ObjectId> {
    let endpoint = decode_value(fields.get("value")).as_integer();
    if endpoint.is_none() {
        debug!(role, "link leaf without a numeric object id; dropping node");
    }

    endpoint.map(ObjectId)
}

fn decode_value(json: Option<&Json>) -> FilterValue {
    match json {
        Some(Json::String(text)) => FilterValue::Text(text.clone()),
        Some(Json::Number(n)) => n.as_f64().map_or(FilterValue::Null, FilterValue::Number),
        Some(Json::Bool(b)) => FilterValue::Bool(*b),
        // Null, arrays, and objects have no scalar slot; the leaf never matches.
        _ => FilterValue::Null,
    }
}
