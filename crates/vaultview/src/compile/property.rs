use crate::{
    exec::ports::MetadataPort,
    filter::{CompareOp, FilterValue, kind, kind::ValueKind},
    sql::{Param, ParamAllocator, PropertyJoins},
    types::PropertyDefId,
};
use tracing::debug;

///
/// Property predicate builder
///
/// Turns one typed property leaf into a column-specific comparison with
/// exactly one bound parameter. Degradations are lawful, not errors: an
/// unsupported operator falls back to EQ and an unparseable value binds NULL,
/// which makes the predicate vacuously false for that leaf.
///

pub(super) fn build(
    metadata: &dyn MetadataPort,
    joins: &mut PropertyJoins,
    allocator: &mut ParamAllocator,
    property: PropertyDefId,
    op: CompareOp,
    declared_kind: Option<&str>,
    value: &FilterValue,
) -> String {
    let definition = metadata.property(property);
    let schema_kind = definition.as_ref().and_then(|d| d.kind);
    let resolved = kind::resolve(declared_kind, schema_kind, value);
    let op = effective_op(op, resolved, property);

    // Multi-valued value-list properties have no single typed slot; their
    // values live in linking rows, so the predicate is an existence check.
    if resolved == ValueKind::ValueList && definition.is_some_and(|d| d.multi_select) {
        return multi_select_predicate(metadata, allocator, property, value);
    }

    let alias = joins.alias(property);
    let param = bind_value(metadata, property, resolved, op, value);
    let name = allocator.bind(param);

    format!("{alias}.{} {} :{name}", resolved.column(), op.sql_symbol())
}

/// LIKE only applies to the text column; other kinds degrade to EQ.
fn effective_op(op: CompareOp, resolved: ValueKind, property: PropertyDefId) -> CompareOp {
    if op == CompareOp::Like && resolved != ValueKind::Text {
        debug!(
            property = %property,
            kind = ?resolved,
            "LIKE is not supported for this kind; degrading to EQ"
        );
        return CompareOp::Eq;
    }

    op
}

fn bind_value(
    metadata: &dyn MetadataPort,
    property: PropertyDefId,
    resolved: ValueKind,
    op: CompareOp,
    value: &FilterValue,
) -> Param {
    match resolved {
        ValueKind::Text => bind_text(op, value),
        ValueKind::Number => bind_number(value),
        ValueKind::Date => bind_date(value),
        ValueKind::Boolean => bind_boolean(value),
        ValueKind::Reference => value.as_integer().map_or(Param::Null, Param::Integer),
        ValueKind::ValueList => bind_value_list_item(metadata, property, value),
    }
}

fn bind_text(op: CompareOp, value: &FilterValue) -> Param {
    let text = match value {
        FilterValue::Text(text) => text.clone(),
        FilterValue::Number(n) => n.to_string(),
        FilterValue::Bool(b) => b.to_string(),
        FilterValue::Null => return Param::Null,
    };

    if op == CompareOp::Like {
        return Param::Text(wrap_like(text));
    }

    Param::Text(text)
}

/// Wrap a LIKE value in wildcards unless the caller already supplied any.
fn wrap_like(text: String) -> String {
    if text.contains(['%', '_']) {
        text
    } else {
        format!("%{text}%")
    }
}

fn bind_number(value: &FilterValue) -> Param {
    match value {
        FilterValue::Number(n) => Param::Number(*n),
        FilterValue::Text(text) => text
            .trim()
            .parse::<f64>()
            .map_or(Param::Null, Param::Number),
        FilterValue::Bool(_) | FilterValue::Null => Param::Null,
    }
}

fn bind_date(value: &FilterValue) -> Param {
    match value {
        FilterValue::Text(text) => kind::parse_date(text).map_or(Param::Null, Param::Date),
        _ => Param::Null,
    }
}

fn bind_boolean(value: &FilterValue) -> Param {
    match value {
        FilterValue::Bool(b) => Param::Bool(*b),
        FilterValue::Text(text) if text.eq_ignore_ascii_case("true") => Param::Bool(true),
        FilterValue::Text(text) if text.eq_ignore_ascii_case("false") => Param::Bool(false),
        _ => Param::Null,
    }
}

/// Numeric values are item ids; textual values resolve through the value-list
/// lookup. Unresolvable labels bind NULL and the leaf never matches.
fn bind_value_list_item(
    metadata: &dyn MetadataPort,
    property: PropertyDefId,
    value: &FilterValue,
) -> Param {
    if let Some(id) = value.as_integer() {
        return Param::Integer(id);
    }

    match value {
        FilterValue::Text(label) => metadata
            .value_list_item_id(property, label.trim())
            .map_or_else(
                || {
                    debug!(property = %property, label = %label, "value-list label did not resolve");
                    Param::Null
                },
                |item| Param::Integer(item.0),
            ),
        _ => Param::Null,
    }
}

fn multi_select_predicate(
    metadata: &dyn MetadataPort,
    allocator: &mut ParamAllocator,
    property: PropertyDefId,
    value: &FilterValue,
) -> String {
    let item = bind_value_list_item(metadata, property, value);
    let property_name = allocator.bind(Param::Integer(property.0));
    let item_name = allocator.bind(item);

    format!(
        "EXISTS (SELECT 1 FROM property_value_item pvi \
         WHERE pvi.version_id = v.id \
         AND pvi.property_def_id = :{property_name} \
         AND pvi.value_list_item_id = :{item_name})"
    )
}
