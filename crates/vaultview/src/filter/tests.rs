use crate::{
    filter::{
        ast::{CompareOp, FilterNode, FilterValue, GroupOp},
        decode::decode_filter,
    },
    types::{ObjectId, PropertyDefId},
};

#[test]
fn missing_blank_and_malformed_payloads_decode_to_no_filter() {
    assert_eq!(decode_filter(None), None);
    assert_eq!(decode_filter(Some("")), None);
    assert_eq!(decode_filter(Some("   ")), None);
    assert_eq!(decode_filter(Some("{not json")), None);
    assert_eq!(decode_filter(Some("\"just a string\"")), None);
    assert_eq!(decode_filter(Some("42")), None);
}

#[test]
fn bare_array_decodes_to_implicit_and_group() {
    let payload = r#"[
        {"propertyDefId": 50, "op": "EQ", "value": "Active", "dataType": "text"},
        {"propertyDefId": 51, "op": "GTE", "value": 100}
    ]"#;

    let expected = FilterNode::and(vec![
        FilterNode::Property {
            property: PropertyDefId(50),
            op: CompareOp::Eq,
            value: FilterValue::Text("Active".to_string()),
            declared_kind: Some("text".to_string()),
        },
        FilterNode::Property {
            property: PropertyDefId(51),
            op: CompareOp::Gte,
            value: FilterValue::Number(100.0),
            declared_kind: None,
        },
    ]);

    assert_eq!(decode_filter(Some(payload)), Some(expected));
}

#[test]
fn explicit_group_decodes_operator_and_conditions() {
    let payload = r#"{
        "operator": "OR",
        "conditions": [
            {"propertyDefId": 50, "value": "Draft"},
            {"propertyDefId": 50, "value": "Review"}
        ]
    }"#;

    let Some(FilterNode::Group { op, children }) = decode_filter(Some(payload)) else {
        panic!("expected a group node");
    };
    assert_eq!(op, GroupOp::Or);
    assert_eq!(children.len(), 2);
}

#[test]
fn unknown_group_operator_defaults_to_and() {
    let payload = r#"{"operator": "XOR", "conditions": []}"#;

    assert_eq!(
        decode_filter(Some(payload)),
        Some(FilterNode::and(Vec::new()))
    );
}

#[test]
fn missing_or_unknown_leaf_operator_defaults_to_eq() {
    for payload in [
        r#"{"propertyDefId": 50, "value": "Active"}"#,
        r#"{"propertyDefId": 50, "op": "BETWEEN", "value": "Active"}"#,
    ] {
        let Some(FilterNode::Property { op, .. }) = decode_filter(Some(payload)) else {
            panic!("expected a property leaf for {payload}");
        };
        assert_eq!(op, CompareOp::Eq, "payload {payload}");
    }
}

#[test]
fn sentinel_property_id_decodes_to_full_text_leaf() {
    let payload = r#"{"propertyDefId": 0, "value": "  contract renewal "}"#;

    assert_eq!(
        decode_filter(Some(payload)),
        Some(FilterNode::FullText {
            query: "contract renewal".to_string(),
        })
    );
}

#[test]
fn full_text_leaf_without_usable_query_is_dropped() {
    assert_eq!(decode_filter(Some(r#"{"propertyDefId": 0}"#)), None);
    assert_eq!(
        decode_filter(Some(r#"{"propertyDefId": 0, "value": "   "}"#)),
        None
    );
}

#[test]
fn link_leaves_decode_both_directions() {
    assert_eq!(
        decode_filter(Some(r#"{"linkRole": "Customer", "value": 42}"#)),
        Some(FilterNode::Link {
            role: "Customer".to_string(),
            target: ObjectId(42),
        })
    );
    assert_eq!(
        decode_filter(Some(r#"{"reverseLinkRole": "Supplier", "value": "7"}"#)),
        Some(FilterNode::ReverseLink {
            role: "Supplier".to_string(),
            source: ObjectId(7),
        })
    );
}

#[test]
fn link_leaf_without_numeric_endpoint_is_dropped() {
    assert_eq!(
        decode_filter(Some(r#"{"linkRole": "Customer", "value": "Acme Ltd"}"#)),
        None
    );
}

#[test]
fn unrecognized_nodes_are_dropped_inside_groups() {
    let payload = r#"[
        {"propertyDefId": 50, "value": "Active"},
        {"someFutureLeaf": true},
        ["nested", "garbage"]
    ]"#;

    let Some(FilterNode::Group { children, .. }) = decode_filter(Some(payload)) else {
        panic!("expected a group node");
    };
    // The garbage leaf vanishes; the nested array survives as an empty group.
    assert_eq!(children.len(), 2);
    assert_eq!(children[1], FilterNode::and(Vec::new()));
}

#[test]
fn non_scalar_property_values_decode_to_null() {
    let payload = r#"{"propertyDefId": 50, "value": {"nested": true}}"#;

    let Some(FilterNode::Property { value, .. }) = decode_filter(Some(payload)) else {
        panic!("expected a property leaf");
    };
    assert_eq!(value, FilterValue::Null);
}

#[test]
fn nested_groups_decode_recursively() {
    let payload = r#"{
        "operator": "AND",
        "conditions": [
            {"operator": "OR", "conditions": [
                {"propertyDefId": 50, "value": "Active"},
                {"propertyDefId": 0, "value": "contract"}
            ]},
            {"linkRole": "Customer", "value": 42}
        ]
    }"#;

    let Some(FilterNode::Group { op, children }) = decode_filter(Some(payload)) else {
        panic!("expected a group node");
    };
    assert_eq!(op, GroupOp::And);
    assert!(matches!(&children[0], FilterNode::Group { op: GroupOp::Or, children } if children.len() == 2));
    assert!(matches!(&children[1], FilterNode::Link { .. }));
}
