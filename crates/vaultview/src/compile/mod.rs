mod link;
mod property;


use crate::{
    exec::ports::MetadataPort,
    filter::FilterNode,
    sql::{Param, ParamAllocator, PropertyJoins},
    types::PropertyDefId,
};
use link::LinkDirection;
use std::collections::{BTreeMap, BTreeSet};
use tracing::warn;

///
/// Filter compiler
///
/// Pure recursive walk over the filter tree. Produces the boolean condition
/// fragment for the base query, the merged parameter map, the set of property
/// definition ids that need a property-value join, and at most one free-text
/// term. The input tree is never mutated.
///

///
/// CompiledFilter
///

#[derive(Clone, Debug, PartialEq)]
pub struct CompiledFilter {
    /// Boolean SQL fragment; empty when the tree contributes no condition.
    pub condition_sql: String,

    pub params: BTreeMap<String, Param>,

    /// Distinct property ids needing a property-value join — exactly one join
    /// per id, shared by every leaf on that id.
    pub required_property_ids: BTreeSet<PropertyDefId>,

    /// Free-text term extracted from the tree, resolved outside SQL.
    pub free_text: Option<String>,
}

impl CompiledFilter {
    /// True when the compiled tree selects nothing at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.condition_sql.is_empty() && self.free_text.is_none()
    }
}

///
/// FilterCompiler
///

pub struct FilterCompiler<'a> {
    metadata: &'a dyn MetadataPort,
}

impl<'a> FilterCompiler<'a> {
    #[must_use]
    pub const fn new(metadata: &'a dyn MetadataPort) -> Self {
        Self { metadata }
    }

    #[must_use]
    pub fn compile(&self, root: &FilterNode) -> CompiledFilter {
        let mut cx = Compilation::default();
        let condition_sql = self.compile_node(root, &mut cx);

        CompiledFilter {
            condition_sql,
            params: cx.allocator.into_params(),
            required_property_ids: cx.joins.into_ids(),
            free_text: cx.free_text,
        }
    }

    fn compile_node(&self, node: &FilterNode, cx: &mut Compilation) -> String {
        match node {
            FilterNode::Group { op, children } => {
                let parts: Vec<String> = children
                    .iter()
                    .map(|child| self.compile_node(child, cx))
                    .filter(|sql| !sql.is_empty())
                    .collect();

                match parts.as_slice() {
                    [] => String::new(),
                    [only] => only.clone(),
                    _ => format!("({})", parts.join(&format!(" {} ", op.sql_keyword()))),
                }
            }

            FilterNode::Property {
                property,
                op,
                value,
                declared_kind,
            } => property::build(
                self.metadata,
                &mut cx.joins,
                &mut cx.allocator,
                *property,
                *op,
                declared_kind.as_deref(),
                value,
            ),

            FilterNode::Link { role, target } => {
                link::build(&mut cx.allocator, LinkDirection::Forward, role, *target)
            }

            FilterNode::ReverseLink { role, source } => {
                link::build(&mut cx.allocator, LinkDirection::Reverse, role, *source)
            }

            // Free-text leaves emit no SQL; the first term encountered wins
            // and later ones are ignored so the "at most one term" contract
            // stays deterministic.
            FilterNode::FullText { query } => {
                if cx.free_text.is_none() {
                    cx.free_text = Some(query.clone());
                } else {
                    warn!(ignored = %query, "multiple full-text leaves; keeping the first");
                }

                String::new()
            }
        }
    }
}

///
/// Compilation
/// Accumulator threaded through one compile pass.
///

#[derive(Debug, Default)]
struct Compilation {
    allocator: ParamAllocator,
    joins: PropertyJoins,
    free_text: Option<String>,
}
