use crate::{
    sql::{Param, ParamAllocator},
    types::ObjectId,
};

///
/// Relationship predicate builder
///
/// Link leaves are existence checks over the directed link table; they never
/// materialize linked objects into results and need no property-value joins.
/// Each leaf binds two fresh parameters (role, endpoint id) so that several
/// relationship leaves in one tree cannot collide.
///

///
/// LinkDirection
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) enum LinkDirection {
    /// This object links out via the role to the given target.
    Forward,

    /// This object is linked to by the given source via the role.
    Reverse,
}

pub(super) fn build(
    allocator: &mut ParamAllocator,
    direction: LinkDirection,
    role: &str,
    endpoint: ObjectId,
) -> String {
    let role_name = allocator.bind(Param::Text(role.to_string()));
    let endpoint_name = allocator.bind(Param::Integer(endpoint.0));

    let (anchor_column, endpoint_column) = match direction {
        LinkDirection::Forward => ("source_object_id", "target_object_id"),
        LinkDirection::Reverse => ("target_object_id", "source_object_id"),
    };

    format!(
        "EXISTS (SELECT 1 FROM object_link lnk \
         WHERE lnk.{anchor_column} = o.id \
         AND LOWER(lnk.role) = LOWER(:{role_name}) \
         AND lnk.{endpoint_column} = :{endpoint_name})"
    )
}
