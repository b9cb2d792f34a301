use crate::{
    error::PortError,
    exec::ports::DatabasePort,
    sql::{Param, ParamAllocator, Statement},
    types::{AclId, UserId, VersionId},
};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

///
/// ACL resolution
///
/// A version's effective ACL is the first non-null reference walking
/// version → object → class → object-type. Both resolvers run fresh on every
/// execution — grants are never cached, so results always reflect the current
/// ACL state at the time their query runs.
///

/// Build the bulk effective-ACL statement for a set of version ids.
///
/// One round-trip resolves the whole inheritance chain with COALESCE; rows
/// whose chain is entirely null surface as a null ACL and are dropped by
/// [`resolve_effective_acls`].
#[must_use]
pub fn effective_acl_statement(ids: &BTreeSet<VersionId>) -> Statement {
    let mut allocator = ParamAllocator::with_prefix("a");
    let placeholders: Vec<String> = ids
        .iter()
        .map(|id| format!(":{}", allocator.bind(Param::Integer(id.0))))
        .collect();

    let sql = format!(
        "SELECT v.id, COALESCE(v.acl_id, o.acl_id, c.acl_id, t.acl_id) \
         FROM version v \
         JOIN object o ON o.id = v.object_id \
         LEFT JOIN class c ON c.id = o.class_id \
         LEFT JOIN object_type t ON t.id = o.object_type_id \
         WHERE v.id IN ({})",
        placeholders.join(", ")
    );

    Statement::new(sql, allocator.into_params())
}

/// Build the readable-ACL-set statement for one user.
///
/// An ACL is readable when an entry grants `can_read` to the user directly or
/// to any group the user belongs to. Role-based named permissions are not
/// part of this resolver.
#[must_use]
pub fn readable_acl_statement(user: UserId) -> Statement {
    let mut allocator = ParamAllocator::with_prefix("u");
    let direct = allocator.bind(Param::Integer(user.0));
    let via_group = allocator.bind(Param::Integer(user.0));

    let sql = format!(
        "SELECT DISTINCT e.acl_id \
         FROM acl_entry e \
         LEFT JOIN group_member gm ON gm.group_id = e.group_id \
         WHERE e.can_read = TRUE \
         AND (e.user_id = :{direct} OR gm.user_id = :{via_group})"
    );

    Statement::new(sql, allocator.into_params())
}

/// Resolve the effective ACL for each version id in `ids`.
///
/// Versions whose full inheritance chain yields no ACL are absent from the
/// returned map, which excludes them from any later intersection.
pub fn resolve_effective_acls(
    db: &dyn DatabasePort,
    ids: &BTreeSet<VersionId>,
) -> Result<BTreeMap<VersionId, AclId>, PortError> {
    if ids.is_empty() {
        return Ok(BTreeMap::new());
    }

    let rows = db.select_id_pairs(&effective_acl_statement(ids))?;
    let resolved: BTreeMap<VersionId, AclId> = rows
        .into_iter()
        .filter_map(|(version, acl)| acl.map(|acl| (VersionId(version), AclId(acl))))
        .collect();

    debug!(
        requested = ids.len(),
        resolved = resolved.len(),
        "resolved effective ACLs"
    );

    Ok(resolved)
}

/// Resolve the set of ACL ids the user may read.
pub fn readable_acl_ids(
    db: &dyn DatabasePort,
    user: UserId,
) -> Result<BTreeSet<AclId>, PortError> {
    let ids = db.select_ids(&readable_acl_statement(user))?;

    Ok(ids.into_iter().map(AclId).collect())
}

/// Intersect: the versions whose effective ACL the user may read.
#[must_use]
pub fn allowed_versions(
    effective: &BTreeMap<VersionId, AclId>,
    readable: &BTreeSet<AclId>,
) -> BTreeSet<VersionId> {
    effective
        .iter()
        .filter(|(_, acl)| readable.contains(acl))
        .map(|(version, _)| *version)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effective_acl_statement_walks_the_inheritance_chain() {
        let ids = BTreeSet::from([VersionId(10), VersionId(11)]);
        let statement = effective_acl_statement(&ids);

        assert!(
            statement
                .sql
                .contains("COALESCE(v.acl_id, o.acl_id, c.acl_id, t.acl_id)")
        );
        assert!(statement.sql.ends_with("WHERE v.id IN (:a0, :a1)"));
        assert_eq!(statement.params.get("a0"), Some(&Param::Integer(10)));
        assert_eq!(statement.params.get("a1"), Some(&Param::Integer(11)));
    }

    #[test]
    fn readable_acl_statement_covers_direct_and_group_grants() {
        let statement = readable_acl_statement(UserId(5));

        assert!(statement.sql.contains("e.can_read = TRUE"));
        assert!(statement.sql.contains("e.user_id = :u0"));
        assert!(statement.sql.contains("gm.user_id = :u1"));
        assert_eq!(statement.params.get("u0"), Some(&Param::Integer(5)));
        assert_eq!(statement.params.get("u1"), Some(&Param::Integer(5)));
    }

    #[test]
    fn allowed_versions_intersects_effective_with_readable() {
        let effective = BTreeMap::from([
            (VersionId(10), AclId(7)),
            (VersionId(11), AclId(8)),
            (VersionId(12), AclId(7)),
        ]);
        let readable = BTreeSet::from([AclId(7)]);

        assert_eq!(
            allowed_versions(&effective, &readable),
            BTreeSet::from([VersionId(10), VersionId(12)])
        );
    }
}
