pub mod ports;


use crate::{
    acl,
    compile::{CompiledFilter, FilterCompiler},
    error::{Error, ErrorOrigin},
    filter::decode_filter,
    sql::{Param, ParamAllocator, PropertyJoins, Statement},
    types::{UserId, VersionId, VersionRecord, ViewId},
};
use std::collections::BTreeSet;
use tracing::debug;

// re-exports
pub use ports::{DatabasePort, FullTextIndex, MetadataPort, ViewStore};

///
/// ViewExecutor
///
/// Orchestrates one view execution: load → decode → compile → optional
/// full-text narrowing → base query → ACL narrowing → final fetch. Each
/// narrowing step short-circuits to an empty result; only port failures and a
/// missing view are errors. The two query phases (base query, ACL resolution)
/// are separate round-trips and are not atomic — a concurrent ACL edit
/// between them is an accepted eventual-consistency trade-off.
///

pub struct ViewExecutor<'a> {
    views: &'a dyn ViewStore,
    metadata: &'a dyn MetadataPort,
    db: &'a dyn DatabasePort,
    full_text: &'a dyn FullTextIndex,
}

impl<'a> ViewExecutor<'a> {
    #[must_use]
    pub const fn new(
        views: &'a dyn ViewStore,
        metadata: &'a dyn MetadataPort,
        db: &'a dyn DatabasePort,
        full_text: &'a dyn FullTextIndex,
    ) -> Self {
        Self {
            views,
            metadata,
            db,
            full_text,
        }
    }

    /// Execute a saved view for a user.
    ///
    /// Returns the version records matching the view's filter that the user is
    /// allowed to read, ordered by version id. Every narrowing step that comes
    /// up empty returns an empty list, never an error.
    pub fn execute(&self, view_id: ViewId, user_id: UserId) -> Result<Vec<VersionRecord>, Error> {
        // 1. Load the view.
        let view = self
            .views
            .view(view_id)
            .map_err(|err| Error::store(ErrorOrigin::View, err))?
            .ok_or_else(|| Error::view_not_found(view_id))?;

        // 2. Decode the persisted filter payload. An absent or unusable
        // payload selects nothing.
        let Some(filter) = decode_filter(view.filter.as_deref()) else {
            debug!(view = %view_id, "view has no usable filter; returning empty result");
            return Ok(Vec::new());
        };

        // 3. Readable-ACL set first: a user who can read nothing gets nothing,
        // and no further query is issued.
        let readable = acl::readable_acl_ids(self.db, user_id)
            .map_err(|err| Error::store(ErrorOrigin::Acl, err))?;
        if readable.is_empty() {
            debug!(view = %view_id, user = %user_id, "user has no readable ACLs");
            return Ok(Vec::new());
        }

        // 4. Compile the filter tree.
        let compiled = FilterCompiler::new(self.metadata).compile(&filter);
        if compiled.is_empty() {
            debug!(view = %view_id, "filter compiled to an empty selection");
            return Ok(Vec::new());
        }

        // 5. Free-text narrowing through the search collaborator.
        let text_ids = match &compiled.free_text {
            Some(query) => {
                let ids = self.full_text.find_matching_version_ids(query);
                if ids.is_empty() {
                    debug!(view = %view_id, query = %query, "no full-text matches");
                    return Ok(Vec::new());
                }
                Some(ids)
            }
            None => None,
        };

        // 6. Base query over the EAV store.
        let statement = base_statement(&compiled, text_ids.as_ref());
        debug!(view = %view_id, statement = %statement, "executing base query");
        let matched: BTreeSet<VersionId> = self
            .db
            .select_ids(&statement)
            .map_err(|err| Error::store(ErrorOrigin::Database, err))?
            .into_iter()
            .map(VersionId)
            .collect();
        if matched.is_empty() {
            debug!(view = %view_id, "base query matched no versions");
            return Ok(Vec::new());
        }

        // 7./8. ACL narrowing: effective ACLs for exactly the matched ids,
        // intersected with the user's readable set.
        let effective = acl::resolve_effective_acls(self.db, &matched)
            .map_err(|err| Error::store(ErrorOrigin::Acl, err))?;
        let allowed = acl::allowed_versions(&effective, &readable);
        if allowed.is_empty() {
            debug!(view = %view_id, user = %user_id, matched = matched.len(), "ACL narrowing removed all matches");
            return Ok(Vec::new());
        }

        // 9. Final fetch of the allowed version records.
        let records = self
            .db
            .select_versions(&fetch_statement(&allowed))
            .map_err(|err| Error::store(ErrorOrigin::Database, err))?;
        debug!(view = %view_id, user = %user_id, rows = records.len(), "view execution finished");

        Ok(records)
    }
}

/// Build the base query: distinct version ids, one property-value join per
/// required property id, constrained by the compiled condition and (when
/// present) the free-text id set.
fn base_statement(compiled: &CompiledFilter, text_ids: Option<&BTreeSet<VersionId>>) -> Statement {
    // Compiled params use the "p" prefix; joins and the id restriction use
    // their own, so the maps merge without collisions.
    let mut allocator = ParamAllocator::with_prefix("j");

    let mut sql = String::from(
        "SELECT DISTINCT v.id FROM version v JOIN object o ON o.id = v.object_id",
    );
    for property in &compiled.required_property_ids {
        let alias = PropertyJoins::alias_for(*property);
        let name = allocator.bind(Param::Integer(property.0));
        sql.push_str(&format!(
            " LEFT JOIN property_value {alias} ON {alias}.version_id = v.id \
             AND {alias}.property_def_id = :{name}"
        ));
    }

    let mut clauses: Vec<String> = Vec::new();
    if !compiled.condition_sql.is_empty() {
        clauses.push(compiled.condition_sql.clone());
    }
    if let Some(ids) = text_ids {
        clauses.push(format!("v.id IN ({})", bind_id_list(&mut allocator, ids)));
    }
    sql.push_str(" WHERE ");
    sql.push_str(&clauses.join(" AND "));

    let mut params = compiled.params.clone();
    params.extend(allocator.into_params());

    Statement::new(sql, params)
}

/// Build the final fetch of full version records, ordered by version id so a
/// fixed underlying data set always yields the same result order.
fn fetch_statement(ids: &BTreeSet<VersionId>) -> Statement {
    let mut allocator = ParamAllocator::with_prefix("f");
    let sql = format!(
        "SELECT v.id, v.object_id, v.title, v.created_at, v.acl_id \
         FROM version v WHERE v.id IN ({}) ORDER BY v.id",
        bind_id_list(&mut allocator, ids)
    );

    Statement::new(sql, allocator.into_params())
}

fn bind_id_list(allocator: &mut ParamAllocator, ids: &BTreeSet<VersionId>) -> String {
    let placeholders: Vec<String> = ids
        .iter()
        .map(|id| format!(":{}", allocator.bind(Param::Integer(id.0))))
        .collect();

    placeholders.join(", ")
}
