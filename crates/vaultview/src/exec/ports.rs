use crate::{
    error::PortError,
    sql::Statement,
    types::{
        PropertyDefId, PropertyDefinition, ValueListItemId, VersionId, VersionRecord,
        ViewDefinition, ViewId,
    },
};
use std::collections::BTreeSet;

///
/// Collaborator ports
///
/// The engine builds every statement itself and only hands finished,
/// parameterized SQL across these boundaries. Ports hold the transactional
/// scope, connection pooling, and retry policy; the engine holds none.
///

///
/// DatabasePort
///
/// Executes engine-built statements. Any failure is fatal for the execution
/// that issued it — the engine never retries.
///

pub trait DatabasePort {
    /// Run a statement whose result is a single integer-id column.
    fn select_ids(&self, statement: &Statement) -> Result<Vec<i64>, PortError>;

    /// Run a statement whose result is `(id, nullable id)` rows.
    fn select_id_pairs(&self, statement: &Statement) -> Result<Vec<(i64, Option<i64>)>, PortError>;

    /// Run a statement whose result is full version records.
    fn select_versions(&self, statement: &Statement) -> Result<Vec<VersionRecord>, PortError>;
}

///
/// ViewStore
///

pub trait ViewStore {
    /// Load a saved view definition by id.
    fn view(&self, id: ViewId) -> Result<Option<ViewDefinition>, PortError>;
}

///
/// MetadataPort
///
/// Property-definition and value-list lookups consulted during compilation.
/// Lookups are infallible by contract: an unknown id simply returns `None`
/// and the affected leaf degrades per the compilation rules.
///

pub trait MetadataPort {
    /// Look up a property definition (declared kind, multi-select flag).
    fn property(&self, id: PropertyDefId) -> Option<PropertyDefinition>;

    /// Resolve a textual value-list label to its item id.
    fn value_list_item_id(&self, property: PropertyDefId, label: &str) -> Option<ValueListItemId>;
}

///
/// FullTextIndex
///
/// Free-text search over the per-version searchable text cache. Infallible by
/// contract: implementations log and swallow internal failures, returning an
/// empty set.
///

pub trait FullTextIndex {
    fn find_matching_version_ids(&self, query: &str) -> BTreeSet<VersionId>;
}
