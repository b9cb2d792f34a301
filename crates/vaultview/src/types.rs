use crate::filter::ValueKind;
use chrono::NaiveDateTime;
use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

///
/// Id newtypes
///
/// Every identifier flowing through the engine gets its own type so that a
/// version id can never be handed to an ACL lookup by accident. All ids are
/// plain database integers underneath.
///

macro_rules! id_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, Debug, Deserialize, Display, Eq, From, Hash, Ord, PartialEq,
            PartialOrd, Serialize,
        )]
        pub struct $name(pub i64);
    };
}

id_newtype!(ViewId);
id_newtype!(UserId);
id_newtype!(GroupId);
id_newtype!(VersionId);
id_newtype!(ObjectId);
id_newtype!(AclId);
id_newtype!(ValueListItemId);

id_newtype!(
    /// Identifier of a typed metadata field in the EAV model.
    ///
    /// Id `0` is reserved: persisted filter payloads use it as the sentinel
    /// for free-text leaves and it never names a real property definition.
    PropertyDefId
);

impl PropertyDefId {
    /// Sentinel id carried by free-text leaves in persisted payloads.
    pub const FULL_TEXT_SENTINEL: Self = Self(0);
}

///
/// OrderDirection
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum OrderDirection {
    Asc,
    Desc,
}

///
/// ViewDefinition
///
/// A saved, named filter definition over object versions. Created and edited
/// by administration surfaces elsewhere; the engine consumes it read-only and
/// never mutates the persisted filter payload.
///

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ViewDefinition {
    pub id: ViewId,
    pub name: String,
    pub owner: UserId,
    pub shared: bool,

    /// Persisted filter payload (JSON document), decoded at execution time.
    pub filter: Option<String>,

    pub sort_order: Vec<(PropertyDefId, OrderDirection)>,
    pub grouping: Vec<PropertyDefId>,
}

///
/// PropertyDefinition
///
/// Metadata for one EAV field, looked up through the metadata port when a
/// filter leaf does not declare its own data kind.
///

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PropertyDefinition {
    pub id: PropertyDefId,
    pub name: String,

    /// Declared storage kind, when the schema records one.
    pub kind: Option<ValueKind>,

    /// Multi-valued value-list property: values live in linking rows rather
    /// than the single typed slot on the property-value row.
    pub multi_select: bool,
}

///
/// VersionRecord
///
/// Immutable-per-id snapshot of an object's metadata at a point in time.
/// `acl_id` is the version's own ACL reference; the effective ACL may come
/// from further up the inheritance chain.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct VersionRecord {
    pub id: VersionId,
    pub object_id: ObjectId,
    pub title: String,
    pub created_at: NaiveDateTime,
    pub acl_id: Option<AclId>,
}
