//! Saved-view execution engine over a versioned EAV repository.
//!
//! A view is a persisted, composable filter over object versions: property
//! comparisons, relationship existence checks, and an optional free-text
//! term. Executing one compiles the filter tree into a parameterized query
//! over the EAV store, narrows the matches through an external full-text
//! index, and intersects the result with the user's inheritance-resolved
//! ACL set so that no version the user cannot read is ever returned.
//!
//! ## Crate layout
//! - `filter`: closed filter AST, payload decoding, value-kind resolution.
//! - `sql`: parameterized statement building blocks.
//! - `compile`: filter tree → condition fragment + params + join set.
//! - `acl`: ACL inheritance and readable-set resolution.
//! - `exec`: the view executor and its collaborator ports.
#![warn(unreachable_pub)]

pub mod acl;
pub mod compile;
pub mod error;
pub mod exec;
pub mod filter;
pub mod sql;
pub mod types;

// re-exports
pub use compile::{CompiledFilter, FilterCompiler};
pub use error::{Error, ErrorKind, ErrorOrigin, PortError};
pub use exec::{DatabasePort, FullTextIndex, MetadataPort, ViewExecutor, ViewStore};
pub use filter::{FilterNode, ValueKind, decode_filter};
pub use sql::{Param, Statement};
pub use types::{
    AclId, GroupId, ObjectId, PropertyDefId, PropertyDefinition, UserId, ValueListItemId,
    VersionId, VersionRecord, ViewDefinition, ViewId,
};

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
