pub mod ast;
pub mod decode;
pub mod kind;

#[cfg(test)]
mod tests;

// re-exports
pub use ast::{CompareOp, FilterNode, FilterValue, GroupOp};
pub use decode::decode_filter;
pub use kind::ValueKind;
