//! Static resource schema for the Merx back office.
//!
//! Every view in the console is driven by this catalog: which resources
//! exist, which realm serves them, their fields, and how role resources
//! join to their permission lists. Nothing mutates the catalog at runtime.

pub mod field;
pub mod registry;
pub mod resource;

pub use field::{FieldKind, FieldSpec};
pub use resource::{Action, ActionPermissions, JoinSpec, ResourceSpec};
