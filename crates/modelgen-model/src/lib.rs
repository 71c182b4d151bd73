//! Type graph data model for the modelgen code generator.
//!
//! Business types (policy and product component classes) form a
//! single-inheritance hierarchy. This crate stores them in an arena:
//!
//! - `TypeData` nodes with a non-owning `supertype` id
//! - `Attribute` nodes, optionally overriding an ancestor's attribute
//! - `Association` nodes whose kind-specific links (`inverse`, shared host)
//!   live inside [`AssociationKind`]
//!
//! The graph is built once by a model loader and then shared read-only by
//! the resolver for the duration of a generation run.

mod graph;
mod hierarchy_check;
mod ids;

pub use graph::{
    Association, AssociationKind, Attribute, GraphError, Sharing, TypeData, TypeGraph,
};
pub use hierarchy_check::HierarchyCycle;
pub use ids::{AssociationId, AttributeId, TypeId};
