//! Hierarchy and derived-union resolution for the modelgen code generator.
//!
//! Given a read-only [`TypeGraph`](modelgen_model::TypeGraph), this crate
//! answers the questions the emission layer asks about each type:
//!
//! - which attributes and associations are inherited, and which are
//!   overridden or redeclared ([`inheritance`])
//! - which of a type's compositions narrow an inherited derived union
//!   ([`derived_union`])
//! - which ancestor already emits association-handling code
//!   ([`Builder::nearest_ancestor_builder_with_associations`])
//!
//! All traversals go through the [`walker`], which is fused by a
//! [`RecursionGuard`] so a malformed model fails with
//! [`ResolveError::CyclicHierarchy`] instead of looping. Builders are created
//! lazily and exactly once per type by [`ModelNodeCache`].

pub mod builder;
pub mod cache;
pub mod derived_union;
pub mod error;
pub mod inheritance;
pub mod recursion;
pub mod settings;
pub mod walker;

pub use builder::{Builder, GeneratedNames};
pub use cache::ModelNodeCache;
pub use derived_union::{
    DerivedUnionSubsets, is_recursive_subset_of, nearest_ancestor_subset_of,
    subset_associations_of, subsetted_derived_unions,
};
pub use error::{ResolveError, ResolveResult};
pub use inheritance::{super_associations_by_name, super_attributes};
pub use recursion::{RecursionGuard, RecursionProfile, RecursionResult};
pub use settings::{GeneratorSettings, variable_name};
pub use walker::{
    HierarchyVisitor, WalkControl, WalkOutcome, ancestors, walk_hierarchy, walk_supertypes,
};

/// Insertion-ordered map with the Fx hasher.
pub type FxIndexMap<K, V> = indexmap::IndexMap<K, V, rustc_hash::FxBuildHasher>;
/// Insertion-ordered set with the Fx hasher.
pub type FxIndexSet<T> = indexmap::IndexSet<T, rustc_hash::FxBuildHasher>;

#[cfg(test)]
#[path = "../tests/fixtures.rs"]
pub(crate) mod fixtures;
