//! Generation-facing wrapper around one model type.
//!
//! A `Builder` is created once per type by [`ModelNodeCache`] and never
//! changes afterwards. Construction resolves every derived view the emission
//! layer reads: inherited attributes and associations, derived-union subsets
//! and the link to the supertype's builder.

use crate::cache::ModelNodeCache;
use crate::derived_union::{DerivedUnionSubsets, subsetted_derived_unions};
use crate::error::{ResolveError, ResolveResult};
use crate::inheritance::{super_associations_by_name, super_attributes};
use crate::settings::variable_name;
use crate::{FxIndexMap, FxIndexSet};
use modelgen_common::Diagnostic;
use modelgen_model::{AssociationId, AttributeId, TypeGraph, TypeId};
use std::sync::Arc;
use tracing::debug;

/// Names the templates use for the code generated from one type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedNames {
    pub class_name: String,
    /// Set only when published interfaces are generated.
    pub interface_name: Option<String>,
    pub builder_class_name: String,
    pub variable_name: String,
}

#[derive(Debug)]
pub struct Builder {
    source_type: TypeId,
    name: String,
    own_attributes: Vec<AttributeId>,
    own_associations: Vec<AssociationId>,
    super_attributes: FxIndexSet<AttributeId>,
    super_associations_by_name: FxIndexMap<String, AssociationId>,
    derived_union_subsets: Vec<DerivedUnionSubsets>,
    supertype_builder: Option<Arc<Builder>>,
    names: GeneratedNames,
    is_published_interface: bool,
}

impl Builder {
    /// Resolve the builder for `ty`, taking the supertype's builder from
    /// `cache`. The cache builds ancestors first, so that lookup is a hit.
    /// Association-level problems are returned as diagnostics.
    pub(crate) fn build(
        cache: &ModelNodeCache,
        ty: TypeId,
    ) -> ResolveResult<(Builder, Vec<Diagnostic>)> {
        let graph = cache.graph();
        let settings = cache.settings();
        let data = graph.get_type(ty).ok_or(ResolveError::UnknownType(ty))?;
        debug!(type_name = %data.name, "Builder::build");

        let supertype_builder = match data.supertype {
            Some(supertype) => Some(cache.builder_for(supertype)?),
            None => None,
        };

        let mut diagnostics = unpaired_compositions(graph, ty);
        let super_attributes = super_attributes(graph, ty)?;
        let super_associations_by_name = super_associations_by_name(graph, ty)?;
        let derived_union_subsets = subsetted_derived_unions(graph, ty, &mut diagnostics)?;

        let names = GeneratedNames {
            class_name: settings.class_name(&data.name),
            interface_name: settings.interface_name(&data.name),
            builder_class_name: settings.builder_class_name(&data.name),
            variable_name: variable_name(&data.name),
        };

        let builder = Builder {
            source_type: ty,
            name: data.name.clone(),
            own_attributes: data.attributes.clone(),
            own_associations: data.associations.clone(),
            super_attributes,
            super_associations_by_name,
            derived_union_subsets,
            supertype_builder,
            names,
            is_published_interface: settings.published_interfaces,
        };
        Ok((builder, diagnostics))
    }

    pub fn source_type(&self) -> TypeId {
        self.source_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn own_attributes(&self) -> &[AttributeId] {
        &self.own_attributes
    }

    pub fn own_associations(&self) -> &[AssociationId] {
        &self.own_associations
    }

    /// Inherited, non-overridden attributes.
    pub fn super_attributes(&self) -> &FxIndexSet<AttributeId> {
        &self.super_attributes
    }

    /// Inherited associations this type does not redeclare, keyed by name.
    pub fn super_associations_by_name(&self) -> &FxIndexMap<String, AssociationId> {
        &self.super_associations_by_name
    }

    /// Derived unions narrowed by this type's own compositions.
    pub fn derived_union_subsets(&self) -> &[DerivedUnionSubsets] {
        &self.derived_union_subsets
    }

    pub fn supertype_builder(&self) -> Option<&Arc<Builder>> {
        self.supertype_builder.as_ref()
    }

    /// The nearest ancestor builder that declares at least one association.
    ///
    /// Ancestors without associations are skipped; `None` when no ancestor
    /// declares any.
    pub fn nearest_ancestor_builder_with_associations(&self) -> Option<&Arc<Builder>> {
        let mut current = self.supertype_builder.as_ref();
        while let Some(builder) = current {
            if !builder.own_associations.is_empty() {
                return Some(builder);
            }
            current = builder.supertype_builder.as_ref();
        }
        None
    }

    /// Whether association-handling code already exists higher up the
    /// hierarchy and must be reused instead of emitted again.
    pub fn has_ancestor_association_builder(&self) -> bool {
        self.nearest_ancestor_builder_with_associations().is_some()
    }

    pub fn is_published_interface(&self) -> bool {
        self.is_published_interface
    }

    pub fn names(&self) -> &GeneratedNames {
        &self.names
    }
}

/// `MG2001` for each own composition of `ty` with no inverse. Shared
/// detail-to-master links are paired through their host instead.
fn unpaired_compositions(graph: &TypeGraph, ty: TypeId) -> Vec<Diagnostic> {
    graph
        .type_data(ty)
        .associations
        .iter()
        .copied()
        .filter(|&id| {
            let assoc = graph.association(id);
            assoc.kind.is_composition() && !assoc.is_shared() && assoc.inverse().is_none()
        })
        .map(|id| ResolveError::missing_inverse(graph, id).to_diagnostic())
        .collect()
}

#[cfg(test)]
#[path = "../tests/builder_tests.rs"]
mod builder_tests;
