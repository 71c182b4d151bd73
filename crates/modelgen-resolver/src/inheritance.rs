//! Inherited attribute and association views.
//!
//! Each view is folded over the supertype chain from the root down, one level
//! per step, so chain length costs heap and not stack. Both depend only on
//! the (immutable) graph; repeated calls give identical results.

use crate::error::ResolveResult;
use crate::walker::ancestors;
use crate::{FxIndexMap, FxIndexSet};
use modelgen_model::{AssociationId, AttributeId, TypeGraph, TypeId};
use smallvec::SmallVec;
use std::iter;
use tracing::trace;

/// Attributes `ty` inherits and does not override.
///
/// Empty for a root type. Otherwise the supertype's own attributes, then the
/// supertype's own inherited set, minus every attribute that one of `ty`'s
/// own attributes overrides.
pub fn super_attributes(
    graph: &TypeGraph,
    ty: TypeId,
) -> ResolveResult<FxIndexSet<AttributeId>> {
    let mut inherited: FxIndexSet<AttributeId> = FxIndexSet::default();
    for (level, supertype) in root_first_links(graph, ty)? {
        let mut next: FxIndexSet<AttributeId> =
            graph.type_data(supertype).attributes.iter().copied().collect();
        next.extend(inherited);
        inherited = next;
        drop_overridden(graph, level, &mut inherited);
    }
    Ok(inherited)
}

/// Inherited associations keyed by name that `ty` does not redeclare.
///
/// The supertype's own map, overlaid with the supertype's own associations,
/// minus every name that `ty` declares itself.
pub fn super_associations_by_name(
    graph: &TypeGraph,
    ty: TypeId,
) -> ResolveResult<FxIndexMap<String, AssociationId>> {
    let mut by_name: FxIndexMap<String, AssociationId> = FxIndexMap::default();
    for (level, supertype) in root_first_links(graph, ty)? {
        for &assoc in &graph.type_data(supertype).associations {
            by_name.insert(graph.association(assoc).name.clone(), assoc);
        }
        for &own in &graph.type_data(level).associations {
            by_name.shift_remove(graph.association(own).name.as_str());
        }
    }
    Ok(by_name)
}

/// `(subtype, supertype)` pairs of `ty`'s chain, from the link below the root
/// down to `(ty, supertype of ty)`.
fn root_first_links(
    graph: &TypeGraph,
    ty: TypeId,
) -> ResolveResult<SmallVec<[(TypeId, TypeId); 8]>> {
    let chain = ancestors(graph, ty)?;
    let mut links: SmallVec<[(TypeId, TypeId); 8]> = iter::once(ty)
        .chain(chain.iter().copied())
        .zip(chain.iter().copied())
        .collect();
    links.reverse();
    Ok(links)
}

fn drop_overridden(graph: &TypeGraph, ty: TypeId, inherited: &mut FxIndexSet<AttributeId>) {
    for &own in &graph.type_data(ty).attributes {
        if let Some(overridden) = graph.attribute(own).overrides {
            if inherited.shift_remove(&overridden) {
                trace!(
                    attribute = %graph.qualified_attribute_name(own),
                    overridden = %graph.qualified_attribute_name(overridden),
                    "super_attributes: dropped overridden attribute"
                );
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/inheritance_tests.rs"]
mod inheritance_tests;
