//! Derived-union subset resolution.
//!
//! A derived union is a master-to-detail composition flagged
//! `is_derived_union`, declared on a master type. Its inverse is the
//! detail-to-master composition declared on the child side (the union's
//! declaring type in the child hierarchy). Subtypes of that child type narrow
//! the union with their own detail-to-master compositions, either directly
//! (the inverse master-to-detail `subset_of` the union, possibly through
//! chained unions), by redeclaring the parent link under the same name, or
//! through a shared association whose host is the union's inverse.
//!
//! Association-level problems (missing inverse, dangling or cyclic
//! `subset_of`, unresolved shared host) are pushed as diagnostics and the offending
//! association is skipped. Only the union itself lacking an inverse, or a
//! cyclic hierarchy, is returned as an error.

use crate::error::{ResolveError, ResolveResult};
use crate::recursion::{RecursionGuard, RecursionProfile, RecursionResult};
use crate::walker::{WalkControl, walk_supertypes};
use modelgen_common::{Diagnostic, diagnostic_codes};
use modelgen_model::{AssociationId, TypeGraph, TypeId};
use rustc_hash::FxHashSet;
use serde::Serialize;
use smallvec::SmallVec;
use tracing::{debug, trace};

/// A derived union together with the associations of one type that narrow it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedUnionSubsets {
    /// The master-to-detail derived union.
    pub union: AssociationId,
    /// The union's detail-to-master inverse on the child side.
    pub union_inverse: AssociationId,
    /// Own detail-to-master compositions of the type that narrow the union.
    pub subsets: Vec<AssociationId>,
}

/// Whether an ancestor of `candidate` already implements a subset of `union`.
///
/// The search begins at `candidate`'s immediate supertype and ends, without
/// a match, at the type that declares `union`'s inverse. First match wins.
pub fn nearest_ancestor_subset_of(
    graph: &TypeGraph,
    union: AssociationId,
    candidate: TypeId,
    diagnostics: &mut Vec<Diagnostic>,
) -> ResolveResult<bool> {
    let union_inverse = union_inverse(graph, union)?;
    let declaring_type = graph.association(union_inverse).owner;

    let mut found = false;
    let mut scan = |graph: &TypeGraph, ty: TypeId| {
        if ty == declaring_type {
            return WalkControl::Stop;
        }
        for assoc_id in own_detail_to_master(graph, ty) {
            if assoc_id == union_inverse {
                continue;
            }
            let assoc = graph.association(assoc_id);
            if assoc.is_shared() {
                match assoc.shared_host() {
                    Some(host) if host == union_inverse || host == union => {
                        found = true;
                    }
                    Some(_) => {}
                    None => diagnostics.push(missing_shared_host(graph, assoc_id)),
                }
            } else {
                match assoc.inverse() {
                    Some(master_to_detail) => {
                        let inverse = graph.association(master_to_detail);
                        found = !inverse.is_derived_union && inverse.subset_of == Some(union);
                    }
                    None => diagnostics.push(missing_inverse(graph, assoc_id)),
                }
            }
            if found {
                trace!(
                    union = %graph.qualified_association_name(union),
                    subset = %graph.qualified_association_name(assoc_id),
                    "nearest_ancestor_subset_of: found"
                );
                return WalkControl::Stop;
            }
        }
        WalkControl::Continue
    };
    walk_supertypes(graph, candidate, &mut scan)?;

    Ok(found)
}

/// Own detail-to-master compositions of `ty` that narrow `union`.
///
/// Collects every match; an empty result is valid (no subtype narrows the
/// union yet).
pub fn subset_associations_of(
    graph: &TypeGraph,
    union: AssociationId,
    ty: TypeId,
    diagnostics: &mut Vec<Diagnostic>,
) -> ResolveResult<Vec<AssociationId>> {
    let union_inverse = union_inverse(graph, union)?;
    let union_inverse_name = graph.association(union_inverse).name.as_str();
    if !graph.contains_type(ty) {
        return Err(ResolveError::UnknownType(ty));
    }
    if !graph.association(union).is_derived_union {
        debug!(
            union = %graph.qualified_association_name(union),
            "subset_associations_of: association is not flagged as derived union"
        );
    }

    let mut subsets = Vec::new();
    for detail_to_master in own_detail_to_master(graph, ty) {
        if detail_to_master == union_inverse {
            continue;
        }
        let assoc = graph.association(detail_to_master);

        if assoc.is_shared() {
            if assoc.shared_host().is_none() {
                diagnostics.push(missing_shared_host(graph, detail_to_master));
                continue;
            }
            if assoc.name == union_inverse_name
                && !nearest_ancestor_subset_of(graph, union, ty, diagnostics)?
            {
                subsets.push(detail_to_master);
            }
            continue;
        }

        let Some(inverse_id) = assoc.inverse() else {
            diagnostics.push(missing_inverse(graph, detail_to_master));
            continue;
        };
        // A union never subsets another union from the detail side.
        if graph.association(inverse_id).is_derived_union {
            continue;
        }
        if assoc.name == union_inverse_name
            || is_recursive_subset_of(graph, inverse_id, union, diagnostics)
        {
            subsets.push(detail_to_master);
        }
    }

    trace!(
        union = %graph.qualified_association_name(union),
        type_name = %graph.type_name(ty),
        count = subsets.len(),
        "subset_associations_of"
    );
    Ok(subsets)
}

/// Whether `association`'s `subset_of` reaches `union`, directly or through
/// chained derived unions.
///
/// A `subset_of` that points at a non-union is reported as a dangling
/// reference and ends the chain. So does a chain that runs back into a union
/// it already passed.
pub fn is_recursive_subset_of(
    graph: &TypeGraph,
    association: AssociationId,
    union: AssociationId,
    diagnostics: &mut Vec<Diagnostic>,
) -> bool {
    let mut guard = RecursionGuard::with_profile(RecursionProfile::SubsetChain);
    let mut path: SmallVec<[AssociationId; 4]> = SmallVec::new();

    let mut from = association;
    let mut next = graph.get_association(association).and_then(|a| a.subset_of);
    let reached = loop {
        let Some(target) = next else {
            break false;
        };
        match guard.enter(target) {
            RecursionResult::Entered => path.push(target),
            RecursionResult::Cycle => {
                debug!(
                    association = %graph.qualified_association_name(from),
                    revisited = %graph.qualified_association_name(target),
                    "is_recursive_subset_of: cyclic subset chain"
                );
                diagnostics.push(cyclic_subset_chain(graph, from, target));
                break false;
            }
            exceeded => {
                debug!(
                    association = %graph.qualified_association_name(association),
                    ?exceeded,
                    "is_recursive_subset_of: chain too long"
                );
                break false;
            }
        }

        let target_assoc = graph.association(target);
        if !target_assoc.is_derived_union {
            diagnostics.push(ResolveError::dangling_subset(graph, from, target).to_diagnostic());
            break false;
        }
        if target == union {
            break true;
        }
        from = target;
        next = target_assoc.subset_of;
    };

    for key in path {
        guard.leave(key);
    }
    reached
}

/// Derived unions inherited by `ty` that its own compositions narrow.
///
/// Unions are discovered from the detail-to-master compositions declared on
/// `ty`'s ancestors whose inverse is a derived union, nearest ancestor first.
/// Unions with no subset on `ty` are omitted.
pub fn subsetted_derived_unions(
    graph: &TypeGraph,
    ty: TypeId,
    diagnostics: &mut Vec<Diagnostic>,
) -> ResolveResult<Vec<DerivedUnionSubsets>> {
    let mut candidates: Vec<(AssociationId, AssociationId)> = Vec::new();
    let mut seen = FxHashSet::default();

    let mut collect = |graph: &TypeGraph, ancestor: TypeId| {
        for detail_to_master in own_detail_to_master(graph, ancestor) {
            let assoc = graph.association(detail_to_master);
            if assoc.is_shared() {
                continue;
            }
            let Some(union) = assoc.inverse() else {
                diagnostics.push(missing_inverse(graph, detail_to_master));
                continue;
            };
            if graph.association(union).is_derived_union && seen.insert(union) {
                candidates.push((union, detail_to_master));
            }
        }
        WalkControl::Continue
    };
    walk_supertypes(graph, ty, &mut collect)?;

    let mut result = Vec::new();
    for (union, union_inverse) in candidates {
        let subsets = subset_associations_of(graph, union, ty, diagnostics)?;
        if !subsets.is_empty() {
            result.push(DerivedUnionSubsets {
                union,
                union_inverse,
                subsets,
            });
        }
    }
    Ok(result)
}

fn union_inverse(graph: &TypeGraph, union: AssociationId) -> ResolveResult<AssociationId> {
    let assoc = graph
        .get_association(union)
        .ok_or(ResolveError::UnknownAssociation(union))?;
    assoc
        .inverse()
        .ok_or_else(|| ResolveError::missing_inverse(graph, union))
}

fn own_detail_to_master(
    graph: &TypeGraph,
    ty: TypeId,
) -> impl Iterator<Item = AssociationId> + '_ {
    graph
        .type_data(ty)
        .associations
        .iter()
        .copied()
        .filter(|&id| graph.association(id).is_composition_detail_to_master())
}

fn missing_inverse(graph: &TypeGraph, association: AssociationId) -> Diagnostic {
    ResolveError::missing_inverse(graph, association).to_diagnostic()
}

fn cyclic_subset_chain(graph: &TypeGraph, from: AssociationId, to: AssociationId) -> Diagnostic {
    let (from, to) = (
        graph.qualified_association_name(from),
        graph.qualified_association_name(to),
    );
    Diagnostic::from_code(
        from.as_str(),
        diagnostic_codes::CYCLIC_SUBSET_CHAIN,
        &[from.as_str(), to.as_str()],
    )
    .with_related(to.as_str(), "subset chain continues here")
}

fn missing_shared_host(graph: &TypeGraph, association: AssociationId) -> Diagnostic {
    let name = graph.qualified_association_name(association);
    Diagnostic::from_code(
        name.as_str(),
        diagnostic_codes::MISSING_SHARED_HOST,
        &[name.as_str()],
    )
}

#[cfg(test)]
#[path = "../tests/derived_union_tests.rs"]
mod derived_union_tests;
