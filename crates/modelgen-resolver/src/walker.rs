//! Top-down traversal of a single-inheritance chain.
//!
//! The walker visits a type and then its ancestors (self, supertype,
//! supertype's supertype, ...) until the chain ends or the visitor asks to
//! stop. The acyclic invariant is normally established up front by
//! [`TypeGraph::check_hierarchy`], but the walker never trusts it: every
//! traversal is fused by a [`RecursionGuard`] and fails with
//! [`ResolveError::CyclicHierarchy`] when a type comes around again. The
//! guard is sized from the graph, so chain length alone never fails a walk.

use crate::error::{ResolveError, ResolveResult};
use crate::recursion::{RecursionGuard, RecursionProfile, RecursionResult};
use modelgen_model::{TypeGraph, TypeId};
use smallvec::SmallVec;
use tracing::{trace, warn};

/// Visitor verdict for one visited type.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WalkControl {
    /// Move on to the next ancestor.
    Continue,
    /// Stop immediately; no further ancestor is visited.
    Stop,
}

impl From<bool> for WalkControl {
    /// `true` means continue.
    fn from(keep_going: bool) -> Self {
        if keep_going { Self::Continue } else { Self::Stop }
    }
}

/// How a traversal ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WalkOutcome {
    /// The root of the chain was reached.
    Exhausted,
    /// The visitor stopped at this type (which was visited).
    Stopped(TypeId),
}

impl WalkOutcome {
    pub fn stopped_at(self) -> Option<TypeId> {
        match self {
            Self::Stopped(ty) => Some(ty),
            Self::Exhausted => None,
        }
    }
}

/// Per-type callback of a hierarchy walk.
pub trait HierarchyVisitor {
    fn visit(&mut self, graph: &TypeGraph, ty: TypeId) -> WalkControl;
}

impl<F> HierarchyVisitor for F
where
    F: FnMut(&TypeGraph, TypeId) -> WalkControl,
{
    fn visit(&mut self, graph: &TypeGraph, ty: TypeId) -> WalkControl {
        self(graph, ty)
    }
}

/// Visit `start` and then each of its ancestors.
pub fn walk_hierarchy<V>(
    graph: &TypeGraph,
    start: TypeId,
    visitor: &mut V,
) -> ResolveResult<WalkOutcome>
where
    V: HierarchyVisitor + ?Sized,
{
    if !graph.contains_type(start) {
        return Err(ResolveError::UnknownType(start));
    }
    walk_chain(graph, start, visitor)
}

/// Visit the ancestors of `start`, beginning at its immediate supertype.
///
/// `start` itself is not visited, but it still counts for cycle detection.
pub fn walk_supertypes<V>(
    graph: &TypeGraph,
    start: TypeId,
    visitor: &mut V,
) -> ResolveResult<WalkOutcome>
where
    V: HierarchyVisitor + ?Sized,
{
    if !graph.contains_type(start) {
        return Err(ResolveError::UnknownType(start));
    }
    let mut skip_start = |graph: &TypeGraph, ty: TypeId| {
        if ty == start {
            WalkControl::Continue
        } else {
            visitor.visit(graph, ty)
        }
    };
    walk_chain(graph, start, &mut skip_start)
}

/// Ancestors of `ty`, nearest first, excluding `ty` itself.
pub fn ancestors(graph: &TypeGraph, ty: TypeId) -> ResolveResult<SmallVec<[TypeId; 8]>> {
    let mut chain = SmallVec::new();
    walk_supertypes(graph, ty, &mut |_: &TypeGraph, ancestor: TypeId| {
        chain.push(ancestor);
        WalkControl::Continue
    })?;
    Ok(chain)
}

fn walk_chain<V>(
    graph: &TypeGraph,
    origin: TypeId,
    visitor: &mut V,
) -> ResolveResult<WalkOutcome>
where
    V: HierarchyVisitor + ?Sized,
{
    let types = u32::try_from(graph.type_count()).unwrap_or(u32::MAX);
    let mut guard = RecursionGuard::with_profile(RecursionProfile::HierarchyWalk { types });
    let mut path: SmallVec<[TypeId; 8]> = SmallVec::new();

    let mut current = Some(origin);
    let outcome = loop {
        let Some(ty) = current else {
            break Ok(WalkOutcome::Exhausted);
        };

        match guard.enter(ty) {
            RecursionResult::Entered => path.push(ty),
            RecursionResult::Cycle => {
                warn!(
                    origin = %graph.type_name(origin),
                    revisited = %graph.type_name(ty),
                    "hierarchy walk: cycle"
                );
                break Err(ResolveError::cyclic(graph, ty));
            }
            exceeded => {
                warn!(
                    origin = %graph.type_name(origin),
                    depth = guard.depth(),
                    ?exceeded,
                    "hierarchy walk: limit reached"
                );
                break Err(ResolveError::too_deep(graph, origin, types));
            }
        }

        trace!(type_name = %graph.type_name(ty), "walk_hierarchy: visit");
        if visitor.visit(graph, ty) == WalkControl::Stop {
            break Ok(WalkOutcome::Stopped(ty));
        }
        current = graph.supertype(ty);
    };

    for ty in path {
        guard.leave(ty);
    }
    outcome
}

#[cfg(test)]
#[path = "../tests/walker_tests.rs"]
mod walker_tests;
