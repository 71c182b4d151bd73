//! Supertype Cycle Detection
//!
//! Detects circular supertype chains BEFORE any resolution runs, so that a
//! cyclic model is rejected for the whole generation run up front.

use crate::graph::TypeGraph;
use crate::ids::TypeId;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::fmt;

/// A cycle in the `supertype` relation, listed from the first type reached
/// on the cycle around to the type whose supertype closes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchyCycle {
    pub types: Vec<TypeId>,
    pub names: Vec<String>,
}

impl fmt::Display for HierarchyCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cyclic supertype chain: ")?;
        for name in &self.names {
            write!(f, "{name} -> ")?;
        }
        match self.names.first() {
            Some(first) => write!(f, "{first}"),
            None => Ok(()),
        }
    }
}

impl std::error::Error for HierarchyCycle {}

#[derive(Copy, Clone, PartialEq, Eq)]
enum Mark {
    OnPath,
    Done,
}

impl TypeGraph {
    /// Check that the supertype relation is acyclic.
    ///
    /// Every chain is followed once; types already proven acyclic are not
    /// walked again, so the check is linear in the number of types.
    pub fn check_hierarchy(&self) -> Result<(), HierarchyCycle> {
        let mut marks: FxHashMap<TypeId, Mark> = FxHashMap::default();

        for (start, _) in self.types() {
            if marks.contains_key(&start) {
                continue;
            }

            let mut path: SmallVec<[TypeId; 8]> = SmallVec::new();
            let mut current = Some(start);
            while let Some(ty) = current {
                match marks.get(&ty) {
                    Some(Mark::Done) => break,
                    Some(Mark::OnPath) => {
                        let begin = path.iter().position(|&t| t == ty).unwrap_or(0);
                        let types: Vec<TypeId> = path[begin..].to_vec();
                        let names = types
                            .iter()
                            .map(|&t| self.type_name(t).to_string())
                            .collect();
                        tracing::debug!(?types, "check_hierarchy: cycle found");
                        return Err(HierarchyCycle { types, names });
                    }
                    None => {
                        marks.insert(ty, Mark::OnPath);
                        path.push(ty);
                        current = self.supertype(ty);
                    }
                }
            }

            for ty in path {
                marks.insert(ty, Mark::Done);
            }
        }

        Ok(())
    }

    /// Whether `ty` is `ancestor` or has it somewhere on its supertype chain.
    ///
    /// Bounded by the number of types, so it terminates on cyclic graphs.
    pub fn is_same_or_subtype_of(&self, ty: TypeId, ancestor: TypeId) -> bool {
        let mut current = Some(ty);
        let mut steps = 0usize;
        while let Some(t) = current {
            if t == ancestor {
                return true;
            }
            steps += 1;
            if steps > self.type_count() {
                return false;
            }
            current = self.supertype(t);
        }
        false
    }
}

#[cfg(test)]
#[path = "../tests/hierarchy_check_tests.rs"]
mod hierarchy_check_tests;
