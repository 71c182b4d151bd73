//! Per-run memoization of [`Builder`]s.
//!
//! Each type gets exactly one builder for the lifetime of a cache, and
//! ancestors are built before their subtypes. The first request for a type
//! claims its slot and constructs the builder outside the lock; concurrent
//! requests from other threads block on the condvar until the owner
//! publishes the result. A request for a slot the calling thread is itself
//! building can only come from a cyclic chain and fails fast instead of
//! deadlocking.

use crate::builder::Builder;
use crate::error::{ResolveError, ResolveResult};
use crate::settings::GeneratorSettings;
use crate::walker::ancestors;
use modelgen_common::{Diagnostic, limits};
use modelgen_model::{TypeGraph, TypeId};
use parking_lot::{Condvar, Mutex};
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::Arc;
use std::thread::{self, ThreadId};
use tracing::{debug, trace, warn};

enum Slot {
    Building(ThreadId),
    Ready(Arc<Builder>),
}

/// What `builder_for` decided after inspecting a slot under the lock.
enum Probe {
    Hit(Arc<Builder>),
    Reentered,
    Wait,
    Claim,
}

#[derive(Default)]
struct DiagnosticLog {
    seen: FxHashSet<(u32, String)>,
    entries: Vec<Diagnostic>,
}

impl DiagnosticLog {
    fn record(&mut self, diagnostic: Diagnostic) {
        if self.seen.insert((diagnostic.code, diagnostic.element.clone())) {
            self.entries.push(diagnostic);
        }
    }
}

pub struct ModelNodeCache {
    graph: Arc<TypeGraph>,
    settings: GeneratorSettings,
    slots: Mutex<FxHashMap<TypeId, Slot>>,
    built: Condvar,
    diagnostics: Mutex<DiagnosticLog>,
}

impl ModelNodeCache {
    pub fn new(graph: Arc<TypeGraph>, settings: GeneratorSettings) -> Self {
        let capacity = limits::BUILDER_CACHE_CAPACITY.min(graph.type_count());
        Self {
            graph,
            settings,
            slots: Mutex::new(FxHashMap::with_capacity_and_hasher(capacity, Default::default())),
            built: Condvar::new(),
            diagnostics: Mutex::new(DiagnosticLog::default()),
        }
    }

    pub fn graph(&self) -> &TypeGraph {
        &self.graph
    }

    pub fn settings(&self) -> &GeneratorSettings {
        &self.settings
    }

    /// Number of builders constructed so far.
    pub fn len(&self) -> usize {
        self.slots
            .lock()
            .values()
            .filter(|slot| matches!(slot, Slot::Ready(_)))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The builder for `ty`, constructing it on first request.
    ///
    /// Repeated calls return the same `Arc`. Missing ancestor builders are
    /// constructed first, root down, one at a time, so a deep hierarchy never
    /// nests constructions. Failed constructions are not memoized; the next
    /// request retries.
    pub fn builder_for(&self, ty: TypeId) -> ResolveResult<Arc<Builder>> {
        if !self.graph.contains_type(ty) {
            return Err(ResolveError::UnknownType(ty));
        }
        if let Some(Slot::Ready(builder)) = self.slots.lock().get(&ty) {
            trace!(type_name = %self.graph.type_name(ty), "builder_for: hit");
            return Ok(Arc::clone(builder));
        }

        let chain = ancestors(&self.graph, ty).inspect_err(|err| {
            warn!(type_name = %self.graph.type_name(ty), %err, "builder_for: bad hierarchy");
            self.record(err.to_diagnostic());
        })?;
        for &ancestor in chain.iter().rev() {
            self.resolve_slot(ancestor)?;
        }
        self.resolve_slot(ty)
    }

    /// Claim, wait for or reuse the slot of `ty`, building it when claimed.
    fn resolve_slot(&self, ty: TypeId) -> ResolveResult<Arc<Builder>> {
        let me = thread::current().id();

        {
            let mut slots = self.slots.lock();
            loop {
                let probe = match slots.get(&ty) {
                    Some(Slot::Ready(builder)) => Probe::Hit(Arc::clone(builder)),
                    Some(Slot::Building(owner)) if *owner == me => Probe::Reentered,
                    Some(Slot::Building(_)) => Probe::Wait,
                    None => Probe::Claim,
                };
                match probe {
                    Probe::Hit(builder) => return Ok(builder),
                    Probe::Reentered => {
                        drop(slots);
                        warn!(
                            type_name = %self.graph.type_name(ty),
                            "builder_for: re-entered while building"
                        );
                        let err = ResolveError::cyclic(&self.graph, ty);
                        self.record(err.to_diagnostic());
                        return Err(err);
                    }
                    Probe::Wait => self.built.wait(&mut slots),
                    Probe::Claim => {
                        slots.insert(ty, Slot::Building(me));
                        break;
                    }
                }
            }
        }

        debug!(type_name = %self.graph.type_name(ty), "builder_for: building");
        let result = Builder::build(self, ty);

        let outcome = {
            let mut slots = self.slots.lock();
            match result {
                Ok((builder, diagnostics)) => {
                    let builder = Arc::new(builder);
                    slots.insert(ty, Slot::Ready(Arc::clone(&builder)));
                    drop(slots);
                    let mut log = self.diagnostics.lock();
                    for diagnostic in diagnostics {
                        log.record(diagnostic);
                    }
                    Ok(builder)
                }
                Err(err) => {
                    slots.remove(&ty);
                    drop(slots);
                    self.record(err.to_diagnostic());
                    Err(err)
                }
            }
        };
        self.built.notify_all();
        outcome
    }

    pub fn builder_by_name(&self, name: &str) -> Option<ResolveResult<Arc<Builder>>> {
        let ty = self.graph.type_by_name(name)?;
        Some(self.builder_for(ty))
    }

    /// Diagnostics recorded so far, once per code and element.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.lock().entries.clone()
    }

    /// Check the hierarchy, then build every type in graph order.
    ///
    /// Stops at the first structural error; association-level problems only
    /// end up in [`diagnostics`](Self::diagnostics).
    pub fn resolve_all(&self) -> ResolveResult<Vec<Arc<Builder>>> {
        if let Err(cycle) = self.graph.check_hierarchy() {
            warn!(%cycle, "resolve_all: hierarchy check failed");
            let err = match cycle.types.first() {
                Some(&ty) => ResolveError::cyclic(&self.graph, ty),
                None => ResolveError::CyclicHierarchy {
                    type_name: cycle.to_string(),
                },
            };
            self.record(err.to_diagnostic());
            return Err(err);
        }

        let builders = self
            .graph
            .types()
            .map(|(ty, _)| self.builder_for(ty))
            .collect::<ResolveResult<Vec<_>>>()?;
        debug!(count = builders.len(), "resolve_all: done");
        Ok(builders)
    }

    fn record(&self, diagnostic: Diagnostic) {
        self.diagnostics.lock().record(diagnostic);
    }
}

impl std::fmt::Debug for ModelNodeCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelNodeCache")
            .field("types", &self.graph.type_count())
            .field("built", &self.len())
            .field("settings", &self.settings)
            .finish()
    }
}

#[cfg(test)]
#[path = "../tests/cache_tests.rs"]
mod cache_tests;
