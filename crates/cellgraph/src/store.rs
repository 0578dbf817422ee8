//! The live dependency graph

use std::sync::{Arc, PoisonError, RwLock};

use cellgraph_formula::DependencyGraph;

/// Holds the single most recently built graph
///
/// Published graphs are never mutated. [`GraphStore::replace`] swaps the
/// pointer under a write lock; [`GraphStore::current`] clones it under a read
/// lock, and the caller then traverses its snapshot without holding any lock.
/// A reader therefore sees either the old graph or the new one, never a mix.
#[derive(Debug, Default)]
pub struct GraphStore {
    live: RwLock<Option<Arc<DependencyGraph>>>,
}

impl GraphStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish `graph`, discarding whatever was live before
    pub fn replace(&self, graph: DependencyGraph) -> Arc<DependencyGraph> {
        let graph = Arc::new(graph);
        // The lock only guards a pointer swap, so a poisoned lock still holds a
        // consistent value.
        let mut live = self.live.write().unwrap_or_else(PoisonError::into_inner);
        *live = Some(Arc::clone(&graph));
        graph
    }

    /// Snapshot of the live graph, or `None` if nothing was built yet
    pub fn current(&self) -> Option<Arc<DependencyGraph>> {
        self.live
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
