use crate::config::EngineConfig;
use crate::engine::SearchEngine;
use crate::error::Result;
use parking_lot::RwLock;
use std::path::Path;
use std::sync::Arc;

/// Swap point for replacing a running engine with a freshly built one.
///
/// Readers take an `Arc` snapshot and keep it for the whole query, so a swap
/// never affects a search already in progress.
#[derive(Debug)]
pub struct SharedEngine {
    current: RwLock<Arc<SearchEngine>>,
}

impl SharedEngine {
    pub fn new(engine: SearchEngine) -> Self {
        Self { current: RwLock::new(Arc::new(engine)) }
    }

    pub fn current(&self) -> Arc<SearchEngine> {
        self.current.read().clone()
    }

    /// Install `engine` and return the one it replaced.
    pub fn replace(&self, engine: SearchEngine) -> Arc<SearchEngine> {
        std::mem::replace(&mut *self.current.write(), Arc::new(engine))
    }

    /// Build a new engine from `corpus` and swap it in. The build runs outside
    /// the lock; on error the current engine stays in place.
    pub fn rebuild<P: AsRef<Path>>(&self, corpus: P, config: EngineConfig) -> Result<Arc<SearchEngine>> {
        let engine = Arc::new(SearchEngine::build(corpus, config)?);
        *self.current.write() = Arc::clone(&engine);
        tracing::info!(num_docs = engine.document_count(), "search engine swapped");
        Ok(engine)
    }
}
