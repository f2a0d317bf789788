//! Free list of logger storage blocks.
//!
//! Request-scoped logging creates and drops handles at a high rate, and every
//! `with_*` call produces a new one. Blocks are recycled through a
//! process-wide free list instead of being reallocated each time. The list is
//! unbounded and never frees a block once allocated.
//!
//! Blocks are shared behind an `Arc` and are only ever written while uniquely
//! owned: when filled at checkout and when reset on recycle. A block still
//! shared by a cloned handle is not recycled; the last owner returns it.

use crate::config::HandleSettings;
use crate::context::Context;
use crate::logging::log_trace;
use crate::sink::Sink;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Storage behind a [`Logger`](crate::Logger).
#[derive(Default)]
pub(crate) struct PoolBlock {
    pub(crate) ctx: Option<Context>,
    pub(crate) sink: Option<Arc<dyn Sink>>,
    pub(crate) settings: HandleSettings,
}

impl PoolBlock {
    fn fill(&mut self, ctx: Option<Context>, sink: Arc<dyn Sink>, settings: HandleSettings) {
        self.ctx = ctx;
        self.sink = Some(sink);
        self.settings = settings;
    }

    fn reset(&mut self) {
        self.ctx = None;
        self.sink = None;
        self.settings = HandleSettings::default();
    }

    pub(crate) fn is_reset(&self) -> bool {
        self.ctx.is_none() && self.sink.is_none() && self.settings == HandleSettings::default()
    }
}

/// The zeroed block, seen only through a handle that is being dropped.
pub(crate) static EMPTY_BLOCK: PoolBlock = PoolBlock {
    ctx: None,
    sink: None,
    settings: HandleSettings::DEFAULT,
};

/// Snapshot of pool counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PoolStats {
    /// Blocks ever allocated (pool misses).
    pub allocated: usize,
    /// Checkouts served from the free list.
    pub reused: usize,
    /// Blocks currently waiting in the free list.
    pub idle: usize,
}

/// Concurrency-safe free list of [`PoolBlock`]s.
pub(crate) struct HandlePool {
    free: Mutex<Vec<Arc<PoolBlock>>>,
    allocated: AtomicUsize,
    reused: AtomicUsize,
}

static HANDLE_POOL: HandlePool = HandlePool::new();

/// The process-wide pool used by every logger.
pub(crate) fn global() -> &'static HandlePool {
    &HANDLE_POOL
}

/// Counters of the process-wide handle pool.
pub fn pool_stats() -> PoolStats {
    global().stats()
}

impl HandlePool {
    pub(crate) const fn new() -> Self {
        Self {
            free: parking_lot::const_mutex(Vec::new()),
            allocated: AtomicUsize::new(0),
            reused: AtomicUsize::new(0),
        }
    }

    /// Take a block from the free list (or allocate one) and fill it.
    pub(crate) fn checkout(
        &self,
        ctx: Option<Context>,
        sink: Arc<dyn Sink>,
        settings: HandleSettings,
    ) -> Arc<PoolBlock> {
        let recycled = self.free.lock().pop();
        let mut block = match recycled {
            Some(block) => {
                self.reused.fetch_add(1, Ordering::Relaxed);
                block
            }
            None => {
                let total = self.allocated.fetch_add(1, Ordering::Relaxed) + 1;
                log_trace!(allocated = total, "Handle pool miss, allocating block");
                Arc::new(PoolBlock::default())
            }
        };

        match Arc::get_mut(&mut block) {
            Some(inner) => inner.fill(ctx, sink, settings),
            // Free-list entries are uniquely owned; never taken in practice.
            None => {
                let mut fresh = PoolBlock::default();
                fresh.fill(ctx, sink, settings);
                block = Arc::new(fresh);
            }
        }
        block
    }

    /// Reset and return a block, unless another handle still shares it.
    pub(crate) fn recycle(&self, mut block: Arc<PoolBlock>) {
        if let Some(inner) = Arc::get_mut(&mut block) {
            inner.reset();
            self.free.lock().push(block);
        }
    }

    #[cfg(test)]
    pub(crate) fn free_blocks(&self) -> Vec<Arc<PoolBlock>> {
        self.free.lock().clone()
    }

    pub(crate) fn stats(&self) -> PoolStats {
        PoolStats {
            allocated: self.allocated.load(Ordering::Relaxed),
            reused: self.reused.load(Ordering::Relaxed),
            idle: self.free.lock().len(),
        }
    }
}
