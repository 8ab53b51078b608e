//! Pool of long-lived engine processes.
//!
//! A semaphore bounds how many engines are leased at once. Idle engines are
//! kept and handed to the next caller instead of paying process start-up on
//! every request. A lease returns its engine on drop only when the engine is
//! known to be between searches; an engine dropped mid-search (timeout, I/O
//! failure, or a cancelled request future) is killed instead.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::{debug, warn};

use super::analysis::{EvaluationResult, Evaluator};
use super::stockfish::{EngineError, StockfishEngine};
use crate::config::EngineConfig;

struct PoolInner {
    config: EngineConfig,
    idle: Mutex<Vec<StockfishEngine>>,
    permits: Arc<Semaphore>,
}

impl PoolInner {
    fn take_idle(&self) -> Option<StockfishEngine> {
        self.idle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop()
    }

    fn put_idle(&self, engine: StockfishEngine) {
        self.idle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(engine);
    }
}

/// Pool of engines for concurrent game reviews
#[derive(Clone)]
pub struct EnginePool {
    inner: Arc<PoolInner>,
}

impl EnginePool {
    /// Create a new engine pool. No process is started until the first lease.
    pub fn new(config: EngineConfig) -> Self {
        let permits = Arc::new(Semaphore::new(config.pool_size.max(1)));
        Self {
            inner: Arc::new(PoolInner {
                config,
                idle: Mutex::new(Vec::new()),
                permits,
            }),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.inner.config
    }

    /// Waits for a free slot and leases an engine
    ///
    /// Idle engines are checked before reuse; dead ones are dropped and a
    /// fresh engine is spawned when none is left.
    pub async fn acquire(&self) -> Result<EngineLease, EngineError> {
        let permit = Arc::clone(&self.inner.permits)
            .acquire_owned()
            .await
            .map_err(|_| EngineError::PoolClosed)?;

        let engine = loop {
            match self.inner.take_idle() {
                Some(mut engine) => {
                    if engine.is_healthy().await {
                        debug!(engine = engine.name(), "reusing idle engine");
                        break engine;
                    }
                    warn!(engine = engine.name(), "dropping idle engine that stopped responding");
                }
                None => break StockfishEngine::spawn(&self.inner.config).await?,
            }
        };

        Ok(EngineLease {
            engine: Some(engine),
            reusable: true,
            pool: Arc::clone(&self.inner),
            _permit: permit,
        })
    }

    /// Number of leases that can be handed out right now
    pub fn available(&self) -> usize {
        self.inner.permits.available_permits()
    }

    /// Number of started engines waiting for a lease
    pub fn idle_count(&self) -> usize {
        self.inner
            .idle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Stops handing out engines; waiting callers get [`EngineError::PoolClosed`]
    pub fn close(&self) {
        self.inner.permits.close();
        self.inner
            .idle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

/// Exclusive use of one pooled engine
pub struct EngineLease {
    engine: Option<StockfishEngine>,
    /// False while a search is in flight and after any failed search
    reusable: bool,
    pool: Arc<PoolInner>,
    _permit: OwnedSemaphorePermit,
}

impl EngineLease {
    pub fn engine_name(&self) -> &str {
        self.engine.as_ref().map(|e| e.name()).unwrap_or("")
    }
}

impl Evaluator for EngineLease {
    async fn evaluate(&mut self, fen: &str, depth: u8) -> Result<EvaluationResult, EngineError> {
        let engine = self.engine.as_mut().ok_or(EngineError::PoolClosed)?;

        self.reusable = false;
        let result = engine.analyze(fen, depth).await;
        self.reusable = result.is_ok();
        result
    }
}

impl Drop for EngineLease {
    fn drop(&mut self) {
        let Some(engine) = self.engine.take() else {
            return;
        };
        if self.reusable && !self.pool.permits.is_closed() {
            self.pool.put_idle(engine);
        } else {
            warn!(engine = engine.name(), "discarding engine after interrupted search");
        }
    }
}
