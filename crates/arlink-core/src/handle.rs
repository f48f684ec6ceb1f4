use parking_lot::RwLock;
use std::sync::Arc;

use crate::engine::NativeEngine;
use crate::error::{NativeError, ShellError, ShellResult};

enum Slot<N> {
    Live(Arc<N>),
    Cleared,
}

/// Owned handle to the single native engine instance.
///
/// The slot lock is the liveness domain. Engine calls run under a shared
/// guard, `destroy` takes the exclusive one: teardown waits for every call in
/// flight and nothing observes a half torn-down engine.
pub struct EngineHandle<N: NativeEngine> {
    slot: RwLock<Slot<N>>,
}

impl<N: NativeEngine> EngineHandle<N> {
    /// Construct the native engine. Failure is fatal for the shell.
    pub fn create<F>(factory: F) -> ShellResult<Self>
    where
        F: FnOnce() -> Result<N, NativeError>,
    {
        let engine = factory().map_err(|e| {
            log::error!("native engine construction failed: {e}");
            ShellError::EngineCreate(e)
        })?;
        log::info!("native engine created");
        Ok(Self {
            slot: RwLock::new(Slot::Live(Arc::new(engine))),
        })
    }

    #[inline]
    pub fn is_live(&self) -> bool {
        matches!(*self.slot.read(), Slot::Live(_))
    }

    /// Control-context access.
    ///
    /// Only valid on the context that also calls `destroy`; the returned
    /// reference is not protected against a teardown from elsewhere.
    #[inline]
    pub fn live(&self) -> Option<Arc<N>> {
        match &*self.slot.read() {
            Slot::Live(engine) => Some(Arc::clone(engine)),
            Slot::Cleared => None,
        }
    }

    /// Run `f` inside the liveness domain. Returns `None` once cleared.
    #[inline]
    pub fn with_live<R>(&self, f: impl FnOnce(&N) -> R) -> Option<R> {
        let slot = self.slot.read();
        match &*slot {
            Slot::Live(engine) => Some(f(engine)),
            Slot::Cleared => None,
        }
    }

    /// Tear the engine down. Blocks until no `with_live` call is in flight.
    ///
    /// Returns `false` if the handle was already cleared.
    pub fn destroy(&self) -> bool {
        let mut slot = self.slot.write();
        match std::mem::replace(&mut *slot, Slot::Cleared) {
            Slot::Live(engine) => {
                engine.destroy();
                log::info!("native engine destroyed");
                true
            }
            Slot::Cleared => false,
        }
    }
}
