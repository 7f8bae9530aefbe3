//! One-shot readiness signal for the diagram engine.
//!
//! The bootstrap sequence resolves the signal exactly once, either with the
//! engine handle or as absent. The controller awaits it once before any setup.
//!
//! ```
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let (signal, ready) = sowchart::readiness::channel::<u32>();
//! signal.ready(7);
//! assert_eq!(ready.wait().await, Some(7));
//! # });
//! ```

use log::debug;
use tokio::sync::oneshot;

/// Creates a linked signal/waiter pair.
pub fn channel<E>() -> (EngineSignal<E>, EngineReady<E>) {
    let (tx, rx) = oneshot::channel();
    (EngineSignal { tx }, EngineReady { rx })
}

/// Resolving half, held by the bootstrap sequence.
#[derive(Debug)]
pub struct EngineSignal<E> {
    tx: oneshot::Sender<E>,
}

impl<E> EngineSignal<E> {
    /// Hands the loaded engine to the waiter.
    pub fn ready(self, engine: E) {
        if self.tx.send(engine).is_err() {
            debug!("Engine became ready after the waiter went away");
        }
    }

    /// Reports that no engine will become available.
    pub fn absent(self) {
        debug!("Diagram engine reported absent");
    }
}

/// Waiting half, consumed by the controller.
#[derive(Debug)]
pub struct EngineReady<E> {
    rx: oneshot::Receiver<E>,
}

impl<E> EngineReady<E> {
    /// A waiter that is already resolved.
    pub fn resolved(engine: Option<E>) -> Self {
        let (signal, ready) = channel();
        match engine {
            Some(engine) => signal.ready(engine),
            None => signal.absent(),
        }
        ready
    }

    /// Waits for the signal. `None` means the engine is absent.
    pub async fn wait(self) -> Option<E> {
        self.rx.await.ok()
    }
}
