//! Interrupt handling for the stage loops

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared flag raised by the interrupt handler and polled between invocations.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag {
    raised: Arc<AtomicBool>,
}

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes Ctrl+C to this flag. Can only be installed once per process.
    pub fn install_ctrlc_handler(&self) -> Result<(), ctrlc::Error> {
        let raised = self.raised.clone();
        ctrlc::set_handler(move || {
            raised.store(true, Ordering::SeqCst);
        })
    }

    pub fn cancel(&self) {
        self.raised.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.raised.load(Ordering::SeqCst)
    }

    /// Clears the flag so a stage after a cancelled one still runs.
    pub fn reset(&self) {
        self.raised.store(false, Ordering::SeqCst);
    }
}
