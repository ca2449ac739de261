//! Stop signal for batch compilation
//!
//! A run consults the token before each semantic. Once it fires the store
//! stops handing out semantics; concepts already compiled keep their
//! definitions.

use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared stop flag; clones observe the same signal
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask every run holding this token to stop
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Arm the token again for the next run
    pub fn reset(&self) {
        self.0.store(false, Ordering::Release);
    }

    /// `Break` once cancelled, for use with `?` inside a store visitor
    pub fn checkpoint(&self) -> ControlFlow<()> {
        if self.is_cancelled() {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    }
}
