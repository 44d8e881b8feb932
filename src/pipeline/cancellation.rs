use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{AppError, Result};

/// Cancellation signal threaded through dispatch.
///
/// Handlers call [`Cancellation::checkpoint`] before each I/O boundary. Nothing
/// interrupts an operation that is already running, so a commit that has been
/// issued always runs to completion.
#[derive(Clone, Debug, Default)]
pub struct Cancellation {
    cancelled: Arc<AtomicBool>,
}

impl Cancellation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    pub fn checkpoint(&self) -> Result<()> {
        if self.is_cancelled() {
            return Err(AppError::Cancelled);
        }
        Ok(())
    }

    /// Guard that raises the signal when dropped, e.g. when the transport
    /// drops a request future because the client went away.
    pub fn cancel_on_drop(&self) -> CancelOnDrop {
        CancelOnDrop(self.clone())
    }
}

pub struct CancelOnDrop(Cancellation);

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        self.0.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkpoint_passes_until_cancelled() {
        let cancel = Cancellation::new();
        assert!(cancel.checkpoint().is_ok());

        cancel.clone().cancel();
        assert!(cancel.is_cancelled());
        assert!(matches!(cancel.checkpoint(), Err(AppError::Cancelled)));
    }

    #[test]
    fn guard_cancels_on_drop() {
        let cancel = Cancellation::new();
        {
            let _guard = cancel.cancel_on_drop();
            assert!(!cancel.is_cancelled());
        }
        assert!(cancel.is_cancelled());
    }
}
