use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// One-shot cancellation signal shared by the unbounded generator stages of the pipeline.
///
/// The token starts out clear. [CancelToken::cancel] broadcasts cancellation to every clone of
/// the token; producers observe it cooperatively by checking [CancelToken::is_cancelled] at
/// their next production step. Cancelling an already-cancelled token is a no-op.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Broadcasts cancellation to all clones of this token.
    ///
    /// Returns `true` if this call performed the broadcast and `false` if the token was already
    /// cancelled.
    pub fn cancel(&self) -> bool {
        !self.cancelled.swap(true, Ordering::SeqCst)
    }

    /// Returns `true` once [CancelToken::cancel] has been called on any clone
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}
