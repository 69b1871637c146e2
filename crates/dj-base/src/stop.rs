use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

/// Shared stop flag for the frame loop.
///
/// Clones share the same flag. Whoever notices the user's quit request
/// (Ctrl-C handler, stdin watcher) calls `raise()`, and the frame loop
/// polls `is_raised()` once per frame.
#[derive(Clone, Debug, Default)]
pub struct StopSignal {
    raised: Arc<AtomicBool>,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a graceful shutdown.
    pub fn raise(&self) {
        self.raised.store(true, Ordering::Relaxed);
    }

    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_flag() {
        let signal = StopSignal::new();
        let watcher = signal.clone();
        assert!(!watcher.is_raised());
        signal.raise();
        assert!(watcher.is_raised());
    }
}
