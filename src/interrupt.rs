//! Cooperative stop flag and SIGINT bridge
//!
//! The walker polls a shared flag between node visits; the signal handler
//! only sets the flag and returns, so the record in flight is always
//! finished and the sink flushed before the process exits. A second SIGINT
//! while a stop is already pending exits immediately with status 130.

use std::process;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared stop-requested flag.
///
/// Cloning is cheap; all clones observe the same flag. The signal boundary
/// is the only writer, the walker only reads.
#[derive(Debug, Clone, Default)]
pub struct StopFlag(Arc<AtomicBool>);

impl StopFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a stop. Returns the previous value.
    pub fn trigger(&self) -> bool {
        self.0.swap(true, Ordering::SeqCst)
    }

    /// Whether a stop has been requested.
    #[inline]
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Install the SIGINT handler that drives `flag`.
///
/// First signal: set the flag, let the scan drain. Second signal: the run
/// is already draining, so give up on a clean stop and exit with the
/// conventional interrupted status.
pub fn install_handler(flag: StopFlag) -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(move || {
        if flag.trigger() {
            process::exit(130);
        }
    })
}
