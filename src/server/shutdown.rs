//! Shared shutdown signal: one struct reachable from every thread instead
//! of a process-wide static.

use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Default)]
pub struct Shutdown {
    requested: AtomicBool,
}

impl Shutdown {
    pub fn new() -> Self {
        Shutdown {
            requested: AtomicBool::new(false),
        }
    }

    pub fn request(&self) {
        self.requested.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }
}
