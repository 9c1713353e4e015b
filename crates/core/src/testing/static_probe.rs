//! Fixed-answer tool probe for testing.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::converter::ToolProbe;

/// Tool probe whose answer is set by the test.
#[derive(Debug, Default)]
pub struct StaticToolProbe {
    available: AtomicBool,
}

impl StaticToolProbe {
    pub fn new(available: bool) -> Self {
        Self {
            available: AtomicBool::new(available),
        }
    }

    pub fn available() -> Self {
        Self::new(true)
    }

    pub fn unavailable() -> Self {
        Self::new(false)
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }
}

impl ToolProbe for StaticToolProbe {
    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }
}
