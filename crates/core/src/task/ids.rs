//! Task identifier generation.

use chrono::Utc;
use std::sync::atomic::{AtomicI64, Ordering};

use super::types::TaskId;

/// Generates millisecond-timestamp identifiers.
///
/// Two calls within the same millisecond get consecutive values, so ids are
/// strictly increasing for the lifetime of the generator.
#[derive(Debug, Default)]
pub struct TaskIdGenerator {
    last: AtomicI64,
}

impl TaskIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> TaskId {
        let now = Utc::now().timestamp_millis();
        let mut last = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(last + 1);
            match self
                .last
                .compare_exchange_weak(last, candidate, Ordering::AcqRel, Ordering::Relaxed)
            {
                Ok(_) => return TaskId::new(candidate.to_string()),
                Err(actual) => last = actual,
            }
        }
    }
}
