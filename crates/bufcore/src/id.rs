use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a buffer, unique within the engine that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BufferId(pub usize);

impl fmt::Display for BufferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Buffer({})", self.0)
    }
}

/// Monotonic counter owned by a single engine.
///
/// Starts at zero and never hands out the same value twice. Gaps are fine.
#[derive(Debug, Default)]
pub struct IdGenerator {
    next: usize,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> BufferId {
        let id = BufferId(self.next);
        self.next += 1;
        id
    }

    /// The id the next call to [`IdGenerator::next_id`] will return.
    pub fn peek(&self) -> BufferId {
        BufferId(self.next)
    }
}
