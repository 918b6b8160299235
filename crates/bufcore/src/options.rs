use serde::{Deserialize, Serialize};

pub const DEFAULT_READ_BUFFER_CAPACITY: usize = 8 * 1024;
pub const DEFAULT_CREATE_MODE: u32 = 0o755;

/// Tunables for file ingestion and file creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineOptions {
    /// Size of the internal read buffer used while splitting lines. Lines
    /// longer than this are still loaded whole.
    #[serde(default = "default_read_buffer_capacity")]
    pub read_buffer_capacity: usize,
    /// Permission bits for files created by `new_buffer_from_file` (unix only).
    #[serde(default = "default_create_mode")]
    pub create_mode: u32,
}

fn default_read_buffer_capacity() -> usize {
    DEFAULT_READ_BUFFER_CAPACITY
}

fn default_create_mode() -> u32 {
    DEFAULT_CREATE_MODE
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            read_buffer_capacity: DEFAULT_READ_BUFFER_CAPACITY,
            create_mode: DEFAULT_CREATE_MODE,
        }
    }
}
