pub mod buffer;
pub mod engine;
pub mod error;
pub mod id;
pub mod line_ending;
pub mod loader;
pub mod options;
pub mod path;

pub use buffer::{Buffer, TextBuffer};
pub use engine::{DefaultEngine, Engine};
pub use error::{is_not_implemented_io, EngineError, Result};
pub use id::{BufferId, IdGenerator};
pub use line_ending::{classify, classify_lines, LineEnding, NATIVE_LINE_ENDING};
pub use loader::{ingest, load_lines, Ingested};
pub use options::EngineOptions;
