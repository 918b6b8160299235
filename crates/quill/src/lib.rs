// Quill library exports

pub mod app;
pub mod config;
pub mod status_manager;

pub use app::{App, BufferRow};
pub use config::Config;
pub use status_manager::{MessageType, StatusManager, StatusMessage};
