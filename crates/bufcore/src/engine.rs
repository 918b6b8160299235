use std::fs::{File, OpenOptions};
use std::path::Path;

use crate::buffer::{Buffer, TextBuffer};
use crate::error::{EngineError, Result};
use crate::id::{BufferId, IdGenerator};
use crate::loader;
use crate::options::EngineOptions;
use crate::path::clean_path;

/// Owner of the open buffers and the only way to create or discard them.
pub trait Engine {
    type Buffer: Buffer;

    /// The registry in insertion order.
    fn buffers(&self) -> &[Self::Buffer];

    /// Registers an empty buffer named `"new"`.
    fn new_buffer(&mut self) -> &Self::Buffer;

    /// Opens `path` (creating it when absent), loads it and registers the
    /// resulting buffer.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Io`] when the file cannot be opened or read.
    /// Nothing is registered in that case.
    fn new_buffer_from_file(&mut self, path: &Path) -> Result<&Self::Buffer>;

    /// Drops the buffer with `id`. Unknown ids are ignored.
    fn remove_buffer(&mut self, id: BufferId);

    fn buffer(&self, id: BufferId) -> Option<&Self::Buffer> {
        self.buffers().iter().find(|buffer| buffer.id() == id)
    }

    fn buffer_mut(&mut self, id: BufferId) -> Option<&mut Self::Buffer>;

    fn has_unsaved_changes(&self) -> bool {
        self.buffers().iter().any(|buffer| buffer.is_dirty())
    }
}

/// The stock engine: a `Vec` of [`TextBuffer`]s plus an id counter.
#[derive(Debug)]
pub struct DefaultEngine {
    buffers: Vec<TextBuffer>,
    ids: IdGenerator,
    options: EngineOptions,
}

impl DefaultEngine {
    pub fn new() -> Self {
        Self::with_options(EngineOptions::default())
    }

    pub fn with_options(options: EngineOptions) -> Self {
        let mut engine = Self {
            buffers: Vec::new(),
            ids: IdGenerator::new(),
            options,
        };
        // A fresh engine always starts with one scratch buffer.
        engine.new_buffer();
        engine
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }

    fn register(&mut self, buffer: TextBuffer) -> &TextBuffer {
        log::debug!("registered {} as '{}'", buffer.id(), buffer.name());
        self.buffers.push(buffer);
        &self.buffers[self.buffers.len() - 1]
    }

    fn open_backing_file(&self, path: &Path) -> std::io::Result<File> {
        let mut options = OpenOptions::new();
        options.read(true).write(true).create(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(self.options.create_mode);
        }
        options.open(path)
    }
}

impl Default for DefaultEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine for DefaultEngine {
    type Buffer = TextBuffer;

    fn buffers(&self) -> &[TextBuffer] {
        &self.buffers
    }

    fn new_buffer(&mut self) -> &TextBuffer {
        let buffer = TextBuffer::new(self.ids.next_id());
        self.register(buffer)
    }

    fn new_buffer_from_file(&mut self, path: &Path) -> Result<&TextBuffer> {
        let path = clean_path(path);
        let mut file = self
            .open_backing_file(&path)
            .map_err(|e| EngineError::io(&path, e))?;
        let ingested =
            loader::ingest(&mut file, &self.options).map_err(|e| EngineError::io(&path, e))?;

        log::debug!(
            "loaded {} ({} lines, {})",
            path.display(),
            ingested.lines.len(),
            ingested.line_ending
        );

        let buffer = TextBuffer::from_file(self.ids.next_id(), path, file, ingested);
        Ok(self.register(buffer))
    }

    fn remove_buffer(&mut self, id: BufferId) {
        if let Some(index) = self.buffers.iter().position(|b| b.id() == id) {
            // Dropping the buffer closes its backing file, if any.
            let removed = self.buffers.remove(index);
            log::debug!("removed {} ('{}')", removed.id(), removed.name());
        }
    }

    fn buffer_mut(&mut self, id: BufferId) -> Option<&mut TextBuffer> {
        self.buffers.iter_mut().find(|buffer| buffer.id() == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_engine_has_one_empty_buffer() {
        let engine = DefaultEngine::new();
        let buffers = engine.buffers();
        assert_eq!(buffers.len(), 1);
        assert_eq!(buffers[0].id(), BufferId(0));
        assert!(buffers[0].is_empty());
        assert_eq!(buffers[0].name(), "new");
    }

    #[test]
    fn test_new_buffer_appends_with_fresh_id() {
        let mut engine = DefaultEngine::new();
        let id = engine.new_buffer().id();

        assert_eq!(engine.len(), 2);
        assert_eq!(id, BufferId(1));
        assert_eq!(engine.buffers()[1].id(), id);
    }

    #[test]
    fn test_remove_buffer() {
        let mut engine = DefaultEngine::new();
        let b1 = engine.new_buffer().id();
        let b2 = engine.new_buffer().id();
        let b3 = engine.new_buffer().id();
        let mut total = 4;

        for id in [b2, b1, b3] {
            assert_eq!(engine.len(), total);
            engine.remove_buffer(id);
            total -= 1;
        }
        assert_eq!(engine.len(), 1);
        assert_eq!(engine.buffers()[0].id(), BufferId(0));
    }

    #[test]
    fn test_remove_unknown_buffer_is_noop() {
        let mut engine = DefaultEngine::new();
        engine.remove_buffer(BufferId(99));
        assert_eq!(engine.len(), 1);
    }

    #[test]
    fn test_remove_all_buffers_empties_registry() {
        let mut engine = DefaultEngine::new();
        let ids: Vec<_> = (0..3).map(|_| engine.new_buffer().id()).collect();
        for id in ids {
            engine.remove_buffer(id);
        }
        engine.remove_buffer(BufferId(0));
        assert!(engine.is_empty());
        assert!(engine.buffers().is_empty());
    }

    #[test]
    fn test_ids_are_not_reused_after_removal() {
        let mut engine = DefaultEngine::new();
        let first = engine.new_buffer().id();
        engine.remove_buffer(first);
        let second = engine.new_buffer().id();
        assert!(second > first);
    }

    #[test]
    fn test_buffer_lookup() {
        let mut engine = DefaultEngine::new();
        let id = engine.new_buffer().id();

        assert_eq!(engine.buffer(id).map(Buffer::id), Some(id));
        assert!(engine.buffer_mut(id).is_some());
        assert!(engine.buffer(BufferId(42)).is_none());
        assert!(!engine.has_unsaved_changes());
    }

    #[test]
    fn test_engines_do_not_share_ids() {
        let mut a = DefaultEngine::new();
        let mut b = DefaultEngine::new();
        a.new_buffer();
        a.new_buffer();
        assert_eq!(b.new_buffer().id(), BufferId(1));
    }
}
