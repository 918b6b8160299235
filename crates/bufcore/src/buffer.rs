use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::error::{EngineError, Result};
use crate::id::BufferId;
use crate::line_ending::LineEnding;
use crate::loader::Ingested;

pub const NEW_BUFFER_NAME: &str = "new";

/// Capabilities every buffer kind offers to the engine and its callers.
///
/// The byte-stream half (`Read`, `Write`, `Seek`) and the save operations are
/// extension points; [`TextBuffer`] answers them with the not-implemented
/// sentinel.
pub trait Buffer: Read + Write + Seek {
    fn id(&self) -> BufferId;
    fn name(&self) -> &str;
    /// Backing file path, if the buffer came from a file.
    fn path(&self) -> Option<&Path>;
    fn lines(&self) -> &[Vec<u8>];
    fn line_ending(&self) -> LineEnding;
    fn cursor_position(&self) -> (usize, usize);
    fn is_dirty(&self) -> bool;

    fn save(&mut self) -> Result<()>;
    fn save_as(&mut self, path: &Path) -> Result<()>;

    fn line_count(&self) -> usize {
        self.lines().len()
    }

    fn is_empty(&self) -> bool {
        self.lines().is_empty()
    }
}

/// Line-oriented buffer, either in memory only or backed by an open file.
///
/// The backing handle is owned here and closes when the buffer is dropped.
#[derive(Debug)]
pub struct TextBuffer {
    id: BufferId,
    name: String,
    path: Option<PathBuf>,
    content: Vec<Vec<u8>>,
    line_ending: LineEnding,
    cursor_line: usize,
    cursor_col: usize,
    dirty: bool,
    file: Option<File>,
}

impl TextBuffer {
    pub fn new(id: BufferId) -> Self {
        Self {
            id,
            name: NEW_BUFFER_NAME.to_string(),
            path: None,
            content: Vec::new(),
            line_ending: LineEnding::Unknown,
            cursor_line: 0,
            cursor_col: 0,
            dirty: false,
            file: None,
        }
    }

    pub fn from_file(id: BufferId, path: PathBuf, file: File, ingested: Ingested) -> Self {
        Self {
            id,
            name: path.to_string_lossy().into_owned(),
            path: Some(path),
            content: ingested.lines,
            line_ending: ingested.line_ending,
            cursor_line: 0,
            cursor_col: 0,
            dirty: false,
            file: Some(file),
        }
    }

    pub fn is_file_backed(&self) -> bool {
        self.file.is_some()
    }

    pub fn line(&self, index: usize) -> Option<&[u8]> {
        self.content.get(index).map(Vec::as_slice)
    }
}

impl Buffer for TextBuffer {
    fn id(&self) -> BufferId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn lines(&self) -> &[Vec<u8>] {
        &self.content
    }

    fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    fn cursor_position(&self) -> (usize, usize) {
        (self.cursor_line, self.cursor_col)
    }

    fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn save(&mut self) -> Result<()> {
        Err(EngineError::NotImplemented("save"))
    }

    fn save_as(&mut self, _path: &Path) -> Result<()> {
        Err(EngineError::NotImplemented("save as"))
    }
}

impl Read for TextBuffer {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(EngineError::unsupported_io("read"))
    }
}

impl Write for TextBuffer {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(EngineError::unsupported_io("write"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Err(EngineError::unsupported_io("flush"))
    }
}

impl Seek for TextBuffer {
    fn seek(&mut self, _pos: SeekFrom) -> io::Result<u64> {
        Err(EngineError::unsupported_io("seek"))
    }
}
