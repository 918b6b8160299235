use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom};

use crate::line_ending::{classify_lines, LineEnding};
use crate::options::EngineOptions;

/// Result of reading a file into line form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ingested {
    pub lines: Vec<Vec<u8>>,
    pub line_ending: LineEnding,
}

/// Splits `reader` into `\n` terminated lines, keeping the terminators.
///
/// A line longer than `capacity` keeps accumulating until its own `\n` or the
/// end of input, so arbitrarily long lines come back whole. Lines made of a
/// bare terminator are kept; a trailing terminator does not produce an extra
/// empty line.
pub fn load_lines<R: Read>(reader: R, capacity: usize) -> io::Result<Vec<Vec<u8>>> {
    let mut reader = BufReader::with_capacity(capacity.max(1), reader);
    let mut lines = Vec::new();

    loop {
        let mut line = Vec::new();
        // read_until retries on Interrupted and stitches together lines that
        // span several fills of the internal buffer.
        let read = reader.read_until(b'\n', &mut line)?;
        if read == 0 {
            break;
        }
        lines.push(line);
    }

    Ok(lines)
}

/// Reads a whole file into lines and classifies its line endings.
///
/// The file is read once from the start. Classification runs over the loaded
/// lines, which gives the same answer as [`crate::classify`] on the raw file.
/// The handle is left positioned at the start.
pub fn ingest<F: Read + Seek>(file: &mut F, options: &EngineOptions) -> io::Result<Ingested> {
    file.seek(SeekFrom::Start(0))?;
    let lines = load_lines(&mut *file, options.read_buffer_capacity)?;
    file.seek(SeekFrom::Start(0))?;

    let line_ending = classify_lines(&lines);
    log::trace!("ingested {} lines, line ending {}", lines.len(), line_ending);

    Ok(Ingested { lines, line_ending })
}
