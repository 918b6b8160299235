use anyhow::Result;
use bufcore::{Buffer, BufferId, DefaultEngine, Engine, LineEnding};
use std::path::PathBuf;

use crate::config::Config;
use crate::status_manager::StatusManager;

/// One row of the buffer listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferRow {
    pub id: BufferId,
    pub line_ending: LineEnding,
    pub lines: usize,
    pub dirty: bool,
    pub name: String,
}

pub struct App {
    pub config: Config,
    pub status: StatusManager,
    engine: DefaultEngine,
}

impl App {
    pub fn new(config: Config) -> Self {
        let engine = DefaultEngine::with_options(config.engine.clone());
        Self {
            config,
            status: StatusManager::new(),
            engine,
        }
    }

    /// Builds an app from the on-disk configuration.
    pub async fn load() -> Result<Self> {
        let config = Config::load().await?;
        Ok(Self::new(config))
    }

    pub fn engine(&self) -> &DefaultEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut DefaultEngine {
        &mut self.engine
    }

    /// Opens every path into the engine, off the async runtime.
    ///
    /// Each failure is recorded in the status log and does not stop the
    /// remaining paths. Returns the ids of the buffers that were opened.
    pub async fn open_files(&mut self, paths: Vec<PathBuf>) -> Result<Vec<BufferId>> {
        // Placeholder while the real engine is on the blocking pool.
        let mut engine = std::mem::take(&mut self.engine);

        let (engine, results) = tokio::task::spawn_blocking(move || {
            let results: Vec<_> = paths
                .into_iter()
                .map(|path| {
                    let opened = engine
                        .new_buffer_from_file(&path)
                        .map(|buffer| (buffer.id(), buffer.line_count(), buffer.line_ending()));
                    (path, opened)
                })
                .collect();
            (engine, results)
        })
        .await
        .map_err(|e| anyhow::anyhow!("File loading task failed: {}", e))?;

        self.engine = engine;

        let mut opened = Vec::new();
        for (path, result) in results {
            match result {
                Ok((id, lines, line_ending)) => {
                    self.status.set_success(format!(
                        "opened {} as {} ({} lines, {})",
                        path.display(),
                        id,
                        lines,
                        line_ending
                    ));
                    opened.push(id);
                }
                Err(e) => self.status.report_engine_error(&e),
            }
        }
        Ok(opened)
    }

    /// Tries to save every file-backed buffer, recording the outcome.
    pub fn save_all(&mut self) {
        let ids: Vec<BufferId> = self
            .engine
            .buffers()
            .iter()
            .filter(|buffer| buffer.path().is_some())
            .map(Buffer::id)
            .collect();

        for id in ids {
            if let Some(buffer) = self.engine.buffer_mut(id) {
                match buffer.save() {
                    Ok(()) => self.status.set_success(format!("saved {}", buffer.name())),
                    Err(e) => self.status.report_engine_error(&e),
                }
            }
        }
    }

    pub fn close_buffer(&mut self, id: BufferId) {
        self.engine.remove_buffer(id);
    }

    pub fn buffer_rows(&self) -> Vec<BufferRow> {
        self.engine
            .buffers()
            .iter()
            .map(|buffer| BufferRow {
                id: buffer.id(),
                line_ending: buffer.line_ending(),
                lines: buffer.line_count(),
                dirty: buffer.is_dirty(),
                name: shorten_name(buffer.name(), self.config.display.max_name_width),
            })
            .collect()
    }

    pub fn render_table(&self) -> String {
        let mut out = String::new();
        if self.config.display.show_header {
            out.push_str(&format!(
                "{:>4}  {:<8}  {:>7}  {:<5}  {}\n",
                "ID", "ENDING", "LINES", "DIRTY", "NAME"
            ));
        }
        for row in self.buffer_rows() {
            out.push_str(&format!(
                "{:>4}  {:<8}  {:>7}  {:<5}  {}\n",
                row.id.0,
                row.line_ending.as_str(),
                row.lines,
                if row.dirty { "yes" } else { "no" },
                row.name
            ));
        }
        out
    }
}

/// Keeps the tail of long names, which is the part that tells files apart.
fn shorten_name(name: &str, max_width: usize) -> String {
    let count = name.chars().count();
    if count <= max_width {
        return name.to_string();
    }
    let keep = max_width.saturating_sub(1);
    let tail: String = name.chars().skip(count - keep).collect();
    format!("…{}", tail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status_manager::MessageType;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_app_creation() {
        let app = App::new(Config::default());
        assert_eq!(app.engine().buffers().len(), 1);
        assert!(!app.status.has_message());

        let rows = app.buffer_rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "new");
        assert_eq!(rows[0].line_ending, LineEnding::Unknown);
    }

    #[tokio::test]
    async fn test_open_files_registers_buffers_and_reports() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "one\r\ntwo\r\n").unwrap();
        let dir = TempDir::new().unwrap();
        let bad = dir.path().join("missing").join("file.txt");

        let mut app = App::new(Config::default());
        let opened = app
            .open_files(vec![file.path().to_path_buf(), bad])
            .await
            .unwrap();

        assert_eq!(opened.len(), 1);
        assert_eq!(app.engine().buffers().len(), 2);
        let buffer = app.engine().buffer(opened[0]).unwrap();
        assert_eq!(buffer.line_ending(), LineEnding::Crlf);
        assert_eq!(buffer.line_count(), 2);

        let messages = app.status.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].message_type, MessageType::Success);
        assert_eq!(messages[1].message_type, MessageType::Error);
        assert!(app.status.has_errors());
    }

    #[tokio::test]
    async fn test_save_all_reports_feature_unavailable() {
        let file = NamedTempFile::new().unwrap();
        let mut app = App::new(Config::default());
        app.open_files(vec![file.path().to_path_buf()]).await.unwrap();
        app.status.clear();

        app.save_all();

        let messages = app.status.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].message_type, MessageType::Warning);
        assert_eq!(messages[0].content, "feature unavailable: save");
        assert!(!app.status.has_errors());
    }

    #[test]
    fn test_close_buffer() {
        let mut app = App::new(Config::default());
        let id = app.engine_mut().new_buffer().id();
        app.close_buffer(id);
        app.close_buffer(BufferId(77));
        assert_eq!(app.engine().buffers().len(), 1);
    }

    #[test]
    fn test_render_table() {
        let mut app = App::new(Config::default());
        let table = app.render_table();
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("ENDING"));
        assert!(lines[1].contains("UNKNOWN"));
        assert!(lines[1].ends_with("new"));

        app.config.display.show_header = false;
        assert_eq!(app.render_table().lines().count(), 1);
    }

    #[test]
    fn test_shorten_name() {
        assert_eq!(shorten_name("short.txt", 20), "short.txt");
        assert_eq!(shorten_name("/very/long/path/file.txt", 9), "…file.txt");
        assert_eq!(shorten_name("/very/long/path/file.txt", 9).chars().count(), 9);
    }
}
