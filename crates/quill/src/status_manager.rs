use std::fmt;

use bufcore::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Info,
    Success,
    Warning,
    Error,
}

impl MessageType {
    pub fn label(&self) -> &'static str {
        match self {
            MessageType::Info => "info",
            MessageType::Success => "ok",
            MessageType::Warning => "warning",
            MessageType::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub content: String,
    pub message_type: MessageType,
}

impl StatusMessage {
    pub fn new(content: String, message_type: MessageType) -> Self {
        Self {
            content,
            message_type,
        }
    }

    /// Turns an engine failure into something a user can act on.
    ///
    /// I/O errors are shown verbatim. Operations that are not implemented yet
    /// are reported as unavailable features, not failures.
    pub fn from_engine_error(err: &EngineError) -> Self {
        match err {
            EngineError::NotImplemented(operation) => Self::new(
                format!("feature unavailable: {}", operation),
                MessageType::Warning,
            ),
            EngineError::Io { .. } => Self::new(err.to_string(), MessageType::Error),
        }
    }
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.message_type.label(), self.content)
    }
}

/// Collects the messages produced while a command runs, in order.
#[derive(Debug, Clone, Default)]
pub struct StatusManager {
    messages: Vec<StatusMessage>,
}

impl StatusManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_info(&mut self, message: String) {
        self.push(StatusMessage::new(message, MessageType::Info));
    }

    pub fn set_success(&mut self, message: String) {
        self.push(StatusMessage::new(message, MessageType::Success));
    }

    pub fn set_warning(&mut self, message: String) {
        self.push(StatusMessage::new(message, MessageType::Warning));
    }

    pub fn set_error(&mut self, message: String) {
        self.push(StatusMessage::new(message, MessageType::Error));
    }

    pub fn report_engine_error(&mut self, err: &EngineError) {
        self.push(StatusMessage::from_engine_error(err));
    }

    fn push(&mut self, message: StatusMessage) {
        match message.message_type {
            MessageType::Error => log::error!("{}", message.content),
            MessageType::Warning => log::warn!("{}", message.content),
            MessageType::Info | MessageType::Success => log::info!("{}", message.content),
        }
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[StatusMessage] {
        &self.messages
    }

    pub fn has_errors(&self) -> bool {
        self.messages
            .iter()
            .any(|message| message.message_type == MessageType::Error)
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn has_message(&self) -> bool {
        !self.messages.is_empty()
    }
}
