use std::fmt;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MessageType {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub content: String,
    pub message_type: MessageType,
    pub created_at: Instant,
    pub auto_clear_duration: Option<Duration>,
}

impl StatusMessage {
    pub fn new(content: String, message_type: MessageType) -> Self {
        let auto_clear_duration = Self::default_duration_for_type(message_type);
        Self {
            content,
            message_type,
            created_at: Instant::now(),
            auto_clear_duration,
        }
    }

    pub fn with_duration(content: String, message_type: MessageType, duration: Duration) -> Self {
        Self {
            content,
            message_type,
            created_at: Instant::now(),
            auto_clear_duration: Some(duration),
        }
    }

    pub fn permanent(content: String, message_type: MessageType) -> Self {
        Self {
            content,
            message_type,
            created_at: Instant::now(),
            auto_clear_duration: None,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.auto_clear_duration
            .is_some_and(|duration| self.created_at.elapsed() > duration)
    }

    fn default_duration_for_type(message_type: MessageType) -> Option<Duration> {
        match message_type {
            MessageType::Info => Some(Duration::from_secs(3)),
            MessageType::Success => Some(Duration::from_secs(2)),
            MessageType::Warning => Some(Duration::from_secs(5)),
            MessageType::Error => Some(Duration::from_secs(7)),
        }
    }
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.message_type {
            MessageType::Info | MessageType::Success => write!(f, "{}", self.content),
            MessageType::Warning => write!(f, "W: {}", self.content),
            MessageType::Error => write!(f, "E: {}", self.content),
        }
    }
}

#[derive(Clone, Default)]
pub struct StatusManager {
    pub current_message: Option<StatusMessage>,
}

impl StatusManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_info(&mut self, message: String) {
        self.current_message = Some(StatusMessage::new(message, MessageType::Info));
    }

    pub fn set_success(&mut self, message: String) {
        self.current_message = Some(StatusMessage::new(message, MessageType::Success));
    }

    pub fn set_warning(&mut self, message: String) {
        self.current_message = Some(StatusMessage::new(message, MessageType::Warning));
    }

    pub fn set_error(&mut self, message: String) {
        self.current_message = Some(StatusMessage::new(message, MessageType::Error));
    }

    pub fn set_permanent(&mut self, message: String, message_type: MessageType) {
        self.current_message = Some(StatusMessage::permanent(message, message_type));
    }

    /// Shows the outcome of a command: errors as errors, anything else as info.
    /// An empty success clears the line.
    pub fn report(&mut self, result: &anyhow::Result<String>) {
        match result {
            Ok(message) if message.is_empty() => self.clear(),
            Ok(message) => self.set_info(message.clone()),
            Err(e) => self.set_error(e.to_string()),
        }
    }

    pub fn clear(&mut self) {
        self.current_message = None;
    }

    pub fn update(&mut self) {
        if self
            .current_message
            .as_ref()
            .is_some_and(StatusMessage::is_expired)
        {
            self.current_message = None;
        }
    }

    pub fn get_current_message(&self) -> Option<&StatusMessage> {
        self.current_message.as_ref()
    }

    pub fn has_message(&self) -> bool {
        self.current_message.is_some()
    }
}
