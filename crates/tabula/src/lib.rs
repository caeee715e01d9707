// Tabula library exports

pub mod command_processor;
pub mod config;
pub mod editor;
pub mod file_manager;
pub mod status_manager;

pub use command_processor::CommandProcessor;
pub use config::Config;
pub use editor::Editor;
pub use file_manager::FileManager;
pub use status_manager::{MessageType, StatusManager};
