use anyhow::Result;
use linecore::{Direction, SearchMatch};
use std::path::PathBuf;

use crate::editor::Editor;
use crate::file_manager::FileManager;

pub struct CommandProcessor;

impl CommandProcessor {
    pub fn new() -> Self {
        Self
    }

    /// Runs one command-line command and returns the status text for it.
    ///
    /// `/term` and `?term` search forward and backward; a bare `/` or `?`
    /// repeats the last search in that direction.
    pub async fn execute_command(
        &self,
        command: &str,
        editor: &mut Editor,
        file_manager: &mut FileManager,
        should_quit: &mut bool,
    ) -> Result<String> {
        let cmd = command.trim_start_matches(':').trim();

        if cmd.is_empty() {
            return Ok(String::new());
        }

        if let Some(term) = cmd.strip_prefix('/') {
            return Self::search(editor, term, Direction::Forward);
        }
        if let Some(term) = cmd.strip_prefix('?') {
            return Self::search(editor, term, Direction::Backward);
        }

        let parts: Vec<&str> = cmd.split_whitespace().collect();
        if parts.is_empty() {
            return Ok(String::new());
        }

        match parts.as_slice() {
            ["w"] => {
                if file_manager.has_file() {
                    file_manager.save_file(editor).await
                } else {
                    Err(anyhow::anyhow!("No file name specified"))
                }
            }
            ["w", path] => file_manager.save_file_as(PathBuf::from(path), editor).await,
            ["wq"] => {
                if !file_manager.has_file() {
                    return Err(anyhow::anyhow!("No file name specified"));
                }
                let result = file_manager.save_file(editor).await?;
                *should_quit = true;
                Ok(result)
            }
            ["wq", path] => {
                let result = file_manager
                    .save_file_as(PathBuf::from(path), editor)
                    .await?;
                *should_quit = true;
                Ok(result)
            }
            ["x"] => {
                let result = if editor.is_modified() {
                    if !file_manager.has_file() {
                        return Err(anyhow::anyhow!("No file name specified"));
                    }
                    file_manager.save_file(editor).await?
                } else {
                    String::new()
                };
                *should_quit = true;
                Ok(result)
            }
            ["q"] => {
                if editor.is_modified() {
                    Ok("No write since last change (add ! to override)".to_string())
                } else {
                    *should_quit = true;
                    Ok(String::new())
                }
            }
            ["q!"] => {
                *should_quit = true;
                Ok(String::new())
            }
            ["nohl"] | ["nohlsearch"] => {
                editor.clear_search();
                Ok("Search cleared".to_string())
            }
            ["set", "ic"] | ["set", "ignorecase"] => {
                editor.set_case_sensitive(false);
                Ok("Search is now case insensitive".to_string())
            }
            ["set", "noic"] | ["set", "noignorecase"] => {
                editor.set_case_sensitive(true);
                Ok("Search is now case sensitive".to_string())
            }
            ["u"] | ["undo"] => {
                if editor.undo() {
                    Ok("Undo successful".to_string())
                } else {
                    Ok("Nothing to undo".to_string())
                }
            }
            ["redo"] => {
                if editor.redo() {
                    Ok("Redo successful".to_string())
                } else {
                    Ok("Nothing to redo".to_string())
                }
            }
            ["n"] => {
                let direction = editor.search_state().direction();
                Self::repeat_search(editor, direction)
            }
            ["N"] => {
                let direction = editor.search_state().direction().reversed();
                Self::repeat_search(editor, direction)
            }
            _ => Err(anyhow::anyhow!("Unknown command: {}", cmd)),
        }
    }

    fn search(editor: &mut Editor, term: &str, direction: Direction) -> Result<String> {
        if term.is_empty() {
            return Self::repeat_search(editor, direction);
        }

        match editor.search(term, direction) {
            Some(found) => Ok(Self::match_message(&found, term, direction)),
            None => Err(anyhow::anyhow!("Pattern not found: {}", term)),
        }
    }

    fn repeat_search(editor: &mut Editor, direction: Direction) -> Result<String> {
        let state = editor.search_state();
        if !state.is_active() || state.term().is_empty() {
            return Err(anyhow::anyhow!("No previous search"));
        }
        let term = state.term().to_string();

        match editor.find_match(direction) {
            Some(found) => Ok(Self::match_message(&found, &term, direction)),
            None => Err(anyhow::anyhow!("Pattern not found: {}", term)),
        }
    }

    fn match_message(found: &SearchMatch, term: &str, direction: Direction) -> String {
        match (found.wrapped, direction) {
            (true, Direction::Forward) => "search hit BOTTOM, continuing at TOP".to_string(),
            (true, Direction::Backward) => "search hit TOP, continuing at BOTTOM".to_string(),
            (false, _) => format!("Found: {}", term),
        }
    }
}

impl Default for CommandProcessor {
    fn default() -> Self {
        Self::new()
    }
}
