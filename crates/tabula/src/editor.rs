use linecore::{
    Direction, Document, LineId, SearchMatch, SearchState, UndoOperation, UndoOutcome, UndoStack,
};

use crate::config::Config;

/// Editing intents over one document.
///
/// Every undoable intent pushes its record onto the undo stack before it
/// touches the document.
#[derive(Debug, Clone)]
pub struct Editor {
    document: Document,
    undo: UndoStack,
    search: SearchState,
    modified: bool,
    tab_size: usize,
    use_spaces: bool,
}

impl Editor {
    pub fn new() -> Self {
        Self::with_config(&Config::default())
    }

    pub fn with_config(config: &Config) -> Self {
        Self {
            document: Document::with_line_capacity(config.editor.initial_line_capacity),
            undo: UndoStack::with_capacity(config.undo.capacity),
            search: SearchState::with_options(config.search),
            modified: false,
            tab_size: config.editor.tab_size,
            use_spaces: config.editor.use_spaces,
        }
    }

    /// Replaces the document with `content`, one line per `\n`-separated record.
    pub fn set_content(&mut self, content: String) {
        self.set_lines(content.split('\n'));
    }

    /// Replaces the document with loaded records. Clears undo and search.
    pub fn set_lines<I, S>(&mut self, records: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let capacity = self.document.line_capacity();
        self.document = Document::from_lines(records, capacity);
        self.undo.clear();
        self.search.clear_search();
        self.modified = false;
    }

    pub fn get_content(&self) -> String {
        self.document.to_text()
    }

    pub fn lines(&self) -> Vec<String> {
        self.document.lines()
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn undo_stack(&self) -> &UndoStack {
        &self.undo
    }

    pub fn search_state(&self) -> &SearchState {
        &self.search
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn mark_saved(&mut self) {
        self.modified = false;
    }

    pub fn line_count(&self) -> usize {
        self.document.line_count()
    }

    /// Cursor as (zero-based line number, column).
    pub fn cursor_position(&self) -> (usize, usize) {
        let line = self
            .document
            .line_number(self.document.current_line())
            .unwrap_or(0);
        (line, self.document.current_column())
    }

    pub fn set_cursor_position(&mut self, line: usize, col: usize) {
        let target = self
            .document
            .line_at(line)
            .unwrap_or_else(|| self.document.tail());
        self.document.set_cursor(target, col);
    }

    pub fn current_line_text(&self) -> String {
        self.document
            .text(self.document.current_line())
            .unwrap_or_default()
    }

    /// Set tab configuration
    pub fn set_tab_config(&mut self, tab_size: usize, use_spaces: bool) {
        self.tab_size = tab_size;
        self.use_spaces = use_spaces;
    }

    pub fn insert_char(&mut self, c: char) {
        if c == '\n' {
            self.insert_newline();
            return;
        }

        let cursor = self.document.cursor();
        self.undo.push_operation(UndoOperation::InsertChar {
            line: cursor.line,
            column: cursor.column,
            ch: c,
        });
        if let Some(line) = self.document.line_mut(cursor.line) {
            line.insert_char_at(cursor.column, c);
        }
        self.document.set_cursor(cursor.line, cursor.column + 1);
        self.modified = true;
    }

    pub fn insert_str(&mut self, text: &str) {
        for c in text.chars() {
            self.insert_char(c);
        }
    }

    pub fn insert_newline(&mut self) {
        let cursor = self.document.cursor();
        let text: String = self
            .current_line_text()
            .chars()
            .skip(cursor.column)
            .collect();

        self.undo.push_operation(UndoOperation::SplitLine {
            line: cursor.line,
            column: cursor.column,
            text,
        });
        if let Some(new_line) = self.document.split_line_at(cursor.line, cursor.column) {
            self.document.set_cursor(new_line, 0);
        }
        self.modified = true;
    }

    pub fn insert_tab(&mut self) {
        if self.use_spaces {
            for _ in 0..self.tab_size {
                self.insert_char(' ');
            }
        } else {
            self.insert_char('\t');
        }
    }

    /// Backspace. At column 0 the line joins the previous one.
    pub fn delete_char_backward(&mut self) {
        let cursor = self.document.cursor();

        if cursor.column > 0 {
            let column = cursor.column - 1;
            let Some(ch) = self
                .document
                .line(cursor.line)
                .and_then(|line| line.char_at(column))
            else {
                return;
            };
            self.undo.push_operation(UndoOperation::DeleteChar {
                line: cursor.line,
                column,
                ch,
            });
            if let Some(line) = self.document.line_mut(cursor.line) {
                line.delete_char_at(column);
            }
            self.document.set_cursor(cursor.line, column);
            self.modified = true;
        } else if let Some(prev) = self.document.prev(cursor.line) {
            self.join_with_next(prev);
        }
    }

    /// Delete under the cursor. At end of line the next line joins this one.
    pub fn delete_char_forward(&mut self) {
        let cursor = self.document.cursor();
        let ch = self
            .document
            .line(cursor.line)
            .and_then(|line| line.char_at(cursor.column));

        match ch {
            Some(ch) => {
                self.undo.push_operation(UndoOperation::DeleteChar {
                    line: cursor.line,
                    column: cursor.column,
                    ch,
                });
                if let Some(line) = self.document.line_mut(cursor.line) {
                    line.delete_char_at(cursor.column);
                }
                self.modified = true;
            }
            None => {
                if self.document.next(cursor.line).is_some() {
                    self.join_with_next(cursor.line);
                    self.document.set_cursor(cursor.line, cursor.column);
                }
            }
        }
    }

    fn join_with_next(&mut self, line: LineId) {
        let Some(next) = self.document.next(line) else {
            return;
        };
        let column = self.document.line_len(line);
        let text = self.document.text(next).unwrap_or_default();

        self.undo.push_operation(UndoOperation::MergeLines { line, column, text });
        if self.document.current_line() == next {
            self.document.set_cursor(next, 0);
        }
        self.document.merge_with_next(line, &mut self.undo);
        self.modified = true;
    }

    /// Opens an empty line below the cursor and moves onto it.
    pub fn open_line_below(&mut self) {
        let current = self.document.current_line();
        self.open_line_after(Some(current));
    }

    /// Opens an empty line above the cursor and moves onto it.
    pub fn open_line_above(&mut self) {
        let prev = self.document.prev(self.document.current_line());
        self.open_line_after(prev);
    }

    fn open_line_after(&mut self, after: Option<LineId>) {
        self.undo.push_operation(UndoOperation::InsertLine {
            after,
            text: String::new(),
        });
        let line = self.document.create_empty_line();
        let id = self.document.insert_line_after(after, line);
        self.document.set_cursor(id, 0);
        self.modified = true;
    }

    /// Deletes the current line and returns its text.
    ///
    /// The only line of a document is emptied rather than removed, which
    /// takes two undo steps to reverse.
    pub fn delete_line(&mut self) -> String {
        let line = self.document.current_line();
        let text = self.current_line_text();

        if self.document.line_count() == 1 {
            if text.is_empty() {
                return text;
            }
            self.undo.push_operation(UndoOperation::SplitLine {
                line,
                column: 0,
                text: text.clone(),
            });
            let Some(rest) = self.document.split_line_at(line, 0) else {
                return text;
            };
            self.undo.push_operation(UndoOperation::DeleteLine {
                after: Some(line),
                text: text.clone(),
            });
            self.document.remove_line(rest, &mut self.undo);
            self.document.set_cursor(line, 0);
            self.modified = true;
            return text;
        }

        let prev = self.document.prev(line);
        let landing = self.document.next(line).or(prev);

        self.undo.push_operation(UndoOperation::DeleteLine {
            after: prev,
            text: text.clone(),
        });
        self.document.remove_line(line, &mut self.undo);
        if let Some(landing) = landing {
            self.document.set_cursor(landing, 0);
        }
        self.modified = true;
        text
    }

    pub fn move_cursor_up(&mut self) {
        let cursor = self.document.cursor();
        if let Some(prev) = self.document.prev(cursor.line) {
            self.document.set_cursor(prev, cursor.column);
        }
    }

    pub fn move_cursor_down(&mut self) {
        let cursor = self.document.cursor();
        if let Some(next) = self.document.next(cursor.line) {
            self.document.set_cursor(next, cursor.column);
        }
    }

    pub fn move_cursor_left(&mut self) {
        let cursor = self.document.cursor();
        if cursor.column > 0 {
            self.document.set_cursor_column(cursor.column - 1);
        } else if let Some(prev) = self.document.prev(cursor.line) {
            let len = self.document.line_len(prev);
            self.document.set_cursor(prev, len);
        }
    }

    pub fn move_cursor_right(&mut self) {
        let cursor = self.document.cursor();
        if cursor.column < self.document.line_len(cursor.line) {
            self.document.set_cursor_column(cursor.column + 1);
        } else if let Some(next) = self.document.next(cursor.line) {
            self.document.set_cursor(next, 0);
        }
    }

    pub fn move_to_line_start(&mut self) {
        self.document.set_cursor_column(0);
    }

    pub fn move_to_line_end(&mut self) {
        let len = self.document.line_len(self.document.current_line());
        self.document.set_cursor_column(len);
    }

    pub fn move_to_document_start(&mut self) {
        let head = self.document.head();
        self.document.set_cursor(head, 0);
    }

    pub fn move_to_document_end(&mut self) {
        let tail = self.document.tail();
        let len = self.document.line_len(tail);
        self.document.set_cursor(tail, len);
    }

    pub fn can_undo(&self) -> bool {
        self.undo.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.undo.can_redo()
    }

    /// Undoes the latest edit that still applies, passing over stale records.
    pub fn undo(&mut self) -> bool {
        loop {
            match self.undo.perform_undo(&mut self.document) {
                UndoOutcome::Applied(kind) => {
                    log::debug!("undid {}", kind);
                    self.modified = true;
                    return true;
                }
                UndoOutcome::Skipped(_) => continue,
                UndoOutcome::Nothing => return false,
            }
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.undo.perform_redo(&mut self.document) {
            UndoOutcome::Applied(kind) => {
                log::debug!("redid {}", kind);
                self.modified = true;
                true
            }
            UndoOutcome::Skipped(_) | UndoOutcome::Nothing => false,
        }
    }

    /// Starts a search from the cursor and jumps to the first match.
    pub fn search(&mut self, term: &str, direction: Direction) -> Option<SearchMatch> {
        self.search.perform_search(&mut self.document, term, direction)
    }

    /// Next match in the direction of the last search (`n`).
    pub fn search_next(&mut self) -> Option<SearchMatch> {
        self.find_match(self.search.direction())
    }

    /// Next match against the direction of the last search (`N`).
    pub fn search_previous(&mut self) -> Option<SearchMatch> {
        self.find_match(self.search.direction().reversed())
    }

    pub fn find_match(&mut self, direction: Direction) -> Option<SearchMatch> {
        match direction {
            Direction::Forward => self.search.find_next(&mut self.document),
            Direction::Backward => self.search.find_previous(&mut self.document),
        }
    }

    pub fn clear_search(&mut self) {
        self.search.clear_search();
    }

    pub fn set_case_sensitive(&mut self, case_sensitive: bool) {
        self.search.set_case_sensitive(case_sensitive);
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_editor_creation() {
        let editor = Editor::new();
        assert_eq!(editor.cursor_position(), (0, 0));
        assert_eq!(editor.line_count(), 1);
        assert!(!editor.is_modified());
        assert!(!editor.can_undo());
    }

    #[test]
    fn test_text_insertion() {
        let mut editor = Editor::new();
        editor.insert_str("hello");

        assert_eq!(editor.get_content(), "hello");
        assert_eq!(editor.cursor_position(), (0, 5));
        assert!(editor.is_modified());
    }

    #[test]
    fn test_newline_insertion() {
        let mut editor = Editor::new();
        editor.insert_str("Hi\n!");

        assert_eq!(editor.get_content(), "Hi\n!");
        assert_eq!(editor.cursor_position(), (1, 1));
        assert_eq!(editor.line_count(), 2);
    }

    #[test]
    fn test_split_in_middle_of_line() {
        let mut editor = Editor::new();
        editor.set_content("Hello World".to_string());
        editor.set_cursor_position(0, 6);
        editor.insert_newline();

        assert_eq!(editor.lines(), vec!["Hello ", "World"]);
        assert_eq!(editor.cursor_position(), (1, 0));

        assert!(editor.undo());
        assert_eq!(editor.lines(), vec!["Hello World"]);
        assert!(editor.redo());
        assert_eq!(editor.lines(), vec!["Hello ", "World"]);
    }

    #[test]
    fn test_backspace() {
        let mut editor = Editor::new();
        editor.insert_str("Hi");
        editor.delete_char_backward();

        assert_eq!(editor.get_content(), "H");
        assert_eq!(editor.cursor_position(), (0, 1));
    }

    #[test]
    fn test_backspace_joins_lines() {
        let mut editor = Editor::new();
        editor.set_content("abc\ndef".to_string());
        editor.set_cursor_position(1, 0);
        editor.delete_char_backward();

        assert_eq!(editor.lines(), vec!["abcdef"]);
        assert_eq!(editor.cursor_position(), (0, 3));

        assert!(editor.undo());
        assert_eq!(editor.lines(), vec!["abc", "def"]);
        assert!(editor.redo());
        assert_eq!(editor.lines(), vec!["abcdef"]);
    }

    #[test]
    fn test_delete_forward_joins_at_end_of_line() {
        let mut editor = Editor::new();
        editor.set_content("ab\ncd".to_string());
        editor.move_to_line_end();
        editor.delete_char_forward();

        assert_eq!(editor.lines(), vec!["abcd"]);
        assert_eq!(editor.cursor_position(), (0, 2));

        editor.delete_char_forward();
        assert_eq!(editor.lines(), vec!["abd"]);

        editor.move_to_document_end();
        editor.delete_char_forward();
        assert_eq!(editor.lines(), vec!["abd"]);
    }

    #[test]
    fn test_undo_a_deletion() {
        let mut editor = Editor::new();
        editor.set_content("Testing".to_string());
        editor.set_cursor_position(0, 6);
        editor.delete_char_forward();
        assert_eq!(editor.get_content(), "Testin");
        assert!(editor.can_undo());

        assert!(editor.undo());
        assert_eq!(editor.get_content(), "Testing");
        assert!(editor.redo());
        assert_eq!(editor.get_content(), "Testin");
    }

    #[test]
    fn test_cursor_movement() {
        let mut editor = Editor::new();
        editor.set_content("Hello\nWorld".to_string());

        editor.move_cursor_right();
        assert_eq!(editor.cursor_position(), (0, 1));

        editor.move_cursor_down();
        assert_eq!(editor.cursor_position(), (1, 1));

        editor.move_cursor_left();
        editor.move_cursor_left();
        assert_eq!(editor.cursor_position(), (0, 5));

        editor.move_cursor_right();
        assert_eq!(editor.cursor_position(), (1, 0));

        editor.move_cursor_up();
        assert_eq!(editor.cursor_position(), (0, 0));

        editor.move_to_document_end();
        assert_eq!(editor.cursor_position(), (1, 5));
        editor.move_to_document_start();
        assert_eq!(editor.cursor_position(), (0, 0));
    }

    #[test]
    fn test_vertical_motion_clamps_column() {
        let mut editor = Editor::new();
        editor.set_content("long line\nab".to_string());
        editor.move_to_line_end();
        editor.move_cursor_down();
        assert_eq!(editor.cursor_position(), (1, 2));
    }

    #[test]
    fn test_delete_line() {
        let mut editor = Editor::new();
        editor.set_content("Line 1\nLine 2\nLine 3".to_string());
        editor.set_cursor_position(1, 3);

        assert_eq!(editor.delete_line(), "Line 2");
        assert_eq!(editor.get_content(), "Line 1\nLine 3");
        assert_eq!(editor.cursor_position(), (1, 0));

        assert!(editor.undo());
        assert_eq!(editor.get_content(), "Line 1\nLine 2\nLine 3");
        assert!(editor.redo());
        assert_eq!(editor.get_content(), "Line 1\nLine 3");
    }

    #[test]
    fn test_delete_first_line_undoes_at_head() {
        let mut editor = Editor::new();
        editor.set_content("first\nsecond".to_string());
        editor.delete_line();
        assert_eq!(editor.lines(), vec!["second"]);

        assert!(editor.undo());
        assert_eq!(editor.lines(), vec!["first", "second"]);
    }

    #[test]
    fn test_delete_only_line() {
        let mut editor = Editor::new();
        editor.set_content("alone".to_string());

        assert_eq!(editor.delete_line(), "alone");
        assert_eq!(editor.lines(), vec![""]);
        assert_eq!(editor.line_count(), 1);

        assert!(editor.undo());
        assert!(editor.undo());
        assert_eq!(editor.lines(), vec!["alone"]);
    }

    #[test]
    fn test_open_lines() {
        let mut editor = Editor::new();
        editor.set_content("middle".to_string());

        editor.open_line_below();
        editor.insert_str("below");
        editor.move_to_document_start();
        editor.open_line_above();
        editor.insert_str("above");

        assert_eq!(editor.lines(), vec!["above", "middle", "below"]);
        assert_eq!(editor.cursor_position(), (0, 5));

        while editor.undo() {}
        assert_eq!(editor.lines(), vec!["middle"]);
    }

    #[test]
    fn test_insert_tab() {
        let mut editor = Editor::new();
        editor.set_tab_config(2, true);
        editor.insert_tab();
        assert_eq!(editor.get_content(), "  ");

        editor.set_tab_config(4, false);
        editor.insert_tab();
        assert_eq!(editor.get_content(), "  \t");
    }

    #[test]
    fn test_modified_state() {
        let mut editor = Editor::new();
        assert!(!editor.is_modified());

        editor.insert_char('a');
        assert!(editor.is_modified());

        editor.mark_saved();
        assert!(!editor.is_modified());

        editor.undo();
        assert!(editor.is_modified());
    }

    #[test]
    fn test_set_content_resets_history() {
        let mut editor = Editor::new();
        editor.insert_str("abc");
        editor.search("b", Direction::Forward);

        editor.set_content("fresh".to_string());
        assert!(!editor.can_undo());
        assert!(!editor.undo());
        assert!(!editor.search_state().is_active());
        assert!(!editor.is_modified());
        assert_eq!(editor.cursor_position(), (0, 0));
    }

    #[test]
    fn test_undo_redo_functionality() {
        let mut editor = Editor::new();
        assert!(!editor.undo());
        assert!(!editor.redo());

        editor.insert_str("Hi");
        assert!(editor.undo());
        assert_eq!(editor.get_content(), "H");
        assert!(editor.redo());
        assert_eq!(editor.get_content(), "Hi");

        editor.insert_char('!');
        assert!(!editor.can_redo());
        assert!(editor.undo());
        assert!(editor.undo());
        assert!(editor.undo());
        assert_eq!(editor.get_content(), "");
        assert!(!editor.undo());
    }

    #[test]
    fn test_undo_passes_over_stale_records() {
        let mut editor = Editor::new();
        editor.set_content("keep\n".to_string());
        editor.set_cursor_position(1, 0);
        editor.insert_str("typed");
        editor.delete_line();
        assert_eq!(editor.lines(), vec!["keep"]);

        assert!(editor.undo());
        assert_eq!(editor.lines(), vec!["keep", "typed"]);
        // the typing happened on a line that no longer exists
        assert!(!editor.undo());
        assert_eq!(editor.lines(), vec!["keep", "typed"]);
    }

    #[test]
    fn test_history_limit() {
        let mut config = Config::default();
        config.undo.capacity = 3;
        let mut editor = Editor::with_config(&config);

        editor.insert_str("abcde");
        let mut undone = 0;
        while editor.undo() {
            undone += 1;
        }
        assert_eq!(undone, 3);
        assert_eq!(editor.get_content(), "ab");
    }

    #[test]
    fn test_search_functionality() {
        let mut editor = Editor::new();
        editor.set_content("Hello World\nHi there\nworld".to_string());

        let found = editor.search("World", Direction::Forward).unwrap();
        assert!(!found.wrapped);
        assert_eq!(editor.cursor_position(), (0, 6));

        // case-insensitive by default
        editor.search_next().unwrap();
        assert_eq!(editor.cursor_position(), (2, 0));

        editor.search_previous().unwrap();
        assert_eq!(editor.cursor_position(), (0, 6));

        editor.set_case_sensitive(true);
        editor.search_next().unwrap();
        let wrapped = editor.search_next().unwrap();
        assert_eq!(editor.cursor_position(), (0, 6));
        assert!(wrapped.wrapped);
    }

    #[test]
    fn test_backward_search_next_keeps_direction() {
        let mut editor = Editor::new();
        editor.set_content("x\nx\nx".to_string());
        editor.move_to_document_end();

        editor.search("x", Direction::Backward).unwrap();
        assert_eq!(editor.cursor_position(), (2, 0));
        editor.search_next().unwrap();
        assert_eq!(editor.cursor_position(), (1, 0));
        editor.search_previous().unwrap();
        assert_eq!(editor.cursor_position(), (2, 0));
    }

    #[test]
    fn test_search_not_found_keeps_cursor() {
        let mut editor = Editor::new();
        editor.set_content("alpha\nbeta".to_string());
        editor.set_cursor_position(1, 2);

        assert!(editor.search("gamma", Direction::Forward).is_none());
        assert_eq!(editor.cursor_position(), (1, 2));
    }

    #[test]
    fn test_unicode_characters_are_single_columns() {
        let mut editor = Editor::new();
        editor.insert_str("こんにちは");
        assert_eq!(editor.cursor_position(), (0, 5));

        editor.delete_char_backward();
        assert_eq!(editor.get_content(), "こんにち");
        assert!(editor.undo());
        assert_eq!(editor.get_content(), "こんにちは");
    }

    #[derive(Debug, Clone)]
    enum Intent {
        Type(char),
        Newline,
        Backspace,
        Delete,
        DeleteLine,
        OpenBelow,
        OpenAbove,
        Left,
        Right,
        Up,
        Down,
        Undo,
        Redo,
    }

    fn growing_intent() -> impl Strategy<Value = Intent> {
        prop_oneof![
            4 => proptest::char::range('a', 'e').prop_map(Intent::Type),
            1 => Just(Intent::Newline),
            1 => Just(Intent::OpenBelow),
            1 => Just(Intent::OpenAbove),
            1 => Just(Intent::Left),
            1 => Just(Intent::Right),
            1 => Just(Intent::Up),
            1 => Just(Intent::Down),
        ]
    }

    fn any_intent() -> impl Strategy<Value = Intent> {
        prop_oneof![
            growing_intent(),
            Just(Intent::Backspace),
            Just(Intent::Delete),
            Just(Intent::DeleteLine),
            Just(Intent::Undo),
            Just(Intent::Redo),
        ]
    }

    fn apply(editor: &mut Editor, intent: &Intent) {
        match intent {
            Intent::Type(c) => editor.insert_char(*c),
            Intent::Newline => editor.insert_newline(),
            Intent::Backspace => editor.delete_char_backward(),
            Intent::Delete => editor.delete_char_forward(),
            Intent::DeleteLine => {
                editor.delete_line();
            }
            Intent::OpenBelow => editor.open_line_below(),
            Intent::OpenAbove => editor.open_line_above(),
            Intent::Left => editor.move_cursor_left(),
            Intent::Right => editor.move_cursor_right(),
            Intent::Up => editor.move_cursor_up(),
            Intent::Down => editor.move_cursor_down(),
            Intent::Undo => {
                editor.undo();
            }
            Intent::Redo => {
                editor.redo();
            }
        }
    }

    fn assert_cursor_valid(editor: &Editor) {
        let document = editor.document();
        let cursor = document.cursor();
        assert!(document.contains(cursor.line));
        assert!(cursor.column <= document.line_len(cursor.line));
        assert_eq!(document.iter().count(), document.line_count());
    }

    proptest! {
        #[test]
        fn undoing_everything_restores_original(
            content in "[a-z\\n]{0,20}",
            intents in proptest::collection::vec(growing_intent(), 0..40),
        ) {
            let mut editor = Editor::new();
            editor.set_content(content.clone());
            for intent in &intents {
                apply(&mut editor, intent);
            }

            while editor.undo() {}
            prop_assert_eq!(editor.get_content(), content);
        }

        #[test]
        fn cursor_stays_valid_under_any_intents(
            content in "[a-z\\n]{0,20}",
            intents in proptest::collection::vec(any_intent(), 0..60),
        ) {
            let mut editor = Editor::new();
            editor.set_content(content);
            for intent in &intents {
                apply(&mut editor, intent);
                assert_cursor_valid(&editor);
            }

            while editor.undo() {
                assert_cursor_valid(&editor);
            }
            while editor.redo() {
                assert_cursor_valid(&editor);
            }
        }
    }
}
