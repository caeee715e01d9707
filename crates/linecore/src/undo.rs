//! Bounded undo/redo log.
//!
//! Records point at lines through [`LineId`] handles and never own them.
//! Before replaying a record the stack checks that its target is still in
//! the document; a stale record is marked invalid and skipped, never applied.

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::document::{Document, LineId, LineObserver};

pub const DEFAULT_UNDO_CAPACITY: usize = 1000;

/// Longest text payload a record keeps, in characters.
pub const MAX_UNDO_PAYLOAD: usize = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UndoKind {
    InsertChar,
    DeleteChar,
    InsertLine,
    DeleteLine,
    SplitLine,
    MergeLines,
}

impl fmt::Display for UndoKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UndoKind::InsertChar => "insert char",
            UndoKind::DeleteChar => "delete char",
            UndoKind::InsertLine => "insert line",
            UndoKind::DeleteLine => "delete line",
            UndoKind::SplitLine => "split line",
            UndoKind::MergeLines => "merge lines",
        };
        f.write_str(name)
    }
}

/// One reversible edit, described as it happened.
///
/// `after: None` stands for the head of the list: the line was inserted or
/// deleted at the very beginning of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UndoOperation {
    /// `ch` was inserted into `line` at `column`.
    InsertChar { line: LineId, column: usize, ch: char },
    /// `ch` was deleted from `line` at `column`.
    DeleteChar { line: LineId, column: usize, ch: char },
    /// A line holding `text` was inserted right after `after`.
    InsertLine { after: Option<LineId>, text: String },
    /// The line right after `after`, holding `text`, was deleted.
    DeleteLine { after: Option<LineId>, text: String },
    /// `line` was split at `column`; `text` went to the new next line.
    SplitLine { line: LineId, column: usize, text: String },
    /// The line after `line`, holding `text`, was appended to `line` at `column`.
    MergeLines { line: LineId, column: usize, text: String },
}

impl UndoOperation {
    pub fn kind(&self) -> UndoKind {
        match self {
            UndoOperation::InsertChar { .. } => UndoKind::InsertChar,
            UndoOperation::DeleteChar { .. } => UndoKind::DeleteChar,
            UndoOperation::InsertLine { .. } => UndoKind::InsertLine,
            UndoOperation::DeleteLine { .. } => UndoKind::DeleteLine,
            UndoOperation::SplitLine { .. } => UndoKind::SplitLine,
            UndoOperation::MergeLines { .. } => UndoKind::MergeLines,
        }
    }

    /// The line this record depends on, `None` for the list-head sentinel.
    pub fn target(&self) -> Option<LineId> {
        match self {
            UndoOperation::InsertChar { line, .. }
            | UndoOperation::DeleteChar { line, .. }
            | UndoOperation::SplitLine { line, .. }
            | UndoOperation::MergeLines { line, .. } => Some(*line),
            UndoOperation::InsertLine { after, .. } | UndoOperation::DeleteLine { after, .. } => {
                *after
            }
        }
    }

    fn payload_mut(&mut self) -> Option<&mut String> {
        match self {
            UndoOperation::InsertChar { .. } | UndoOperation::DeleteChar { .. } => None,
            UndoOperation::InsertLine { text, .. }
            | UndoOperation::DeleteLine { text, .. }
            | UndoOperation::SplitLine { text, .. }
            | UndoOperation::MergeLines { text, .. } => Some(text),
        }
    }

    fn truncate_payload(&mut self) {
        let kind = self.kind();
        if let Some(text) = self.payload_mut() {
            if let Some((cut, _)) = text.char_indices().nth(MAX_UNDO_PAYLOAD) {
                log::warn!(
                    "{} payload truncated to {} characters",
                    kind,
                    MAX_UNDO_PAYLOAD
                );
                text.truncate(cut);
            }
        }
    }
}

/// What `perform_undo` / `perform_redo` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndoOutcome {
    Applied(UndoKind),
    /// The record was stale and has been invalidated without touching the document.
    Skipped(UndoKind),
    Nothing,
}

impl UndoOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, UndoOutcome::Applied(_))
    }
}

#[derive(Debug, Clone)]
struct UndoEntry {
    op: UndoOperation,
    valid: bool,
}

/// Fixed-capacity log of [`UndoOperation`]s.
///
/// Entries `[0, applied)` can be undone (the last one first); entries from
/// `applied` on are the redo horizon, dropped on the next push. When full,
/// pushing drops the oldest entry for good.
#[derive(Debug, Clone)]
pub struct UndoStack {
    entries: VecDeque<UndoEntry>,
    applied: usize,
    capacity: usize,
}

impl UndoStack {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_UNDO_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity.min(DEFAULT_UNDO_CAPACITY)),
            applied: 0,
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.applied = 0;
    }

    /// Records an edit. Call before mutating the document.
    pub fn push_operation(&mut self, mut op: UndoOperation) {
        self.entries.truncate(self.applied);
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
            log::trace!("undo log full, dropped oldest record");
        }

        op.truncate_payload();
        log::trace!("push {:?}", op);
        self.entries.push_back(UndoEntry { op, valid: true });
        self.applied = self.entries.len();
    }

    pub fn can_undo(&self) -> bool {
        self.applied > 0 && self.entries[self.applied - 1].valid
    }

    pub fn can_redo(&self) -> bool {
        self.entries
            .get(self.applied)
            .is_some_and(|entry| entry.valid)
    }

    /// The record the next undo would replay.
    pub fn peek_undo(&self) -> Option<&UndoOperation> {
        self.applied
            .checked_sub(1)
            .and_then(|index| self.entries.get(index))
            .map(|entry| &entry.op)
    }

    /// Clears the validity flag on every record targeting `id`.
    pub fn invalidate_operations_for_line(&mut self, id: LineId) {
        for entry in self.entries.iter_mut() {
            if entry.valid && entry.op.target() == Some(id) {
                entry.valid = false;
            }
        }
    }

    pub fn perform_undo(&mut self, document: &mut Document) -> UndoOutcome {
        if self.applied == 0 {
            return UndoOutcome::Nothing;
        }
        let index = self.applied - 1;
        self.applied = index;

        let Some(op) = self.replayable(index, document) else {
            return UndoOutcome::Skipped(self.entries[index].op.kind());
        };
        let kind = op.kind();

        if !self.revert(&op, document) {
            log::debug!("undo of {} no longer applies, skipping", kind);
            self.entries[index].valid = false;
        }
        document.validate_cursor();

        if self.entries[index].valid {
            UndoOutcome::Applied(kind)
        } else {
            UndoOutcome::Skipped(kind)
        }
    }

    pub fn perform_redo(&mut self, document: &mut Document) -> UndoOutcome {
        let index = self.applied;
        if index >= self.entries.len() {
            return UndoOutcome::Nothing;
        }

        let Some(op) = self.replayable(index, document) else {
            return UndoOutcome::Skipped(self.entries[index].op.kind());
        };
        let kind = op.kind();

        // Replay never frees the record's own target.
        let applied = self.replay(&op, document);
        document.validate_cursor();

        if applied {
            self.applied = index + 1;
            UndoOutcome::Applied(kind)
        } else {
            log::debug!("redo of {} no longer applies, skipping", kind);
            self.entries[index].valid = false;
            UndoOutcome::Skipped(kind)
        }
    }

    /// Clones the record at `index` if it is valid and its target is live;
    /// otherwise marks it invalid.
    fn replayable(&mut self, index: usize, document: &Document) -> Option<UndoOperation> {
        let entry = &mut self.entries[index];
        let live = entry.op.target().map_or(true, |id| document.contains(id));
        if entry.valid && live {
            return Some(entry.op.clone());
        }
        if entry.valid {
            log::debug!("skipping stale {} record", entry.op.kind());
        }
        entry.valid = false;
        None
    }

    fn revert(&mut self, op: &UndoOperation, document: &mut Document) -> bool {
        match op {
            UndoOperation::InsertChar { line, column, .. } => {
                let (line, column) = (*line, *column);
                let Some(target) = document.line_mut(line) else {
                    return false;
                };
                if column >= target.len() {
                    return false;
                }
                target.delete_char_at(column);

                let cursor = document.cursor();
                if cursor.line == line && cursor.column > column {
                    document.set_cursor(line, cursor.column - 1);
                }
                true
            }
            UndoOperation::DeleteChar { line, column, ch } => {
                let (line, column) = (*line, *column);
                let Some(target) = document.line_mut(line) else {
                    return false;
                };
                if column > target.len() {
                    return false;
                }
                target.insert_char_at(column, *ch);

                let cursor = document.cursor();
                if cursor.line == line && cursor.column > column {
                    document.set_cursor(line, cursor.column + 1);
                }
                true
            }
            UndoOperation::InsertLine { after, .. } => {
                let Some(inserted) = Self::line_after(document, *after) else {
                    return false;
                };
                let cursor_on_inserted = document.current_line() == inserted;
                document.remove_line(inserted, self);

                if cursor_on_inserted {
                    if let Some(after) = *after {
                        let len = document.line_len(after);
                        document.set_cursor(after, len);
                    }
                }
                true
            }
            UndoOperation::DeleteLine { after, text } => {
                let restored = document.create_line(text);
                let id = document.insert_line_after(*after, restored);
                document.set_cursor(id, 0);
                true
            }
            UndoOperation::SplitLine { line, column, .. } => {
                document.merge_next_at(*line, *column, self)
            }
            UndoOperation::MergeLines { line, column, .. } => {
                document.split_line_at(*line, *column).is_some()
            }
        }
    }

    fn replay(&mut self, op: &UndoOperation, document: &mut Document) -> bool {
        match op {
            UndoOperation::InsertChar { line, column, ch } => {
                let (line, column) = (*line, *column);
                let Some(target) = document.line_mut(line) else {
                    return false;
                };
                if column > target.len() {
                    return false;
                }
                target.insert_char_at(column, *ch);
                document.set_cursor(line, column + 1);
                true
            }
            UndoOperation::DeleteChar { line, column, .. } => {
                let (line, column) = (*line, *column);
                let Some(target) = document.line_mut(line) else {
                    return false;
                };
                if target.delete_char_at(column).is_none() {
                    return false;
                }
                document.set_cursor(line, column);
                true
            }
            UndoOperation::InsertLine { after, text } => {
                let line = document.create_line(text);
                let id = document.insert_line_after(*after, line);
                document.set_cursor(id, 0);
                true
            }
            UndoOperation::DeleteLine { after, .. } => {
                let Some(deleted) = Self::line_after(document, *after) else {
                    return false;
                };
                document.remove_line(deleted, self)
            }
            UndoOperation::SplitLine { line, column, .. } => {
                match document.split_line_at(*line, *column) {
                    Some(new_line) => {
                        document.set_cursor(new_line, 0);
                        true
                    }
                    None => false,
                }
            }
            UndoOperation::MergeLines { line, .. } => {
                let line = *line;
                let column = document.line_len(line);
                if !document.merge_next_at(line, column, self) {
                    return false;
                }
                document.set_cursor(line, column);
                true
            }
        }
    }

    /// The line following `after`, or the head for the sentinel.
    fn line_after(document: &Document, after: Option<LineId>) -> Option<LineId> {
        match after {
            Some(after) => document.next(after),
            None => Some(document.head()),
        }
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new()
    }
}

impl LineObserver for UndoStack {
    fn line_removed(&mut self, id: LineId) {
        self.invalidate_operations_for_line(id);
    }
}
