//! Line-oriented text engine: gap-buffer lines in a linked document, a
//! bounded undo log that survives line removal, and wraparound search.

pub mod document;
pub mod gap_buffer;
pub mod search;
pub mod undo;

pub use document::{Cursor, Document, Line, LineId, LineObserver, Lines, NoopObserver};
pub use gap_buffer::GapBuffer;
pub use search::{
    search_in_line, search_in_line_backward, Direction, SearchMatch, SearchOptions, SearchState,
};
pub use undo::{UndoKind, UndoOperation, UndoOutcome, UndoStack};
