//! Lines and the document that owns them.
//!
//! Lines live in an arena of slots addressed by [`LineId`] handles. Each
//! handle carries the generation of the slot it was issued for; freeing a
//! slot bumps its generation, so a handle kept past the removal of its line
//! is detected in O(1) instead of being followed into a recycled slot.

use std::fmt;

use crate::gap_buffer::{GapBuffer, DEFAULT_CAPACITY};

/// Generational handle to a line inside one [`Document`].
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineId {
    index: u32,
    generation: u32,
}

impl fmt::Debug for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LineId({}v{})", self.index, self.generation)
    }
}

/// Gets told about every line the document is about to free.
///
/// The call happens before the slot is released, while the handle is still
/// live, so the observer can drop any record that targets it.
pub trait LineObserver {
    fn line_removed(&mut self, id: LineId);
}

/// Observer for code paths that keep no references to lines.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl LineObserver for NoopObserver {
    fn line_removed(&mut self, _id: LineId) {}
}

/// One row of text: a gap buffer plus its list links.
#[derive(Debug, Clone)]
pub struct Line {
    buffer: GapBuffer,
    prev: Option<LineId>,
    next: Option<LineId>,
}

impl Line {
    pub fn new(content: &str) -> Self {
        Self::with_capacity(content, DEFAULT_CAPACITY)
    }

    pub fn empty() -> Self {
        Self::with_capacity("", DEFAULT_CAPACITY)
    }

    pub fn with_capacity(content: &str, min_capacity: usize) -> Self {
        Self {
            buffer: GapBuffer::with_text(content, min_capacity),
            prev: None,
            next: None,
        }
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    pub fn chars(&self) -> impl Iterator<Item = char> + '_ {
        self.buffer.chars()
    }

    pub fn char_at(&self, position: usize) -> Option<char> {
        self.buffer.char_at(position)
    }

    pub fn insert_char_at(&mut self, position: usize, c: char) {
        self.buffer.insert_char_at(position, c);
    }

    pub fn insert_str_at(&mut self, position: usize, s: &str) {
        self.buffer.insert_str_at(position, s);
    }

    pub fn delete_char_at(&mut self, position: usize) -> Option<char> {
        self.buffer.delete_char_at(position)
    }

    pub fn delete_char_before(&mut self, position: usize) -> Option<char> {
        self.buffer.delete_char_before_at(position)
    }

    pub fn truncate_at(&mut self, position: usize) -> String {
        self.buffer.truncate_at(position)
    }

    pub fn buffer(&self) -> &GapBuffer {
        &self.buffer
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.buffer, f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub line: LineId,
    pub column: usize,
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    line: Option<Line>,
}

/// A doubly linked sequence of lines with a tracked cursor.
///
/// The list is never empty: removing the last remaining line puts a fresh
/// empty line in its place.
#[derive(Debug, Clone)]
pub struct Document {
    slots: Vec<Slot>,
    free: Vec<u32>,
    head: LineId,
    tail: LineId,
    count: usize,
    cursor: Cursor,
    line_capacity: usize,
}

impl Document {
    pub fn new() -> Self {
        Self::with_line_capacity(DEFAULT_CAPACITY)
    }

    /// Creates a document of one empty line whose lines start with
    /// `line_capacity` slots of gap.
    pub fn with_line_capacity(line_capacity: usize) -> Self {
        let first = LineId {
            index: 0,
            generation: 0,
        };
        Self {
            slots: vec![Slot {
                generation: 0,
                line: Some(Line::with_capacity("", line_capacity)),
            }],
            free: Vec::new(),
            head: first,
            tail: first,
            count: 1,
            cursor: Cursor {
                line: first,
                column: 0,
            },
            line_capacity,
        }
    }

    /// Builds a document from loaded records, one line per record.
    ///
    /// An empty source yields exactly one empty line.
    pub fn from_lines<I, S>(records: I, line_capacity: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut document = Self::with_line_capacity(line_capacity);
        let mut records = records.into_iter();

        if let Some(first) = records.next() {
            let head = document.head;
            if let Some(line) = document.line_mut(head) {
                line.insert_str_at(0, first.as_ref());
            }
            for record in records {
                let line = document.create_line(record.as_ref());
                document.insert_line_at_end(line);
            }
        }

        document.cursor = Cursor {
            line: document.head,
            column: 0,
        };
        document
    }

    /// A new unlinked line using this document's line capacity.
    pub fn create_line(&self, content: &str) -> Line {
        Line::with_capacity(content, self.line_capacity)
    }

    pub fn create_empty_line(&self) -> Line {
        self.create_line("")
    }

    pub fn head(&self) -> LineId {
        self.head
    }

    pub fn tail(&self) -> LineId {
        self.tail
    }

    pub fn line_count(&self) -> usize {
        self.count
    }

    pub fn line_capacity(&self) -> usize {
        self.line_capacity
    }

    /// O(1) membership test: the handle's slot is occupied by the same generation.
    pub fn contains(&self, id: LineId) -> bool {
        self.line(id).is_some()
    }

    pub fn line(&self, id: LineId) -> Option<&Line> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.line.as_ref())
    }

    pub fn line_mut(&mut self, id: LineId) -> Option<&mut Line> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.line.as_mut())
    }

    pub fn text(&self, id: LineId) -> Option<String> {
        self.line(id).map(Line::text)
    }

    /// Length of a line, 0 for stale handles.
    pub fn line_len(&self, id: LineId) -> usize {
        self.line(id).map_or(0, Line::len)
    }

    pub fn next(&self, id: LineId) -> Option<LineId> {
        self.line(id).and_then(|line| line.next)
    }

    pub fn prev(&self, id: LineId) -> Option<LineId> {
        self.line(id).and_then(|line| line.prev)
    }

    pub fn iter(&self) -> Lines<'_> {
        Lines {
            document: self,
            next: Some(self.head),
        }
    }

    /// Zero-based position of a line in list order.
    pub fn line_number(&self, id: LineId) -> Option<usize> {
        self.iter().position(|(line_id, _)| line_id == id)
    }

    /// Handle of the line at zero-based position `n`.
    pub fn line_at(&self, n: usize) -> Option<LineId> {
        self.iter().nth(n).map(|(id, _)| id)
    }

    pub fn lines(&self) -> Vec<String> {
        self.iter().map(|(_, line)| line.text()).collect()
    }

    pub fn to_text(&self) -> String {
        self.lines().join("\n")
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn current_line(&self) -> LineId {
        self.cursor.line
    }

    pub fn current_column(&self) -> usize {
        self.cursor.column
    }

    /// Moves the cursor, clamping the column. Stale handles are ignored.
    pub fn set_cursor(&mut self, id: LineId, column: usize) {
        if let Some(line) = self.line(id) {
            let column = column.min(line.len());
            self.cursor = Cursor { line: id, column };
        }
    }

    pub fn set_cursor_column(&mut self, column: usize) {
        let line = self.cursor.line;
        self.set_cursor(line, column);
    }

    /// Restores the cursor invariants after a mutation.
    ///
    /// A cursor on a line that left the list goes to the head at column 0;
    /// otherwise its column is clamped to the line length.
    pub fn validate_cursor(&mut self) {
        if !self.contains(self.cursor.line) {
            self.cursor = Cursor {
                line: self.head,
                column: 0,
            };
            return;
        }
        let len = self.line_len(self.cursor.line);
        if self.cursor.column > len {
            self.cursor.column = len;
        }
    }

    /// Splices `line` in right after `prev`, or at the head when `prev` is `None`.
    ///
    /// A stale `prev` appends at the tail.
    pub fn insert_line_after(&mut self, prev: Option<LineId>, line: Line) -> LineId {
        match prev {
            None => self.insert_line_at_beginning(line),
            Some(prev) if !self.contains(prev) => {
                log::debug!("insert after stale {:?}, appending at tail", prev);
                self.insert_line_at_end(line)
            }
            Some(prev) => {
                let next = self.next(prev);
                let id = self.alloc(line, Some(prev), next);

                self.set_next(prev, Some(id));
                match next {
                    Some(next) => self.set_prev(next, Some(id)),
                    None => self.tail = id,
                }
                self.count += 1;
                id
            }
        }
    }

    pub fn insert_line_at_end(&mut self, line: Line) -> LineId {
        let tail = self.tail;
        let id = self.alloc(line, Some(tail), None);
        self.set_next(tail, Some(id));
        self.tail = id;
        self.count += 1;
        id
    }

    pub fn insert_line_at_beginning(&mut self, line: Line) -> LineId {
        let head = self.head;
        let id = self.alloc(line, None, Some(head));
        self.set_prev(head, Some(id));
        self.head = id;
        self.count += 1;
        id
    }

    /// Unlinks and frees a line. Returns false for stale handles.
    ///
    /// `observer` is notified before the slot is freed. Removing the only
    /// line leaves a fresh empty line behind. A cursor on the removed line
    /// moves to its predecessor, or its successor at the head.
    pub fn remove_line(&mut self, id: LineId, observer: &mut dyn LineObserver) -> bool {
        if !self.contains(id) {
            return false;
        }

        if self.count == 1 {
            let fresh = self.create_empty_line();
            self.insert_line_after(Some(id), fresh);
        }

        let prev = self.prev(id);
        let next = self.next(id);

        match prev {
            Some(prev) => self.set_next(prev, next),
            None => {
                if let Some(next) = next {
                    self.head = next;
                }
            }
        }
        match next {
            Some(next) => self.set_prev(next, prev),
            None => {
                if let Some(prev) = prev {
                    self.tail = prev;
                }
            }
        }
        self.count -= 1;

        if self.cursor.line == id {
            match prev.or(next) {
                Some(target) => {
                    let column = if prev.is_some() { self.cursor.column } else { 0 };
                    self.cursor = Cursor {
                        line: target,
                        column: column.min(self.line_len(target)),
                    };
                }
                None => self.cursor = Cursor { line: self.head, column: 0 },
            }
        }

        observer.line_removed(id);
        self.release(id);
        true
    }

    /// Removes a line and hands back its text.
    pub fn delete_line(&mut self, id: LineId, observer: &mut dyn LineObserver) -> Option<String> {
        let text = self.text(id)?;
        self.remove_line(id, observer);
        Some(text)
    }

    /// Moves the text from `column` onward into a new line right after `id`.
    ///
    /// A cursor on `id` at or past `column` follows the text onto the new line.
    pub fn split_line_at(&mut self, id: LineId, column: usize) -> Option<LineId> {
        let line = self.line_mut(id)?;
        let column = column.min(line.len());
        let tail_text = line.truncate_at(column);

        let new_line = self.create_line(&tail_text);
        let new_id = self.insert_line_after(Some(id), new_line);

        if self.cursor.line == id && self.cursor.column >= column {
            self.cursor = Cursor {
                line: new_id,
                column: self.cursor.column - column,
            };
        }
        Some(new_id)
    }

    /// Appends the following line's text to `id` and removes the following line.
    pub fn merge_with_next(&mut self, id: LineId, observer: &mut dyn LineObserver) -> bool {
        let len = self.line_len(id);
        self.merge_next_at(id, len, observer)
    }

    /// Inserts the following line's text into `id` at `column`, then removes
    /// the following line. A cursor on the removed line lands on the same
    /// character in `id`.
    pub fn merge_next_at(
        &mut self,
        id: LineId,
        column: usize,
        observer: &mut dyn LineObserver,
    ) -> bool {
        let Some(next) = self.next(id) else {
            return false;
        };
        let next_text = self.text(next).unwrap_or_default();

        let Some(line) = self.line_mut(id) else {
            return false;
        };
        let column = column.min(line.len());
        line.insert_str_at(column, &next_text);

        if self.cursor.line == next {
            self.cursor = Cursor {
                line: id,
                column: column + self.cursor.column,
            };
        }

        self.remove_line(next, observer)
    }

    fn alloc(&mut self, mut line: Line, prev: Option<LineId>, next: Option<LineId>) -> LineId {
        line.prev = prev;
        line.next = next;

        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.line = Some(line);
                LineId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    line: Some(line),
                });
                LineId {
                    index,
                    generation: 0,
                }
            }
        }
    }

    fn release(&mut self, id: LineId) {
        if let Some(slot) = self.slots.get_mut(id.index as usize) {
            if slot.generation == id.generation {
                slot.line = None;
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(id.index);
            }
        }
    }

    fn set_next(&mut self, id: LineId, next: Option<LineId>) {
        if let Some(line) = self.line_mut(id) {
            line.next = next;
        }
    }

    fn set_prev(&mut self, id: LineId, prev: Option<LineId>) {
        if let Some(line) = self.line_mut(id) {
            line.prev = prev;
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Head-to-tail iterator over a document's lines.
pub struct Lines<'a> {
    document: &'a Document,
    next: Option<LineId>,
}

impl<'a> Iterator for Lines<'a> {
    type Item = (LineId, &'a Line);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        let line = self.document.line(id)?;
        self.next = line.next;
        Some((id, line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(lines: &[&str]) -> Document {
        Document::from_lines(lines.iter().copied(), 8)
    }

    /// Walks the list both ways and checks the links agree with `count`.
    fn assert_consistent(document: &Document) {
        let forward: Vec<LineId> = document.iter().map(|(id, _)| id).collect();
        assert_eq!(forward.len(), document.line_count());
        assert_eq!(forward.first(), Some(&document.head()));
        assert_eq!(forward.last(), Some(&document.tail()));

        let mut backward = Vec::new();
        let mut current = Some(document.tail());
        while let Some(id) = current {
            backward.push(id);
            current = document.prev(id);
        }
        backward.reverse();
        assert_eq!(forward, backward);

        assert!(document.contains(document.current_line()));
        assert!(document.current_column() <= document.line_len(document.current_line()));
    }

    #[test]
    fn test_new_document_has_one_empty_line() {
        let document = Document::new();
        assert_eq!(document.line_count(), 1);
        assert_eq!(document.lines(), vec![String::new()]);
        assert_eq!(document.head(), document.tail());
        assert_eq!(document.current_line(), document.head());
        assert_eq!(document.current_column(), 0);
        assert_consistent(&document);
    }

    #[test]
    fn test_from_lines() {
        let document = doc(&["one", "two", "three"]);
        assert_eq!(document.line_count(), 3);
        assert_eq!(document.lines(), vec!["one", "two", "three"]);
        assert_eq!(document.current_line(), document.head());
        assert_consistent(&document);

        let empty = Document::from_lines(Vec::<String>::new(), 8);
        assert_eq!(empty.line_count(), 1);
        assert_eq!(empty.lines(), vec![String::new()]);
    }

    #[test]
    fn test_line_creation() {
        let line = Line::new("Hello World");
        assert_eq!(line.len(), 11);
        assert_eq!(line.text(), "Hello World");

        let empty = Line::empty();
        assert_eq!(empty.len(), 0);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_line_operations() {
        let mut line = Line::new("Hello");
        assert_eq!(line.char_at(0), Some('H'));
        assert_eq!(line.char_at(10), None);

        line.insert_char_at(5, '!');
        line.insert_str_at(5, " World");
        assert_eq!(line.text(), "Hello World!");

        line.delete_char_at(5);
        assert_eq!(line.text(), "HelloWorld!");

        line.delete_char_before(5);
        assert_eq!(line.text(), "HellWorld!");
    }

    #[test]
    fn test_insert_line_after_relinks_neighbours() {
        let mut document = doc(&["a", "c"]);
        let a = document.head();
        let c = document.tail();

        let b = document.insert_line_after(Some(a), Line::new("b"));
        assert_eq!(document.lines(), vec!["a", "b", "c"]);
        assert_eq!(document.prev(c), Some(b));
        assert_eq!(document.next(a), Some(b));
        assert_eq!(document.tail(), c);

        let d = document.insert_line_after(Some(c), Line::new("d"));
        assert_eq!(document.tail(), d);

        let z = document.insert_line_after(None, Line::new("z"));
        assert_eq!(document.head(), z);
        assert_eq!(document.lines(), vec!["z", "a", "b", "c", "d"]);
        assert_consistent(&document);
    }

    #[test]
    fn test_remove_line_fixes_head_and_tail() {
        let mut document = doc(&["a", "b", "c"]);
        let a = document.head();
        let c = document.tail();

        assert!(document.remove_line(a, &mut NoopObserver));
        assert_eq!(document.lines(), vec!["b", "c"]);
        assert!(!document.contains(a));

        assert!(document.remove_line(c, &mut NoopObserver));
        assert_eq!(document.lines(), vec!["b"]);
        assert_eq!(document.head(), document.tail());
        assert_consistent(&document);

        assert!(!document.remove_line(a, &mut NoopObserver));
    }

    #[test]
    fn test_removing_last_line_leaves_empty_line() {
        let mut document = doc(&["only"]);
        let only = document.head();

        assert!(document.remove_line(only, &mut NoopObserver));
        assert_eq!(document.line_count(), 1);
        assert_eq!(document.lines(), vec![String::new()]);
        assert_ne!(document.head(), only);
        assert_consistent(&document);
    }

    #[test]
    fn test_recycled_slot_does_not_revive_old_handle() {
        let mut document = doc(&["a", "b"]);
        let b = document.tail();
        document.remove_line(b, &mut NoopObserver);

        let fresh = document.insert_line_at_end(Line::new("fresh"));
        assert!(!document.contains(b));
        assert!(document.contains(fresh));
        assert_eq!(document.text(b), None);
    }

    #[test]
    fn test_observer_sees_removed_line() {
        struct Recorder(Vec<LineId>);
        impl LineObserver for Recorder {
            fn line_removed(&mut self, id: LineId) {
                self.0.push(id);
            }
        }

        let mut document = doc(&["a", "b"]);
        let a = document.head();
        let mut recorder = Recorder(Vec::new());
        assert!(document.merge_with_next(a, &mut recorder));
        assert_eq!(recorder.0.len(), 1);
        assert!(!document.contains(recorder.0[0]));
    }

    #[test]
    fn test_split_line_moves_cursor() {
        let mut document = doc(&["Hello World"]);
        let first = document.head();
        document.set_cursor(first, 6);

        let second = document.split_line_at(first, 6).unwrap();
        assert_eq!(document.lines(), vec!["Hello ", "World"]);
        assert_eq!(document.line_count(), 2);
        assert_eq!(document.cursor(), Cursor { line: second, column: 0 });
        assert_consistent(&document);
    }

    #[test]
    fn test_split_leaves_cursor_before_column() {
        let mut document = doc(&["abcdef"]);
        let first = document.head();
        document.set_cursor(first, 2);
        document.split_line_at(first, 4);
        assert_eq!(document.cursor(), Cursor { line: first, column: 2 });
    }

    #[test]
    fn test_split_then_merge_restores() {
        let mut document = doc(&["before", "Hello World", "after"]);
        let line = document.line_at(1).unwrap();

        document.split_line_at(line, 5);
        assert_eq!(document.line_count(), 4);
        assert!(document.merge_with_next(line, &mut NoopObserver));
        assert_eq!(document.lines(), vec!["before", "Hello World", "after"]);
        assert_eq!(document.line_count(), 3);
        assert_consistent(&document);
    }

    #[test]
    fn test_merge_moves_cursor_from_removed_line() {
        let mut document = doc(&["abc", "defg"]);
        let first = document.head();
        let second = document.tail();
        document.set_cursor(second, 2);

        assert!(document.merge_with_next(first, &mut NoopObserver));
        assert_eq!(document.lines(), vec!["abcdefg"]);
        assert_eq!(document.cursor(), Cursor { line: first, column: 5 });
    }

    #[test]
    fn test_merge_on_last_line_is_noop() {
        let mut document = doc(&["a", "b"]);
        let tail = document.tail();
        assert!(!document.merge_with_next(tail, &mut NoopObserver));
        assert_eq!(document.line_count(), 2);
    }

    #[test]
    fn test_set_cursor_clamps_and_ignores_stale() {
        let mut document = doc(&["abc", "de"]);
        let first = document.head();
        let second = document.tail();

        document.set_cursor(second, 99);
        assert_eq!(document.cursor(), Cursor { line: second, column: 2 });

        document.remove_line(second, &mut NoopObserver);
        document.set_cursor(second, 0);
        assert_eq!(document.current_line(), first);
    }

    #[test]
    fn test_remove_current_line_moves_cursor_to_neighbour() {
        let mut document = doc(&["first", "second", "third"]);
        let first = document.head();
        let second = document.line_at(1).unwrap();

        document.set_cursor(second, 4);
        document.remove_line(second, &mut NoopObserver);
        assert_eq!(document.cursor(), Cursor { line: first, column: 4 });

        document.set_cursor(first, 3);
        document.remove_line(first, &mut NoopObserver);
        assert_eq!(document.current_line(), document.head());
        assert_eq!(document.current_column(), 0);
        assert_consistent(&document);
    }

    #[test]
    fn test_line_number_round_trip() {
        let document = doc(&["a", "b", "c"]);
        for n in 0..3 {
            let id = document.line_at(n).unwrap();
            assert_eq!(document.line_number(id), Some(n));
        }
        assert_eq!(document.line_at(3), None);
    }

    #[test]
    fn test_validate_cursor_after_external_shrink() {
        let mut document = doc(&["abcdef"]);
        let first = document.head();
        document.set_cursor(first, 6);
        document.line_mut(first).unwrap().truncate_at(2);
        document.validate_cursor();
        assert_eq!(document.current_column(), 2);
    }
}
