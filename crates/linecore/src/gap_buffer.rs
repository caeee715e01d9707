//! Editable character storage for a single line.
//!
//! The buffer keeps its free space as one contiguous gap sitting at the edit
//! point. Inserting or deleting at the edit point only moves a gap boundary;
//! moving the edit point slides the characters between the old and the new
//! position across the gap, so the cost is proportional to the distance.

use std::fmt;

/// Initial capacity used when a caller does not ask for one.
pub const DEFAULT_CAPACITY: usize = 64;

/// Minimum number of slots added whenever the buffer has to grow.
const MIN_GROWTH: usize = 16;

/// Fill value for slots inside the gap. Never observable through the API.
const GAP_FILL: char = '\0';

#[derive(Clone)]
pub struct GapBuffer {
    data: Vec<char>,
    gap_start: usize,
    gap_end: usize,
}

impl GapBuffer {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates an empty buffer whose gap spans the whole capacity.
    pub fn with_capacity(initial_capacity: usize) -> Self {
        Self {
            data: vec![GAP_FILL; initial_capacity],
            gap_start: 0,
            gap_end: initial_capacity,
        }
    }

    /// Creates a buffer holding `text` with the edit point at position 0.
    ///
    /// The content is placed after the gap, so the first insertion at the
    /// start of the line needs no shifting.
    pub fn with_text(text: &str, min_capacity: usize) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let capacity = (chars.len() * 2).max(min_capacity);
        let gap_end = capacity - chars.len();

        let mut data = vec![GAP_FILL; capacity];
        data[gap_end..].copy_from_slice(&chars);

        Self {
            data,
            gap_start: 0,
            gap_end,
        }
    }

    /// Logical length: capacity minus the gap.
    pub fn len(&self) -> usize {
        self.data.len() - self.gap_len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    pub fn gap_len(&self) -> usize {
        self.gap_end - self.gap_start
    }

    /// The edit point, which is always the start of the gap.
    pub fn cursor_position(&self) -> usize {
        self.gap_start
    }

    /// Moves the edit point to `position`, clamped to `[0, len]`.
    pub fn move_cursor_to(&mut self, position: usize) {
        let position = position.min(self.len());

        if position < self.gap_start {
            // Slide [position, gap_start) to the far side of the gap.
            let shift = self.gap_start - position;
            self.data
                .copy_within(position..self.gap_start, self.gap_end - shift);
            self.gap_start = position;
            self.gap_end -= shift;
        } else if position > self.gap_start {
            // Slide the first `shift` characters after the gap to its near side.
            let shift = position - self.gap_start;
            self.data
                .copy_within(self.gap_end..self.gap_end + shift, self.gap_start);
            self.gap_start += shift;
            self.gap_end += shift;
        }
    }

    pub fn insert_char(&mut self, c: char) {
        if self.gap_start == self.gap_end {
            self.grow(1);
        }
        self.data[self.gap_start] = c;
        self.gap_start += 1;
    }

    /// Inserts `s` at the edit point, growing at most once.
    pub fn insert_str(&mut self, s: &str) {
        let needed = s.chars().count();
        if self.gap_len() < needed {
            self.grow(needed);
        }
        for c in s.chars() {
            self.data[self.gap_start] = c;
            self.gap_start += 1;
        }
    }

    /// Deletes the character right after the edit point. No-op at the end.
    pub fn delete_char(&mut self) -> Option<char> {
        if self.gap_end >= self.data.len() {
            return None;
        }
        let c = self.data[self.gap_end];
        self.gap_end += 1;
        Some(c)
    }

    /// Deletes the character right before the edit point. No-op at position 0.
    pub fn delete_char_before(&mut self) -> Option<char> {
        if self.gap_start == 0 {
            return None;
        }
        self.gap_start -= 1;
        Some(self.data[self.gap_start])
    }

    /// Logical character at `position`, translated through the gap.
    pub fn char_at(&self, position: usize) -> Option<char> {
        if position >= self.len() {
            return None;
        }
        let physical = if position < self.gap_start {
            position
        } else {
            position + self.gap_len()
        };
        Some(self.data[physical])
    }

    pub fn chars(&self) -> impl Iterator<Item = char> + '_ {
        self.data[..self.gap_start]
            .iter()
            .chain(self.data[self.gap_end..].iter())
            .copied()
    }

    pub fn insert_char_at(&mut self, position: usize, c: char) {
        self.move_cursor_to(position);
        self.insert_char(c);
    }

    pub fn insert_str_at(&mut self, position: usize, s: &str) {
        self.move_cursor_to(position);
        self.insert_str(s);
    }

    pub fn delete_char_at(&mut self, position: usize) -> Option<char> {
        if position >= self.len() {
            return None;
        }
        self.move_cursor_to(position);
        self.delete_char()
    }

    /// Backspace semantics: deletes the character at `position - 1`.
    pub fn delete_char_before_at(&mut self, position: usize) -> Option<char> {
        if position == 0 || position > self.len() {
            return None;
        }
        self.move_cursor_to(position);
        self.delete_char_before()
    }

    /// Drops everything from `position` to the end and returns it.
    pub fn truncate_at(&mut self, position: usize) -> String {
        self.move_cursor_to(position);
        let removed: String = self.data[self.gap_end..].iter().collect();
        self.gap_end = self.data.len();
        removed
    }

    /// Reallocates so the gap can hold at least `needed` more characters.
    ///
    /// Pre-gap content keeps its offset from the start and post-gap content
    /// keeps its offset from the end, so the edit point does not move.
    fn grow(&mut self, needed: usize) {
        let old_capacity = self.data.len();
        let len = self.len();
        let new_capacity = (old_capacity * 2)
            .max(len + needed + MIN_GROWTH)
            .max(MIN_GROWTH);

        let tail_len = old_capacity - self.gap_end;
        let new_gap_end = new_capacity - tail_len;

        let mut data = vec![GAP_FILL; new_capacity];
        data[..self.gap_start].copy_from_slice(&self.data[..self.gap_start]);
        data[new_gap_end..].copy_from_slice(&self.data[self.gap_end..]);

        log::trace!(
            "gap buffer grew from {} to {} slots (len {})",
            old_capacity,
            new_capacity,
            len
        );

        self.data = data;
        self.gap_end = new_gap_end;
    }
}

impl Default for GapBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for GapBuffer {
    fn from(text: &str) -> Self {
        Self::with_text(text, DEFAULT_CAPACITY)
    }
}

impl fmt::Display for GapBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.chars() {
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

impl fmt::Debug for GapBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GapBuffer")
            .field("text", &self.to_string())
            .field("gap_start", &self.gap_start)
            .field("gap_end", &self.gap_end)
            .field("capacity", &self.data.len())
            .finish()
    }
}
