//! Substring search over a document's lines, with wraparound.

use serde::{Deserialize, Serialize};

use crate::document::{Document, Line, LineId};

/// Longest search term kept, in characters.
pub const MAX_SEARCH_TERM: usize = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

impl Direction {
    pub fn reversed(self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    /// ASCII-only folding when false.
    pub case_sensitive: bool,
    /// Continue past the end of the document back to the other end.
    pub wrap_scan: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            wrap_scan: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchMatch {
    pub line: LineId,
    pub column: usize,
    /// The scan passed the end (or start) of the document to find this.
    pub wrapped: bool,
}

fn matches_at(haystack: &[char], term: &[char], at: usize, case_sensitive: bool) -> bool {
    haystack[at..at + term.len()]
        .iter()
        .zip(term)
        .all(|(a, b)| {
            if case_sensitive {
                a == b
            } else {
                a.eq_ignore_ascii_case(b)
            }
        })
}

fn find_forward(
    haystack: &[char],
    term: &[char],
    start: usize,
    case_sensitive: bool,
) -> Option<usize> {
    if term.is_empty() || term.len() > haystack.len() {
        return None;
    }
    (start..=haystack.len() - term.len())
        .find(|&i| matches_at(haystack, term, i, case_sensitive))
}

fn find_backward(
    haystack: &[char],
    term: &[char],
    start: usize,
    case_sensitive: bool,
) -> Option<usize> {
    if term.is_empty() || term.len() > haystack.len() {
        return None;
    }
    let last = start.min(haystack.len() - term.len());
    (0..=last)
        .rev()
        .find(|&i| matches_at(haystack, term, i, case_sensitive))
}

/// First occurrence of `term` in `line` starting at or after `start_col`.
pub fn search_in_line(
    line: &Line,
    term: &str,
    start_col: usize,
    case_sensitive: bool,
) -> Option<usize> {
    let haystack: Vec<char> = line.chars().collect();
    let term: Vec<char> = term.chars().collect();
    find_forward(&haystack, &term, start_col, case_sensitive)
}

/// Last occurrence of `term` in `line` starting at or before `start_col`.
pub fn search_in_line_backward(
    line: &Line,
    term: &str,
    start_col: usize,
    case_sensitive: bool,
) -> Option<usize> {
    let haystack: Vec<char> = line.chars().collect();
    let term: Vec<char> = term.chars().collect();
    find_backward(&haystack, &term, start_col, case_sensitive)
}

/// Session state for `/` and `?` style searching.
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    term: String,
    current: Option<SearchMatch>,
    direction: Direction,
    options: SearchOptions,
    active: bool,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: SearchOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn current_match(&self) -> Option<SearchMatch> {
        self.current
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_forward(&self) -> bool {
        self.direction == Direction::Forward
    }

    pub fn options(&self) -> SearchOptions {
        self.options
    }

    pub fn case_sensitive(&self) -> bool {
        self.options.case_sensitive
    }

    pub fn set_case_sensitive(&mut self, case_sensitive: bool) {
        self.options.case_sensitive = case_sensitive;
    }

    pub fn set_wrap_scan(&mut self, wrap_scan: bool) {
        self.options.wrap_scan = wrap_scan;
    }

    /// Drops the term and the current match, keeping the options.
    pub fn clear_search(&mut self) {
        self.term.clear();
        self.current = None;
        self.active = false;
    }

    /// Starts a new search from the cursor.
    ///
    /// On a match the cursor moves to it; otherwise the cursor stays put and
    /// the current match is cleared. An empty term finds nothing and leaves
    /// the state untouched.
    pub fn perform_search(
        &mut self,
        document: &mut Document,
        term: &str,
        direction: Direction,
    ) -> Option<SearchMatch> {
        if term.is_empty() {
            return None;
        }

        self.term = term.chars().take(MAX_SEARCH_TERM).collect();
        self.direction = direction;
        self.active = true;

        let cursor = document.cursor();
        self.search_from(document, cursor.line, cursor.column, direction)
    }

    /// Steps forward from the current match, or from the cursor when there is
    /// none or its line has since been removed.
    pub fn find_next(&mut self, document: &mut Document) -> Option<SearchMatch> {
        self.resume(document, Direction::Forward)
    }

    pub fn find_previous(&mut self, document: &mut Document) -> Option<SearchMatch> {
        self.resume(document, Direction::Backward)
    }

    fn resume(&mut self, document: &mut Document, direction: Direction) -> Option<SearchMatch> {
        if !self.active || self.term.is_empty() {
            return None;
        }

        let (line, column) = match self.current {
            Some(found) if document.contains(found.line) => (found.line, found.column),
            _ => {
                let cursor = document.cursor();
                (cursor.line, cursor.column)
            }
        };
        self.search_from(document, line, column, direction)
    }

    fn search_from(
        &mut self,
        document: &mut Document,
        line: LineId,
        column: usize,
        direction: Direction,
    ) -> Option<SearchMatch> {
        let term: Vec<char> = self.term.chars().collect();
        let found = match direction {
            Direction::Forward => self.scan_forward(document, &term, line, column),
            Direction::Backward => self.scan_backward(document, &term, line, column),
        };

        match found {
            Some(found) => {
                if found.wrapped {
                    log::debug!("search for {:?} wrapped", self.term);
                }
                document.set_cursor(found.line, found.column);
                self.current = Some(found);
            }
            None => self.current = None,
        }
        found
    }

    fn scan_forward(
        &self,
        document: &Document,
        term: &[char],
        origin: LineId,
        origin_col: usize,
    ) -> Option<SearchMatch> {
        let case_sensitive = self.options.case_sensitive;
        let text_of = |id: LineId| -> Vec<char> {
            document.line(id).map(|line| line.chars().collect()).unwrap_or_default()
        };
        let hit = |line: LineId, column: usize, wrapped: bool| SearchMatch {
            line,
            column,
            wrapped,
        };

        let origin_text = text_of(origin);
        if let Some(column) = find_forward(&origin_text, term, origin_col + 1, case_sensitive) {
            return Some(hit(origin, column, false));
        }

        let mut current = document.next(origin);
        while let Some(id) = current {
            if let Some(column) = find_forward(&text_of(id), term, 0, case_sensitive) {
                return Some(hit(id, column, false));
            }
            current = document.next(id);
        }

        if !self.options.wrap_scan {
            return None;
        }

        let mut current = Some(document.head());
        while let Some(id) = current.filter(|&id| id != origin) {
            if let Some(column) = find_forward(&text_of(id), term, 0, case_sensitive) {
                return Some(hit(id, column, true));
            }
            current = document.next(id);
        }

        find_forward(&origin_text, term, 0, case_sensitive)
            .filter(|&column| column <= origin_col)
            .map(|column| hit(origin, column, true))
    }

    fn scan_backward(
        &self,
        document: &Document,
        term: &[char],
        origin: LineId,
        origin_col: usize,
    ) -> Option<SearchMatch> {
        let case_sensitive = self.options.case_sensitive;
        let text_of = |id: LineId| -> Vec<char> {
            document.line(id).map(|line| line.chars().collect()).unwrap_or_default()
        };
        let hit = |line: LineId, column: usize, wrapped: bool| SearchMatch {
            line,
            column,
            wrapped,
        };

        let origin_text = text_of(origin);
        if origin_col > 0 {
            let found = find_backward(&origin_text, term, origin_col - 1, case_sensitive);
            if let Some(column) = found {
                return Some(hit(origin, column, false));
            }
        }

        let mut current = document.prev(origin);
        while let Some(id) = current {
            if let Some(column) = find_backward(&text_of(id), term, usize::MAX, case_sensitive) {
                return Some(hit(id, column, false));
            }
            current = document.prev(id);
        }

        if !self.options.wrap_scan {
            return None;
        }

        let mut current = Some(document.tail());
        while let Some(id) = current.filter(|&id| id != origin) {
            if let Some(column) = find_backward(&text_of(id), term, usize::MAX, case_sensitive) {
                return Some(hit(id, column, true));
            }
            current = document.prev(id);
        }

        find_backward(&origin_text, term, usize::MAX, case_sensitive)
            .filter(|&column| column >= origin_col)
            .map(|column| hit(origin, column, true))
    }
}
