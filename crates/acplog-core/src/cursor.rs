//! Index-based access to a log's lines with comment skipping.
//!
//! A line is a comment when its first character is `#`. Neighbor lookups and
//! scans step over comments transparently; lookups past either end of the log
//! yield an empty line instead of failing.

/// How many non-comment lines a scan may visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanLimit {
    Unbounded,
    Lines(usize),
}

/// Direction of a scan relative to the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}

/// Returns true for comment lines.
#[must_use]
pub fn is_comment(line: &str) -> bool {
    line.starts_with('#')
}

/// A position within a log's lines. Moving it yields a new cursor.
#[derive(Debug, Clone, Copy)]
pub struct LineCursor<'a> {
    lines: &'a [String],
    index: usize,
}

impl<'a> LineCursor<'a> {
    /// Creates a cursor, clamping `index` into the log.
    #[must_use]
    pub fn new(lines: &'a [String], index: usize) -> Self {
        Self {
            lines,
            index: index.min(lines.len().saturating_sub(1)),
        }
    }

    /// Moves to an absolute position, clamping into the log.
    #[must_use]
    pub fn at(self, index: usize) -> Self {
        Self::new(self.lines, index)
    }

    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The line under the cursor, or `""` for an empty log.
    #[must_use]
    pub fn line(&self) -> &'a str {
        self.line_at(self.index)
    }

    /// The line at `index`, or `""` outside the log.
    #[must_use]
    pub fn line_at(&self, index: usize) -> &'a str {
        self.lines.get(index).map_or("", String::as_str)
    }

    /// Index of the first non-comment line after `index`.
    #[must_use]
    pub fn next_index(&self, index: usize) -> Option<usize> {
        (index.saturating_add(1)..self.lines.len()).find(|&i| !is_comment(&self.lines[i]))
    }

    /// Index of the last non-comment line before `index`.
    #[must_use]
    pub fn previous_index(&self, index: usize) -> Option<usize> {
        (0..index.min(self.lines.len()))
            .rev()
            .find(|&i| !is_comment(&self.lines[i]))
    }

    /// The next non-comment line after the cursor, or `""` at the end of the log.
    #[must_use]
    pub fn next_line(&self) -> &'a str {
        self.next_index(self.index).map_or("", |i| self.line_at(i))
    }

    /// The previous non-comment line before the cursor, or `""` at the start of the log.
    #[must_use]
    pub fn previous_line(&self) -> &'a str {
        self.previous_index(self.index)
            .map_or("", |i| self.line_at(i))
    }

    /// Non-comment lines after the cursor, nearest first.
    #[must_use]
    pub fn scan_forward(&self, limit: ScanLimit) -> Scan<'a> {
        Scan {
            cursor: *self,
            position: Some(self.index),
            direction: Direction::Forward,
            remaining: limit,
        }
    }

    /// Non-comment lines before the cursor, nearest first.
    #[must_use]
    pub fn scan_backward(&self, limit: ScanLimit) -> Scan<'a> {
        Scan {
            cursor: *self,
            position: Some(self.index),
            direction: Direction::Backward,
            remaining: limit,
        }
    }
}

/// Iterator over `(index, line)` pairs produced by a bounded or unbounded scan.
#[derive(Debug, Clone)]
pub struct Scan<'a> {
    cursor: LineCursor<'a>,
    position: Option<usize>,
    direction: Direction,
    remaining: ScanLimit,
}

impl<'a> Iterator for Scan<'a> {
    type Item = (usize, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        if let ScanLimit::Lines(0) = self.remaining {
            return None;
        }
        let from = self.position?;
        let found = match self.direction {
            Direction::Forward => self.cursor.next_index(from),
            Direction::Backward => self.cursor.previous_index(from),
        };
        self.position = found;
        let index = found?;
        if let ScanLimit::Lines(n) = &mut self.remaining {
            *n -= 1;
        }
        Some((index, self.cursor.line_at(index)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_neighbors_skip_comments() {
        let log = lines(&["a", "# note", "b", "#", "c"]);
        let cursor = LineCursor::new(&log, 2);

        assert_eq!(cursor.previous_line(), "a");
        assert_eq!(cursor.next_line(), "c");
    }

    #[test]
    fn test_boundaries_yield_empty_sentinel() {
        let log = lines(&["first", "last"]);

        assert_eq!(LineCursor::new(&log, 0).previous_line(), "");
        assert_eq!(LineCursor::new(&log, 1).next_line(), "");
        assert_eq!(LineCursor::new(&log, 0).line_at(7), "");
    }

    #[test]
    fn test_out_of_range_index_is_clamped() {
        let log = lines(&["a", "b", "c"]);
        let cursor = LineCursor::new(&log, 99);

        assert_eq!(cursor.index(), 2);
        assert_eq!(cursor.line(), "c");
        assert_eq!(cursor.previous_line(), "b");
        assert_eq!(cursor.previous_index(usize::MAX), Some(2));
        assert_eq!(cursor.next_index(usize::MAX), None);

        let empty: Vec<String> = Vec::new();
        let cursor = LineCursor::new(&empty, 5);
        assert_eq!(cursor.index(), 0);
        assert_eq!(cursor.line(), "");
        assert_eq!(cursor.next_line(), "");
        assert!(cursor.is_empty());
    }

    #[test]
    fn test_bounded_scan_counts_only_non_comment_lines() {
        let log = lines(&["start", "# c1", "one", "# c2", "two", "three"]);
        let cursor = LineCursor::new(&log, 0);

        let seen: Vec<_> = cursor.scan_forward(ScanLimit::Lines(2)).collect();
        assert_eq!(seen, vec![(2, "one"), (4, "two")]);

        let all: Vec<_> = cursor.scan_forward(ScanLimit::Unbounded).map(|(_, l)| l).collect();
        assert_eq!(all, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_backward_scan_runs_to_start() {
        let log = lines(&["a", "# skip", "b", "c"]);
        let cursor = LineCursor::new(&log, 3);

        let seen: Vec<_> = cursor.scan_backward(ScanLimit::Unbounded).collect();
        assert_eq!(seen, vec![(2, "b"), (0, "a")]);
        assert_eq!(cursor.at(0).scan_backward(ScanLimit::Unbounded).count(), 0);
    }
}
