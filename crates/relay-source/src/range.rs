use miette::SourceSpan;

use crate::SourceFile;

/// A half-open byte range `[start, end)` inside a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct TextRange {
    start: usize,
    end: usize,
}

impl TextRange {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "invalid range {start}..{end}");
        TextRange { start, end }
    }

    /// An empty range at `offset`, used for pure insertions.
    pub fn empty(offset: usize) -> Self {
        TextRange { start: offset, end: offset }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Cursor containment: a cursor sitting right after the last byte still counts.
    pub fn contains_inclusive(&self, offset: usize) -> bool {
        self.start <= offset && offset <= self.end
    }

    pub fn contains_range(&self, other: TextRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

impl From<TextRange> for SourceSpan {
    fn from(range: TextRange) -> Self {
        SourceSpan::new(range.start.into(), range.len())
    }
}

/// A cursor position: a file plus a byte offset into its text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FilePosition {
    pub file: SourceFile,
    pub offset: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inclusive_containment_accepts_the_end() {
        let range = TextRange::new(4, 8);
        assert!(range.contains_inclusive(4));
        assert!(range.contains_inclusive(8));
        assert!(!range.contains_inclusive(9));
        assert!(!range.contains_inclusive(3));
    }

    #[test]
    fn nested_ranges() {
        let outer = TextRange::new(0, 20);
        assert!(outer.contains_range(TextRange::new(3, 20)));
        assert!(!outer.contains_range(TextRange::new(3, 21)));
        assert!(TextRange::empty(5).is_empty());
    }
}
