//! Caret and selection positions.

/// A caret or selection over the displayed text, in characters.
///
/// `end` is exclusive, matching host text controls: a collapsed caret has
/// `start == end`, and selecting the characters at offsets 5 and 6 is
/// `Caret::new(5, 7)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Caret {
    pub start: usize,
    pub end: usize,
}

impl Caret {
    /// Create a selection. The bounds are ordered if given reversed.
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start: start.min(end),
            end: start.max(end),
        }
    }

    /// A collapsed caret at `offset`.
    pub fn at(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    /// Check whether the caret selects nothing.
    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    /// Clamp both ends to `[0, width]`.
    pub fn clamped(self, width: usize) -> Self {
        Self::new(self.start.min(width), self.end.min(width))
    }
}
