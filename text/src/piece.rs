//! Pieces: spans of text borrowed from one of the two backing buffers

use std::ops::Range;

/// Which backing buffer a [`Piece`] reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    /// The immutable document the table was created from.
    Original,
    /// The append-only buffer holding every inserted string.
    Added,
}

/// A `(source, offset, length)` reference into one of the buffers.
///
/// Pieces are plain values. They never own text and never have a length of zero,
/// which is why every constructor returns an [`Option`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub(crate) source: Source,
    pub(crate) offset: usize,
    pub(crate) length: usize,
}

impl Piece {
    /// Create a piece, or `None` when `length` is zero.
    pub fn new(source: Source, offset: usize, length: usize) -> Option<Self> {
        (length > 0).then_some(Self {
            source,
            offset,
            length,
        })
    }

    pub fn source(&self) -> Source {
        self.source
    }

    /// Start of the piece within its buffer.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// Buffer offset one past the last char of the piece.
    pub fn end(&self) -> usize {
        self.offset + self.length
    }

    /// The buffer range this piece covers.
    pub fn range(&self) -> Range<usize> {
        self.offset..self.end()
    }

    /// Split at a buffer offset in `offset..=end`, returning the head and the tail.
    ///
    /// Either half is `None` when it would be empty.
    pub fn split_at(&self, at: usize) -> (Option<Piece>, Option<Piece>) {
        debug_assert!(
            (self.offset..=self.end()).contains(&at),
            "split offset {at} outside {:?}",
            self.range()
        );
        (
            Piece::new(self.source, self.offset, at - self.offset),
            Piece::new(self.source, at, self.end() - at),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_length_piece_is_never_built() {
        assert_eq!(Piece::new(Source::Original, 4, 0), None);
        assert!(Piece::new(Source::Added, 0, 1).is_some());
    }

    #[test]
    fn split_in_middle() {
        let piece = Piece::new(Source::Original, 10, 6).expect("non-empty");
        let (head, tail) = piece.split_at(12);

        assert_eq!(head, Piece::new(Source::Original, 10, 2));
        assert_eq!(tail, Piece::new(Source::Original, 12, 4));
    }

    #[test]
    fn split_at_edges_drops_empty_half() {
        let piece = Piece::new(Source::Added, 3, 5).expect("non-empty");

        assert_eq!(piece.split_at(3), (None, Some(piece)));
        assert_eq!(piece.split_at(8), (Some(piece), None));
    }
}
