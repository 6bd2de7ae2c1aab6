//! Buffer store: the immutable original text and the append-only added text
//!
//! Both buffers hold `char`s, so every offset handed out here (and every index in
//! the public [`crate::PieceTable`] API) counts Unicode scalar values.

use crate::piece::{Piece, Source};

/// Owner of the text that pieces point into.
///
/// `original` is fixed at construction. `added` only ever grows at its tail, which
/// keeps every offset previously handed out by [`Buffers::append`] valid forever.
#[derive(Debug, Clone, Default)]
pub struct Buffers {
    original: Box<[char]>,
    added: Vec<char>,
}

impl Buffers {
    pub fn new(document: &str) -> Self {
        Self {
            original: document.chars().collect(),
            added: Vec::new(),
        }
    }

    pub fn original(&self) -> &[char] {
        &self.original
    }

    pub fn added(&self) -> &[char] {
        &self.added
    }

    /// Append `text` to the added buffer and return the offset it starts at.
    pub fn append(&mut self, text: &str) -> usize {
        let offset = self.added.len();
        self.added.extend(text.chars());
        offset
    }

    /// The whole buffer a source tag refers to.
    pub fn get(&self, source: Source) -> &[char] {
        match source {
            Source::Original => &self.original,
            Source::Added => &self.added,
        }
    }

    /// The chars referenced by `piece`.
    pub fn slice(&self, piece: &Piece) -> &[char] {
        &self.get(piece.source)[piece.range()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_returns_start_offset() {
        let mut buffers = Buffers::new("abc");

        assert_eq!(buffers.append("xy"), 0);
        assert_eq!(buffers.append("z"), 2);
        assert_eq!(buffers.added(), &['x', 'y', 'z']);
        assert_eq!(buffers.original(), &['a', 'b', 'c']);
    }

    #[test]
    fn offsets_count_chars_not_bytes() {
        let mut buffers = Buffers::new("héllo");
        let offset = buffers.append("wörld");

        assert_eq!(buffers.original().len(), 5);
        assert_eq!(buffers.append("!"), offset + 5);
    }

    #[test]
    fn slice_reads_through_source_tag() {
        let mut buffers = Buffers::new("original");
        buffers.append("added");

        let original = Piece::new(Source::Original, 2, 3).expect("non-empty");
        let added = Piece::new(Source::Added, 1, 3).expect("non-empty");

        assert_eq!(buffers.slice(&original), &['i', 'g', 'i']);
        assert_eq!(buffers.slice(&added), &['d', 'd', 'e']);
    }
}
