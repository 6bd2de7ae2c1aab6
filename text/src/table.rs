//! The piece table: an ordered list of [`Piece`]s over two [`Buffers`]
//!
//! Every operation first resolves document indices to a [`Location`] with
//! [`PieceTable::locate`], then either adjusts one piece in place (the fast paths)
//! or splices a short run of replacement pieces into the list.
//!
//! # Boundary convention
//!
//! An index that lands exactly between two pieces resolves to the *end* of the
//! earlier piece, not the start of the later one. The insert and delete fast paths
//! are written against that convention, so it must not be flipped.

use std::fmt::{self, Write};

use snafu::OptionExt;

use crate::{
    buffer::Buffers,
    error::{OutOfRangeSnafu, Result},
    piece::{Piece, Source},
};

/// A resolved document index: which piece, and where inside that piece's buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    /// Index into the piece list.
    pub piece: usize,
    /// Offset within the buffer the piece reads from (not within the piece).
    pub offset: usize,
}

impl Location {
    /// True for the "no piece" result that `locate(0)` produces on an empty table.
    pub fn is_past_end(&self, piece_count: usize) -> bool {
        self.piece >= piece_count
    }
}

/// Editable text stored as pieces over an original and an added buffer.
///
/// Not synchronized: callers that share a table across threads must serialize all
/// access themselves.
#[derive(Debug, Clone, Default)]
pub struct PieceTable {
    buffers: Buffers,
    pieces: Vec<Piece>,
    /// Cached sum of all piece lengths.
    length: usize,
}

impl PieceTable {
    /// Create a table whose document is `document`.
    ///
    /// A non-empty document becomes a single piece over the original buffer; an
    /// empty one starts with no pieces at all.
    pub fn new(document: &str) -> Self {
        let buffers = Buffers::new(document);
        let length = buffers.original().len();
        let pieces = Piece::new(Source::Original, 0, length)
            .into_iter()
            .collect();

        Self {
            buffers,
            pieces,
            length,
        }
    }

    /// Number of chars in the document.
    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn piece_count(&self) -> usize {
        self.pieces.len()
    }

    pub fn buffers(&self) -> &Buffers {
        &self.buffers
    }

    /// Resolve a document index to the piece containing it.
    ///
    /// Valid for `0..=len()`. See the module docs for how indices on a piece
    /// boundary resolve.
    pub fn locate(&self, index: isize) -> Result<Location> {
        usize::try_from(index)
            .ok()
            .and_then(|index| self.find(index))
            .context(OutOfRangeSnafu {
                index,
                length: self.length,
            })
    }

    fn find(&self, index: usize) -> Option<Location> {
        if self.pieces.is_empty() {
            return (index == 0).then_some(Location {
                piece: 0,
                offset: 0,
            });
        }

        let mut remaining = index;
        for (i, piece) in self.pieces.iter().enumerate() {
            if remaining <= piece.length {
                return Some(Location {
                    piece: i,
                    offset: piece.offset + remaining,
                });
            }
            remaining -= piece.length;
        }
        None
    }

    /// Insert `text` so that it starts at document index `index`.
    ///
    /// Typing at the end of the most recent insertion extends that piece rather than
    /// adding a new one, so sequential keystrokes do not grow the piece list.
    pub fn insert(&mut self, text: &str, index: usize) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }

        let location = self.find(index).context(OutOfRangeSnafu {
            index: signed(index),
            length: self.length,
        })?;

        let added_offset = self.buffers.append(text);
        let inserted = self.buffers.added().len() - added_offset;
        self.length += inserted;

        if location.is_past_end(self.pieces.len()) {
            tracing::trace!("insert into empty table: {} chars", inserted);
            self.pieces
                .extend(Piece::new(Source::Added, added_offset, inserted));
            return Ok(());
        }

        let piece = &mut self.pieces[location.piece];
        if piece.source == Source::Added
            && location.offset == piece.end()
            && location.offset == added_offset
        {
            piece.length += inserted;
            tracing::trace!(
                "insert extended piece {}: {} chars at {}",
                location.piece,
                inserted,
                index
            );
            return Ok(());
        }

        let (head, tail) = piece.split_at(location.offset);
        let new = Piece::new(Source::Added, added_offset, inserted);
        tracing::trace!(
            "insert split piece {}: {} chars at {}",
            location.piece,
            inserted,
            index
        );
        self.replace_pieces(location.piece, 1, [head, new, tail].into_iter().flatten());
        Ok(())
    }

    /// Delete `length` chars starting at `index`.
    ///
    /// A negative `length` deletes the `-length` chars that end at `index`.
    pub fn delete(&mut self, index: isize, length: isize) -> Result<()> {
        if length == 0 {
            return Ok(());
        }

        let (start_index, stop_index) = self.span(index, length)?;
        let start = self.locate(start_index)?;
        let stop = self.locate(stop_index)?;

        let removed = stop_index.abs_diff(start_index);
        self.length -= removed;

        if start.piece == stop.piece {
            let piece = &mut self.pieces[start.piece];
            if start.offset == piece.offset {
                piece.offset += removed;
                piece.length -= removed;
                tracing::trace!("delete trimmed head of piece {}", start.piece);
                self.drop_if_empty(start.piece);
                return Ok(());
            } else if stop.offset == piece.end() {
                piece.length -= removed;
                tracing::trace!("delete trimmed tail of piece {}", start.piece);
                self.drop_if_empty(start.piece);
                return Ok(());
            }
        }

        let (head, _) = self.pieces[start.piece].split_at(start.offset);
        let (_, tail) = self.pieces[stop.piece].split_at(stop.offset);
        tracing::trace!(
            "delete replaced pieces {}..={}: {} chars",
            start.piece,
            stop.piece,
            removed
        );
        self.replace_pieces(
            start.piece,
            stop.piece - start.piece + 1,
            head.into_iter().chain(tail),
        );
        Ok(())
    }

    /// The `length` chars starting at `index`.
    ///
    /// A negative `length` reads the `-length` chars that end at `index`.
    pub fn string_at(&self, index: isize, length: isize) -> Result<String> {
        let (start, stop) = self.span(index, length)?;
        Ok(self.extract(start, stop)?.into_iter().collect())
    }

    /// Materialize the whole document.
    pub fn get_text(&self) -> String {
        self.chunks().flatten().collect()
    }

    /// Iterate over the text of each piece, in document order.
    pub fn chunks(&self) -> Chunks<'_> {
        Chunks {
            buffers: &self.buffers,
            pieces: self.pieces.iter(),
        }
    }

    /// The chars in the document range `start..stop`.
    pub(crate) fn extract(&self, start: isize, stop: isize) -> Result<Vec<char>> {
        let first = self.locate(start)?;
        let last = self.locate(stop)?;

        if first.piece == last.piece {
            let Some(piece) = self.pieces.get(first.piece) else {
                return Ok(Vec::new());
            };
            return Ok(self.buffers.get(piece.source)[first.offset..last.offset].to_vec());
        }

        let mut chars = Vec::with_capacity(stop.abs_diff(start));
        let head = self.pieces[first.piece];
        chars.extend_from_slice(&self.buffers.get(head.source)[first.offset..head.end()]);
        for piece in &self.pieces[first.piece + 1..last.piece] {
            chars.extend_from_slice(self.buffers.slice(piece));
        }
        let tail = self.pieces[last.piece];
        chars.extend_from_slice(&self.buffers.get(tail.source)[tail.offset..last.offset]);
        Ok(chars)
    }

    /// Turn a signed `(index, length)` pair into a forward `start..stop` span.
    fn span(&self, index: isize, length: isize) -> Result<(isize, isize)> {
        let span = if length < 0 {
            index.checked_add(length).map(|start| (start, index))
        } else {
            index.checked_add(length).map(|stop| (index, stop))
        };
        span.context(OutOfRangeSnafu {
            index,
            length: self.length,
        })
    }

    /// Replace `count` pieces starting at `start` with `items`.
    fn replace_pieces(
        &mut self,
        start: usize,
        count: usize,
        items: impl IntoIterator<Item = Piece>,
    ) {
        self.pieces.splice(start..start + count, items);
    }

    fn drop_if_empty(&mut self, index: usize) {
        if self.pieces[index].length == 0 {
            self.pieces.remove(index);
        }
    }

    pub(crate) fn signed_len(&self) -> isize {
        signed(self.length)
    }
}

fn signed(value: usize) -> isize {
    isize::try_from(value).unwrap_or(isize::MAX)
}

impl From<&str> for PieceTable {
    fn from(document: &str) -> Self {
        Self::new(document)
    }
}

impl From<String> for PieceTable {
    fn from(document: String) -> Self {
        Self::new(&document)
    }
}

impl fmt::Display for PieceTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for chunk in self.chunks() {
            for &ch in chunk {
                f.write_char(ch)?;
            }
        }
        Ok(())
    }
}

/// Iterator over the text of each piece. Created by [`PieceTable::chunks`].
#[derive(Debug, Clone)]
pub struct Chunks<'a> {
    buffers: &'a Buffers,
    pieces: std::slice::Iter<'a, Piece>,
}

impl<'a> Iterator for Chunks<'a> {
    type Item = &'a [char];

    fn next(&mut self) -> Option<Self::Item> {
        let piece = self.pieces.next()?;
        Some(self.buffers.slice(piece))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.pieces.size_hint()
    }
}

impl ExactSizeIterator for Chunks<'_> {}
