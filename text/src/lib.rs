//! Piece table text storage for piecework
//!
//! A [`PieceTable`] represents an editable document as an ordered list of
//! [`Piece`]s. Each piece points into one of two buffers: the original document,
//! which is never modified, or the added buffer, which only ever grows. Edits
//! rewrite a handful of pieces instead of copying the document, so their cost
//! scales with the number of edits made rather than the size of the text.
//!
//! The key components are:
//! - [`buffer::Buffers`] - Owns the original and added text
//! - [`piece::Piece`] - A `(source, offset, length)` span into one buffer
//! - [`table::PieceTable`] - The piece list plus locate, insert, delete and read
//!
//! All indices and lengths count `char`s.
//!
//! ```
//! use piecework_text::PieceTable;
//!
//! let mut table = PieceTable::new("Hello world");
//! table.insert(",", 5)?;
//! table.delete(12, -6)?;
//! table.insert(" there", 6)?;
//!
//! assert_eq!(table.get_text(), "Hello, there");
//! assert_eq!(table.string_at(0, 5)?, "Hello");
//! # Ok::<(), piecework_text::Error>(())
//! ```

pub mod buffer;
pub mod error;
pub mod piece;
mod slice;
pub mod table;

pub use buffer::Buffers;
pub use error::{Error, Result};
pub use piece::{Piece, Source};
pub use table::{Chunks, Location, PieceTable};
