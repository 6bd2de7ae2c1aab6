//! Errors produced by [`crate::PieceTable`] operations

use snafu::Snafu;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Every failure a piece table operation can report.
///
/// Failures are raised before any state is touched, so a table that returned an
/// error is still in the state it had before the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    /// The index (or the end of the requested span) does not resolve to a position
    /// inside the document.
    #[snafu(display("Index {index} is out of range for document length {length}"))]
    OutOfRange { index: isize, length: usize },
}
