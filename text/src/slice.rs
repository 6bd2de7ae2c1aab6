//! Sequence-style access: single chars and `start:stop:step` slices
//!
//! Negative indices count back from the end of the document. Slices clamp their
//! bounds instead of failing, then read the covered run of chars in one pass
//! before the step is applied.

use std::num::NonZeroIsize;

use snafu::{ensure, OptionExt};

use crate::{
    error::{OutOfRangeSnafu, Result},
    table::PieceTable,
};

/// Bounds of a slice after clamping, ready for extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Bounds {
    start: isize,
    stop: isize,
    step: isize,
}

impl Bounds {
    fn resolve(
        start: Option<isize>,
        stop: Option<isize>,
        step: Option<NonZeroIsize>,
        length: isize,
    ) -> Self {
        let step = step.map_or(1, NonZeroIsize::get);
        let (lower, upper) = if step < 0 {
            (-1, length - 1)
        } else {
            (0, length)
        };

        let clamp = |bound: isize| {
            if bound < 0 {
                (bound + length).max(lower)
            } else {
                bound.min(upper)
            }
        };

        let start = start.map_or(if step < 0 { upper } else { lower }, clamp);
        let stop = stop.map_or(if step < 0 { lower } else { upper }, clamp);
        Self { start, stop, step }
    }
}

impl PieceTable {
    /// The char at `index`. Negative indices count from the end.
    pub fn get(&self, index: isize) -> Result<char> {
        let length = self.signed_len();
        let resolved = if index < 0 { index + length } else { index };
        ensure!(
            (0..length).contains(&resolved),
            OutOfRangeSnafu {
                index,
                length: self.len(),
            }
        );

        self.extract(resolved, resolved + 1)?
            .first()
            .copied()
            .context(OutOfRangeSnafu {
                index,
                length: self.len(),
            })
    }

    /// Slice the document like a sequence.
    ///
    /// `None` bounds default to the start and end (swapped for a negative step).
    /// Out of range bounds are clamped, so this only fails if the table itself is
    /// inconsistent.
    pub fn slice(
        &self,
        start: Option<isize>,
        stop: Option<isize>,
        step: Option<NonZeroIsize>,
    ) -> Result<String> {
        let Bounds { start, stop, step } = Bounds::resolve(start, stop, step, self.signed_len());
        let stride = step.unsigned_abs();

        if step > 0 {
            if stop <= start {
                return Ok(String::new());
            }
            let chars = self.extract(start, stop)?;
            Ok(chars.into_iter().step_by(stride).collect())
        } else {
            if start <= stop {
                return Ok(String::new());
            }
            let chars = self.extract(stop + 1, start + 1)?;
            Ok(chars.into_iter().rev().step_by(stride).collect())
        }
    }
}
