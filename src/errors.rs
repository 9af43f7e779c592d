//! Error types reported when building arrays, views and filters.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors that can occur when constructing or reshaping an array, view or
/// filter.
///
/// All of these indicate a logic error in the caller. They are reported when
/// the array, view or filter is built, never while iterating.
#[derive(Clone, Debug, PartialEq)]
pub enum ArrayError {
    /// A count that must be positive was zero, a product of sizes does not
    /// fit in `usize`, or a buffer has the wrong record width for its role.
    /// The payload describes the problem.
    InvalidConfiguration(&'static str),

    /// A scalar count `len` is not evenly divisible by the requested
    /// `divisor` (a record width, item shape product or reshape size).
    ShapeMismatch { len: usize, divisor: usize },

    /// A size passed to a reshape differs from the size it must match.
    SizeMismatch { expected: usize, actual: usize },

    /// `index` is outside `[0, len)`.
    IndexOutOfRange { index: usize, len: usize },
}

impl Display for ArrayError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ArrayError::InvalidConfiguration(msg) => write!(f, "invalid configuration: {}", msg),
            ArrayError::ShapeMismatch { len, divisor } => {
                write!(f, "length {} is not divisible by {}", len, divisor)
            }
            ArrayError::SizeMismatch { expected, actual } => {
                write!(f, "size {} does not match the expected size {}", actual, expected)
            }
            ArrayError::IndexOutOfRange { index, len } => {
                write!(f, "index {} out of range for length {}", index, len)
            }
        }
    }
}

impl Error for ArrayError {}

/// Divide `len` by `divisor`, failing unless the division is exact.
pub(crate) fn exact_div(len: usize, divisor: usize) -> Result<usize, ArrayError> {
    if divisor == 0 || len % divisor != 0 {
        return Err(ArrayError::ShapeMismatch { len, divisor });
    }
    Ok(len / divisor)
}
