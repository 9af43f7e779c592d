//! fe_array provides flat arrays of fixed-width records, together with
//! zero-copy shaped and filtered views over them, for storing per-node and
//! per-quadrature-point fields in finite-element codes.
//!
//! # Arrays
//!
//! An [`Array`] is a contiguous buffer of `size` records, each holding
//! `nb_components` scalars. Arrays can grow and shrink. New slots are filled
//! with the array's default value.
//!
//! # Views
//!
//! A view reinterprets the scalars of a container as a sequence of items of
//! a given shape, without copying. For example a displacement field with 3
//! components per node can be viewed as one 3-vector per node, and a stress
//! field with 9 components per quadrature point as one 3x3 matrix per
//! quadrature point:
//!
//! ```
//! use fe_array::{make_view, Array};
//!
//! let stress = Array::from_data(9, (0..18).map(|x| x as f64).collect()).unwrap();
//! let matrices = make_view(&stress, &[3, 3]).unwrap();
//! assert_eq!(matrices.size(), 2);
//!
//! let traces: Vec<f64> = matrices
//!     .iter()
//!     .map(|m| (0..3).map(|i| m.at(&[i, i]).unwrap()).sum())
//!     .collect();
//! assert_eq!(traces, [12., 39.]);
//! ```
//!
//! The number of items is the trailing dimension, computed from the total
//! number of scalars, so the item shape must evenly divide it.
//!
//! # Filtered views
//!
//! A [`FilteredView`] selects a subset of records of an array through an
//! [`IndexSelection`], where each filter entry selects `nb_item_per_elem`
//! consecutive records. This is typically used to visit the quadrature point
//! records of a subset of elements. Views can be created over filtered views
//! in the same way as over arrays, and behave identically:
//!
//! ```
//! use fe_array::{make_view, Array, FilteredView, IndexSelection};
//!
//! // 3 elements with 2 quadrature points each, with a 2-vector per point.
//! let gradient = Array::from_data(2, (0..12).collect()).unwrap();
//! let elements = IndexSelection::from([2, 0]);
//! let filtered = FilteredView::new(&gradient, &elements, 2).unwrap();
//!
//! let view = make_view(&filtered, &[2]).unwrap();
//! let firsts: Vec<i32> = view.iter().map(|v| v[0]).collect();
//! assert_eq!(firsts, [8, 10, 0, 2]);
//! ```
//!
//! # Validation
//!
//! Filter entries are checked against the bounds of the backing array when a
//! filtered view is created, if validation is enabled. Validation is always
//! enabled in debug builds, and can be enabled in release builds with the
//! `validate` crate feature or by setting the `FE_ARRAY_VALIDATE` environment
//! variable (see [`env::validation_enabled`]).
//!
//! # Parallel iteration
//!
//! Views can be traversed in parallel using [Rayon](https://docs.rs/rayon)
//! via [`ArrayView::par_iter`], [`ArrayViewMut::par_iter_mut`] and
//! [`FilteredView::par_iter`].

mod array;
pub mod cursor;
pub mod env;
pub mod errors;
mod filter;
mod impl_debug;
pub mod iterators;
mod view;

// Re-exports for convenience.
pub use array::{Array, IndexSelection};
pub use cursor::Cursor;
pub use errors::ArrayError;
pub use filter::FilteredView;
pub use iterators::{DirectIter, FilteredIter, Iter, IterMut};
pub use view::{
    make_const_view, make_view, make_view_mut, ArrayView, ArrayViewMut, Block, BlockMut,
    Container, StepRange,
};

/// This module provides a convenient way to import the most common traits
/// from this library via a glob import.
pub mod prelude {
    pub use super::Container;
}
