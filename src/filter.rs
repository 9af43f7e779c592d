use crate::array::{Array, IndexSelection};
use crate::cursor::{decompose, linearize};
use crate::env::validation_enabled;
use crate::errors::{exact_div, ArrayError};
use crate::iterators::FilteredIter;
use crate::view::{Container, StepRange};

/// A read-only view of the records of an [`Array`] selected by a filter.
///
/// Each filter entry `f` selects `nb_item_per_elem` consecutive records of
/// the backing array, starting at record `f * nb_item_per_elem`. For example
/// when the backing array stores one record per quadrature point and there
/// are `nb_item_per_elem` quadrature points per element, the filter is a
/// list of element indices and the view yields the quadrature point records
/// of those elements, in filter order.
///
/// The filter may contain repeated entries. Records are never copied; use
/// [`to_array`](FilteredView::to_array) to materialize the selection.
///
/// ```
/// use fe_array::{Array, FilteredView, IndexSelection};
///
/// // 3 elements with 2 quadrature points each, 1 component per point.
/// let stress = Array::from_data(1, vec![0., 1., 10., 11., 20., 21.]).unwrap();
/// let elements = IndexSelection::from([2, 0]);
///
/// let filtered = FilteredView::new(&stress, &elements, 2).unwrap();
/// let values: Vec<f64> = filtered.iter().map(|record| record[0]).collect();
/// assert_eq!(values, [20., 21., 0., 1.]);
/// ```
#[derive(Debug)]
pub struct FilteredView<'a, T> {
    array: &'a Array<T>,
    filter: &'a IndexSelection,
    nb_item_per_elem: usize,
}

impl<T> Clone for FilteredView<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for FilteredView<'_, T> {}

impl<'a, T> FilteredView<'a, T> {
    /// Create a view of the records of `array` selected by `filter`.
    ///
    /// Fails with `InvalidConfiguration` if `nb_item_per_elem` is zero or the
    /// filter does not have exactly one component. When validation is
    /// enabled (see [`validation_enabled`]), fails with `IndexOutOfRange` if a
    /// filter entry selects records beyond the end of `array`.
    pub fn new(
        array: &'a Array<T>,
        filter: &'a IndexSelection,
        nb_item_per_elem: usize,
    ) -> Result<Self, ArrayError> {
        if nb_item_per_elem == 0 {
            return Err(ArrayError::InvalidConfiguration(
                "nb_item_per_elem must be non-zero",
            ));
        }
        if filter.nb_components() != 1 {
            return Err(ArrayError::InvalidConfiguration(
                "filter must have one component per record",
            ));
        }
        let view = FilteredView {
            array,
            filter,
            nb_item_per_elem,
        };
        if validation_enabled() {
            view.check_bounds(nb_item_per_elem, array.nb_components())?;
        }
        Ok(view)
    }

    /// Return the number of selected records, `filter.size() * nb_item_per_elem`.
    pub fn size(&self) -> usize {
        self.filter.size() * self.nb_item_per_elem
    }

    /// Return the number of components of each record, which is that of the
    /// backing array.
    pub fn nb_components(&self) -> usize {
        self.array.nb_components()
    }

    /// Return true if no records are selected.
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Return the number of records selected by each filter entry.
    pub fn nb_item_per_elem(&self) -> usize {
        self.nb_item_per_elem
    }

    /// Return the backing array.
    pub fn array(&self) -> &'a Array<T> {
        self.array
    }

    /// Return the filter.
    pub fn filter(&self) -> &'a IndexSelection {
        self.filter
    }

    /// Return the `index`th selected record, or `None` if `index` is out of
    /// range.
    pub fn get(&self, index: usize) -> Option<&'a [T]> {
        if index >= self.size() {
            return None;
        }
        let pos = decompose(index, self.nb_item_per_elem);
        let outer = *self.filter.data().get(pos.outer)?;
        let record = linearize(outer, pos.inner, self.nb_item_per_elem);
        self.array.try_record(record).ok()
    }

    /// Return an iterator over the selected records.
    pub fn iter(&self) -> FilteredIter<'a, T> {
        self.begin()
    }

    /// Return an iterator positioned at the first selected record.
    pub fn begin(&self) -> FilteredIter<'a, T> {
        FilteredIter::new(
            self.array.data(),
            self.nb_components(),
            self.filter.data(),
            0,
            self.nb_item_per_elem,
        )
    }

    /// Return an iterator positioned one past the last selected record.
    pub fn end(&self) -> FilteredIter<'a, T> {
        FilteredIter::new(
            self.array.data(),
            self.nb_components(),
            self.filter.data(),
            self.filter.size(),
            self.nb_item_per_elem,
        )
    }

    /// Return the number of sub-items per filter entry after reinterpreting
    /// the backing array as blocks of `n` scalars, where the selection spans
    /// `new_size` outer entries.
    ///
    /// The result is
    /// `nb_components * filter.size() * nb_item_per_elem / (n * new_size)`.
    /// If `n` or `new_size` is zero, or the selection is empty, the current
    /// `nb_item_per_elem` is returned unchanged.
    ///
    /// Otherwise `new_size` must equal `filter.size()`, since the selection
    /// always spans one outer entry per filter entry. Any other value, such as
    /// the number of items of a view over this filter, fails with
    /// `SizeMismatch`. Fails with `ShapeMismatch` if the selection's scalars
    /// cannot be split evenly into `new_size * k` blocks of `n` scalars.
    pub fn reinterpreted_nb_item_per_elem(
        &self,
        n: usize,
        new_size: usize,
    ) -> Result<usize, ArrayError> {
        if n == 0 || new_size == 0 || self.is_empty() {
            return Ok(self.nb_item_per_elem);
        }
        if new_size != self.filter.size() {
            return Err(ArrayError::SizeMismatch {
                expected: self.filter.size(),
                actual: new_size,
            });
        }
        let divisor = n.checked_mul(new_size).ok_or(ArrayError::InvalidConfiguration(
            "reshape block size overflows usize",
        ))?;
        exact_div(self.nb_components() * self.size(), divisor)
    }

    /// Return an iterator over blocks of `n` scalars of the selection, at its
    /// first position.
    ///
    /// See [`reinterpreted_nb_item_per_elem`](FilteredView::reinterpreted_nb_item_per_elem)
    /// for the meaning of `new_size`.
    pub fn begin_reinterpret(
        &self,
        n: usize,
        new_size: usize,
    ) -> Result<FilteredIter<'a, T>, ArrayError> {
        self.reinterpret_at(n, new_size, 0)
    }

    /// Return the end iterator matching
    /// [`begin_reinterpret`](FilteredView::begin_reinterpret).
    pub fn end_reinterpret(
        &self,
        n: usize,
        new_size: usize,
    ) -> Result<FilteredIter<'a, T>, ArrayError> {
        self.reinterpret_at(n, new_size, self.filter.size())
    }

    fn reinterpret_at(
        &self,
        n: usize,
        new_size: usize,
        filter_pos: usize,
    ) -> Result<FilteredIter<'a, T>, ArrayError> {
        let nb_item_per_elem = self.reinterpreted_nb_item_per_elem(n, new_size)?;
        if validation_enabled() {
            self.check_bounds(nb_item_per_elem, n)?;
        }
        Ok(FilteredIter::new(
            self.array.data(),
            n,
            self.filter.data(),
            filter_pos,
            nb_item_per_elem,
        ))
    }

    /// Check that every filter entry selects blocks of `block` scalars that
    /// lie within the backing array.
    fn check_bounds(&self, nb_item_per_elem: usize, block: usize) -> Result<(), ArrayError> {
        let span = nb_item_per_elem * block;
        if span == 0 {
            return Ok(());
        }
        let len = self.array.len() / span;
        match self.filter.data().iter().find(|&&outer| outer >= len) {
            Some(&index) => Err(ArrayError::IndexOutOfRange { index, len }),
            None => Ok(()),
        }
    }
}

impl<T: Clone> FilteredView<'_, T> {
    /// Copy the selected records into a new array.
    ///
    /// The new array has the same number of components and default value as
    /// the backing array.
    pub fn to_array(&self) -> Array<T> {
        let data: Vec<T> = self.iter().flatten().cloned().collect();
        Array::from_parts(
            self.nb_components(),
            data,
            self.array.default_value().clone(),
        )
    }
}

impl<'a, T> IntoIterator for &FilteredView<'a, T> {
    type Item = &'a [T];
    type IntoIter = FilteredIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.begin()
    }
}

impl<T> Container for FilteredView<'_, T> {
    type Elem = T;

    fn size(&self) -> usize {
        FilteredView::size(self)
    }

    fn nb_components(&self) -> usize {
        FilteredView::nb_components(self)
    }

    /// Split each filter entry's records into blocks of `block` scalars.
    ///
    /// The selection spans `filter.size()` outer entries, so this uses
    /// `nb_components * nb_item_per_elem / block` sub-items per entry. Fails
    /// if a block would straddle two filter entries.
    fn steps(&self, block: usize) -> Result<StepRange<'_, T>, ArrayError> {
        let nb_item_per_elem = self.reinterpreted_nb_item_per_elem(block, self.filter.size())?;
        if validation_enabled() {
            self.check_bounds(nb_item_per_elem, block)?;
        }
        Ok(StepRange::Filtered {
            data: self.array.data(),
            filter: self.filter.data(),
            nb_item_per_elem,
        })
    }
}
