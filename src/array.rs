use std::ops::{Index, IndexMut};
use std::slice::{ChunksExact, ChunksExactMut};

use crate::errors::{exact_div, ArrayError};

/// A resizable, contiguous buffer of fixed-width records.
///
/// The buffer holds `size() * nb_components()` scalars. Component `c` of
/// record `i` is stored at `data()[i * nb_components() + c]`.
///
/// Slots created when the array grows are filled with the array's default
/// value, which is `T::default()` unless configured otherwise with
/// [`set_default_value`](Array::set_default_value) or
/// [`full`](Array::full).
#[derive(Clone, PartialEq)]
pub struct Array<T> {
    data: Vec<T>,
    nb_components: usize,
    default_value: T,
    id: String,
}

/// A list of record indices with one component per record, used to select
/// records for a [`FilteredView`](crate::FilteredView).
pub type IndexSelection = Array<usize>;

fn check_nb_components(nb_components: usize) -> Result<(), ArrayError> {
    if nb_components == 0 {
        return Err(ArrayError::InvalidConfiguration("nb_components must be non-zero"));
    }
    Ok(())
}

impl<T: Clone + Default> Array<T> {
    /// Create an array of `size` records of `nb_components` scalars, each set
    /// to `T::default()`.
    pub fn new(size: usize, nb_components: usize) -> Result<Self, ArrayError> {
        Self::full(size, nb_components, T::default())
    }

    /// Create an array from existing data, grouped into records of
    /// `nb_components` scalars.
    pub fn from_data(nb_components: usize, data: Vec<T>) -> Result<Self, ArrayError> {
        check_nb_components(nb_components)?;
        exact_div(data.len(), nb_components)?;
        Ok(Array {
            data,
            nb_components,
            default_value: T::default(),
            id: String::new(),
        })
    }
}

impl<T: Clone> Array<T> {
    /// Create an array of `size` records with every scalar set to `value`.
    ///
    /// `value` also becomes the fill value for future growth.
    pub fn full(size: usize, nb_components: usize, value: T) -> Result<Self, ArrayError> {
        check_nb_components(nb_components)?;
        Ok(Array {
            data: vec![value.clone(); size * nb_components],
            nb_components,
            default_value: value,
            id: String::new(),
        })
    }

    /// Resize to `new_size` records.
    ///
    /// Records up to `min(size, new_size)` are preserved. New slots are set
    /// to the default value.
    pub fn resize(&mut self, new_size: usize) {
        let value = self.default_value.clone();
        self.resize_with_value(new_size, value);
    }

    /// Resize to `new_size` records, filling new slots with `value`.
    pub fn resize_with_value(&mut self, new_size: usize, value: T) {
        self.data.resize(new_size * self.nb_components, value);
    }

    /// Append a record.
    pub fn push(&mut self, record: &[T]) -> Result<(), ArrayError> {
        if record.len() != self.nb_components {
            return Err(ArrayError::ShapeMismatch {
                len: record.len(),
                divisor: self.nb_components,
            });
        }
        self.data.extend_from_slice(record);
        Ok(())
    }

    /// Set every scalar to `value`.
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    /// Set the value used to fill slots created by [`resize`](Array::resize).
    pub fn set_default_value(&mut self, value: T) {
        self.default_value = value;
    }
}

impl<T> Array<T> {
    /// Assemble an array from parts that are already known to be consistent.
    pub(crate) fn from_parts(nb_components: usize, data: Vec<T>, default_value: T) -> Self {
        debug_assert!(nb_components > 0 && data.len() % nb_components == 0);
        Array {
            data,
            nb_components,
            default_value,
            id: String::new(),
        }
    }

    /// Set a name which identifies this array in debug output.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Return the name set with [`with_id`](Array::with_id).
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Return the value used to fill new slots on growth.
    pub fn default_value(&self) -> &T {
        &self.default_value
    }

    /// Return the number of records.
    pub fn size(&self) -> usize {
        self.data.len() / self.nb_components
    }

    /// Return the number of scalars in each record.
    pub fn nb_components(&self) -> usize {
        self.nb_components
    }

    /// Return the total number of scalars, `size() * nb_components()`.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Return true if the array has no records.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Return the underlying scalars in record order.
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Return the underlying scalars mutably.
    ///
    /// The length of the returned slice cannot change, so the record layout
    /// is preserved.
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Return record `index`, or `IndexOutOfRange`.
    pub fn try_record(&self, index: usize) -> Result<&[T], ArrayError> {
        self.check_index(index)?;
        Ok(self.record(index))
    }

    /// Return record `index`.
    ///
    /// Panics if `index >= self.size()`.
    pub fn record(&self, index: usize) -> &[T] {
        let start = index * self.nb_components;
        &self.data[start..start + self.nb_components]
    }

    /// Return record `index` mutably.
    ///
    /// Panics if `index >= self.size()`.
    pub fn record_mut(&mut self, index: usize) -> &mut [T] {
        let start = index * self.nb_components;
        &mut self.data[start..start + self.nb_components]
    }

    /// Return component `component` of record `index`, or `None` if either is
    /// out of range.
    pub fn get(&self, index: usize, component: usize) -> Option<&T> {
        if component >= self.nb_components {
            return None;
        }
        self.data.get(index * self.nb_components + component)
    }

    /// Mutable version of [`get`](Array::get).
    pub fn get_mut(&mut self, index: usize, component: usize) -> Option<&mut T> {
        if component >= self.nb_components {
            return None;
        }
        self.data.get_mut(index * self.nb_components + component)
    }

    /// Remove record `index`, shifting later records down by one.
    pub fn erase(&mut self, index: usize) -> Result<(), ArrayError> {
        self.check_index(index)?;
        let start = index * self.nb_components;
        self.data.drain(start..start + self.nb_components);
        Ok(())
    }

    /// Return an iterator over records.
    pub fn iter_records(&self) -> ChunksExact<'_, T> {
        self.data.chunks_exact(self.nb_components)
    }

    /// Return an iterator over mutable records.
    pub fn iter_records_mut(&mut self) -> ChunksExactMut<'_, T> {
        self.data.chunks_exact_mut(self.nb_components)
    }

    fn check_index(&self, index: usize) -> Result<(), ArrayError> {
        let len = self.size();
        if index >= len {
            return Err(ArrayError::IndexOutOfRange { index, len });
        }
        Ok(())
    }
}

impl<T: Default> From<Vec<T>> for Array<T> {
    /// Create an array with one component per record.
    fn from(data: Vec<T>) -> Self {
        Array {
            data,
            nb_components: 1,
            default_value: T::default(),
            id: String::new(),
        }
    }
}

impl<T: Default + Clone, const N: usize> From<[T; N]> for Array<T> {
    fn from(data: [T; N]) -> Self {
        Array::from(data.to_vec())
    }
}

impl<T> Index<usize> for Array<T> {
    type Output = [T];

    fn index(&self, index: usize) -> &[T] {
        self.record(index)
    }
}

impl<T> IndexMut<usize> for Array<T> {
    fn index_mut(&mut self, index: usize) -> &mut [T] {
        self.record_mut(index)
    }
}
