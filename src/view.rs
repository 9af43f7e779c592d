use std::ops::{Deref, DerefMut};

use smallvec::SmallVec;

use crate::array::Array;
use crate::cursor::{decompose, linearize};
use crate::errors::{exact_div, ArrayError};
use crate::iterators::{DirectIter, FilteredIter, Iter, IterKind, IterMut};

/// Shape of a view's items. Views rarely have more than a few dimensions.
pub(crate) type Shape = SmallVec<[usize; 4]>;

/// A sequence of records that views can be built on.
///
/// This is implemented by [`Array`], which is traversed directly, and by
/// [`FilteredView`](crate::FilteredView), which gathers records through a
/// filter. Code that consumes views only depends on this trait and on the
/// iteration contract of [`ArrayView`], not on the concrete container.
pub trait Container {
    /// The element type.
    type Elem;

    /// Return the number of records.
    fn size(&self) -> usize;

    /// Return the number of scalars in each record.
    fn nb_components(&self) -> usize;

    /// Return true if the container has no records.
    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Return the range to traverse when the container is split into items
    /// of `block` scalars.
    ///
    /// Fails with `ShapeMismatch` if the container cannot be split into
    /// blocks of this size.
    fn steps(&self, block: usize) -> Result<StepRange<'_, Self::Elem>, ArrayError>;
}

/// The traversal strategy of a view, determined by the kind of container it
/// was built on.
#[derive(Debug)]
pub enum StepRange<'a, T> {
    /// Consecutive blocks of a contiguous buffer.
    Direct { data: &'a [T] },

    /// Blocks gathered through a filter. Filter entry `f` selects the
    /// `nb_item_per_elem` blocks starting at block `f * nb_item_per_elem`.
    Filtered {
        data: &'a [T],
        filter: &'a [usize],
        nb_item_per_elem: usize,
    },
}

impl<T> Clone for StepRange<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for StepRange<'_, T> {}

impl<'a, T> StepRange<'a, T> {
    /// Return an iterator positioned at the first block.
    pub(crate) fn begin(&self, block: usize) -> IterKind<'a, T> {
        match *self {
            StepRange::Direct { data } => IterKind::Direct(DirectIter::new(data, block, 0)),
            StepRange::Filtered {
                data,
                filter,
                nb_item_per_elem,
            } => IterKind::Filtered(FilteredIter::new(data, block, filter, 0, nb_item_per_elem)),
        }
    }

    /// Return an iterator positioned one past the last block.
    pub(crate) fn end(&self, block: usize) -> IterKind<'a, T> {
        match *self {
            StepRange::Direct { data } => {
                IterKind::Direct(DirectIter::new(data, block, data.len() / block))
            }
            StepRange::Filtered {
                data,
                filter,
                nb_item_per_elem,
            } => IterKind::Filtered(FilteredIter::new(
                data,
                block,
                filter,
                filter.len(),
                nb_item_per_elem,
            )),
        }
    }

    /// Return the scalars of the `index`th block in traversal order.
    ///
    /// Panics if `index` is out of range or, for a filtered range, if the
    /// selected filter entry points outside the data.
    pub(crate) fn block_at(&self, index: usize, block: usize) -> &'a [T] {
        let start = match *self {
            StepRange::Direct { .. } => index * block,
            StepRange::Filtered {
                filter,
                nb_item_per_elem,
                ..
            } => {
                let pos = decompose(index, nb_item_per_elem);
                linearize(filter[pos.outer], pos.inner, nb_item_per_elem) * block
            }
        };
        let data = match *self {
            StepRange::Direct { data } | StepRange::Filtered { data, .. } => data,
        };
        &data[start..start + block]
    }
}

impl<T> Container for Array<T> {
    type Elem = T;

    fn size(&self) -> usize {
        Array::size(self)
    }

    fn nb_components(&self) -> usize {
        Array::nb_components(self)
    }

    fn steps(&self, block: usize) -> Result<StepRange<'_, T>, ArrayError> {
        exact_div(self.len(), block)?;
        Ok(StepRange::Direct { data: self.data() })
    }
}

/// Validate `dims` against `len` scalars, returning the scalar count of one
/// item and the number of items.
fn item_layout(len: usize, dims: &[usize]) -> Result<(usize, usize), ArrayError> {
    let block = dims
        .iter()
        .try_fold(1usize, |block, &dim| block.checked_mul(dim))
        .ok_or(ArrayError::InvalidConfiguration(
            "view dimensions overflow usize",
        ))?;
    if block == 0 {
        return Err(ArrayError::InvalidConfiguration(
            "view dimensions must be non-zero",
        ));
    }
    let size = exact_div(len, block)?;
    Ok((block, size))
}

/// Return the offset of `index` in a row-major block of shape `shape`.
fn block_offset(shape: &[usize], index: &[usize]) -> Option<usize> {
    if index.len() != shape.len() {
        return None;
    }
    index
        .iter()
        .zip(shape)
        .try_fold(0, |offset, (&i, &size)| (i < size).then_some(offset * size + i))
}

/// One item of a view: a row-major block of scalars with a shape.
///
/// Dereferences to the flat slice of scalars.
#[derive(Debug)]
pub struct Block<'d, 's, T> {
    data: &'d [T],
    shape: &'s [usize],
}

impl<T> Clone for Block<'_, '_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Block<'_, '_, T> {}

impl<'d, 's, T> Block<'d, 's, T> {
    pub(crate) fn new(data: &'d [T], shape: &'s [usize]) -> Block<'d, 's, T> {
        Block { data, shape }
    }

    /// Return the block's scalars in row-major order.
    pub fn as_slice(&self) -> &'d [T] {
        self.data
    }

    /// Return the size of each dimension of the block.
    pub fn shape(&self) -> &'s [usize] {
        self.shape
    }

    /// Return the element at a multi-dimensional index, or `None` if the
    /// index has the wrong length or is out of bounds.
    pub fn at(&self, index: &[usize]) -> Option<&'d T> {
        let data = self.data;
        block_offset(self.shape, index).map(|offset| &data[offset])
    }
}

impl<T> Deref for Block<'_, '_, T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.data
    }
}

/// Mutable version of [`Block`].
#[derive(Debug)]
pub struct BlockMut<'d, 's, T> {
    data: &'d mut [T],
    shape: &'s [usize],
}

impl<'d, 's, T> BlockMut<'d, 's, T> {
    pub(crate) fn new(data: &'d mut [T], shape: &'s [usize]) -> BlockMut<'d, 's, T> {
        BlockMut { data, shape }
    }

    /// Return the size of each dimension of the block.
    pub fn shape(&self) -> &'s [usize] {
        self.shape
    }

    /// Return the element at a multi-dimensional index.
    pub fn at(&self, index: &[usize]) -> Option<&T> {
        let offset = block_offset(self.shape, index)?;
        Some(&self.data[offset])
    }

    /// Return the element at a multi-dimensional index mutably.
    pub fn at_mut(&mut self, index: &[usize]) -> Option<&mut T> {
        let offset = block_offset(self.shape, index)?;
        Some(&mut self.data[offset])
    }

    /// Consume the block and return its scalars, preserving the data
    /// lifetime.
    pub fn into_slice_mut(self) -> &'d mut [T] {
        self.data
    }
}

impl<T> Deref for BlockMut<'_, '_, T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.data
    }
}

impl<T> DerefMut for BlockMut<'_, '_, T> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.data
    }
}

/// A view which reinterprets a container as a sequence of equally shaped
/// items, without copying.
///
/// Created with [`make_view`]. A view built with dimensions
/// `[d_1, ..., d_{k-1}]` yields `size()` items, each a row-major block of
/// shape `[d_1, ..., d_{k-1}]`, where
/// `size() = container.size() * container.nb_components() / (d_1 * ... * d_{k-1})`.
///
/// For example a view with dimensions `[2]` over an array of 2D velocities
/// yields one 2-vector per record, and a view with dimensions `[3, 3]` over
/// an array with 9 components yields one 3x3 matrix per record.
#[derive(Debug)]
pub struct ArrayView<'a, T> {
    range: StepRange<'a, T>,
    dims: Shape,
    block: usize,
    size: usize,
}

impl<T> Clone for ArrayView<'_, T> {
    fn clone(&self) -> Self {
        ArrayView {
            range: self.range,
            dims: self.dims.clone(),
            block: self.block,
            size: self.size,
        }
    }
}

impl<'a, T> ArrayView<'a, T> {
    /// Return an iterator positioned at the first item.
    pub fn begin(&self) -> Iter<'a, '_, T> {
        Iter::new(self.range.begin(self.block), &self.dims)
    }

    /// Return an iterator positioned one past the last item.
    ///
    /// Iterators returned by [`begin`](ArrayView::begin) compare equal to this
    /// once exhausted.
    pub fn end(&self) -> Iter<'a, '_, T> {
        Iter::new(self.range.end(self.block), &self.dims)
    }

    /// Return an iterator over the view's items. Same as
    /// [`begin`](ArrayView::begin).
    pub fn iter(&self) -> Iter<'a, '_, T> {
        self.begin()
    }

    /// Return the `index`th item, or `None` if `index >= self.size()`.
    pub fn block(&self, index: usize) -> Option<Block<'a, '_, T>> {
        (index < self.size).then(|| Block::new(self.range.block_at(index, self.block), &self.dims))
    }

    /// Return the number of items, ie. the computed trailing dimension.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Return true if the view has no items.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Return the number of dimensions specified when creating the view.
    pub fn dims(&self) -> usize {
        self.dims.len()
    }

    /// Return the shape of each item.
    pub fn shape(&self) -> &[usize] {
        &self.dims
    }

    /// Return the strategy used to traverse the underlying container.
    pub fn range(&self) -> StepRange<'a, T> {
        self.range
    }

    pub(crate) fn block_len(&self) -> usize {
        self.block
    }
}

impl<'a, 's, T> IntoIterator for &'s ArrayView<'a, T> {
    type Item = Block<'a, 's, T>;
    type IntoIter = Iter<'a, 's, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.begin()
    }
}

/// Mutable view over an [`Array`], created with [`make_view_mut`].
///
/// Items are disjoint blocks of the array, so they can be modified
/// independently, including from different threads via
/// [`par_iter_mut`](ArrayViewMut::par_iter_mut).
#[derive(Debug)]
pub struct ArrayViewMut<'a, T> {
    data: &'a mut [T],
    dims: Shape,
    block: usize,
    size: usize,
}

impl<'a, T> ArrayViewMut<'a, T> {
    /// Return an iterator over the view's items.
    pub fn iter(&self) -> Iter<'_, '_, T> {
        Iter::new(
            IterKind::Direct(DirectIter::new(&*self.data, self.block, 0)),
            &self.dims,
        )
    }

    /// Return an iterator over mutable items.
    pub fn iter_mut(&mut self) -> IterMut<'_, '_, T> {
        IterMut::new(&mut *self.data, self.block, &self.dims)
    }

    /// Return the `index`th item mutably, or `None` if out of range.
    pub fn block_mut(&mut self, index: usize) -> Option<BlockMut<'_, '_, T>> {
        if index >= self.size {
            return None;
        }
        let start = index * self.block;
        Some(BlockMut::new(
            &mut self.data[start..start + self.block],
            &self.dims,
        ))
    }

    /// Return the number of items.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Return true if the view has no items.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Return the number of dimensions specified when creating the view.
    pub fn dims(&self) -> usize {
        self.dims.len()
    }

    /// Return the shape of each item.
    pub fn shape(&self) -> &[usize] {
        &self.dims
    }

    pub(crate) fn parts_mut(&mut self) -> (&mut [T], usize, &[usize]) {
        (&mut *self.data, self.block, &self.dims)
    }
}

/// Create a view of `container` whose items have shape `dims`.
///
/// The number of items is computed so that all scalars of the container are
/// covered. An empty `dims` yields one item per scalar.
///
/// Fails with `InvalidConfiguration` if any dimension is zero or their
/// product overflows, or with `ShapeMismatch` if the product of `dims` does
/// not evenly divide the container's scalar count.
///
/// ```
/// use fe_array::{make_view, Array};
///
/// let velocity = Array::from_data(2, vec![1., 0., 0., 1., 1., 1.]).unwrap();
/// let view = make_view(&velocity, &[2]).unwrap();
/// assert_eq!(view.size(), 3);
///
/// let norms: Vec<f64> = view
///     .iter()
///     .map(|v| v.iter().map(|x| x * x).sum::<f64>())
///     .collect();
/// assert_eq!(norms, [1., 1., 2.]);
/// ```
pub fn make_view<'a, C: Container + ?Sized>(
    container: &'a C,
    dims: &[usize],
) -> Result<ArrayView<'a, C::Elem>, ArrayError> {
    let (block, size) = item_layout(container.size() * container.nb_components(), dims)?;
    let range = container.steps(block)?;
    Ok(ArrayView {
        range,
        dims: Shape::from_slice(dims),
        block,
        size,
    })
}

/// Create an immutable view of `container`.
///
/// This is equivalent to [`make_view`]. It exists so call sites can state
/// that the view is only read, whatever the mutability of the binding that
/// owns the container.
pub fn make_const_view<'a, C: Container + ?Sized>(
    container: &'a C,
    dims: &[usize],
) -> Result<ArrayView<'a, C::Elem>, ArrayError> {
    make_view(container, dims)
}

/// Create a mutable view of `array` whose items have shape `dims`.
///
/// This has the same validation rules as [`make_view`]. Holding the view
/// borrows the array mutably, so the array cannot be resized while the view
/// exists.
pub fn make_view_mut<'a, T>(
    array: &'a mut Array<T>,
    dims: &[usize],
) -> Result<ArrayViewMut<'a, T>, ArrayError> {
    let (block, size) = item_layout(array.len(), dims)?;
    Ok(ArrayViewMut {
        data: array.data_mut(),
        dims: Shape::from_slice(dims),
        block,
        size,
    })
}

#[cfg(test)]
mod tests {
    use fe_array_testing::TestCases;

    use super::{block_offset, make_const_view, make_view, make_view_mut, Container, StepRange};
    use crate::array::Array;
    use crate::errors::ArrayError;

    fn iota(size: usize, nb_components: usize) -> Array<i32> {
        let data = (0..(size * nb_components) as i32).collect();
        Array::from_data(nb_components, data).unwrap()
    }

    #[test]
    fn test_view_sizes() {
        #[derive(Debug)]
        struct Case {
            size: usize,
            nb_components: usize,
            dims: &'static [usize],
            expected: Result<usize, ArrayError>,
        }

        let cases = [
            Case {
                size: 4,
                nb_components: 2,
                dims: &[2],
                expected: Ok(4),
            },
            Case {
                size: 4,
                nb_components: 2,
                dims: &[],
                expected: Ok(8),
            },
            Case {
                size: 3,
                nb_components: 4,
                dims: &[2, 2],
                expected: Ok(3),
            },
            Case {
                size: 6,
                nb_components: 1,
                dims: &[3],
                expected: Ok(2),
            },
            Case {
                size: 0,
                nb_components: 3,
                dims: &[3],
                expected: Ok(0),
            },
            Case {
                size: 5,
                nb_components: 2,
                dims: &[3],
                expected: Err(ArrayError::ShapeMismatch { len: 10, divisor: 3 }),
            },
            Case {
                size: 5,
                nb_components: 2,
                dims: &[2, 0],
                expected: Err(ArrayError::InvalidConfiguration(
                    "view dimensions must be non-zero",
                )),
            },
        ];

        cases.test_each(|case| {
            let array = iota(case.size, case.nb_components);
            let view = make_view(&array, case.dims);
            let size = view.as_ref().map(|v| v.size()).map_err(|e| e.clone());
            assert_eq!(size, case.expected.clone());
            if let Ok(view) = view {
                assert_eq!(view.dims(), case.dims.len());
                assert_eq!(view.shape(), case.dims);
                assert_eq!(view.iter().count(), view.size());
            }
        })
    }

    #[test]
    fn test_view_visits_scalars_in_order() {
        let array = iota(6, 4);
        for dims in [&[1][..], &[2], &[4], &[2, 2], &[3], &[2, 3]] {
            let view = make_view(&array, dims).unwrap();
            let block: usize = dims.iter().product();
            assert_eq!(view.size(), array.len() / block);

            let scalars: Vec<i32> = view.iter().flat_map(|b| b.as_slice().to_vec()).collect();
            assert_eq!(scalars, array.data());
        }
    }

    #[test]
    fn test_block_shape_and_index() {
        let array = iota(2, 6);
        let view = make_view(&array, &[2, 3]).unwrap();
        let second = view.block(1).unwrap();
        assert_eq!(second.shape(), &[2, 3]);
        assert_eq!(second.at(&[0, 0]), Some(&6));
        assert_eq!(second.at(&[1, 2]), Some(&11));
        assert_eq!(second.at(&[2, 0]), None);
        assert_eq!(second.at(&[1]), None);
        assert_eq!(second[4], 10);
        assert!(view.block(2).is_none());
    }

    #[test]
    fn test_block_offset() {
        assert_eq!(block_offset(&[], &[]), Some(0));
        assert_eq!(block_offset(&[3], &[2]), Some(2));
        assert_eq!(block_offset(&[2, 3, 4], &[1, 2, 3]), Some(23));
        assert_eq!(block_offset(&[2, 3], &[0, 3]), None);
    }

    #[test]
    fn test_begin_end() {
        let array = iota(3, 2);
        let view = make_view(&array, &[2]).unwrap();
        let mut iter = view.begin();
        let end = view.end();
        let mut count = 0;
        while iter != end {
            iter.next();
            count += 1;
        }
        assert_eq!(count, 3);
        assert!(iter.next().is_none());
        assert_eq!(iter.current_index(), None);
    }

    #[test]
    fn test_into_iter() {
        let array = iota(2, 2);
        let view = make_const_view(&array, &[2]).unwrap();
        let mut sums = Vec::new();
        for block in &view {
            sums.push(block.iter().sum::<i32>());
        }
        assert_eq!(sums, [1, 5]);
    }

    #[test]
    fn test_view_mut() {
        let mut array = iota(3, 2);
        let mut view = make_view_mut(&mut array, &[2]).unwrap();
        assert_eq!(view.size(), 3);
        for mut block in view.iter_mut() {
            block[1] = -block[1];
        }
        *view.block_mut(0).unwrap().at_mut(&[0]).unwrap() = 100;
        assert!(view.block_mut(3).is_none());
        assert_eq!(view.iter().map(|b| b[0]).collect::<Vec<_>>(), [100, 2, 4]);
        assert_eq!(array.data(), &[100, -1, 2, -3, 4, -5]);
    }

    #[test]
    fn test_view_mut_errors() {
        let mut array = iota(3, 2);
        assert_eq!(
            make_view_mut(&mut array, &[4]).err(),
            Some(ArrayError::ShapeMismatch { len: 6, divisor: 4 })
        );
        assert_eq!(
            make_view_mut(&mut array, &[0]).err(),
            Some(ArrayError::InvalidConfiguration(
                "view dimensions must be non-zero"
            ))
        );
        assert_eq!(
            make_view_mut(&mut array, &[usize::MAX, 2]).err(),
            Some(ArrayError::InvalidConfiguration(
                "view dimensions overflow usize"
            ))
        );
    }

    #[test]
    fn test_view_dims_overflow() {
        let array = iota(3, 2);
        assert_eq!(
            make_view(&array, &[usize::MAX, 2]).err(),
            Some(ArrayError::InvalidConfiguration(
                "view dimensions overflow usize"
            ))
        );

        // A zero dimension after an overflowing prefix is still rejected.
        assert!(make_view(&array, &[usize::MAX, 2, 0]).is_err());

        // Large dimensions whose product fits are a shape mismatch.
        assert_eq!(
            make_view(&array, &[1000, 1000]).err(),
            Some(ArrayError::ShapeMismatch {
                len: 6,
                divisor: 1_000_000
            })
        );
    }

    #[test]
    fn test_direct_range() {
        let array = iota(2, 3);
        assert!(matches!(
            array.steps(3),
            Ok(StepRange::Direct { data }) if data.len() == 6
        ));
        assert_eq!(
            array.steps(4).err(),
            Some(ArrayError::ShapeMismatch { len: 6, divisor: 4 })
        );
    }
}
