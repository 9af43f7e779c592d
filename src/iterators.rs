use std::iter::FusedIterator;
use std::slice::ChunksExactMut;

use crate::cursor::{linearize, Cursor};
use crate::view::{Block, BlockMut};

mod parallel;

/// Iterator over consecutive fixed-size blocks of a contiguous buffer.
#[derive(Debug)]
pub struct DirectIter<'a, T> {
    data: &'a [T],

    /// Number of scalars per yielded block.
    block: usize,

    /// Index of the next block.
    pos: usize,

    /// Index one past the last block.
    end: usize,
}

impl<'a, T> DirectIter<'a, T> {
    pub(crate) fn new(data: &'a [T], block: usize, pos: usize) -> DirectIter<'a, T> {
        let end = if block == 0 { 0 } else { data.len() / block };
        DirectIter {
            data,
            block,
            pos: pos.min(end),
            end,
        }
    }

    /// Return the index of the block the next call to `next` will yield.
    pub fn position(&self) -> usize {
        self.pos
    }
}

impl<T> Clone for DirectIter<'_, T> {
    fn clone(&self) -> Self {
        DirectIter { ..*self }
    }
}

impl<T> PartialEq for DirectIter<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.data.as_ptr(), other.data.as_ptr())
            && self.block == other.block
            && self.pos == other.pos
    }
}

impl<'a, T> Iterator for DirectIter<'a, T> {
    type Item = &'a [T];

    #[inline]
    fn next(&mut self) -> Option<&'a [T]> {
        if self.pos >= self.end {
            return None;
        }
        let start = self.pos * self.block;
        self.pos += 1;
        Some(&self.data[start..start + self.block])
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.end - self.pos;
        (len, Some(len))
    }
}

impl<T> ExactSizeIterator for DirectIter<'_, T> {}
impl<T> FusedIterator for DirectIter<'_, T> {}

/// Iterator over the sub-items selected by a filter.
///
/// For each entry `f` of the filter, this yields `nb_item_per_elem`
/// consecutive blocks starting at block `f * nb_item_per_elem` of the backing
/// buffer. Nothing is copied: each item borrows the backing data.
///
/// The iterator is at its end when the filter position reaches the end of
/// the filter with a sub-element counter of zero, which is the state returned
/// by [`FilteredView::end`](crate::FilteredView::end).
#[derive(Debug)]
pub struct FilteredIter<'a, T> {
    data: &'a [T],

    /// Number of scalars per yielded block.
    block: usize,

    filter: &'a [usize],

    /// `outer` is the filter position, `inner` the sub-element counter.
    pos: Cursor,

    nb_item_per_elem: usize,
}

impl<'a, T> FilteredIter<'a, T> {
    pub(crate) fn new(
        data: &'a [T],
        block: usize,
        filter: &'a [usize],
        filter_pos: usize,
        nb_item_per_elem: usize,
    ) -> FilteredIter<'a, T> {
        debug_assert!(nb_item_per_elem > 0);
        FilteredIter {
            data,
            block,
            filter,
            pos: Cursor::new(filter_pos.min(filter.len()), 0),
            nb_item_per_elem,
        }
    }

    /// Return the block index in the backing buffer of the item the next call
    /// to `next` will yield, or `None` at the end.
    pub fn current_index(&self) -> Option<usize> {
        self.filter
            .get(self.pos.outer)
            .map(|&outer| linearize(outer, self.pos.inner, self.nb_item_per_elem))
    }

    /// Return the current position in the filter.
    pub fn filter_position(&self) -> usize {
        self.pos.outer
    }

    /// Return the counter of sub-items visited within the current filter
    /// entry.
    pub fn sub_element_counter(&self) -> usize {
        self.pos.inner
    }

    /// Return the number of sub-items per filter entry.
    pub fn nb_item_per_elem(&self) -> usize {
        self.nb_item_per_elem
    }
}

impl<T> Clone for FilteredIter<'_, T> {
    fn clone(&self) -> Self {
        FilteredIter { ..*self }
    }
}

impl<T> PartialEq for FilteredIter<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.data.as_ptr(), other.data.as_ptr())
            && self.block == other.block
            && std::ptr::eq(self.filter.as_ptr(), other.filter.as_ptr())
            && self.pos == other.pos
    }
}

impl<'a, T> Iterator for FilteredIter<'a, T> {
    type Item = &'a [T];

    #[inline]
    fn next(&mut self) -> Option<&'a [T]> {
        let index = self.current_index()?;
        self.pos.step(self.nb_item_per_elem);
        let start = index * self.block;
        Some(&self.data[start..start + self.block])
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining_outer = self.filter.len() - self.pos.outer;
        let len = (remaining_outer * self.nb_item_per_elem).saturating_sub(self.pos.inner);
        (len, Some(len))
    }
}

impl<T> ExactSizeIterator for FilteredIter<'_, T> {}
impl<T> FusedIterator for FilteredIter<'_, T> {}

#[derive(Debug)]
pub(crate) enum IterKind<'a, T> {
    Direct(DirectIter<'a, T>),
    Filtered(FilteredIter<'a, T>),
}

impl<T> Clone for IterKind<'_, T> {
    fn clone(&self) -> Self {
        match self {
            IterKind::Direct(iter) => IterKind::Direct(iter.clone()),
            IterKind::Filtered(iter) => IterKind::Filtered(iter.clone()),
        }
    }
}

impl<T> PartialEq for IterKind<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (IterKind::Direct(a), IterKind::Direct(b)) => a == b,
            (IterKind::Filtered(a), IterKind::Filtered(b)) => a == b,
            _ => false,
        }
    }
}

/// Iterator over the items of an [`ArrayView`](crate::ArrayView).
///
/// This has the same behavior whether the view is over an
/// [`Array`](crate::Array) or a [`FilteredView`](crate::FilteredView).
///
/// `'d` is the lifetime of the data and `'s` the lifetime of the item shape.
#[derive(Debug)]
pub struct Iter<'d, 's, T> {
    iter: IterKind<'d, T>,
    shape: &'s [usize],
}

impl<T> Clone for Iter<'_, '_, T> {
    fn clone(&self) -> Self {
        Iter {
            iter: self.iter.clone(),
            shape: self.shape,
        }
    }
}

impl<'d, 's, T> Iter<'d, 's, T> {
    pub(crate) fn new(iter: IterKind<'d, T>, shape: &'s [usize]) -> Iter<'d, 's, T> {
        Iter { iter, shape }
    }

    /// Return the backing block index of the next item, or `None` at the end.
    pub fn current_index(&self) -> Option<usize> {
        match &self.iter {
            IterKind::Direct(iter) => (iter.len() > 0).then_some(iter.position()),
            IterKind::Filtered(iter) => iter.current_index(),
        }
    }
}

impl<T> PartialEq for Iter<'_, '_, T> {
    fn eq(&self, other: &Self) -> bool {
        self.iter == other.iter
    }
}

impl<'d, 's, T> Iterator for Iter<'d, 's, T> {
    type Item = Block<'d, 's, T>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let data = match self.iter {
            IterKind::Direct(ref mut iter) => iter.next(),
            IterKind::Filtered(ref mut iter) => iter.next(),
        }?;
        Some(Block::new(data, self.shape))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.iter {
            IterKind::Direct(iter) => iter.size_hint(),
            IterKind::Filtered(iter) => iter.size_hint(),
        }
    }
}

impl<T> ExactSizeIterator for Iter<'_, '_, T> {}
impl<T> FusedIterator for Iter<'_, '_, T> {}

/// Iterator over mutable items of an [`ArrayViewMut`](crate::ArrayViewMut).
pub struct IterMut<'d, 's, T> {
    chunks: ChunksExactMut<'d, T>,
    shape: &'s [usize],
}

impl<'d, 's, T> IterMut<'d, 's, T> {
    pub(crate) fn new(data: &'d mut [T], block: usize, shape: &'s [usize]) -> IterMut<'d, 's, T> {
        IterMut {
            chunks: data.chunks_exact_mut(block),
            shape,
        }
    }
}

impl<'d, 's, T> Iterator for IterMut<'d, 's, T> {
    type Item = BlockMut<'d, 's, T>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.chunks.next().map(|data| BlockMut::new(data, self.shape))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.chunks.size_hint()
    }
}

impl<T> ExactSizeIterator for IterMut<'_, '_, T> {}
impl<T> FusedIterator for IterMut<'_, '_, T> {}

#[cfg(test)]
mod tests {
    use super::{DirectIter, FilteredIter};

    #[test]
    fn test_direct_iter() {
        let data = [0, 1, 2, 3, 4, 5];
        let blocks: Vec<_> = DirectIter::new(&data, 2, 0).collect();
        assert_eq!(blocks, [[0, 1].as_slice(), &[2, 3], &[4, 5]]);

        let mut iter = DirectIter::new(&data, 3, 0);
        assert_eq!(iter.len(), 2);
        iter.next();
        assert_eq!(iter.len(), 1);
        assert_eq!(iter.position(), 1);
    }

    #[test]
    fn test_direct_iter_end() {
        let data = [0, 1, 2, 3];
        let mut begin = DirectIter::new(&data, 2, 0);
        let end = DirectIter::new(&data, 2, 2);
        assert!(begin != end);
        begin.by_ref().for_each(drop);
        assert!(begin == end);
    }

    #[test]
    fn test_filtered_iter_gather() {
        // Four elements with two sub-items of one scalar each.
        let data = [10, 11, 20, 21, 30, 31, 40, 41];
        let filter = [3, 1];
        let items: Vec<_> = FilteredIter::new(&data, 1, &filter, 0, 2)
            .map(|item| item[0])
            .collect();
        assert_eq!(items, [40, 41, 20, 21]);
    }

    #[test]
    fn test_filtered_iter_current_index() {
        // 3 elements of 3 sub-items with 2 scalars each.
        let data = [0; 18];
        let filter = [2, 0];
        let mut iter = FilteredIter::new(&data, 2, &filter, 0, 3);

        let mut indices = Vec::new();
        while let Some(index) = iter.current_index() {
            indices.push(index);
            iter.next();
        }
        assert_eq!(indices, [6, 7, 8, 0, 1, 2]);
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn test_filtered_iter_len() {
        let data = [0; 12];
        let filter = [1, 0, 1];
        let mut iter = FilteredIter::new(&data, 1, &filter, 0, 4);
        assert_eq!(iter.len(), 12);
        for remaining in (0..12).rev() {
            iter.next();
            assert_eq!(iter.len(), remaining);
        }
    }
}
