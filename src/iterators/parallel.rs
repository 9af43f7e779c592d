use rayon::prelude::*;

use crate::filter::FilteredView;
use crate::view::{ArrayView, ArrayViewMut, Block, BlockMut, StepRange};

impl<'a, T: Sync> ArrayView<'a, T> {
    /// Return a parallel iterator over the view's items.
    ///
    /// Items are yielded in the same order as [`iter`](ArrayView::iter) when
    /// collected.
    pub fn par_iter(&self) -> impl IndexedParallelIterator<Item = Block<'a, '_, T>> + '_ {
        let range = self.range();
        let block = self.block_len();
        let shape = self.shape();
        (0..self.size())
            .into_par_iter()
            .map(move |index| Block::new(range.block_at(index, block), shape))
    }
}

impl<T: Send> ArrayViewMut<'_, T> {
    /// Return a parallel iterator over mutable items.
    pub fn par_iter_mut(&mut self) -> impl IndexedParallelIterator<Item = BlockMut<'_, '_, T>> {
        let (data, block, shape) = self.parts_mut();
        data.par_chunks_mut(block)
            .map(move |chunk| BlockMut::new(chunk, shape))
    }
}

impl<'a, T: Sync> FilteredView<'a, T> {
    /// Return a parallel iterator over the selected records.
    pub fn par_iter(&self) -> impl IndexedParallelIterator<Item = &'a [T]> {
        let range = StepRange::Filtered {
            data: self.array().data(),
            filter: self.filter().data(),
            nb_item_per_elem: self.nb_item_per_elem(),
        };
        let block = self.nb_components();
        (0..self.size())
            .into_par_iter()
            .map(move |index| range.block_at(index, block))
    }
}
