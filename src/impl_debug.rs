use std::fmt::{Debug, Error, Formatter};

use crate::array::Array;

/// Entry in the formatted representation of an array's records.
enum Entry<T: Debug> {
    Value(T),

    /// "..." used to elide long lists.
    Ellipsis,
}

impl<T: Debug> Debug for Entry<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self {
            Entry::Value(val) => write!(f, "{:?}", val),
            Entry::Ellipsis => write!(f, "..."),
        }
    }
}

/// Configuration for debug formatting of an array.
struct FormatOptions {
    /// Maximum number of records to print before eliding.
    max_records: usize,

    /// Maximum number of components per record to print before eliding.
    max_components: usize,
}

impl Default for FormatOptions {
    fn default() -> Self {
        FormatOptions {
            max_records: 10,
            max_components: 10,
        }
    }
}

/// Format a list as `[a, b, c, ..., x, y, z]`, keeping at most `max_len`
/// entries.
fn write_list<T: Debug>(
    f: &mut Formatter<'_>,
    items: impl ExactSizeIterator<Item = T> + Clone,
    max_len: usize,
) -> Result<(), Error> {
    let len = items.len();

    let head = items.clone().take(max_len / 2);
    let tail = items
        .skip(max_len / 2)
        .skip(len.saturating_sub(max_len));

    let mut list = f.debug_list();
    list.entries(head.map(Entry::Value));
    if len > max_len {
        list.entry(&Entry::<T>::Ellipsis);
    }
    list.entries(tail.map(Entry::Value));
    list.finish()
}

struct FormatRecord<'a, T> {
    record: &'a [T],
    max_components: usize,
}

impl<T: Debug> Debug for FormatRecord<'_, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write_list(f, self.record.iter(), self.max_components)
    }
}

/// A [`Debug`]-implementing wrapper around an array reference with custom
/// formatting options.
struct FormatArray<'a, T> {
    array: &'a Array<T>,
    opts: FormatOptions,
}

impl<'a, T> FormatArray<'a, T> {
    fn new(array: &'a Array<T>, opts: FormatOptions) -> Self {
        Self { array, opts }
    }
}

impl<T: Debug> Debug for FormatArray<'_, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        let array = self.array;
        let max_components = self.opts.max_components;
        let records = array.iter_records().map(move |record| FormatRecord {
            record,
            max_components,
        });
        write_list(f, records, self.opts.max_records)?;

        write!(
            f,
            ", size={}, nb_components={}",
            array.size(),
            array.nb_components()
        )?;
        if !array.id().is_empty() {
            write!(f, ", id={:?}", array.id())?;
        }
        Ok(())
    }
}

impl<T: Debug> Debug for Array<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "{:?}", FormatArray::new(self, FormatOptions::default()))
    }
}
