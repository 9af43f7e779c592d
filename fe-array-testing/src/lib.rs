//! Internal testing utilities for the fe-array crates.

use std::fmt::Debug;
use std::panic::{RefUnwindSafe, UnwindSafe};

/// Run a table of test cases, collecting failures instead of stopping at the
/// first one.
///
/// Cases are conventionally a `Debug` struct named `Case`, collected into an
/// array named `cases`:
///
/// ```
/// use fe_array_testing::TestCases;
///
/// #[derive(Debug)]
/// struct Case {
///     size: usize,
///     nb_components: usize,
///     len: usize,
/// }
///
/// let cases = [
///     Case { size: 3, nb_components: 2, len: 6 },
///     Case { size: 0, nb_components: 4, len: 0 },
/// ];
///
/// cases.test_each(|&Case { size, nb_components, len }| {
///     assert_eq!(size * nb_components, len);
/// });
/// ```
///
/// Every case is run, even after a failure. If any case panicked, `test_each`
/// panics afterwards with the number of failures and the debug
/// representation of each failing case.
///
/// Cases and anything captured by the test closure must be unwind safe. Wrap
/// values with interior mutability in
/// [`AssertUnwindSafe`](std::panic::AssertUnwindSafe), or build them inside
/// the closure.
pub trait TestCases {
    /// The data for a single test case.
    type Case;

    /// Call `test` with a reference to each case.
    fn test_each(self, test: impl Fn(&Self::Case) + RefUnwindSafe)
    where
        Self::Case: Debug + RefUnwindSafe;

    /// Call `test` with each case by value.
    ///
    /// The debug representation of each case is captured before the call, so
    /// this costs one `format!` per case.
    fn test_each_value(self, test: impl Fn(Self::Case) + RefUnwindSafe)
    where
        Self::Case: Debug + UnwindSafe;
}

fn report_failures(failures: Vec<String>) {
    assert!(
        failures.is_empty(),
        "{} test cases failed: {:?}",
        failures.len(),
        failures
    );
}

impl<I: IntoIterator> TestCases for I {
    type Case = I::Item;

    fn test_each(self, test: impl Fn(&I::Item) + RefUnwindSafe)
    where
        Self::Case: Debug + RefUnwindSafe,
    {
        let failures = self
            .into_iter()
            .filter(|case| std::panic::catch_unwind(|| test(case)).is_err())
            .map(|case| format!("{:?}", case))
            .collect();
        report_failures(failures);
    }

    fn test_each_value(self, test: impl Fn(I::Item) + RefUnwindSafe)
    where
        Self::Case: Debug + UnwindSafe,
    {
        let mut failures = Vec::new();
        for case in self {
            let case_str = format!("{:?}", case);
            let test = &test;
            if std::panic::catch_unwind(move || test(case)).is_err() {
                failures.push(case_str);
            }
        }
        report_failures(failures);
    }
}
