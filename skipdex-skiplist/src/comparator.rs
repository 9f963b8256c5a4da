use std::cmp;

mod default_comparator;
mod less_comparator;

pub mod prelude {
    #![allow(unused)]

    pub use super::Comparator;
    pub use super::default_comparator::DefaultComparator;
    pub use super::less_comparator::LessComparator;
}

/// Total order over the keys of a skip list.
///
/// Implementations must be consistent for the whole lifetime of the list
/// they are installed in. A comparator that is not a total order leaves the
/// key order unspecified, it is never detected at runtime.
pub trait Comparator: Send + Sync + Clone {
    type Item;

    fn compare(&self, a: &Self::Item, b: &Self::Item) -> cmp::Ordering;
}
