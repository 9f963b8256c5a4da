use std::{cmp, marker::PhantomData};

use super::Comparator;

/// Orders keys by their [`Ord`] implementation.
#[derive(Debug)]
pub struct DefaultComparator<T> {
    _marker: PhantomData<fn(&T, &T)>,
}

impl<T> Default for DefaultComparator<T> {
    fn default() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Comparator for DefaultComparator<T>
where
    T: Ord,
{
    type Item = T;

    fn compare(&self, a: &Self::Item, b: &Self::Item) -> cmp::Ordering {
        a.cmp(b)
    }
}

impl<T> Clone for DefaultComparator<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for DefaultComparator<T> {}

#[cfg(test)]
mod tests {
    use std::cmp::Ordering::*;

    use crate::comparator::prelude::*;

    #[test]
    fn ord_compare() {
        let cmp = DefaultComparator::<u32>::default();
        assert_eq!(cmp.compare(&1, &1), Equal);
        assert_eq!(cmp.compare(&1, &2), Less);
        assert_eq!(cmp.compare(&2, &1), Greater);
    }
}
