use std::{cmp, fmt, marker::PhantomData};

use super::Comparator;

/// Adapts a strict less-than predicate into a [`Comparator`].
///
/// Two keys where neither is less than the other compare as equal.
pub struct LessComparator<T, F> {
    less: F,
    _marker: PhantomData<fn(&T, &T)>,
}

impl<T, F> LessComparator<T, F>
where
    F: Fn(&T, &T) -> bool,
{
    pub fn new(less: F) -> Self {
        Self {
            less,
            _marker: PhantomData,
        }
    }
}

impl<T, F> Comparator for LessComparator<T, F>
where
    F: Fn(&T, &T) -> bool + Send + Sync + Clone,
{
    type Item = T;

    fn compare(&self, a: &Self::Item, b: &Self::Item) -> cmp::Ordering {
        if (self.less)(a, b) {
            cmp::Ordering::Less
        } else if (self.less)(b, a) {
            cmp::Ordering::Greater
        } else {
            cmp::Ordering::Equal
        }
    }
}

impl<T, F: Clone> Clone for LessComparator<T, F> {
    fn clone(&self) -> Self {
        Self {
            less: self.less.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T, F> fmt::Debug for LessComparator<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LessComparator").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cmp::Ordering::*;

    use crate::comparator::prelude::*;

    #[test]
    fn less_predicate_compare() {
        let cmp = LessComparator::new(|a: &i64, b: &i64| a < b);
        assert_eq!(cmp.compare(&3, &3), Equal);
        assert_eq!(cmp.compare(&-1, &3), Less);
        assert_eq!(cmp.compare(&3, &-1), Greater);
    }

    #[test]
    fn reversed_predicate() {
        let cmp = LessComparator::new(|a: &&str, b: &&str| a > b);
        assert_eq!(cmp.compare(&"b", &"a"), Less);
        assert_eq!(cmp.compare(&"a", &"b"), Greater);
    }
}
