//! In-memory ordered key-value index built on skip lists.
//!
//! [`SkipList`] is the single-threaded variant with point, range, ceiling
//! and floor queries. [`ConcurrentSkipList`] supports `put`/`get`/`del` from
//! many threads at once.

pub use skipdex_skiplist::{error, prelude::*};

/// Index that may be shared between threads.
pub type Index<K, V, C = DefaultComparator<K>> = ConcurrentSkipList<K, V, C>;

/// Builds an empty [`Index`] ordered by a strict less-than predicate.
pub fn new_index<K, V, F>(less: F) -> Index<K, V, LessComparator<K, F>>
where
    F: Fn(&K, &K) -> bool + Send + Sync + Clone,
{
    ConcurrentSkipList::new(LessComparator::new(less))
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, thread};

    use crossbeam::sync::WaitGroup;

    use super::*;

    #[test]
    fn index_from_predicate() {
        let index = Arc::new(new_index(|a: &i32, b: &i32| a < b));
        let wg = WaitGroup::new();

        for i in 0..100 {
            let index = index.clone();
            let wg = wg.clone();
            thread::spawn(move || {
                index.put(i, i);
                drop(wg);
            });
        }
        wg.wait();

        let wg = WaitGroup::new();
        for i in (1..100).step_by(2) {
            let index = index.clone();
            let wg = wg.clone();
            thread::spawn(move || {
                index.del(&i);
                drop(wg);
            });
        }
        wg.wait();

        for i in 0..10 {
            if i % 2 == 0 {
                assert_eq!(index.get(&i), Some(i), "key {i} should exist");
            } else {
                assert_eq!(index.get(&i), None, "key {i} should not exist");
            }
        }
    }

    #[test]
    fn sequential_queries() -> anyhow::Result<()> {
        let opts = SkipListOpenOptions::new().max_height(8).build()?;
        let mut list = SkipList::with_options(DefaultComparator::<u64>::default(), opts);
        for k in (0..50).map(|k| k * 2) {
            list.put(k, k.to_string());
        }

        assert_eq!(list.ceiling(&33), Some((&34, &"34".to_string())));
        assert_eq!(list.floor(&33), Some((&32, &"32".to_string())));
        let keys: Vec<u64> = list.range(&10, &20).into_iter().map(|(k, _)| *k).collect();
        itertools::assert_equal(keys, [10, 12, 14, 16, 18, 20]);
        Ok(())
    }
}
