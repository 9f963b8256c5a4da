use std::{
    cmp::Ordering::*,
    ptr,
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicUsize, Ordering::*},
    },
};

use crossbeam::{
    epoch::{self, Atomic, Guard, Owned, Shared},
    utils::Backoff,
};
use parking_lot::{Mutex, MutexGuard, RwLock};

use crate::{comparator::prelude::*, height::random_height, options::SkipListOptions};

struct Node<K, V> {
    // `None` only for the head
    entry: Option<(K, RwLock<V>)>,
    tower: Box<[Atomic<Self>]>,
    lock: Mutex<()>,
    // logically deleted, set once under `lock`
    marked: AtomicBool,
    fully_linked: AtomicBool,
}

impl<K, V> Node<K, V> {
    fn new(key: K, value: V, height: usize) -> Self {
        Self {
            entry: Some((key, RwLock::new(value))),
            tower: (0..height).map(|_| Atomic::null()).collect(),
            lock: Mutex::new(()),
            marked: AtomicBool::new(false),
            fully_linked: AtomicBool::new(false),
        }
    }

    fn new_head(height: usize) -> Self {
        Self {
            entry: None,
            tower: (0..height).map(|_| Atomic::null()).collect(),
            lock: Mutex::new(()),
            marked: AtomicBool::new(false),
            fully_linked: AtomicBool::new(true),
        }
    }

    fn height(&self) -> usize {
        self.tower.len()
    }

    fn key(&self) -> &K {
        match &self.entry {
            Some((key, _)) => key,
            None => unreachable!("head has no key"),
        }
    }

    fn value(&self) -> &RwLock<V> {
        match &self.entry {
            Some((_, value)) => value,
            None => unreachable!("head has no value"),
        }
    }

    fn get_next<'g>(&self, level: usize, guard: &'g Guard) -> Shared<'g, Self> {
        self.tower[level].load(Acquire, guard)
    }

    fn is_marked(&self) -> bool {
        self.marked.load(Acquire)
    }

    fn is_fully_linked(&self) -> bool {
        self.fully_linked.load(Acquire)
    }
}

struct Window<'a, K, V> {
    // highest level at which a node with the key was seen
    found: Option<usize>,
    preds: Vec<&'a Node<K, V>>,
    succs: Vec<Shared<'a, Node<K, V>>>,
}

/// Skip list that can be shared between threads.
///
/// Lookups never take a lock. Writers lock only the predecessors of the key
/// they mutate, validate that nothing changed in between, and splice. Locks
/// are always taken in decreasing key order. Unlinked nodes are reclaimed
/// through `crossbeam-epoch` once no pinned reader can reach them.
pub struct ConcurrentSkipList<K, V, C> {
    head: Box<Node<K, V>>,
    height: AtomicUsize,
    len: AtomicUsize,
    c: C,
    options: Arc<SkipListOptions>,
}

impl<K, V, C> Default for ConcurrentSkipList<K, V, C>
where
    C: Comparator<Item = K> + Default,
{
    fn default() -> Self {
        Self::new(C::default())
    }
}

impl<K, V, C> ConcurrentSkipList<K, V, C>
where
    C: Comparator<Item = K>,
{
    pub fn new(c: C) -> Self {
        Self::with_options(c, Arc::new(SkipListOptions::default()))
    }

    pub fn with_options(c: C, options: Arc<SkipListOptions>) -> Self {
        tracing::debug!(max_height = options.max_height, "create concurrent skip list");
        ConcurrentSkipList {
            head: Box::new(Node::new_head(options.max_height)),
            height: AtomicUsize::new(1),
            len: AtomicUsize::new(0),
            c,
            options,
        }
    }

    pub fn len(&self) -> usize {
        self.len.load(SeqCst)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Highest level any node has been linked at. Never shrinks.
    pub fn height(&self) -> usize {
        self.height.load(SeqCst)
    }

    fn find<'a>(&'a self, key: &K, guard: &'a Guard) -> Window<'a, K, V> {
        let max_height = self.options.max_height;
        let mut found = None;
        let mut preds = vec![&*self.head; max_height];
        let mut succs = vec![Shared::null(); max_height];

        let mut pred: &Node<K, V> = &self.head;
        for level in (0..max_height).rev() {
            let mut curr = pred.get_next(level, guard);
            while let Some(node) = unsafe { curr.as_ref() } {
                match self.c.compare(node.key(), key) {
                    Less => {
                        pred = node;
                        curr = pred.get_next(level, guard);
                    }
                    Equal => {
                        if found.is_none() {
                            found = Some(level);
                        }
                        break;
                    }
                    Greater => break,
                }
            }
            preds[level] = pred;
            succs[level] = curr;
        }

        Window {
            found,
            preds,
            succs,
        }
    }

    // Locks `preds[0..height]` bottom-up, skipping repeats, and checks each
    // level with `valid` while its predecessor is held.
    fn lock_preds<'a>(
        &self,
        preds: &[&'a Node<K, V>],
        height: usize,
        valid: impl Fn(usize, &'a Node<K, V>) -> bool,
    ) -> Option<Vec<MutexGuard<'a, ()>>> {
        let mut locks = Vec::with_capacity(height);
        let mut last: Option<&Node<K, V>> = None;

        for (level, &pred) in preds.iter().enumerate().take(height) {
            if last.is_none_or(|p| !ptr::eq(p, pred)) {
                locks.push(pred.lock.lock());
                last = Some(pred);
            }

            if !valid(level, pred) {
                return None;
            }
        }

        Some(locks)
    }

    fn raise_height(&self, height: usize) {
        let mut prev_height = self.height();
        while height > prev_height {
            match self
                .height
                .compare_exchange(prev_height, height, SeqCst, SeqCst)
            {
                Ok(_) => {
                    tracing::debug!(from = prev_height, to = height, "grow skip list height");
                    break;
                }
                Err(cur_h) => prev_height = cur_h,
            }
        }
    }

    /// Looks `key` up without taking any lock.
    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        let guard = &epoch::pin();
        let mut pred: &Node<K, V> = &self.head;

        for level in (0..self.height()).rev() {
            let mut curr = pred.get_next(level, guard);
            while let Some(node) = unsafe { curr.as_ref() } {
                match self.c.compare(node.key(), key) {
                    Less => {
                        pred = node;
                        curr = pred.get_next(level, guard);
                    }
                    Equal => {
                        if node.is_fully_linked() && !node.is_marked() {
                            return Some(node.value().read().clone());
                        }
                        return None;
                    }
                    Greater => break,
                }
            }
        }

        None
    }

    /// Inserts `key`, or overwrites the value in place if it is already present.
    pub fn put(&self, key: K, value: V) {
        let guard = &epoch::pin();
        let height = random_height(self.options.max_height);

        let backoff = Backoff::new();
        loop {
            let window = self.find(&key, guard);

            if let Some(level) = window.found {
                let node = unsafe { window.succs[level].deref() };
                if node.is_marked() {
                    // being removed, wait for the unlink
                    backoff.snooze();
                    continue;
                }
                while !node.is_fully_linked() {
                    backoff.snooze();
                }

                let _lock = node.lock.lock();
                if node.is_marked() {
                    continue;
                }
                *node.value().write() = value;
                tracing::trace!("overwrite value");
                return;
            }

            self.raise_height(height);
            let Some(locks) = self.lock_preds(&window.preds, height, |level, pred| {
                let succ = window.succs[level];
                let succ_live = unsafe { succ.as_ref() }.is_none_or(|s| !s.is_marked());
                !pred.is_marked() && succ_live && pred.get_next(level, guard) == succ
            }) else {
                backoff.spin();
                continue;
            };

            let node = Owned::new(Node::new(key, value, height));
            for level in 0..height {
                node.tower[level].store(window.succs[level], Relaxed);
            }
            let node = node.into_shared(guard);
            for level in 0..height {
                window.preds[level].tower[level].store(node, Release);
            }
            unsafe { node.deref() }.fully_linked.store(true, Release);
            drop(locks);

            self.len.fetch_add(1, SeqCst);
            tracing::trace!(height, "insert node");
            return;
        }
    }

    /// Removes `key`. Returns whether this call removed it.
    pub fn del(&self, key: &K) -> bool {
        let guard = &epoch::pin();

        let window = self.find(key, guard);
        let Some(level) = window.found else {
            return false;
        };
        let victim_ptr = window.succs[level];
        let victim = unsafe { victim_ptr.deref() };
        if !victim.is_fully_linked() || victim.is_marked() || victim.height() - 1 != level {
            return false;
        }

        let victim_lock = victim.lock.lock();
        if victim.is_marked() {
            return false;
        }
        victim.marked.store(true, Release);
        let height = victim.height();

        let backoff = Backoff::new();
        loop {
            let window = self.find(key, guard);
            // the victim itself is marked, only the predecessors must be live
            let Some(locks) = self.lock_preds(&window.preds, height, |level, pred| {
                !pred.is_marked() && pred.get_next(level, guard) == victim_ptr
            }) else {
                backoff.spin();
                continue;
            };

            for level in (0..height).rev() {
                let next = victim.get_next(level, guard);
                window.preds[level].tower[level].store(next, Release);
            }
            drop(victim_lock);
            drop(locks);

            unsafe { guard.defer_destroy(victim_ptr) };
            self.len.fetch_sub(1, SeqCst);
            tracing::trace!(height, "delete node");
            return true;
        }
    }
}

impl<K, V, C> Drop for ConcurrentSkipList<K, V, C> {
    fn drop(&mut self) {
        // Unlinked nodes are already owned by the epoch collector.
        unsafe {
            let guard = epoch::unprotected();
            let mut cur = self.head.get_next(0, guard);
            while !cur.is_null() {
                let next = cur.deref().get_next(0, guard);
                drop(cur.into_owned());
                cur = next;
            }
        }
    }
}

#[cfg(test)]
impl<K, V, C> ConcurrentSkipList<K, V, C>
where
    K: Clone,
    C: Comparator<Item = K>,
{
    fn keys(&self) -> Vec<K> {
        let guard = &epoch::pin();
        let mut res = Vec::new();
        let mut cur = self.head.get_next(0, guard);
        while let Some(node) = unsafe { cur.as_ref() } {
            res.push(node.key().clone());
            cur = node.get_next(0, guard);
        }
        res
    }

    // Every level ascends, and every node linked at a level is linked below it.
    fn check_invariants(&self) {
        let guard = &epoch::pin();
        let mut below: Option<Vec<*const Node<K, V>>> = None;

        for level in 0..self.options.max_height {
            let mut nodes: Vec<*const Node<K, V>> = Vec::new();
            let mut cur = self.head.get_next(level, guard);
            let mut prev: Option<&Node<K, V>> = None;
            while let Some(node) = unsafe { cur.as_ref() } {
                assert!(level < node.height());
                if let Some(prev) = prev {
                    assert_eq!(self.c.compare(prev.key(), node.key()), Less);
                }
                nodes.push(node as *const _);
                prev = Some(node);
                cur = node.get_next(level, guard);
            }

            if let Some(below) = &below {
                for node in &nodes {
                    assert!(below.contains(node));
                }
            }
            below = Some(nodes);
        }
    }
}
