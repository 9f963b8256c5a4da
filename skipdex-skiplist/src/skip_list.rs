use std::{cmp::Ordering::*, sync::Arc};

use crate::{comparator::prelude::*, height::random_height, options::SkipListOptions};

/// Handle of a node slot in the arena. `None` in a link position is the
/// end of the level, `None` as a traversal cursor is the head.
type Link = Option<usize>;

struct Node<K, V> {
    key: K,
    value: V,
    forward: Vec<Link>,
}

enum Descent {
    Found(usize),
    // rightmost node at level 0 whose key is less than the target
    Before(Link),
}

/// Single-threaded skip list.
///
/// Nodes live in an arena and link to each other through stable slot
/// handles. Deleted slots are recycled through a free list.
pub struct SkipList<K, V, C> {
    slots: Vec<Option<Node<K, V>>>,
    free: Vec<usize>,
    head: Vec<Link>,
    len: usize,
    c: C,
    options: Arc<SkipListOptions>,
}

impl<K, V, C> Default for SkipList<K, V, C>
where
    C: Comparator<Item = K> + Default,
{
    fn default() -> Self {
        Self::new(C::default())
    }
}

impl<K, V, C> SkipList<K, V, C>
where
    C: Comparator<Item = K>,
{
    pub fn new(c: C) -> Self {
        Self::with_options(c, Arc::new(SkipListOptions::default()))
    }

    pub fn with_options(c: C, options: Arc<SkipListOptions>) -> Self {
        tracing::debug!(max_height = options.max_height, "create skip list");
        SkipList {
            slots: Vec::new(),
            free: Vec::new(),
            head: vec![None],
            len: 0,
            c,
            options,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of levels currently in use by the head.
    pub fn height(&self) -> usize {
        self.head.len()
    }

    fn node(&self, idx: usize) -> &Node<K, V> {
        self.slots[idx]
            .as_ref()
            .unwrap_or_else(|| panic!("dangling skip list handle {idx}"))
    }

    fn node_mut(&mut self, idx: usize) -> &mut Node<K, V> {
        self.slots[idx]
            .as_mut()
            .unwrap_or_else(|| panic!("dangling skip list handle {idx}"))
    }

    fn get_next(&self, from: Link, level: usize) -> Link {
        match from {
            None => self.head[level],
            Some(idx) => self.node(idx).forward[level],
        }
    }

    fn set_next(&mut self, from: Link, level: usize, to: Link) {
        match from {
            None => self.head[level] = to,
            Some(idx) => self.node_mut(idx).forward[level] = to,
        }
    }

    // Walks `level` from `start` to the rightmost node whose key is less than `key`.
    fn find_prev(&self, key: &K, start: Link, level: usize) -> Link {
        let mut cur = start;
        while let Some(next) = self.get_next(cur, level) {
            if self.c.compare(&self.node(next).key, key) != Less {
                break;
            }
            cur = Some(next);
        }
        cur
    }

    fn descend(&self, key: &K) -> Descent {
        let mut cur = None;
        for level in (0..self.height()).rev() {
            while let Some(next) = self.get_next(cur, level) {
                match self.c.compare(&self.node(next).key, key) {
                    Less => cur = Some(next),
                    Equal => return Descent::Found(next),
                    Greater => break,
                }
            }
        }
        Descent::Before(cur)
    }

    fn ceiling_node(&self, key: &K) -> Link {
        match self.descend(key) {
            Descent::Found(idx) => Some(idx),
            Descent::Before(prev) => self.get_next(prev, 0),
        }
    }

    fn floor_node(&self, key: &K) -> Link {
        match self.descend(key) {
            Descent::Found(idx) => Some(idx),
            Descent::Before(prev) => prev,
        }
    }

    fn entry(&self, idx: usize) -> (&K, &V) {
        let node = self.node(idx);
        (&node.key, &node.value)
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        match self.descend(key) {
            Descent::Found(idx) => Some(&self.node(idx).value),
            Descent::Before(_) => None,
        }
    }

    /// Inserts `key`, or overwrites the value in place if it is already present.
    pub fn put(&mut self, key: K, value: V) {
        if let Descent::Found(idx) = self.descend(&key) {
            self.node_mut(idx).value = value;
            tracing::trace!(slot = idx, "overwrite value");
            return;
        }

        let height = random_height(self.options.max_height);
        if height > self.head.len() {
            tracing::debug!(from = self.head.len(), to = height, "grow skip list height");
            self.head.resize(height, None);
        }

        let node = Node {
            key,
            value,
            forward: vec![None; height],
        };
        let idx = match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = Some(node);
                idx
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        };

        let mut prev = None;
        for level in (0..height).rev() {
            prev = self.find_prev(&self.node(idx).key, prev, level);
            let next = self.get_next(prev, level);
            self.node_mut(idx).forward[level] = next;
            self.set_next(prev, level, Some(idx));
        }

        self.len += 1;
        tracing::trace!(slot = idx, height, "insert node");
    }

    /// Removes `key` and returns its value. Absent keys are a no-op.
    pub fn del(&mut self, key: &K) -> Option<V> {
        let target = match self.descend(key) {
            Descent::Found(idx) => idx,
            Descent::Before(_) => return None,
        };

        let mut prev = None;
        for level in (0..self.height()).rev() {
            prev = self.find_prev(key, prev, level);
            if self.get_next(prev, level) == Some(target) {
                let next = self.node(target).forward[level];
                self.set_next(prev, level, next);
            }
        }

        let node = self.slots[target]
            .take()
            .unwrap_or_else(|| panic!("dangling skip list handle {target}"));
        self.free.push(target);
        self.len -= 1;

        let height = self.head.len();
        while self.head.len() > 1 && self.head.last() == Some(&None) {
            self.head.pop();
        }
        if self.head.len() < height {
            tracing::debug!(from = height, to = self.head.len(), "shrink skip list height");
        }

        tracing::trace!(slot = target, "delete node");
        Some(node.value)
    }

    /// Smallest entry whose key is greater than or equal to `target`.
    pub fn ceiling(&self, target: &K) -> Option<(&K, &V)> {
        self.ceiling_node(target).map(|idx| self.entry(idx))
    }

    /// Largest entry whose key is less than or equal to `target`.
    pub fn floor(&self, target: &K) -> Option<(&K, &V)> {
        self.floor_node(target).map(|idx| self.entry(idx))
    }

    /// All entries with `start <= key <= end`, in ascending key order.
    pub fn range(&self, start: &K, end: &K) -> Vec<(&K, &V)> {
        let mut res = Vec::new();
        if self.c.compare(start, end) == Greater {
            return res;
        }

        let mut cur = self.ceiling_node(start);
        while let Some(idx) = cur {
            let node = self.node(idx);
            if self.c.compare(&node.key, end) == Greater {
                break;
            }
            res.push((&node.key, &node.value));
            cur = node.forward[0];
        }
        res
    }

    pub fn iter(&self) -> SkipListIter<'_, K, V, C> {
        SkipListIter {
            list: self,
            cur: self.head[0],
        }
    }
}

pub struct SkipListIter<'a, K, V, C> {
    list: &'a SkipList<K, V, C>,
    cur: Link,
}

impl<'a, K, V, C> Iterator for SkipListIter<'a, K, V, C>
where
    C: Comparator<Item = K>,
{
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.cur?;
        let list = self.list;
        let node = list.node(idx);
        self.cur = node.forward[0];
        Some((&node.key, &node.value))
    }
}
