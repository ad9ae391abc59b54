//! # Ordered subscriber list backed by a slab.
//!
//! [`SubscriberList`] keeps entries in insertion order with O(1) append and
//! O(1) removal by handle. Entries live in a `Vec` of slots linked through
//! `prev`/`next` indices; freed slots go on a free list and bump their
//! generation, so a stale [`SlotKey`] never removes a newer occupant.
//!
//! ```text
//! head ─► [2] ⇄ [0] ⇄ [3] ◄─ tail        free: [1]
//! ```
//!
//! ## Invariants
//! - `head.is_none() == tail.is_none() == (len == 0)`
//! - iteration order is insertion order

/// Handle to an occupied slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct SlotKey {
    pub(crate) index: usize,
    pub(crate) generation: u64,
}

#[derive(Debug)]
struct Slot<T> {
    generation: u64,
    entry: Option<Node<T>>,
}

#[derive(Debug)]
struct Node<T> {
    value: T,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Insertion-ordered list with stable handles.
#[derive(Debug)]
pub(crate) struct SubscriberList<T> {
    slots: Vec<Slot<T>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl<T> SubscriberList<T> {
    pub(crate) fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Appends `value` at the tail and returns its handle.
    pub(crate) fn push_back(&mut self, value: T) -> SlotKey {
        let node = Node {
            value,
            prev: self.tail,
            next: None,
        };

        let index = match self.free.pop() {
            Some(index) => {
                self.slots[index].entry = Some(node);
                index
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    entry: Some(node),
                });
                self.slots.len() - 1
            }
        };

        match self.tail {
            Some(tail) => self.node_mut(tail).next = Some(index),
            None => self.head = Some(index),
        }
        self.tail = Some(index);
        self.len += 1;

        SlotKey {
            index,
            generation: self.slots[index].generation,
        }
    }

    /// Unlinks the entry behind `key` and returns it.
    ///
    /// Returns `None` if the handle is stale (already removed, or the slot was reused).
    pub(crate) fn remove(&mut self, key: SlotKey) -> Option<T> {
        let slot = self.slots.get_mut(key.index)?;
        if slot.generation != key.generation {
            return None;
        }
        let node = slot.entry.take()?;
        slot.generation += 1;
        self.free.push(key.index);

        match node.prev {
            Some(prev) => self.node_mut(prev).next = node.next,
            None => self.head = node.next,
        }
        match node.next {
            Some(next) => self.node_mut(next).prev = node.prev,
            None => self.tail = node.prev,
        }
        self.len -= 1;

        Some(node.value)
    }

    /// Removes every entry, returning them in insertion order.
    pub(crate) fn drain(&mut self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.len);
        let mut cursor = self.head;
        while let Some(index) = cursor {
            let slot = &mut self.slots[index];
            let Some(node) = slot.entry.take() else {
                break;
            };
            slot.generation += 1;
            self.free.push(index);
            cursor = node.next;
            out.push(node.value);
        }
        self.head = None;
        self.tail = None;
        self.len = 0;
        out
    }

    /// Iterates head to tail, yielding each handle with its value.
    pub(crate) fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            cursor: self.head,
        }
    }

    /// Walks the list both ways and checks every link and count.
    #[cfg(test)]
    pub(crate) fn assert_linked(&self) {
        assert_eq!(self.head.is_none(), self.tail.is_none());
        assert_eq!(self.head.is_none(), self.len == 0);
        assert_eq!(self.len + self.free.len(), self.slots.len());

        let mut forward = 0;
        let mut prev = None;
        let mut cursor = self.head;
        while let Some(index) = cursor {
            let node = self.slots[index].entry.as_ref().expect("linked slot is vacant");
            assert_eq!(node.prev, prev, "broken prev link at slot {index}");
            prev = Some(index);
            cursor = node.next;
            forward += 1;
            assert!(forward <= self.len, "cycle in subscriber list");
        }
        assert_eq!(prev, self.tail);
        assert_eq!(forward, self.len);

        for &index in &self.free {
            assert!(self.slots[index].entry.is_none(), "free slot {index} is occupied");
        }
    }

    fn node_mut(&mut self, index: usize) -> &mut Node<T> {
        match self.slots[index].entry.as_mut() {
            Some(node) => node,
            None => unreachable!("linked slot {index} is vacant"),
        }
    }
}

pub(crate) struct Iter<'a, T> {
    list: &'a SubscriberList<T>,
    cursor: Option<usize>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (SlotKey, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let list = self.list;
        let index = self.cursor?;
        let slot = &list.slots[index];
        let node = slot.entry.as_ref()?;
        self.cursor = node.next;
        Some((
            SlotKey {
                index,
                generation: slot.generation,
            },
            &node.value,
        ))
    }
}
