//! Recency List Module
//!
//! Doubly-linked list over an index arena, used to order cache items from
//! most to least recently used.

// == Node ==
#[derive(Debug)]
struct Node<T> {
    value: T,
    prev: Option<usize>,
    next: Option<usize>,
}

// == Recency List ==
/// Tracks access order for LRU eviction strategy.
///
/// Items live in slots of a `Vec`, linked by index:
/// - Front = Most recently used
/// - Back = Least recently used
///
/// A slot index returned by [`RecencyList::push_front`] stays valid until the
/// item is removed, so the owner can keep it in a key index for O(1) promotion
/// and unlinking. Freed slots are recycled.
#[derive(Debug)]
pub(crate) struct RecencyList<T> {
    nodes: Vec<Option<Node<T>>>,
    head: Option<usize>,
    tail: Option<usize>,
    free: Vec<usize>,
    len: usize,
}

impl<T> RecencyList<T> {
    // == Constructor ==
    /// Creates an empty list with room for `capacity` items.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            head: None,
            tail: None,
            free: Vec::new(),
            len: 0,
        }
    }

    // == Push Front ==
    /// Inserts an item as most recently used and returns its slot.
    pub(crate) fn push_front(&mut self, value: T) -> usize {
        let node = Node {
            value,
            prev: None,
            next: None,
        };
        let slot = match self.free.pop() {
            Some(slot) => {
                self.nodes[slot] = Some(node);
                slot
            }
            None => {
                self.nodes.push(Some(node));
                self.nodes.len() - 1
            }
        };
        self.link_front(slot);
        self.len += 1;
        slot
    }

    // == Move To Front ==
    /// Marks the item in `slot` as most recently used.
    pub(crate) fn move_to_front(&mut self, slot: usize) {
        if self.head == Some(slot) || self.node(slot).is_none() {
            return;
        }
        self.unlink(slot);
        self.link_front(slot);
    }

    // == Remove ==
    /// Unlinks and returns the item in `slot`.
    pub(crate) fn remove(&mut self, slot: usize) -> Option<T> {
        self.node(slot)?;
        self.unlink(slot);
        let node = self.nodes[slot].take()?;
        self.free.push(slot);
        self.len -= 1;
        Some(node.value)
    }

    // == Pop Back ==
    /// Returns and removes the least recently used item.
    pub(crate) fn pop_back(&mut self) -> Option<T> {
        let tail = self.tail?;
        self.remove(tail)
    }

    // == Back ==
    /// Returns the least recently used item without removing it.
    #[cfg(test)]
    pub(crate) fn back(&self) -> Option<&T> {
        self.tail.and_then(|slot| self.get(slot))
    }

    pub(crate) fn get(&self, slot: usize) -> Option<&T> {
        self.node(slot).map(|node| &node.value)
    }

    pub(crate) fn get_mut(&mut self, slot: usize) -> Option<&mut T> {
        self.nodes
            .get_mut(slot)
            .and_then(Option::as_mut)
            .map(|node| &mut node.value)
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    // == Clear ==
    /// Drops every item and releases the arena.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    // == Iter ==
    /// Iterates from most to least recently used.
    pub(crate) fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            cursor: self.head,
        }
    }

    fn node(&self, slot: usize) -> Option<&Node<T>> {
        self.nodes.get(slot).and_then(Option::as_ref)
    }

    fn link_front(&mut self, slot: usize) {
        let old_head = self.head;
        if let Some(node) = self.nodes[slot].as_mut() {
            node.prev = None;
            node.next = old_head;
        }
        match old_head.and_then(|head| self.nodes[head].as_mut()) {
            Some(head) => head.prev = Some(slot),
            None => self.tail = Some(slot),
        }
        self.head = Some(slot);
    }

    fn unlink(&mut self, slot: usize) {
        let (prev, next) = match self.nodes[slot].as_mut() {
            Some(node) => (node.prev.take(), node.next.take()),
            None => return,
        };
        match prev.and_then(|p| self.nodes[p].as_mut()) {
            Some(prev_node) => prev_node.next = next,
            None => self.head = next,
        }
        match next.and_then(|n| self.nodes[n].as_mut()) {
            Some(next_node) => next_node.prev = prev,
            None => self.tail = prev,
        }
    }
}

// == Iterator ==
pub(crate) struct Iter<'a, T> {
    list: &'a RecencyList<T>,
    cursor: Option<usize>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (usize, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let slot = self.cursor?;
        let node = self.list.node(slot)?;
        self.cursor = node.next;
        Some((slot, &node.value))
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn order(list: &RecencyList<&'static str>) -> Vec<&'static str> {
        list.iter().map(|(_, v)| *v).collect()
    }

    #[test]
    fn test_list_new() {
        let list: RecencyList<&str> = RecencyList::with_capacity(4);
        assert_eq!(list.len(), 0);
        assert!(list.back().is_none());
        assert_eq!(list.iter().count(), 0);
    }

    #[test]
    fn test_push_front_orders_newest_first() {
        let mut list = RecencyList::with_capacity(4);

        list.push_front("key1");
        list.push_front("key2");
        list.push_front("key3");

        assert_eq!(list.len(), 3);
        assert_eq!(order(&list), vec!["key3", "key2", "key1"]);
        // key1 is oldest (added first)
        assert_eq!(list.back(), Some(&"key1"));
    }

    #[test]
    fn test_move_to_front() {
        let mut list = RecencyList::with_capacity(4);

        let a = list.push_front("a");
        list.push_front("b");
        list.push_front("c");

        // Touch 'a' to move it to front
        list.move_to_front(a);

        assert_eq!(order(&list), vec!["a", "c", "b"]);
        assert_eq!(list.back(), Some(&"b"));
    }

    #[test]
    fn test_move_head_to_front_is_noop() {
        let mut list = RecencyList::with_capacity(2);

        list.push_front("a");
        let b = list.push_front("b");
        list.move_to_front(b);

        assert_eq!(order(&list), vec!["b", "a"]);
    }

    #[test]
    fn test_pop_back_evicts_oldest() {
        let mut list = RecencyList::with_capacity(4);

        list.push_front("key1");
        list.push_front("key2");
        list.push_front("key3");

        assert_eq!(list.pop_back(), Some("key1"));
        assert_eq!(list.len(), 2);
        assert_eq!(list.pop_back(), Some("key2"));
        assert_eq!(list.pop_back(), Some("key3"));
        assert_eq!(list.pop_back(), None);
        assert_eq!(list.len(), 0);
    }

    #[test]
    fn test_remove_middle() {
        let mut list = RecencyList::with_capacity(4);

        list.push_front("key1");
        let key2 = list.push_front("key2");
        list.push_front("key3");

        assert_eq!(list.remove(key2), Some("key2"));
        assert_eq!(list.len(), 2);
        assert_eq!(order(&list), vec!["key3", "key1"]);

        // Removing a freed slot twice is a no-op
        assert_eq!(list.remove(key2), None);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_remove_head_and_tail() {
        let mut list = RecencyList::with_capacity(4);

        let a = list.push_front("a");
        list.push_front("b");
        let c = list.push_front("c");

        list.remove(c);
        assert_eq!(order(&list), vec!["b", "a"]);
        list.remove(a);
        assert_eq!(order(&list), vec!["b"]);
        assert_eq!(list.back(), Some(&"b"));
    }

    #[test]
    fn test_slots_are_recycled() {
        let mut list = RecencyList::with_capacity(2);

        let a = list.push_front("a");
        list.remove(a);
        let b = list.push_front("b");

        assert_eq!(a, b);
        assert_eq!(list.get(b), Some(&"b"));
    }

    #[test]
    fn test_get_mut_updates_in_place() {
        let mut list = RecencyList::with_capacity(2);

        let slot = list.push_front(1);
        if let Some(value) = list.get_mut(slot) {
            *value = 2;
        }

        assert_eq!(list.get(slot), Some(&2));
    }

    #[test]
    fn test_clear() {
        let mut list = RecencyList::with_capacity(4);

        list.push_front("a");
        list.push_front("b");
        list.clear();

        assert_eq!(list.len(), 0);
        assert!(list.back().is_none());
        assert_eq!(list.iter().count(), 0);

        list.push_front("c");
        assert_eq!(order(&list), vec!["c"]);
    }

    #[test]
    fn test_order_after_multiple_touches() {
        let mut list = RecencyList::with_capacity(4);

        let a = list.push_front("a");
        let b = list.push_front("b");
        let c = list.push_front("c");

        list.move_to_front(a);
        list.move_to_front(c);
        list.move_to_front(b);

        // front=[b, c, a]=back
        assert_eq!(list.pop_back(), Some("a"));
        assert_eq!(list.pop_back(), Some("c"));
        assert_eq!(list.pop_back(), Some("b"));
    }
}
