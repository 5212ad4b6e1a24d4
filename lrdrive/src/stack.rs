//! Growable last-in first-out storage used for the parser's state, value and
//! span stacks.

const INITIAL_CAPACITY: usize = 16;

/// An indexable LIFO stack.
///
/// Capacity doubles whenever the stack is full; popping never gives memory
/// back, so a parse that once grew deep does not reallocate again. Popped
/// elements are moved out, so the stack keeps no stale values alive.
///
/// `pop`, `peek` and `at` panic when their precondition is violated: an
/// out-of-range access means the engine itself lost track of its stack
/// discipline, which no input can trigger.
#[derive(Debug, Clone)]
pub struct Stack<T> {
    items: Vec<T>,
}

impl<T> Stack<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    /// Pushes `value` on top, doubling the backing storage when full.
    #[inline]
    pub fn push(&mut self, value: T) {
        if self.items.len() == self.items.capacity() {
            let grow = self.items.capacity().max(INITIAL_CAPACITY);
            self.items.reserve_exact(grow);
        }
        self.items.push(value);
    }

    /// Removes and returns the top element.
    ///
    /// Panics if the stack is empty.
    #[inline]
    pub fn pop(&mut self) -> T {
        match self.items.pop() {
            Some(value) => value,
            None => panic!("pop on an empty stack"),
        }
    }

    /// Returns the top element without removing it.
    ///
    /// Panics if the stack is empty.
    #[inline]
    pub fn peek(&self) -> &T {
        match self.items.last() {
            Some(value) => value,
            None => panic!("peek on an empty stack"),
        }
    }

    /// Returns the `index`-th element counted from the bottom.
    ///
    /// Panics if `index >= self.depth()`.
    #[inline]
    pub fn at(&self, index: usize) -> &T {
        let depth = self.items.len();
        match self.items.get(index) {
            Some(value) => value,
            None => panic!("stack index {index} out of range (depth {depth})"),
        }
    }

    /// Returns the top `n` elements, bottom-most first.
    ///
    /// Panics if `n > self.depth()`.
    #[inline]
    pub fn top(&self, n: usize) -> &[T] {
        let depth = self.items.len();
        assert!(n <= depth, "cannot view {n} elements of a stack of depth {depth}");
        &self.items[depth - n..]
    }

    /// Drops the top `n` elements.
    ///
    /// Panics if `n > self.depth()`.
    pub fn discard(&mut self, n: usize) {
        let depth = self.items.len();
        assert!(n <= depth, "cannot pop {n} elements from a stack of depth {depth}");
        self.items.truncate(depth - n);
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }

    /// Removes every element, keeping the allocation.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Iterates from the bottom of the stack to the top.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T> Default for Stack<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn push_pop_is_lifo() {
        let mut s = Stack::new();
        s.push(1);
        s.push(2);
        s.push(3);
        assert_eq!(s.depth(), 3);
        assert_eq!(*s.peek(), 3);
        assert_eq!(s.pop(), 3);
        assert_eq!(s.pop(), 2);
        assert_eq!(s.depth(), 1);
        assert_eq!(s.pop(), 1);
        assert!(s.is_empty());
    }

    #[test]
    fn at_counts_from_the_bottom() {
        let mut s = Stack::new();
        for c in ['a', 'b', 'c'] {
            s.push(c);
        }
        assert_eq!(*s.at(0), 'a');
        assert_eq!(*s.at(2), 'c');
        assert_eq!(s.top(2), &['b', 'c']);
        assert_eq!(s.top(0), &[] as &[char]);
        assert_eq!(s.iter().collect::<String>(), "abc");
    }

    #[test]
    fn capacity_doubles_and_never_shrinks() {
        let mut s = Stack::new();
        s.push(0u32);
        assert_eq!(s.capacity(), INITIAL_CAPACITY);
        for i in 1..=INITIAL_CAPACITY as u32 {
            s.push(i);
        }
        assert_eq!(s.capacity(), 2 * INITIAL_CAPACITY);
        let grown = s.capacity();
        while !s.is_empty() {
            s.pop();
        }
        assert_eq!(s.capacity(), grown);
    }

    #[test]
    fn popped_values_are_released() {
        let value = Rc::new("payload");
        let mut s = Stack::new();
        s.push(Rc::clone(&value));
        s.push(Rc::clone(&value));
        assert_eq!(Rc::strong_count(&value), 3);
        drop(s.pop());
        s.discard(1);
        assert_eq!(Rc::strong_count(&value), 1);
    }

    #[test]
    #[should_panic(expected = "pop on an empty stack")]
    fn pop_on_empty_panics() {
        let mut s: Stack<u8> = Stack::new();
        s.pop();
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn at_past_the_top_panics() {
        let mut s = Stack::new();
        s.push(1);
        s.at(1);
    }
}
