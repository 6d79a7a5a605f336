use std::cell::RefCell;
use std::rc::Rc;

use thiserror::Error;

/// Starting capacity of a new sequence's element storage.
pub const INITIAL_CAPACITY: usize = 5;

/// A value produced by evaluating an expression: either a plain integer or
/// a handle to a shared sequence.  Cloning an `Int` copies the number;
/// cloning a `Seq` copies only the handle, so sequence values alias.
#[derive(Debug, PartialEq, Clone)]
pub enum Value {
    Int(i32),
    Seq(Sequence),
}

/// A growable, 0-indexed array of integers with shared ownership.  Every
/// clone of the handle counts as one owner; the storage is freed when the
/// last handle drops.  Sequences hold only integers, never other
/// sequences, so reference counting alone is enough.
#[derive(Debug, Clone)]
pub struct Sequence {
    elements: Rc<RefCell<Vec<i32>>>,
}

impl Sequence {
    pub fn new() -> Self {
        Self {
            elements: Rc::new(RefCell::new(Vec::with_capacity(INITIAL_CAPACITY))),
        }
    }

    pub fn from_elements(elements: Vec<i32>) -> Self {
        Self {
            elements: Rc::new(RefCell::new(elements)),
        }
    }

    pub fn len(&self) -> usize {
        self.elements.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.borrow().is_empty()
    }

    /// Element at `index`, or `None` when the index is negative or past the
    /// end.
    pub fn get(&self, index: i32) -> Option<i32> {
        usize::try_from(index)
            .ok()
            .and_then(|index| self.elements.borrow().get(index).copied())
    }

    /// Overwrite the element at a known-in-bounds index.
    pub fn set(&self, index: usize, value: i32) {
        self.elements.borrow_mut()[index] = value;
    }

    /// Append in place; visible through every alias of this sequence.
    pub fn push(&self, value: i32) {
        self.elements.borrow_mut().push(value);
    }

    pub fn to_vec(&self) -> Vec<i32> {
        self.elements.borrow().clone()
    }

    /// Number of live handles to this sequence's storage.
    pub fn ref_count(&self) -> usize {
        Rc::strong_count(&self.elements)
    }

    /// Whether two handles alias the same underlying storage.
    pub fn shares_storage_with(&self, other: &Sequence) -> bool {
        Rc::ptr_eq(&self.elements, &other.elements)
    }
}

impl Default for Sequence {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Sequence {
    /// Content equality, not handle identity; `shares_storage_with` tests
    /// the latter.
    fn eq(&self, other: &Self) -> bool {
        self.elements == other.elements
    }
}

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Type mismatch")]
    TypeMismatch,
    #[error("Divide by zero")]
    DivideByZero,
    #[error("Index out of bounds")]
    IndexOutOfBounds,
    #[error("{0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_counting() {
        let first = Sequence::from_elements(vec![1, 2]);
        assert_eq!(first.ref_count(), 1);

        let second = first.clone();
        assert_eq!(first.ref_count(), 2);
        assert!(first.shares_storage_with(&second));

        drop(second);
        assert_eq!(first.ref_count(), 1);
    }

    #[test]
    fn test_mutation_is_shared() {
        let first = Sequence::from_elements(vec![1, 2]);
        let second = first.clone();

        first.push(3);
        second.set(0, 9);

        assert_eq!(first.to_vec(), vec![9, 2, 3]);
        assert_eq!(second.to_vec(), vec![9, 2, 3]);
    }

    #[test]
    fn test_equality_is_by_contents() {
        let first = Sequence::from_elements(vec![1, 2]);
        let second = Sequence::from_elements(vec![1, 2]);
        assert_eq!(first, second);
        assert!(!first.shares_storage_with(&second));
    }

    #[test]
    fn test_out_of_range_reads() {
        let seq = Sequence::from_elements(vec![5]);
        assert_eq!(seq.get(0), Some(5));
        assert_eq!(seq.get(1), None);
        assert_eq!(seq.get(-1), None);
    }
}
