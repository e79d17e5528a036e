//! Containers used to accumulate the outputs of repeated parsers.

use std::{ops::Index, slice, vec};

/// An insertion-ordered list of parser outputs.
///
/// `IList` has no mutating methods: [`IList::add`] takes the list by value and hands back the extended list, so a
/// list observed through a shared reference never changes underneath its observer. Because the old list is consumed,
/// no elements are copied when a repetition appends its next output.
///
/// # Examples
///
/// ```
/// # use bounce::IList;
/// let list = IList::new().add('a').add('b');
/// assert_eq!(list.len(), 2);
/// assert_eq!(list.iter().collect::<String>(), "ab");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct IList<A> {
    items: Vec<A>,
}

impl<A> IList<A> {
    /// Constructs a new, empty list.
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// A list holding a single element.
    pub fn of(item: A) -> Self {
        Self { items: vec![item] }
    }

    /// Returns the list extended with `item` at the end.
    #[must_use]
    pub fn add(mut self, item: A) -> Self {
        self.items.push(item);
        self
    }

    /// Returns the list extended with every element of `other`, in order.
    #[must_use]
    pub fn concat(mut self, other: Self) -> Self {
        self.items.extend(other.items);
        self
    }

    /// Returns the number of elements in the list.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the list contains no elements.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The element at `index`, if there is one.
    pub fn get(&self, index: usize) -> Option<&A> {
        self.items.get(index)
    }

    /// The first element, if the list is not empty.
    pub fn first(&self) -> Option<&A> {
        self.items.first()
    }

    /// The last element, if the list is not empty.
    pub fn last(&self) -> Option<&A> {
        self.items.last()
    }

    /// Iterate over the elements in insertion order.
    pub fn iter(&self) -> slice::Iter<'_, A> {
        self.items.iter()
    }

    /// Borrow the elements as a slice.
    pub fn as_slice(&self) -> &[A] {
        &self.items
    }

    /// Unwrap the list into a [`Vec`].
    pub fn into_vec(self) -> Vec<A> {
        self.items
    }
}

impl<A> Default for IList<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Index<usize> for IList<A> {
    type Output = A;

    fn index(&self, index: usize) -> &A {
        &self.items[index]
    }
}

impl<A> FromIterator<A> for IList<A> {
    fn from_iter<T: IntoIterator<Item = A>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<A> IntoIterator for IList<A> {
    type Item = A;
    type IntoIter = vec::IntoIter<A>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, A> IntoIterator for &'a IList<A> {
    type Item = &'a A;
    type IntoIter = slice::Iter<'a, A>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<A> From<Vec<A>> for IList<A> {
    fn from(items: Vec<A>) -> Self {
        Self { items }
    }
}

impl<A> From<IList<A>> for Vec<A> {
    fn from(list: IList<A>) -> Self {
        list.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_preserves_order() {
        let list = (1..=3).fold(IList::new(), IList::add);
        assert_eq!(list.into_vec(), vec![1, 2, 3]);
    }

    #[test]
    fn concat_and_index() {
        let list = IList::of('x').concat(IList::from(vec!['y', 'z']));
        assert_eq!(list[2], 'z');
        assert_eq!(list.first(), Some(&'x'));
        assert_eq!(list.last(), Some(&'z'));
        assert_eq!(list.get(3), None);
    }

    #[test]
    fn empty() {
        let list: IList<u8> = IList::default();
        assert!(list.is_empty());
        assert_eq!((&list).into_iter().count(), 0);
    }
}
