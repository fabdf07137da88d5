//! Materialization of string tokens into declared collection types.

use std::collections::{LinkedList, VecDeque};

use crate::shape::CollectionKind;

/// A concrete collection of strings produced for a collection-shaped field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StringCollection {
    /// Contiguous ordered sequence.
    Vec(Vec<String>),
    /// Doubly-linked list.
    Linked(LinkedList<String>),
    /// Double-ended queue.
    Deque(VecDeque<String>),
}

impl StringCollection {
    /// Creates an empty instance of `kind`, sized for `capacity` elements.
    ///
    /// Returns `None` for kinds with no constructible implementation.
    pub fn with_capacity(kind: &CollectionKind, capacity: usize) -> Option<Self> {
        match kind {
            CollectionKind::Array | CollectionKind::Sequence | CollectionKind::List => {
                Some(StringCollection::Vec(Vec::with_capacity(capacity)))
            }
            CollectionKind::LinkedList => Some(StringCollection::Linked(LinkedList::new())),
            CollectionKind::Deque => {
                Some(StringCollection::Deque(VecDeque::with_capacity(capacity)))
            }
            CollectionKind::Abstract(_) => None,
        }
    }

    /// Appends a value at the end.
    pub fn push(&mut self, value: String) {
        match self {
            StringCollection::Vec(v) => v.push(value),
            StringCollection::Linked(l) => l.push_back(value),
            StringCollection::Deque(d) => d.push_back(value),
        }
    }

    /// Removes all values.
    pub fn clear(&mut self) {
        match self {
            StringCollection::Vec(v) => v.clear(),
            StringCollection::Linked(l) => l.clear(),
            StringCollection::Deque(d) => d.clear(),
        }
    }

    /// Returns the number of values.
    pub fn len(&self) -> usize {
        match self {
            StringCollection::Vec(v) => v.len(),
            StringCollection::Linked(l) => l.len(),
            StringCollection::Deque(d) => d.len(),
        }
    }

    /// Returns `true` if the collection holds no values.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates the values in order.
    pub fn iter(&self) -> Box<dyn Iterator<Item = &String> + '_> {
        match self {
            StringCollection::Vec(v) => Box::new(v.iter()),
            StringCollection::Linked(l) => Box::new(l.iter()),
            StringCollection::Deque(d) => Box::new(d.iter()),
        }
    }

    /// Copies the values into a `Vec`, in order.
    pub fn to_vec(&self) -> Vec<String> {
        self.iter().cloned().collect()
    }
}

/// A collection instance already held by a read-only destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistingCollection {
    value: StringCollection,
    mutable: bool,
}

impl ExistingCollection {
    /// An existing instance that may be cleared and refilled.
    pub fn mutable(value: StringCollection) -> Self {
        Self {
            value,
            mutable: true,
        }
    }

    /// An existing instance that cannot be modified.
    pub fn frozen(value: StringCollection) -> Self {
        Self {
            value,
            mutable: false,
        }
    }

    /// Returns `true` if the instance may be modified in place.
    pub fn is_mutable(&self) -> bool {
        self.mutable
    }

    /// Returns the held instance.
    pub fn value(&self) -> &StringCollection {
        &self.value
    }
}

/// Where a materialized collection ends up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionTarget {
    /// The destination accepts a freshly created instance.
    Assignable,
    /// The destination is read-only; binding can only fill the instance it
    /// already holds, if any.
    ReadOnly(Option<ExistingCollection>),
}

/// Builds a collection of `kind` from `tokens`.
///
/// Returns `None` when:
/// - `tokens` is empty and the destination is not top-level, so an existing
///   property value is left alone;
/// - `target` is read-only and holds no instance, or a frozen one;
/// - `target` is assignable and `kind` has no constructible implementation.
///
/// A mutable existing instance is cleared and refilled in place. Kinds
/// satisfied by a plain `Vec<String>` receive `tokens` as-is.
///
/// # Examples
///
/// ```
/// use header_binding::{materialize, CollectionKind, CollectionTarget, StringCollection};
///
/// let tokens = vec!["a".to_string(), "b".to_string()];
/// let list = materialize(tokens, &CollectionKind::LinkedList, true, CollectionTarget::Assignable);
/// assert!(matches!(list, Some(StringCollection::Linked(_))));
///
/// let nested_empty = materialize(Vec::new(), &CollectionKind::List, false, CollectionTarget::Assignable);
/// assert!(nested_empty.is_none());
///
/// let unassignable = CollectionTarget::ReadOnly(None);
/// assert!(materialize(vec!["a".into()], &CollectionKind::List, true, unassignable).is_none());
/// ```
pub fn materialize(
    tokens: Vec<String>,
    kind: &CollectionKind,
    is_top_level: bool,
    target: CollectionTarget,
) -> Option<StringCollection> {
    if tokens.is_empty() && !is_top_level {
        return None;
    }

    if let CollectionTarget::ReadOnly(existing) = target {
        // A new instance could not be stored in a read-only destination.
        let existing = existing.filter(ExistingCollection::is_mutable)?;
        let mut collection = existing.value;
        collection.clear();
        fill(&mut collection, tokens);
        return Some(collection);
    }

    if kind.accepts_sequence() {
        return Some(StringCollection::Vec(tokens));
    }

    let mut collection = StringCollection::with_capacity(kind, tokens.len())?;
    fill(&mut collection, tokens);
    Some(collection)
}

fn fill(collection: &mut StringCollection, tokens: Vec<String>) {
    for token in tokens {
        collection.push(token);
    }
}
