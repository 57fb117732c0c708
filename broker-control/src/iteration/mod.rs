//! Lazy cursor composition layer.
//!
//! Every sequence handed to management tooling is a single-pass cursor built from a
//! [`RawSource`] plus zero or more composition layers:
//!
//! - [`BasicIterator`] passes already-suitable elements through unchanged.
//! - [`ConvertingIterator`] turns engine resources into control adapters and skips
//!   resources that yield none.
//! - [`NestedIterator`] flattens containers into one sequence, skipping containers
//!   whose children cannot be read and finishing inner cursors it abandons.
//!
//! Cursors are read-only: [`ControlIterator::remove`] always fails. `finished()` is the
//! caller's way to say it is done early and is forwarded down the whole chain.
//!
//! ```
//! use broker_control::{BasicIterator, ControlError, ControlIterator, RawSource};
//!
//! let mut cursor = BasicIterator::new(RawSource::plain(vec!["orders", "billing"]));
//! assert!(cursor.has_next());
//! assert!(cursor.has_next());
//! assert_eq!(cursor.try_next().unwrap(), "orders");
//! assert!(matches!(cursor.remove(), Err(ControlError::InvalidOperation { .. })));
//! assert_eq!(cursor.collect::<Vec<_>>(), vec!["billing"]);
//! ```

pub(crate) mod basic;
pub(crate) mod converting;
pub(crate) mod lookup;
pub(crate) mod nested;
pub(crate) mod raw_source;

use crate::error::{ControlError, ControlResult};
use std::mem;

pub use basic::BasicIterator;
pub use converting::ConvertingIterator;
pub use lookup::{find_by_id, find_first};
pub use nested::NestedIterator;
pub use raw_source::{Finish, RawSource};

/// Read-only iteration protocol exposed to management callers.
///
/// `has_next` may be called any number of times without consuming an element.
/// Implementations also implement [`Iterator`], yielding the same elements.
pub trait ControlIterator {
    type Item;

    fn has_next(&mut self) -> bool;

    /// Returns the next element, or `EndOfSequence` once drained.
    fn try_next(&mut self) -> ControlResult<Self::Item>;

    fn remove(&mut self) -> ControlResult<()> {
        Err(ControlError::InvalidOperation { operation: "remove" })
    }

    /// Releases whatever the cursor holds in the engine. Safe to call repeatedly.
    fn finished(&mut self);
}

impl<I: ControlIterator + ?Sized> ControlIterator for Box<I> {
    type Item = I::Item;

    fn has_next(&mut self) -> bool {
        (**self).has_next()
    }

    fn try_next(&mut self) -> ControlResult<Self::Item> {
        (**self).try_next()
    }

    fn remove(&mut self) -> ControlResult<()> {
        (**self).remove()
    }

    fn finished(&mut self) {
        (**self).finished()
    }
}

/// Single-element lookahead kept by positioned cursors.
#[derive(Debug, Default)]
pub(crate) enum Lookahead<T> {
    #[default]
    Empty,
    Buffered(T),
}

impl<T> Lookahead<T> {
    pub(crate) fn is_buffered(&self) -> bool {
        matches!(self, Lookahead::Buffered(_))
    }

    pub(crate) fn take(&mut self) -> Option<T> {
        match mem::replace(self, Lookahead::Empty) {
            Lookahead::Buffered(element) => Some(element),
            Lookahead::Empty => None,
        }
    }

    pub(crate) fn fill(&mut self, element: Option<T>) -> bool {
        match element {
            Some(element) => {
                *self = Lookahead::Buffered(element);
                true
            }
            None => false,
        }
    }
}

pub(crate) fn end_of_sequence() -> ControlError {
    ControlError::EndOfSequence { operation: "next" }
}

#[cfg(test)]
mod tests {
    use super::Lookahead;

    #[test]
    fn lookahead_take_empties_the_buffer() {
        let mut lookahead = Lookahead::default();
        assert!(!lookahead.fill(None::<u8>));
        assert!(!lookahead.is_buffered());

        assert!(lookahead.fill(Some(3)));
        assert!(lookahead.is_buffered());
        assert_eq!(lookahead.take(), Some(3));
        assert_eq!(lookahead.take(), None);
    }
}
