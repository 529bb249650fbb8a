//! Various collections of unit tests
//!
//! Alongside the hand-written cases, every failure found by fuzzing is turned into a new unit
//! test, so there's a few of those here as well.

use std::cell::RefCell;
use std::rc::Rc;

/// Manually-written test cases
mod manual;
/// Property tests against `std::collections::BTreeMap`
mod props;

/// Shared log of every key passed to a tree's `Duplicate` or `Release` strategy
///
/// The strategies themselves are closures over a clone of the log (see [`KeyLog::duplicate`] and
/// [`KeyLog::release`]), so the log can still be inspected after the tree has been dropped.
#[derive(Clone, Default)]
struct KeyLog<K> {
    duplicated: Rc<RefCell<Vec<K>>>,
    released: Rc<RefCell<Vec<K>>>,
}

impl<K: Clone> KeyLog<K> {
    fn duplicate(&self) -> impl FnMut(K) -> K {
        let log = self.duplicated.clone();
        move |k: K| {
            log.borrow_mut().push(k.clone());
            k
        }
    }

    fn release(&self) -> impl FnMut(K) {
        let log = self.released.clone();
        move |k: K| log.borrow_mut().push(k)
    }

    fn duplicated(&self) -> Vec<K> {
        self.duplicated.borrow().clone()
    }

    fn released(&self) -> Vec<K> {
        self.released.borrow().clone()
    }
}
