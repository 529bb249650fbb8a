//! Wrapper module for [`RecycleVec`], the arena that stores every node of a tree

use std::collections::TryReserveError;
use std::fmt::{self, Debug, Formatter};
use std::mem;
use std::num::NonZeroUsize;

/// Vector of values where removed entries leave a vacancy, to be filled by the next insertion
///
/// Vacant entries form an intrusive linked list starting at `head_empty`, so both insertion and
/// removal are O(1). Identifiers handed out by [`try_push`] stay valid until they're passed to
/// [`recycle`]; using an identifier after that is a logic error, and will panic if it refers to a
/// vacant entry.
///
/// [`try_push`]: Self::try_push
/// [`recycle`]: Self::recycle
pub struct RecycleVec<T> {
    vals: Vec<Entry<T>>,
    head_empty: Option<LinkId>,
    live: usize,
}

/// Unique identifier for an occupied entry in a [`RecycleVec`]
//
// We store the index plus one so that Option<SlotId> is 8 bytes instead of 16 (on x86-64 or other
// 64-bit targets). Child links in every node are `Option<SlotId>`, so this adds up.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct SlotId {
    idx_plus_one: NonZeroUsize,
}

impl Debug for SlotId {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "#{}", self.idx())
    }
}

/// Like a `SlotId`, but for entries in the "empty" list
#[derive(Copy, Clone)]
struct LinkId {
    idx_plus_one: NonZeroUsize,
}

enum Entry<T> {
    Link(Option<LinkId>),
    Value(T),
}

impl<T> RecycleVec<T> {
    /// Creates a new, empty `RecycleVec` without allocating
    pub const fn new() -> Self {
        RecycleVec {
            vals: Vec::new(),
            head_empty: None,
            live: 0,
        }
    }

    /// Creates a new, empty `RecycleVec` with space for at least `capacity` values
    pub fn try_with_capacity(capacity: usize) -> Result<Self, TryReserveError> {
        let mut this = RecycleVec::new();
        this.vals.try_reserve(capacity)?;
        Ok(this)
    }

    /// Returns the number of occupied entries
    pub fn len(&self) -> usize {
        self.live
    }

    /// Makes sure that the next call to [`try_push`] won't need to allocate
    ///
    /// This is a no-op if there's a vacant entry available, or if the backing storage already has
    /// spare capacity.
    ///
    /// [`try_push`]: Self::try_push
    pub fn try_reserve_slot(&mut self) -> Result<(), TryReserveError> {
        match self.head_empty {
            Some(_) => Ok(()),
            None => self.vals.try_reserve(1),
        }
    }

    /// Adds a new item to the `RecycleVec`, returning a unique identifier for it
    ///
    /// Vacant entries are reused before the backing storage is grown. If growing the storage
    /// fails, the value is dropped and the `RecycleVec` is left unchanged.
    pub fn try_push(&mut self, val: T) -> Result<SlotId, TryReserveError> {
        self.try_reserve_slot()?;

        let id = match self.head_empty.take() {
            Some(link) => {
                self.head_empty = self.next_link(link);
                self.vals[link.idx()] = Entry::Value(val);
                SlotId { idx_plus_one: link.idx_plus_one }
            }
            None => {
                let idx_plus_one = match NonZeroUsize::new(self.vals.len() + 1) {
                    Some(n) => n,
                    // SAFETY: `Vec::len` is always <= isize::MAX, so `Vec::len() + 1` should
                    // always be less than or equal to usize::MAX; it can't wrap to zero
                    None => unsafe { weak_unreachable!() },
                };
                // can't reallocate; we reserved space above
                self.vals.push(Entry::Value(val));
                SlotId { idx_plus_one }
            }
        };

        self.live += 1;
        Ok(id)
    }

    /// Vacates the entry, returning the value that was there
    #[must_use = "recycling returns the old value, which must be explicitly handled"]
    pub fn recycle(&mut self, id: SlotId) -> T {
        let link = Entry::Link(self.head_empty);
        match mem::replace(&mut self.vals[id.idx()], link) {
            Entry::Value(v) => {
                self.head_empty = Some(LinkId { idx_plus_one: id.idx_plus_one });
                self.live -= 1;
                v
            }
            Entry::Link(l) => {
                // put the list back the way it was before panicking
                self.vals[id.idx()] = Entry::Link(l);
                panic!("slot {id:?} was already recycled");
            }
        }
    }

    /// Returns a reference to the value
    pub fn get(&self, id: SlotId) -> &T {
        match &self.vals[id.idx()] {
            Entry::Value(v) => v,
            Entry::Link(_) => panic!("slot {id:?} is vacant"),
        }
    }

    /// Returns a mutable reference to the value
    pub fn get_mut(&mut self, id: SlotId) -> &mut T {
        match &mut self.vals[id.idx()] {
            Entry::Value(v) => v,
            Entry::Link(_) => panic!("slot {id:?} is vacant"),
        }
    }

    /// Removes every entry, keeping the allocated capacity
    ///
    /// Any values still present are dropped. Callers that need to observe the values (e.g., to
    /// release keys) should [`recycle`](Self::recycle) them first.
    pub fn clear(&mut self) {
        self.vals.clear();
        self.head_empty = None;
        self.live = 0;
    }

    /// Returns the `LinkId` of the next entry in the linked list, starting from `id`
    fn next_link(&self, id: LinkId) -> Option<LinkId> {
        match &self.vals[id.idx()] {
            Entry::Link(next) => *next,
            Entry::Value(_) => panic!("free list entry #{} is occupied", id.idx()),
        }
    }
}

impl SlotId {
    /// Helper method to get the index in `vals` this `SlotId` corresponds to
    fn idx(&self) -> usize {
        self.idx_plus_one.get() - 1
    }
}

impl LinkId {
    /// Internal helper method to get the index in `vals` this `LinkId` corresponds to
    fn idx(&self) -> usize {
        self.idx_plus_one.get() - 1
    }
}
