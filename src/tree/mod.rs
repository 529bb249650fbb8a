//! Wrapper module containing the tree itself

use crate::param::{NaturalOrder, NoRelease, Verbatim};
use crate::public_traits::{Compare, Duplicate, Release};
use crate::AllocError;
use std::cmp::Ordering;
use std::fmt::{self, Debug, Formatter};

mod balance;
mod insert;
mod node;
mod remove;
#[cfg(test)]
mod tests;

pub use insert::Insertion;

use node::{Arena, NodeId};

/// Ordered map, backed by a height-balanced (AVL) binary search tree
///
/// Lookup, insertion, and removal are all `O(log n)`. Keys are ordered by the [`Compare`]
/// strategy `C`; when a key is first stored, it's passed through the [`Duplicate`] strategy `D`,
/// and when it later leaves the tree (by [`erase`], [`clear`], or dropping the tree) it's handed
/// to the [`Release`] strategy `R`. The defaults -- [`NaturalOrder`], [`Verbatim`], and
/// [`NoRelease`] -- make the tree behave like any other map over `K: Ord`:
///
/// ```
/// use avltree::AvlTree;
///
/// let mut tree = AvlTree::new();
/// assert!(tree.insert(20, "twenty", false).is_new());
/// assert!(tree.insert(10, "ten", false).is_new());
/// assert!(tree.insert(30, "thirty", false).is_new());
///
/// assert_eq!(tree.size(), 3);
/// assert_eq!(tree.find(&10), Some(&"ten"));
/// assert_eq!(tree.erase(&20), Some("twenty"));
/// assert!(!tree.contains(&20));
/// ```
///
/// Values are never passed through the key strategies. They're returned to the caller when
/// they're replaced or erased, and dropped normally when the tree is cleared or dropped.
///
/// The tree doesn't do any internal synchronization; wrap it in a lock to share it between
/// threads.
///
/// [`erase`]: Self::erase
/// [`clear`]: Self::clear
pub struct AvlTree<K, V, C = NaturalOrder, D = Verbatim, R = NoRelease>
where
    C: Compare<K>,
    D: Duplicate<K>,
    R: Release<K>,
{
    root: Option<NodeId>,
    nodes: Arena<K, V>,
    compare: C,
    duplicate: D,
    release: R,
    size: usize,
}

impl<K: Ord, V> AvlTree<K, V> {
    /// Creates a new, empty `AvlTree` with the default strategies
    ///
    /// This doesn't allocate; space for nodes is only allocated as they're inserted.
    pub const fn new() -> Self {
        Self::with_strategies(NaturalOrder, Verbatim, NoRelease)
    }

    /// Creates a new, empty `AvlTree` with the default strategies and space for at least
    /// `capacity` entries, returning an error if the allocation fails
    pub fn try_with_capacity(capacity: usize) -> Result<Self, AllocError> {
        Self::try_with_capacity_and_strategies(capacity, NaturalOrder, Verbatim, NoRelease)
    }
}

impl<K: Ord, V> Default for AvlTree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, C, D, R> AvlTree<K, V, C, D, R>
where
    C: Compare<K>,
    D: Duplicate<K>,
    R: Release<K>,
{
    /// Creates a new, empty `AvlTree` using the provided strategies
    pub const fn with_strategies(compare: C, duplicate: D, release: R) -> Self {
        AvlTree {
            root: None,
            nodes: Arena::new(),
            compare,
            duplicate,
            release,
            size: 0,
        }
    }

    /// Creates a new, empty `AvlTree` using the provided strategies, with space for at least
    /// `capacity` entries
    ///
    /// Returns an error if the allocation fails.
    pub fn try_with_capacity_and_strategies(
        capacity: usize,
        compare: C,
        duplicate: D,
        release: R,
    ) -> Result<Self, AllocError> {
        Ok(AvlTree {
            root: None,
            nodes: Arena::try_with_capacity(capacity)?,
            compare,
            duplicate,
            release,
            size: 0,
        })
    }

    /// Returns the number of entries in the tree
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns `true` if the tree has no entries
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the height of the tree, or `None` if it's empty
    ///
    /// A tree with a single entry has height zero. Because the tree is kept balanced, the height
    /// is always less than `1.45 * log2(size + 2)`.
    pub fn height(&self) -> Option<usize> {
        self.root.map(|id| self.nodes.get(id).height as usize)
    }

    /// Returns a reference to the value stored with a key equal to `key`, if there is one
    pub fn find(&self, key: &K) -> Option<&V> {
        self.find_id(key).map(|id| &self.nodes.get(id).value)
    }

    /// Returns a mutable reference to the value stored with a key equal to `key`, if there is one
    ///
    /// ```
    /// use avltree::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// assert!(tree.insert("hits", 0, false).is_new());
    /// if let Some(n) = tree.find_mut(&"hits") {
    ///     *n += 1;
    /// }
    /// assert_eq!(tree.find(&"hits"), Some(&1));
    /// ```
    pub fn find_mut(&mut self, key: &K) -> Option<&mut V> {
        let id = self.find_id(key)?;
        Some(&mut self.nodes.get_mut(id).value)
    }

    /// Returns `true` if the tree contains a key equal to `key`
    pub fn contains(&self, key: &K) -> bool {
        self.find_id(key).is_some()
    }

    /// Removes every entry from the tree, releasing all of the keys
    ///
    /// Keys are released in post-order -- children before their parents. The allocated space
    /// for nodes is kept for reuse.
    ///
    /// If the [`Release`] strategy panics, the tree is still left empty. Keys that hadn't been
    /// released yet are dropped without being passed to the strategy.
    pub fn clear(&mut self) {
        // Resets the arena on the way out, even if `release` unwinds
        struct ClearOnDrop<'t, K, V>(&'t mut Arena<K, V>);

        impl<'t, K, V> Drop for ClearOnDrop<'t, K, V> {
            fn drop(&mut self) {
                self.0.clear();
            }
        }

        // Detach everything first, so that the tree is already empty if releasing panics
        let root = self.root.take();
        self.size = 0;

        let mut guard = ClearOnDrop(&mut self.nodes);
        if let Some(id) = root {
            destroy_subtree(&mut *guard.0, &mut self.release, id);
        }
    }

    /// (*Internal*) Returns the node with a key equal to `key`
    fn find_id(&self, key: &K) -> Option<NodeId> {
        let mut cursor = self.root;
        while let Some(id) = cursor {
            let node = self.nodes.get(id);
            cursor = match self.compare.compare(key, &node.key) {
                Ordering::Equal => return Some(id),
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
            };
        }

        None
    }
}

impl<K, V, C, D, R> Drop for AvlTree<K, V, C, D, R>
where
    C: Compare<K>,
    D: Duplicate<K>,
    R: Release<K>,
{
    fn drop(&mut self) {
        self.clear();
    }
}

/// (*Internal*) Helper function that *actually* implements destruction for [`AvlTree`]
///
/// Every node in the subtree is removed from the arena; keys are released children-first.
fn destroy_subtree<K, V, R: Release<K>>(nodes: &mut Arena<K, V>, release: &mut R, id: NodeId) {
    let node = nodes.recycle(id);
    if let Some(left) = node.left {
        destroy_subtree(nodes, release, left);
    }
    if let Some(right) = node.right {
        destroy_subtree(nodes, release, right);
    }
    release.release(node.key);
}

impl<K, V, C, D, R> Debug for AvlTree<K, V, C, D, R>
where
    K: Debug,
    V: Debug,
    C: Compare<K>,
    D: Duplicate<K>,
    R: Release<K>,
{
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        struct Nodes<'t, K, V> {
            nodes: &'t Arena<K, V>,
            root: Option<NodeId>,
            indent: &'static str,
        }

        impl<'t, K: Debug, V: Debug> Debug for Nodes<'t, K, V> {
            fn fmt(&self, f: &mut Formatter) -> fmt::Result {
                let root = match self.root {
                    None => return f.write_str("{}"),
                    Some(id) => id,
                };

                // Paths are one character per level, so the longest possible path is the height
                let total_pad = self.nodes.get(root).height as usize;

                f.write_str("{")?;
                let mut path = String::new();
                write_nodes(self.nodes, root, &mut path, self.indent, total_pad, f)?;
                f.write_str("\n}")
            }
        }

        fn write_nodes<K: Debug, V: Debug>(
            nodes: &Arena<K, V>,
            id: NodeId,
            path: &mut String,
            indent: &'static str,
            total_pad: usize,
            f: &mut Formatter,
        ) -> fmt::Result {
            let node = nodes.get(id);
            f.write_fmt(format_args!(
                "\n{indent}[{path:<total_pad$}]: {:?} => {:?} (height {})",
                node.key, node.value, node.height,
            ))?;

            for (c, child) in [('L', node.left), ('R', node.right)] {
                if let Some(child) = child {
                    path.push(c);
                    write_nodes(nodes, child, path, indent, total_pad, f)?;
                    path.pop();
                }
            }

            Ok(())
        }

        let indent = match f.alternate() {
            false => "    ",
            true => "        ",
        };
        let nodes = Nodes {
            nodes: &self.nodes,
            root: self.root,
            indent,
        };

        f.debug_struct("AvlTree")
            .field("size", &self.size)
            .field("nodes", &nodes)
            .finish()
    }
}

#[cfg(any(test, feature = "fuzz"))]
macro_rules! valid_assert {
    ($path:ident: $cond:expr) => {
        if !$cond {
            panic!(
                concat!("assertion failed: `", stringify!($cond), "` for path {:?}"),
                $path
            );
        }
    };
}

#[cfg(any(test, feature = "fuzz"))]
macro_rules! valid_assert_eq {
    ($path:ident: $lhs:expr, $rhs:expr) => {
        let left = $lhs;
        let right = $rhs;
        if left != right {
            panic!(
                concat!(
                    "assertion failed: `",
                    stringify!($lhs == $rhs),
                    "` for path {:?}:\n",
                    " left: {:?}\n",
                    "right: {:?}",
                ),
                $path, left, right,
            );
        }
    };
}

#[cfg(any(test, feature = "fuzz"))]
impl<K, V, C, D, R> AvlTree<K, V, C, D, R>
where
    C: Compare<K>,
    D: Duplicate<K>,
    R: Release<K>,
{
    /// (*Test-only*) Validates the tree, panicking if anything is out of place
    ///
    /// This checks that every cached height is correct, that every node satisfies the AVL
    /// invariant, that keys are in strictly increasing order, and that the size matches the
    /// number of nodes. It exists so that tests can quickly narrow down exactly when a failure is
    /// introduced in a particular test case.
    pub fn validate(&self) {
        let mut path = String::new();
        let mut prev: Option<&K> = None;
        let mut count = 0;

        if let Some(root) = self.root {
            self.validate_node(root, &mut path, &mut prev, &mut count);
        }

        valid_assert_eq!(path: count, self.size);
        valid_assert_eq!(path: self.nodes.len(), self.size);
    }

    /// Called by `validate` to check a subtree, returning its height
    fn validate_node<'t>(
        &'t self,
        id: NodeId,
        path: &mut String,
        prev: &mut Option<&'t K>,
        count: &mut usize,
    ) -> i32 {
        let node = self.nodes.get(id);

        let left_height = match node.left {
            None => node::EMPTY_HEIGHT,
            Some(left) => {
                path.push('L');
                let h = self.validate_node(left, path, prev, count);
                path.pop();
                h
            }
        };

        // in-order position of this node
        if let Some(p) = *prev {
            valid_assert!(path: self.compare.compare(p, &node.key) == Ordering::Less);
        }
        *prev = Some(&node.key);
        *count += 1;

        let right_height = match node.right {
            None => node::EMPTY_HEIGHT,
            Some(right) => {
                path.push('R');
                let h = self.validate_node(right, path, prev, count);
                path.pop();
                h
            }
        };

        valid_assert_eq!(path: node.height, 1 + left_height.max(right_height));
        valid_assert!(path: (left_height - right_height).abs() <= 1);
        node.height
    }

    /// (*Test-only*) Returns all of the keys in the tree, in order
    pub fn keys_in_order(&self) -> Vec<&K> {
        fn visit<'t, K, V>(nodes: &'t Arena<K, V>, id: Option<NodeId>, out: &mut Vec<&'t K>) {
            if let Some(id) = id {
                let node = nodes.get(id);
                visit(nodes, node.left, out);
                out.push(&node.key);
                visit(nodes, node.right, out);
            }
        }

        let mut keys = Vec::with_capacity(self.size);
        visit(&self.nodes, self.root, &mut keys);
        keys
    }
}
