use arbitrary::{Arbitrary, Unstructured};
use avltree::mock::Mock;
use avltree::param::{NaturalOrder, NoRelease, Verbatim};
use avltree::{AvlTree, Compare, Duplicate, Insertion, Release};
use std::any::type_name;
use std::fmt::{self, Debug, Formatter};

const VARIANTS: u8 = 7;

/// A single operation on an [`AvlTree`], alongside the result the mock gave for it
#[derive(Clone)]
pub enum Command<K, V> {
    Insert {
        key: K,
        value: V,
        overwrite: bool,
        outcome: Outcome<V>,
    },
    Erase {
        key: K,
        removed: Option<V>,
    },
    Find {
        key: K,
        found: Option<V>,
    },
    /// Replaces the value for `key` through `find_mut`, if it's present
    FindMut {
        key: K,
        new_value: V,
        present: bool,
    },
    Contains {
        key: K,
        present: bool,
    },
    Size {
        size: usize,
    },
    Clear,
}

/// Owned version of [`Insertion`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<V> {
    Inserted,
    Replaced(V),
    Rejected { existing: V },
}

impl<V: Clone> Outcome<V> {
    fn from_insertion(insertion: Insertion<'_, V>) -> Self {
        match insertion {
            Insertion::Inserted => Outcome::Inserted,
            Insertion::Replaced(old) => Outcome::Replaced(old),
            Insertion::Rejected { existing, .. } => Outcome::Rejected {
                existing: existing.clone(),
            },
        }
    }
}

/// Sequence of [`Command`]s, all applied to a single tree
///
/// The `Debug` implementation writes the sequence as a unit test, ready to be copied into
/// `src/tree/tests/basic.rs`.
pub struct CommandSequence<K, V> {
    pub cmds: Vec<Command<K, V>>,
}

impl<K: Debug, V: Debug> Debug for CommandSequence<K, V> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str("#[test]\n")?;
        f.write_str("fn test_case() {\n")?;
        writeln!(
            f,
            "    let mut tree: AvlTree<{}, {}> = AvlTree::new();",
            type_name::<K>(),
            type_name::<V>(),
        )?;
        for c in &self.cmds {
            c.fmt(f)?;
        }
        f.write_str("}")
    }
}

impl<K: Debug, V: Debug> Debug for Command<K, V> {
    #[rustfmt::skip]
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::Insert { key, value, overwrite, outcome } => {
                let call = format!("tree.insert({key:?}, {value:?}, {overwrite})");
                match outcome {
                    Outcome::Inserted => {
                        writeln!(f, "    assert_eq!({call}, Insertion::Inserted);")?
                    }
                    Outcome::Replaced(old) => {
                        writeln!(f, "    assert_eq!({call}, Insertion::Replaced({old:?}));")?
                    }
                    Outcome::Rejected { existing } => writeln!(
                        f,
                        "    assert_eq!(\n        {call},\n        Insertion::Rejected {{ existing: &mut {existing:?}, value: {value:?} }},\n    );",
                    )?,
                }
                f.write_str("    tree.validate();\n")
            }
            Self::Erase { key, removed } => {
                writeln!(f, "    assert_eq!(tree.erase(&{key:?}), {removed:?});")?;
                f.write_str("    tree.validate();\n")
            }
            Self::Find { key, found: Some(v) } => {
                writeln!(f, "    assert_eq!(tree.find(&{key:?}), Some(&{v:?}));")
            }
            Self::Find { key, found: None } => {
                writeln!(f, "    assert_eq!(tree.find(&{key:?}), None);")
            }
            Self::FindMut { key, new_value, present: true } => {
                writeln!(f, "    *tree.find_mut(&{key:?}).unwrap() = {new_value:?};")
            }
            Self::FindMut { key, present: false, .. } => {
                writeln!(f, "    assert!(tree.find_mut(&{key:?}).is_none());")
            }
            Self::Contains { key, present: true } => {
                writeln!(f, "    assert!(tree.contains(&{key:?}));")
            }
            Self::Contains { key, present: false } => {
                writeln!(f, "    assert!(!tree.contains(&{key:?}));")
            }
            Self::Size { size } => writeln!(f, "    assert_eq!(tree.size(), {size});"),
            Self::Clear => {
                f.write_str("    tree.clear();\n")?;
                f.write_str("    tree.validate();\n")
            }
        }
    }
}

impl<K, V> CommandSequence<K, V> {
    pub fn map_values<W, F: FnMut(V) -> W>(self, mut f: F) -> CommandSequence<K, W> {
        CommandSequence {
            cmds: self.cmds.into_iter().map(|c| c.map_value(&mut f)).collect(),
        }
    }
}

impl<K, V> Command<K, V> {
    #[rustfmt::skip]
    pub fn map_value<W, F: FnMut(V) -> W>(self, mut f: F) -> Command<K, W> {
        match self {
            Self::Insert { key, value, overwrite, outcome } => Command::Insert {
                key,
                value: f(value),
                overwrite,
                outcome: match outcome {
                    Outcome::Inserted => Outcome::Inserted,
                    Outcome::Replaced(old) => Outcome::Replaced(f(old)),
                    Outcome::Rejected { existing } => Outcome::Rejected { existing: f(existing) },
                },
            },
            Self::Erase { key, removed } => Command::Erase { key, removed: removed.map(f) },
            Self::Find { key, found } => Command::Find { key, found: found.map(f) },
            Self::FindMut { key, new_value, present } => Command::FindMut {
                key,
                new_value: f(new_value),
                present,
            },
            Self::Contains { key, present } => Command::Contains { key, present },
            Self::Size { size } => Command::Size { size },
            Self::Clear => Command::Clear,
        }
    }
}

impl<'d, K, V> Arbitrary<'d> for CommandSequence<K, V>
where
    K: Arbitrary<'d> + Ord + Clone,
    V: Arbitrary<'d> + Clone,
{
    fn arbitrary(u: &mut Unstructured<'d>) -> arbitrary::Result<Self> {
        let mut cmds = Vec::new();
        let mut mock = Mock::new();

        while !u.is_empty() {
            let variant = u.int_in_range(0..=VARIANTS - 1)?;
            cmds.push(Command::generate(u, variant, &mut mock)?);
        }

        Ok(CommandSequence { cmds })
    }
}

impl<'d, K, V> Command<K, V>
where
    K: Arbitrary<'d> + Ord + Clone,
    V: Arbitrary<'d> + Clone,
{
    /// Creates a new command and executes it on the mock tree
    fn generate(
        u: &mut Unstructured<'d>,
        variant: u8,
        mock: &mut Mock<K, V>,
    ) -> arbitrary::Result<Self> {
        match variant {
            // insert
            0 => {
                let key = K::arbitrary(u)?;
                let value = V::arbitrary(u)?;
                let overwrite = bool::arbitrary(u)?;
                let insertion = mock.insert(key.clone(), value.clone(), overwrite);
                let outcome = Outcome::from_insertion(insertion);
                Ok(Command::Insert { key, value, overwrite, outcome })
            }
            // erase
            1 => {
                let key = K::arbitrary(u)?;
                let removed = mock.erase(&key);
                Ok(Command::Erase { key, removed })
            }
            // find
            2 => {
                let key = K::arbitrary(u)?;
                let found = mock.find(&key).cloned();
                Ok(Command::Find { key, found })
            }
            // find_mut
            3 => {
                let key = K::arbitrary(u)?;
                let new_value = V::arbitrary(u)?;
                let present = match mock.find_mut(&key) {
                    Some(v) => {
                        *v = new_value.clone();
                        true
                    }
                    None => false,
                };
                Ok(Command::FindMut { key, new_value, present })
            }
            // contains
            4 => {
                let key = K::arbitrary(u)?;
                let present = mock.contains(&key);
                Ok(Command::Contains { key, present })
            }
            // size
            5 => Ok(Command::Size { size: mock.size() }),
            // clear
            6 => {
                mock.clear();
                Ok(Command::Clear)
            }
            _ => unreachable!("bad Command variant {variant}"),
        }
    }
}

/// Ongoing state for executing commands on an [`AvlTree`]
pub struct RunnerState<K, V, C = NaturalOrder, D = Verbatim, R = NoRelease>
where
    C: Compare<K>,
    D: Duplicate<K>,
    R: Release<K>,
{
    tree: AvlTree<K, V, C, D, R>,
}

impl<K: Ord, V> RunnerState<K, V> {
    /// Creates a new, blank `RunnerState` to run a series of commands
    pub fn init() -> Self {
        RunnerState {
            tree: AvlTree::new(),
        }
    }
}

impl<K, V, C, D, R> RunnerState<K, V, C, D, R>
where
    K: Debug + Clone,
    V: Debug + Clone + PartialEq,
    C: Compare<K>,
    D: Duplicate<K>,
    R: Release<K>,
{
    /// Creates a `RunnerState` around an existing tree, which should be empty
    pub fn with_tree(tree: AvlTree<K, V, C, D, R>) -> Self {
        assert!(tree.is_empty());
        RunnerState { tree }
    }

    pub fn tree(&self) -> &AvlTree<K, V, C, D, R> {
        &self.tree
    }

    pub fn into_tree(self) -> AvlTree<K, V, C, D, R> {
        self.tree
    }

    /// Runs the command, panicking if the tree's result differs from the mock's
    #[rustfmt::skip]
    pub fn run_cmd(&mut self, cmd: &Command<K, V>) {
        let tree = &mut self.tree;
        match cmd {
            Command::Insert { key, value, overwrite, outcome } => {
                let insertion = tree.insert(key.clone(), value.clone(), *overwrite);
                assert_eq!(&Outcome::from_insertion(insertion), outcome);
                tree.validate();
            }
            Command::Erase { key, removed } => {
                assert_eq!(&tree.erase(key), removed);
                tree.validate();
            }
            Command::Find { key, found } => assert_eq!(tree.find(key), found.as_ref()),
            Command::FindMut { key, new_value, present } => match tree.find_mut(key) {
                Some(v) if *present => *v = new_value.clone(),
                found => assert_eq!(found.is_some(), *present),
            },
            Command::Contains { key, present } => assert_eq!(tree.contains(key), *present),
            Command::Size { size } => assert_eq!(tree.size(), *size),
            Command::Clear => {
                tree.clear();
                tree.validate();
            }
        }
    }
}
