#![no_main]
//! Runs arbitrary commands with key strategies that track how many keys are currently live,
//! checking that every duplicated key is released exactly once

use avltree::param::NaturalOrder;
use avltree::AvlTree;
use avltree_fuzz_utils::{CommandSequence, RunnerState};
use libfuzzer_sys::fuzz_target;
use std::cell::Cell;

fuzz_target!(|cmds: CommandSequence<u16, u8>| {
    let live = Cell::new(0_usize);

    let tree = AvlTree::with_strategies(
        NaturalOrder,
        |k: u16| {
            live.set(live.get() + 1);
            k
        },
        |_k: u16| live.set(live.get() - 1),
    );

    let mut runner = RunnerState::with_tree(tree);
    for c in &cmds.cmds {
        runner.run_cmd(c);
        assert_eq!(live.get(), runner.tree().size());
    }

    drop(runner);
    assert_eq!(live.get(), 0);
});
