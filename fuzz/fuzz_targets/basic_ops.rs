#![no_main]
use arbitrary::{Arbitrary, Unstructured};
use avltree_fuzz_utils::{CommandSequence, RunnerState};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Clone)]
struct UpperLetter(char);

impl<'d> Arbitrary<'d> for UpperLetter {
    fn arbitrary(u: &mut Unstructured<'d>) -> arbitrary::Result<Self> {
        Ok(UpperLetter((b'A' + u.int_in_range(0_u8..=25)?) as char))
    }
}

fuzz_target!(|cmds: CommandSequence<u8, UpperLetter>| {
    let cmds = cmds.map_values(|c| c.0);

    let mut runner: RunnerState<u8, char> = RunnerState::init();
    for c in &cmds.cmds {
        runner.run_cmd(c);
    }
});
