//! Scripted docker runner for unit tests

use super::cli::{CommandOutput, CommandRunner};
use crate::error::Result;
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

/// Replays canned outputs keyed by the full command line.
///
/// Each command line has a queue of outputs; the last one repeats once the
/// queue is down to a single entry. Unscripted commands panic.
#[derive(Default)]
pub(crate) struct ScriptedRunner {
    responses: RefCell<HashMap<String, VecDeque<CommandOutput>>>,
    calls: RefCell<Vec<String>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `output` for the command line `args`
    pub fn on(self, args: &str, output: CommandOutput) -> Self {
        self.responses
            .borrow_mut()
            .entry(args.to_string())
            .or_default()
            .push_back(output);
        self
    }

    /// Queue a successful output with `stdout`
    pub fn ok(self, args: &str, stdout: &str) -> Self {
        self.on(args, CommandOutput::ok(stdout))
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self, args: &str) -> usize {
        self.calls.borrow().iter().filter(|c| *c == args).count()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, args: &[&str]) -> Result<CommandOutput> {
        let line = args.join(" ");
        self.calls.borrow_mut().push(line.clone());

        let mut responses = self.responses.borrow_mut();
        let queue = responses
            .get_mut(&line)
            .unwrap_or_else(|| panic!("unscripted docker command: {}", line));

        let output = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };

        Ok(output.unwrap_or_else(|| panic!("no output left for: {}", line)))
    }
}
