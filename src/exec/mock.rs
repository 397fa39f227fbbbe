//! Scripted command runner for tests.

use super::{CommandOutcome, CommandRunner};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

/// One recorded invocation, for assertions on what a gate or adapter ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub interactive: bool,
}

struct Expectation {
    program: String,
    /// Required prefix of the argument vector; empty matches anything.
    args_prefix: Vec<String>,
    outcome: CommandOutcome,
}

/// Scripted [`CommandRunner`] that matches invocations against queued
/// expectations and records everything it is asked to run.
///
/// Expectations are consumed in order of registration; the first still-queued
/// expectation whose program and argument prefix match is used. Unmatched
/// invocations return the configured default outcome (success with empty
/// output unless changed).
pub struct MockRunner {
    expectations: Mutex<Vec<Expectation>>,
    invocations: Mutex<Vec<Invocation>>,
    default_outcome: CommandOutcome,
}

impl MockRunner {
    pub fn new() -> Self {
        Self {
            expectations: Mutex::new(Vec::new()),
            invocations: Mutex::new(Vec::new()),
            default_outcome: CommandOutcome::success(""),
        }
    }

    /// Makes unmatched invocations return `outcome` instead of success.
    pub fn with_default(mut self, outcome: CommandOutcome) -> Self {
        self.default_outcome = outcome;
        self
    }

    /// Queues an outcome for the next invocation of `program` whose argument
    /// vector starts with `args_prefix`.
    pub fn expect(&self, program: &str, args_prefix: &[&str], outcome: CommandOutcome) {
        self.expectations.lock().unwrap().push(Expectation {
            program: program.to_string(),
            args_prefix: args_prefix.iter().map(|s| s.to_string()).collect(),
            outcome,
        });
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations.lock().unwrap().clone()
    }

    /// Number of recorded invocations of `program` whose args start with
    /// `args_prefix`.
    pub fn count_calls(&self, program: &str, args_prefix: &[&str]) -> usize {
        self.invocations
            .lock()
            .unwrap()
            .iter()
            .filter(|inv| {
                inv.program == program
                    && inv.args.len() >= args_prefix.len()
                    && inv.args.iter().zip(args_prefix).all(|(a, b)| a == b)
            })
            .count()
    }

    fn record_and_resolve(&self, program: &str, args: &[&str], interactive: bool) -> CommandOutcome {
        self.invocations.lock().unwrap().push(Invocation {
            program: program.to_string(),
            args: args.iter().map(|s| s.to_string()).collect(),
            interactive,
        });

        let mut expectations = self.expectations.lock().unwrap();
        let position = expectations.iter().position(|exp| {
            exp.program == program
                && args.len() >= exp.args_prefix.len()
                && args
                    .iter()
                    .zip(&exp.args_prefix)
                    .all(|(a, b)| *a == b.as_str())
        });

        match position {
            Some(index) => expectations.remove(index).outcome,
            None => self.default_outcome.clone(),
        }
    }
}

impl Default for MockRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandRunner for MockRunner {
    async fn run(
        &self,
        program: &str,
        args: &[&str],
        _cwd: &Path,
        _timeout: Duration,
    ) -> CommandOutcome {
        self.record_and_resolve(program, args, false)
    }

    async fn run_interactive(
        &self,
        program: &str,
        args: &[&str],
        _cwd: &Path,
        _timeout: Duration,
    ) -> CommandOutcome {
        self.record_and_resolve(program, args, true)
    }
}
