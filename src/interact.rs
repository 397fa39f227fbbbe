//! Interactive prompting capability
//!
//! Gates and adapters never read stdin directly; the orchestrator injects a
//! [`Prompter`] so the decision logic stays testable without a terminal.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::sync::Mutex;

/// Answers to the three decision points the pipeline can reach: a yes/no
/// question, a free-text prompt, and a "press Enter to continue" signal.
pub trait Prompter: Send + Sync {
    /// Asks a yes/no question; returns true on an affirmative answer.
    fn confirm(&self, question: &str) -> bool;

    /// Asks for free text; an empty answer yields `default`.
    fn input(&self, prompt: &str, default: &str) -> String;

    /// Prints `message` and blocks until the user acknowledges it.
    fn acknowledge(&self, message: &str);
}

/// Real prompter over stdin/stdout.
pub struct TerminalPrompter;

impl TerminalPrompter {
    fn read_line(&self) -> String {
        let mut line = String::new();
        let _ = io::stdin().lock().read_line(&mut line);
        line.trim().to_string()
    }
}

impl Prompter for TerminalPrompter {
    fn confirm(&self, question: &str) -> bool {
        print!("{} (y/n): ", question);
        let _ = io::stdout().flush();
        matches!(self.read_line().to_lowercase().as_str(), "y" | "yes")
    }

    fn input(&self, prompt: &str, default: &str) -> String {
        if default.is_empty() {
            print!("{}: ", prompt);
        } else {
            print!("{} (default: {}): ", prompt, default);
        }
        let _ = io::stdout().flush();

        let answer = self.read_line();
        if answer.is_empty() {
            default.to_string()
        } else {
            answer
        }
    }

    fn acknowledge(&self, message: &str) {
        println!("{}", message);
        print!("Press Enter to continue...");
        let _ = io::stdout().flush();
        let _ = self.read_line();
    }
}

/// Scripted prompter for tests: queued answers, recorded questions.
///
/// `confirm` answers are consumed front-to-back; when the queue is empty the
/// configured default answer (false unless changed) is used. Text answers
/// behave the same way, falling back to the prompt's own default.
pub struct ScriptedPrompter {
    confirmations: Mutex<VecDeque<bool>>,
    texts: Mutex<VecDeque<String>>,
    questions: Mutex<Vec<String>>,
    default_confirm: bool,
}

impl ScriptedPrompter {
    pub fn new() -> Self {
        Self {
            confirmations: Mutex::new(VecDeque::new()),
            texts: Mutex::new(VecDeque::new()),
            questions: Mutex::new(Vec::new()),
            default_confirm: false,
        }
    }

    /// A prompter that answers yes to everything not explicitly scripted.
    pub fn agreeable() -> Self {
        Self {
            default_confirm: true,
            ..Self::new()
        }
    }

    pub fn push_confirm(&self, answer: bool) {
        self.confirmations.lock().unwrap().push_back(answer);
    }

    pub fn push_text(&self, answer: impl Into<String>) {
        self.texts.lock().unwrap().push_back(answer.into());
    }

    /// Every question and prompt asked so far, in order.
    pub fn questions(&self) -> Vec<String> {
        self.questions.lock().unwrap().clone()
    }
}

impl Default for ScriptedPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm(&self, question: &str) -> bool {
        self.questions.lock().unwrap().push(question.to_string());
        self.confirmations
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(self.default_confirm)
    }

    fn input(&self, prompt: &str, default: &str) -> String {
        self.questions.lock().unwrap().push(prompt.to_string());
        self.texts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| default.to_string())
    }

    fn acknowledge(&self, message: &str) {
        self.questions.lock().unwrap().push(message.to_string());
    }
}
