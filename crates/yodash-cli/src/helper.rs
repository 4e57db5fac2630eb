use std::borrow::Cow::{self, Borrowed, Owned};

use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};
use yodash_core::model::ModelVersion;

use crate::commands::COMMANDS;

/// Rustyline helper: command and model-name completion, inline hints.
#[derive(Clone)]
pub struct CliHelper {
    commands: Vec<String>,
    models: Vec<String>,
}

impl CliHelper {
    pub fn new() -> Self {
        Self {
            commands: COMMANDS.iter().map(|c| c.to_string()).collect(),
            models: ModelVersion::all()
                .into_iter()
                .map(|m| m.as_str().to_string())
                .collect(),
        }
    }

    fn candidates<'a>(&'a self, line: &'a str) -> (usize, Box<dyn Iterator<Item = &'a String> + 'a>) {
        match line.strip_prefix("model ") {
            Some(partial) => {
                let start = line.len() - partial.len();
                (
                    start,
                    Box::new(self.models.iter().filter(move |m| m.starts_with(partial))),
                )
            }
            None if !line.contains(' ') => (
                0,
                Box::new(self.commands.iter().filter(move |c| c.starts_with(line))),
            ),
            None => (0, Box::new(std::iter::empty())),
        }
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];
        let (start, matches) = self.candidates(line);
        let pairs = matches
            .map(|candidate| Pair {
                display: candidate.clone(),
                replacement: candidate.clone(),
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        let name = line.split_whitespace().next().unwrap_or_default();
        if self.commands.iter().any(|c| c == name) {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        if pos < line.len() || line.is_empty() {
            return None;
        }
        let (start, mut matches) = self.candidates(line);
        let typed = &line[start..];
        matches
            .find(|candidate| candidate.len() > typed.len())
            .map(|candidate| candidate[typed.len()..].to_string())
    }
}

impl Validator for CliHelper {}
