//! Line-oriented terminal access.
//!
//! Screens talk to the user only through [`Terminal`], so the same flows run
//! against a real console ([`StdTerminal`]) or a queue of canned answers
//! ([`ScriptedTerminal`]).

use std::collections::VecDeque;
use std::io;

use colored::Colorize;
use dialoguer::console::{Term, strip_ansi_codes};
use dialoguer::{Confirm, Input};

/// Blocking, one-line-at-a-time user interaction.
pub trait Terminal {
    fn clear(&mut self) -> io::Result<()>;

    fn write_line(&mut self, line: &str) -> io::Result<()>;

    /// Reads one line. An empty entry yields `default`.
    fn read_line(&mut self, prompt: &str, default: &str) -> io::Result<String>;

    /// Asks a yes/no question.
    fn confirm(&mut self, prompt: &str, default: bool) -> io::Result<bool>;

    fn info(&mut self, message: &str) -> io::Result<()> {
        self.write_line(&message.cyan().to_string())
    }

    fn success(&mut self, message: &str) -> io::Result<()> {
        self.write_line(&message.green().to_string())
    }

    fn warn(&mut self, message: &str) -> io::Result<()> {
        self.write_line(&message.yellow().to_string())
    }

    fn error(&mut self, message: &str) -> io::Result<()> {
        self.write_line(&message.red().to_string())
    }
}

/// Console terminal backed by dialoguer prompts.
pub struct StdTerminal {
    term: Term,
}

impl StdTerminal {
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
        }
    }
}

impl Default for StdTerminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Terminal for StdTerminal {
    fn clear(&mut self) -> io::Result<()> {
        self.term.clear_screen()
    }

    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.term.write_line(line)
    }

    fn read_line(&mut self, prompt: &str, default: &str) -> io::Result<String> {
        let mut input = Input::<String>::new().with_prompt(prompt).allow_empty(true);
        if !default.is_empty() {
            input = input.default(default.to_string());
        }
        let line = input.interact_text_on(&self.term).map_err(io::Error::other)?;
        Ok(if line.is_empty() {
            default.to_string()
        } else {
            line
        })
    }

    fn confirm(&mut self, prompt: &str, default: bool) -> io::Result<bool> {
        Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact_on(&self.term)
            .map_err(io::Error::other)
    }
}

/// Terminal fed from a fixed list of answers, recording everything shown.
///
/// Runs out of input with [`io::ErrorKind::UnexpectedEof`]. ANSI styling is
/// stripped from recorded lines, so the transcript holds plain text whether
/// or not colour is enabled.
///
/// # Examples
///
/// ```
/// use odie_cli::term::{ScriptedTerminal, Terminal};
///
/// let mut term = ScriptedTerminal::new(["", "y"]);
/// assert_eq!(term.read_line("Name", "Acme").unwrap(), "Acme");
/// assert!(term.confirm("Save?", false).unwrap());
/// assert!(term.read_line("More", "").is_err());
/// ```
#[derive(Debug, Default)]
pub struct ScriptedTerminal {
    answers: VecDeque<String>,
    transcript: Vec<String>,
}

impl ScriptedTerminal {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            transcript: Vec::new(),
        }
    }

    /// Every line written, plus each prompt with the answer given.
    pub fn transcript(&self) -> &[String] {
        &self.transcript
    }

    /// Whether any transcript line contains `needle`.
    pub fn saw(&self, needle: &str) -> bool {
        self.transcript.iter().any(|line| line.contains(needle))
    }

    /// Answers not consumed yet.
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    fn next_answer(&mut self, prompt: &str) -> io::Result<String> {
        let answer = self.answers.pop_front().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("no scripted answer for prompt '{prompt}'"),
            )
        })?;
        self.transcript.push(format!("{prompt}: {answer}"));
        Ok(answer)
    }
}

impl Terminal for ScriptedTerminal {
    fn clear(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.transcript.push(strip_ansi_codes(line).into_owned());
        Ok(())
    }

    fn read_line(&mut self, prompt: &str, default: &str) -> io::Result<String> {
        let answer = self.next_answer(prompt)?;
        Ok(if answer.is_empty() {
            default.to_string()
        } else {
            answer
        })
    }

    fn confirm(&mut self, prompt: &str, default: bool) -> io::Result<bool> {
        let answer = self.next_answer(prompt)?;
        Ok(match answer.trim().to_ascii_lowercase().as_str() {
            "" => default,
            "y" | "yes" => true,
            _ => false,
        })
    }
}
