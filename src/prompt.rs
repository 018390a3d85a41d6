//! The interactive start-year question.
//!
//! Reading input goes through [`InputProvider`] so the question can be answered by a
//! terminal or, in tests, by a scripted list of answers.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("Input closed before a valid answer was given")]
    Closed,

    #[error("Failed to read input")]
    Io(#[from] io::Error),
}

/// A source of answers to console prompts.
pub trait InputProvider {
    /// Shows `prompt` and reads one line. `Ok(None)` means end of input.
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>>;

    /// Reports a rejected answer before the prompt is repeated.
    fn reject(&mut self, _message: &str) {}
}

/// Reads answers from standard input.
#[derive(Debug, Default)]
pub struct StdinInput;

impl InputProvider for StdinInput {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        print!("{}", prompt);
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }

    fn reject(&mut self, message: &str) {
        println!("{}", message);
    }
}

/// Answers taken from a fixed list, for non-interactive use.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    answers: VecDeque<String>,
    pub rejections: Vec<String>,
}

impl ScriptedInput {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            rejections: Vec::new(),
        }
    }
}

impl InputProvider for ScriptedInput {
    fn read_line(&mut self, _prompt: &str) -> io::Result<Option<String>> {
        Ok(self.answers.pop_front())
    }

    fn reject(&mut self, message: &str) {
        self.rejections.push(message.to_string());
    }
}

/// Where a history fetch starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartChoice {
    /// From the configured epoch year.
    FullHistory,
    FromYear(i32),
}

impl StartChoice {
    /// Interprets one answer: `y`/`yes` (any case) or a four-digit year between
    /// `epoch_year` and `current_year`.
    pub fn parse(answer: &str, epoch_year: i32, current_year: i32) -> Option<Self> {
        let answer = answer.trim().to_ascii_lowercase();
        if answer == "y" || answer == "yes" {
            return Some(StartChoice::FullHistory);
        }
        if answer.len() != 4 || !answer.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let year: i32 = answer.parse().ok()?;
        (epoch_year..=current_year)
            .contains(&year)
            .then_some(StartChoice::FromYear(year))
    }

    pub fn start_year(&self, epoch_year: i32) -> i32 {
        match self {
            StartChoice::FullHistory => epoch_year,
            StartChoice::FromYear(year) => *year,
        }
    }
}

/// Asks for the start of the history until a valid answer is given.
///
/// # Errors
///
/// [`PromptError::Closed`] when input ends first, [`PromptError::Io`] when reading fails.
pub fn prompt_start(
    input: &mut impl InputProvider,
    epoch_year: i32,
    current_year: i32,
) -> Result<StartChoice, PromptError> {
    let prompt = format!(
        "Fetch all data since {}? (y, or enter a start year like 2000): ",
        epoch_year
    );
    loop {
        let Some(answer) = input.read_line(&prompt)? else {
            return Err(PromptError::Closed);
        };
        match StartChoice::parse(&answer, epoch_year, current_year) {
            Some(choice) => return Ok(choice),
            None => input.reject(&format!(
                "Please answer 'y' or a year between {} and {}.",
                epoch_year, current_year
            )),
        }
    }
}
