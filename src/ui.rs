// UI layer: the console the application talks to. `Terminal` is the real
// one, built on `dialoguer` prompts and an `indicatif` spinner; tests plug
// in a scripted console instead.

use anyhow::{Context, Result};
use dialoguer::Input;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, BufRead, IsTerminal, Write};
use std::time::Duration;

/// Everything the menu needs from the user's terminal.
pub trait Console {
    /// Prompt for one line of text. Empty answers are allowed.
    fn ask(&mut self, prompt: &str) -> Result<String>;

    /// Print one line of output.
    fn say(&mut self, line: &str);

    /// Signal that a slow operation started. Default: nothing.
    fn busy(&mut self, _message: &str) {}

    /// Signal that the slow operation finished.
    fn idle(&mut self) {}
}

/// Interactive terminal console.
#[derive(Default)]
pub struct Terminal {
    spinner: Option<ProgressBar>,
}

impl Terminal {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Console for Terminal {
    fn ask(&mut self, prompt: &str) -> Result<String> {
        // dialoguer keeps returning "" once piped input runs dry, so plain
        // line reads take over when stdin is not a terminal.
        if !io::stdin().is_terminal() {
            print!("{}: ", prompt);
            io::stdout().flush()?;
            return read_answer(&mut io::stdin().lock());
        }

        // `Input::interact_text()` prompts the user and returns the line.
        let answer: String = Input::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?;
        Ok(answer.trim().to_string())
    }

    fn say(&mut self, line: &str) {
        println!("{}", line);
    }

    fn busy(&mut self, message: &str) {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(80));
        self.spinner = Some(spinner);
    }

    fn idle(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }
}

/// Reads one trimmed line. End of input is an error, so a closed or
/// exhausted stdin ends the menu instead of feeding it empty answers.
pub fn read_answer<R: BufRead>(reader: &mut R) -> Result<String> {
    let mut line = String::new();
    let read = reader
        .read_line(&mut line)
        .context("Failed to read from stdin")?;
    if read == 0 {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "stdin closed"))
            .context("No more input");
    }
    Ok(line.trim().to_string())
}
