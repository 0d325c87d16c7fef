//! Interactive console input.
//!
//! Every prompt in modpak reads through the [`LineSource`] trait so the
//! acquisition loops can be driven by [`ScriptedLines`] in tests. The console
//! implementation uses cliclack with a custom theme when stdin is a terminal
//! and plain line reads when input is piped.

use std::collections::VecDeque;
use std::io::{BufRead, IsTerminal};
use std::sync::atomic::{AtomicBool, Ordering};

use cliclack::{Theme, ThemeState, input, set_theme};
use console::{Style, Term};

use crate::error::{PakError, PakResult};

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

static CTRLC_HANDLER_SET: AtomicBool = AtomicBool::new(false);

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// A blocking source of operator input, one line per prompt.
pub trait LineSource {
    /// Show `prompt` and return the next line without its terminator.
    fn read_line(&mut self, prompt: &str) -> PakResult<String>;
}

/// Reads lines from the console: cliclack on a terminal, plain lines otherwise.
#[derive(Debug, Default)]
pub struct ConsoleLines;

/// Replays a fixed sequence of answers and records every prompt shown.
///
/// Returns [`PakError::InputClosed`] once the answers run out.
#[derive(Debug, Default)]
pub struct ScriptedLines {
    answers: VecDeque<String>,
    prompts: Vec<String>,
}

/// Theme for modpak prompts. Amber accent.
pub struct PakTheme;

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl ScriptedLines {
    /// Create a source that answers with `answers` in order.
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            prompts: Vec::new(),
        }
    }

    /// Prompts shown so far, in order.
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    /// Answers not yet consumed.
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl LineSource for ConsoleLines {
    fn read_line(&mut self, prompt: &str) -> PakResult<String> {
        if std::io::stdin().is_terminal() {
            return map_cancelled(input(prompt).required(false).interact());
        }

        println!("{}", prompt);
        read_plain_line(&mut std::io::stdin().lock())
    }
}

impl LineSource for ScriptedLines {
    fn read_line(&mut self, prompt: &str) -> PakResult<String> {
        self.prompts.push(prompt.to_string());
        self.answers.pop_front().ok_or(PakError::InputClosed)
    }
}

impl Theme for PakTheme {
    fn bar_color(&self, state: &ThemeState) -> Style {
        match state {
            ThemeState::Active => Style::new().color256(214),
            ThemeState::Error(_) => Style::new().red(),
            _ => Style::new().dim(),
        }
    }

    fn state_symbol_color(&self, state: &ThemeState) -> Style {
        match state {
            ThemeState::Active | ThemeState::Submit => Style::new().color256(214),
            ThemeState::Error(_) => Style::new().red(),
            _ => Style::new().dim(),
        }
    }

    fn input_style(&self, _state: &ThemeState) -> Style {
        Style::new()
    }

    fn placeholder_style(&self, _state: &ThemeState) -> Style {
        Style::new().dim()
    }
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Initialize the theme for cliclack prompts and set up Ctrl+C handler.
pub fn init_theme() {
    set_theme(PakTheme);

    // Restore the cursor if the operator aborts mid-prompt (only once)
    if !CTRLC_HANDLER_SET.swap(true, Ordering::SeqCst) {
        let _ = ctrlc::set_handler(|| {
            let term = Term::stderr();
            let _ = term.show_cursor();
            std::process::exit(130);
        });
    }
}

/// Block until the operator presses ENTER.
///
/// Read errors are ignored: the process is about to exit either way.
pub fn wait_for_acknowledgment() {
    println!("Press ENTER to exit application...");
    let _ = Term::stdout().read_line();
}

/// Read one line from non-interactive input, without its terminator.
///
/// End of input is [`PakError::InputClosed`].
fn read_plain_line(reader: &mut impl BufRead) -> PakResult<String> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Err(PakError::InputClosed);
    }
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Convert IO interrupted errors to Cancelled for clean exit on ESC.
fn map_cancelled<T>(result: Result<T, std::io::Error>) -> PakResult<T> {
    result.map_err(|e| {
        if e.kind() == std::io::ErrorKind::Interrupted {
            PakError::Cancelled
        } else {
            PakError::Io(e)
        }
    })
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_lines_replays_in_order() {
        let mut lines = ScriptedLines::new(["first", "second"]);
        assert_eq!(lines.read_line("a?").unwrap(), "first");
        assert_eq!(lines.read_line("b?").unwrap(), "second");
        assert_eq!(lines.prompts(), ["a?", "b?"]);
        assert_eq!(lines.remaining(), 0);
    }

    #[test]
    fn test_scripted_lines_closes_when_exhausted() {
        let mut lines = ScriptedLines::new(Vec::<String>::new());
        assert!(matches!(lines.read_line("x?"), Err(PakError::InputClosed)));
    }

    #[test]
    fn test_plain_lines_until_end_of_input() {
        let mut reader = std::io::Cursor::new("C:\\UE_4.27\r\n  /out  \n3");
        assert_eq!(read_plain_line(&mut reader).unwrap(), "C:\\UE_4.27");
        assert_eq!(read_plain_line(&mut reader).unwrap(), "  /out  ");
        assert_eq!(read_plain_line(&mut reader).unwrap(), "3");
        assert!(matches!(
            read_plain_line(&mut reader),
            Err(PakError::InputClosed)
        ));
    }

    #[test]
    fn test_map_cancelled() {
        let interrupted: Result<(), _> = Err(std::io::Error::from(std::io::ErrorKind::Interrupted));
        assert!(matches!(map_cancelled(interrupted), Err(PakError::Cancelled)));

        let other: Result<(), _> = Err(std::io::Error::from(std::io::ErrorKind::BrokenPipe));
        assert!(matches!(map_cancelled(other), Err(PakError::Io(_))));
    }
}
