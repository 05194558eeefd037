/// Interactive command loop
///
/// Both tools share one loop. A tool declares a static table of
/// `MenuEntry` rows (token, label, argument prompts, command) and a
/// `Dispatch` implementation that maps each command to its operation. The
/// loop then:
///
/// 1. prints the menu and reads a command token
/// 2. stops on `q` or end of input
/// 3. asks the entry's prompts in order and dispatches
/// 4. renders the outcome, or reports the failure
/// 5. waits for ENTER and starts over
///
/// Operation failures, including panics, are reported and never end the
/// loop. Only losing the terminal itself (an I/O error on input or output)
/// does.

use std::fmt::Debug;
use std::io::{BufRead, Write};
use std::panic::AssertUnwindSafe;

use async_trait::async_trait;
use futures::FutureExt;
use tracing::{debug, warn};

use crate::error::{CliError, CliResult};
use crate::ops::Outcome;
use crate::render::Presenter;

/// Token that ends the session
pub const QUIT: &str = "q";

/// Prompt shown after every command
pub const CONTINUE_PROMPT: &str = "Press ENTER to continue...";

/// One row of a tool's menu table
#[derive(Debug)]
pub struct MenuEntry<C: 'static> {
    /// Token the operator types
    pub key: &'static str,

    /// Menu line text
    pub label: &'static str,

    /// Argument prompts, asked in order
    pub prompts: &'static [&'static str],

    pub command: C,
}

/// A tool's full menu
#[derive(Debug)]
pub struct Menu<C: 'static> {
    entries: &'static [MenuEntry<C>],
}

impl<C: 'static> Menu<C> {
    pub const fn new(entries: &'static [MenuEntry<C>]) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &'static [MenuEntry<C>] {
        self.entries
    }

    /// Finds the entry for a command token
    pub fn lookup(&self, token: &str) -> Option<&'static MenuEntry<C>> {
        self.entries.iter().find(|entry| entry.key == token)
    }

    /// The menu as printed before each command
    pub fn listing(&self) -> String {
        let mut text = String::new();
        for entry in self.entries {
            text.push_str(&format!("{}. {}\n", entry.key, entry.label));
        }
        text.push_str(&format!("Enter '{}' to quit\n", QUIT));
        text
    }
}

/// Maps a menu command to its operation
#[async_trait]
pub trait Dispatch: Send + Sync {
    type Command: Copy + Debug + Send + Sync + 'static;

    /// Runs the operation for `command` with the answers to its prompts
    async fn dispatch(&self, command: Self::Command, args: Vec<String>) -> CliResult<Outcome>;
}

/// Formats a failed command for the operator
pub fn describe_failure(key: &str, err: &CliError) -> String {
    if err.is_input_error() {
        format!(
            "An error occurred while parsing the input for command {}: {}",
            key, err
        )
    } else if err.is_store_error() {
        format!("An error occurred while executing the command {}: {}", key, err)
    } else {
        format!(
            "An unexpected error occurred while executing the command {}: {}",
            key, err
        )
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "operation panicked".to_string()
    }
}

/// Reads one line without its line ending; `None` at end of input
fn read_line<R: BufRead>(input: &mut R) -> CliResult<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    let trimmed = line.trim_end_matches(['\n', '\r']).len();
    line.truncate(trimmed);
    Ok(Some(line))
}

fn prompt<R: BufRead, W: Write>(input: &mut R, output: &mut W, text: &str) -> CliResult<Option<String>> {
    write!(output, "{}", text)?;
    output.flush()?;
    read_line(input)
}

/// Blocks until the operator sends an empty line; false at end of input
fn acknowledge<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> CliResult<bool> {
    loop {
        match prompt(input, output, CONTINUE_PROMPT)? {
            Some(line) if line.is_empty() => return Ok(true),
            Some(_) => continue,
            None => return Ok(false),
        }
    }
}

/// Runs the menu loop until the operator quits or input ends
pub async fn run<D, R, W>(
    menu: &Menu<D::Command>,
    dispatcher: &D,
    presenter: Presenter,
    input: &mut R,
    output: &mut W,
) -> CliResult<()>
where
    D: Dispatch + ?Sized,
    R: BufRead,
    W: Write,
{
    loop {
        write!(output, "{}", menu.listing())?;

        let Some(token) = prompt(input, output, "Enter command: ")? else {
            break;
        };
        let token = token.trim();
        if token == QUIT {
            break;
        }

        match menu.lookup(token) {
            None => {
                writeln!(output, "{}", presenter.failure(&format!("Unknown command: {}", token)))?;
            }
            Some(entry) => {
                let mut args = Vec::with_capacity(entry.prompts.len());
                for text in entry.prompts {
                    match prompt(input, output, text)? {
                        Some(answer) => args.push(answer),
                        None => return Ok(()),
                    }
                }

                debug!(command = entry.key, kind = ?entry.command, "Dispatching command");
                let result = AssertUnwindSafe(dispatcher.dispatch(entry.command, args))
                    .catch_unwind()
                    .await;

                match result {
                    Ok(Ok(outcome)) => write!(output, "{}", presenter.render(&outcome))?,
                    Ok(Err(err)) => {
                        warn!(command = entry.key, error = %err, "Command failed");
                        writeln!(output, "{}", presenter.failure(&describe_failure(entry.key, &err)))?;
                    }
                    Err(payload) => {
                        let message = panic_message(payload.as_ref());
                        warn!(command = entry.key, panic = %message, "Command panicked");
                        writeln!(
                            output,
                            "{}",
                            presenter.failure(&format!(
                                "An unexpected error occurred while executing the command {}: {}",
                                entry.key, message
                            ))
                        )?;
                    }
                }
            }
        }

        if !acknowledge(input, output)? {
            break;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Echo {
        Say,
        Fail,
        Boom,
    }

    const ENTRIES: &[MenuEntry<Echo>] = &[
        MenuEntry {
            key: "1",
            label: "Say something",
            prompts: &["Enter word: "],
            command: Echo::Say,
        },
        MenuEntry {
            key: "2",
            label: "Fail",
            prompts: &[],
            command: Echo::Fail,
        },
        MenuEntry {
            key: "3",
            label: "Panic",
            prompts: &[],
            command: Echo::Boom,
        },
    ];

    static MENU: Menu<Echo> = Menu::new(ENTRIES);

    struct EchoOps;

    #[async_trait]
    impl Dispatch for EchoOps {
        type Command = Echo;

        async fn dispatch(&self, command: Echo, args: Vec<String>) -> CliResult<Outcome> {
            match command {
                Echo::Say => Ok(Outcome::Done(format!("said {}", args[0]))),
                Echo::Fail => Err(CliError::invalid_input("word", "x", "bad")),
                Echo::Boom => panic!("kaboom"),
            }
        }
    }

    async fn drive(script: &str) -> String {
        let mut input = Cursor::new(script.as_bytes().to_vec());
        let mut output = Vec::new();
        run(&MENU, &EchoOps, Presenter::plain(), &mut input, &mut output)
            .await
            .unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_listing() {
        assert_eq!(
            MENU.listing(),
            "1. Say something\n2. Fail\n3. Panic\nEnter 'q' to quit\n"
        );
        assert_eq!(MENU.lookup("2").unwrap().command, Echo::Fail);
        assert!(MENU.lookup("9").is_none());
    }

    #[tokio::test]
    async fn test_quit_immediately() {
        let out = drive("q\n").await;
        assert_eq!(out.matches("Enter command: ").count(), 1);
        assert!(!out.contains(CONTINUE_PROMPT));
    }

    #[tokio::test]
    async fn test_end_of_input_ends_session() {
        let out = drive("").await;
        assert!(out.contains("Enter command: "));
    }

    #[tokio::test]
    async fn test_prompts_then_pause() {
        let out = drive("1\nhello\n\nq\n").await;
        assert!(out.contains("Enter word: said hello\n"));
        assert_eq!(out.matches(CONTINUE_PROMPT).count(), 1);
        assert_eq!(out.matches("Enter command: ").count(), 2);
    }

    #[tokio::test]
    async fn test_pause_waits_for_empty_line() {
        let out = drive("1\nhi\nnot yet\n\nq\n").await;
        assert_eq!(out.matches(CONTINUE_PROMPT).count(), 2);
    }

    #[tokio::test]
    async fn test_failures_do_not_end_loop() {
        let out = drive("2\n\n3\n\n1\nstill here\n\nq\n").await;
        assert!(out.contains(
            "An error occurred while parsing the input for command 2: Invalid word 'x': bad"
        ));
        assert!(out.contains("An unexpected error occurred while executing the command 3: kaboom"));
        assert!(out.contains("said still here"));
    }

    #[tokio::test]
    async fn test_unknown_command() {
        let out = drive("42\n\nq\n").await;
        assert!(out.contains("Unknown command: 42"));
    }

    #[test]
    fn test_describe_store_failure() {
        let err = CliError::Conflict("Email already exists".to_string());
        assert_eq!(
            describe_failure("5", &err),
            "An error occurred while executing the command 5: Conflict: Email already exists"
        );
    }
}
