//! # Chat Loop
//!
//! File: cli/src/commands/chat.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! The interactive part of `termbot`: read a line, answer it, repeat.
//!
//! ```text
//! Starting TerminalBot. Type your message; use /quit to exit.
//!
//! user: What is 4 + 9?
//! bot: 4 + 9 = 13
//! user: /quit
//! bot: Goodbye!
//! ```
//!
//! ## Rules
//!
//! - Blank (or whitespace-only) lines are skipped without asking the bot.
//! - `/quit`, `quit`, `exit` and `/exit` (any case) say goodbye and stop.
//! - End of input (Ctrl+D, closed pipe) and Ctrl+C print a newline, say
//!   goodbye and stop. Both are a normal exit.
//! - Everything else is trimmed and sent to the bot; its answer is printed
//!   as exactly one `bot:` line.
//!
//! ## Architecture
//!
//! Terminal lines are read on a dedicated thread and passed over a channel,
//! so the loop can wait for either the next line or Ctrl+C with
//! `tokio::select!`. The bot is asked one question at a time. It is reached
//! through the [`Responder`] trait, which the tests replace with a mock.
//!
use crate::core::error::{Result, TermbotError};
use crate::core::runtime;
use std::future::Future;
use std::io::{BufRead, Write};
use termbot_dialog::ChatBot;
use tokio::sync::mpsc;
use tracing::{debug, warn};

const EXIT_KEYWORDS: [&str; 4] = ["/quit", "quit", "exit", "/exit"];
const FAREWELL: &str = "bot: Goodbye!";

/// Anything that can answer a line of user input.
pub trait Responder {
    fn name(&self) -> &str;
    fn respond(&mut self, input: &str) -> Result<String>;
}

impl Responder for ChatBot {
    fn name(&self) -> &str {
        ChatBot::name(self)
    }

    fn respond(&mut self, input: &str) -> Result<String> {
        let response = self.get_response(input).map_err(TermbotError::from)?;
        debug!("Responding with confidence {:.2}", response.confidence);
        Ok(response.text)
    }
}

/// What a single line of input asks for.
///
/// Exit keywords are matched case-insensitively after trimming.
#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Empty,
    Exit,
    Message(&'a str),
}

fn classify(line: &str) -> Input<'_> {
    let text = line.trim();
    if text.is_empty() {
        Input::Empty
    } else if EXIT_KEYWORDS.contains(&text.to_lowercase().as_str()) {
        Input::Exit
    } else {
        Input::Message(text)
    }
}

/// Runs the chat loop on the terminal until the user leaves.
///
/// # Arguments
///
/// * `responder` - The bot answering each message.
///
/// # Returns
///
/// `Ok(())` when the user types an exit keyword, closes the input or
/// presses Ctrl+C.
///
/// # Errors
///
/// Returns the first error from the responder or from writing to stdout.
pub async fn run<R: Responder>(responder: &mut R) -> Result<()> {
    match runtime::settings() {
        Some(settings) => debug!("Chatting with runtime settings {:?}", settings),
        None => warn!("Chatting before the runtime was configured"),
    }
    let lines = spawn_stdin_reader();
    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Could not listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };
    chat_loop(responder, lines, interrupt, &mut std::io::stdout()).await
}

/// Forwards stdin lines to the returned channel. The channel closes at end of
/// input or on a read error.
fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(16);
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if tx.blocking_send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!("Failed to read from stdin: {}", e);
                    break;
                }
            }
        }
        debug!("Stdin reader finished");
    });
    rx
}

/// The loop behind [`run`], with its input, interrupt and output injected.
///
/// Prints the greeting, then one `user: ` prompt per line read. Stops at an
/// exit keyword, when `lines` closes or when `interrupt` completes, printing
/// the farewell in each case.
async fn chat_loop<R, F, W>(
    responder: &mut R,
    mut lines: mpsc::Receiver<String>,
    interrupt: F,
    out: &mut W,
) -> Result<()>
where
    R: Responder,
    F: Future<Output = ()>,
    W: Write,
{
    tokio::pin!(interrupt);
    writeln!(
        out,
        "Starting {}. Type your message; use /quit to exit.\n",
        responder.name()
    )?;

    loop {
        write!(out, "user: ")?;
        out.flush()?;

        let line = tokio::select! {
            biased;
            _ = &mut interrupt => {
                debug!("Interrupted");
                None
            }
            line = lines.recv() => line,
        };

        let Some(line) = line else {
            writeln!(out, "\n{}", FAREWELL)?;
            break;
        };

        match classify(&line) {
            Input::Empty => continue,
            Input::Exit => {
                writeln!(out, "{}", FAREWELL)?;
                break;
            }
            Input::Message(text) => {
                let reply = responder.respond(text)?;
                writeln!(out, "bot: {}", reply)?;
            }
        }
    }
    out.flush()?;
    Ok(())
}
