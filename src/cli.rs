//! CLI channel: stdin/stdout REPL for local coaching sessions.

use std::pin::Pin;

use futures::{Stream, StreamExt, stream};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::coach::{CoachRequest, Orchestrator};

/// User id for the local REPL.
pub const LOCAL_USER: &str = "local-user";

pub type LineStream = Pin<Box<dyn Stream<Item = String> + Send>>;

/// A line typed at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Message(String),
    /// `/done <action-id>`
    Done(String),
    /// `/end`: end the session, keeping its context for later.
    End,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        Some(match line.split_once(char::is_whitespace) {
            _ if line == "/quit" || line == "/exit" => Self::Quit,
            _ if line == "/end" => Self::End,
            Some(("/done", id)) if !id.trim().is_empty() => Self::Done(id.trim().to_string()),
            _ => Self::Message(line.to_string()),
        })
    }
}

/// Reads stdin line by line and hands the lines out as a stream.
pub struct CliChannel;

impl CliChannel {
    pub fn new() -> Self {
        Self
    }

    pub fn start(&self) -> LineStream {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();

        tokio::spawn(async move {
            let stdin = tokio::io::stdin();
            let mut lines = BufReader::new(stdin).lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        if tx.send(line).is_err() {
                            break;
                        }
                    }
                    Ok(None) => break,
                    Err(e) => {
                        tracing::error!(error = %e, "Error reading stdin");
                        break;
                    }
                }
            }
        });

        Box::pin(stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|line| (line, rx))
        }))
    }

    /// Drive a coaching session from `lines` until EOF or `/quit`.
    pub async fn run(&self, orchestrator: &Orchestrator, mut lines: LineStream) {
        let mut session_id: Option<String> = None;
        eprint!("> ");

        while let Some(line) = lines.next().await {
            let Some(command) = Command::parse(&line) else {
                eprint!("> ");
                continue;
            };

            match command {
                Command::Quit => break,
                Command::End => {
                    // the id is kept so the next message restores the preserved context
                    if let Some(id) = session_id.as_deref() {
                        match orchestrator.end_session(id).await {
                            Ok(()) => eprintln!("Session saved. Say anything to pick up where you left off."),
                            Err(e) => eprintln!("Could not end session: {e}"),
                        }
                    }
                }
                Command::Done(action_id) => match orchestrator.complete_action(LOCAL_USER, &action_id).await {
                    Ok(total) => eprintln!("Nice work. {total} action(s) completed so far."),
                    Err(e) => eprintln!("Could not record that: {e}"),
                },
                Command::Message(text) => {
                    let mut request = CoachRequest::new(LOCAL_USER, text);
                    request.session_id = session_id.clone();
                    let response = orchestrator.process_request(request).await;
                    println!("\n{}\n", response.content);
                    if let Some(actions) = response.recommendations.as_ref().and_then(|r| r.actions.as_ref()) {
                        for action in actions {
                            eprintln!("  /done {}  ({})", action.id, action.description);
                        }
                    }
                    session_id = Some(response.session_id);
                }
            }
            eprint!("> ");
        }
    }
}

impl Default for CliChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands() {
        assert_eq!(Command::parse("   "), None);
        assert_eq!(Command::parse("/quit"), Some(Command::Quit));
        assert_eq!(Command::parse("/end"), Some(Command::End));
        assert_eq!(
            Command::parse("/done action-1"),
            Some(Command::Done("action-1".to_string()))
        );
        assert_eq!(Command::parse("/done"), Some(Command::Message("/done".to_string())));
        assert_eq!(
            Command::parse(" I feel stuck "),
            Some(Command::Message("I feel stuck".to_string()))
        );
    }
}
