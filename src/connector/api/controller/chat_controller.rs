use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

use crate::application::ReplyOutcome;
use crate::domain::{ConversationSession, ExportFormat, TaskLabel};

use super::super::Container;
use super::progress::with_spinner;

const HELP: &str = "\
Commands:
  /task <label|none>             select a task (see `ba-genie tasks`) or clear it
  /export <text|docx> [path]     save the last response (default response.txt / response.docx)
  /history                       show the conversation so far
  /clear                         start over with an empty conversation
  /help                          show this help
  /quit                          leave the chat";

/// One line of interactive input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    Message(String),
    SetTask(Option<TaskLabel>),
    Export(ExportFormat, Option<PathBuf>),
    History,
    Clear,
    Help,
    Quit,
    Empty,
    Invalid(String),
}

impl ChatCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return ChatCommand::Empty;
        }
        let Some(rest) = line.strip_prefix('/') else {
            return ChatCommand::Message(line.to_string());
        };

        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest, ""),
        };

        match name.to_lowercase().as_str() {
            "quit" | "exit" => ChatCommand::Quit,
            "help" => ChatCommand::Help,
            "history" => ChatCommand::History,
            "clear" => ChatCommand::Clear,
            "task" => match arg {
                "" => ChatCommand::Invalid("usage: /task <label|none>".to_string()),
                a if a.eq_ignore_ascii_case("none") => ChatCommand::SetTask(None),
                a => match a.parse::<TaskLabel>() {
                    Ok(label) => ChatCommand::SetTask(Some(label)),
                    Err(e) => ChatCommand::Invalid(e.to_string()),
                },
            },
            "export" => {
                let (format, path) = match arg.split_once(char::is_whitespace) {
                    Some((f, p)) => (f, Some(PathBuf::from(p.trim()))),
                    None => (arg, None),
                };
                if format.is_empty() {
                    return ChatCommand::Invalid("usage: /export <text|docx> [path]".to_string());
                }
                match format.parse::<ExportFormat>() {
                    Ok(f) => ChatCommand::Export(f, path),
                    Err(e) => ChatCommand::Invalid(e.to_string()),
                }
            }
            other => ChatCommand::Invalid(format!("unknown command '/{}', try /help", other)),
        }
    }
}

/// Interactive session on stdin/stdout. The session object lives exactly as long
/// as this loop.
pub struct ChatController<'a> {
    container: &'a Container,
}

impl<'a> ChatController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn run(&self, task: Option<String>) -> Result<String> {
        let mut task = task.map(|t| t.parse::<TaskLabel>()).transpose()?;
        let mut session = ConversationSession::new();
        let chat = self.container.chat_use_case();
        let export = self.container.export_use_case();

        info!("Chat session {} started", session.id());
        println!("BA Genie ({}). Type /help for commands.", self.container.service_name());

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            print!("{}> ", task.map(|t| format!("[{}] ", t)).unwrap_or_default());
            std::io::stdout().flush()?;

            let Some(line) = lines.next_line().await? else {
                break;
            };

            match ChatCommand::parse(&line) {
                ChatCommand::Empty => {}
                ChatCommand::Quit => break,
                ChatCommand::Help => println!("{}", HELP),
                ChatCommand::Invalid(msg) => println!("{}", msg),
                ChatCommand::SetTask(t) => {
                    task = t;
                    match t {
                        Some(label) => println!("Task set to {}.", label),
                        None => println!("Task cleared; requests are routed by keywords."),
                    }
                }
                ChatCommand::History => println!("{}", Self::format_history(&session)),
                ChatCommand::Clear => {
                    session.clear();
                    println!("Conversation cleared.");
                }
                ChatCommand::Export(format, path) => {
                    let path = path.unwrap_or_else(|| PathBuf::from(format.default_file_name()));
                    match export.write_to(&session, format, &path).await {
                        Ok(artifact) => println!(
                            "Saved {} ({} bytes) to {}",
                            artifact.mime_type(),
                            artifact.bytes().len(),
                            path.display()
                        ),
                        Err(e) => println!("Export failed: {}", e),
                    }
                }
                ChatCommand::Message(text) => {
                    let message = format!("Asking {}...", self.container.service_name());
                    let reply = with_spinner(&message, chat.execute(&mut session, &text, task)).await;
                    debug!("Reply outcome: {:?}", reply.outcome());
                    if reply.outcome() == ReplyOutcome::Fallback {
                        println!("(fallback response)");
                    }
                    println!("\n{}\n", reply.content());
                }
            }
        }

        info!("Chat session {} ended after {} turns", session.id(), session.len());
        session.clear();
        Ok("Goodbye.".to_string())
    }

    fn format_history(session: &ConversationSession) -> String {
        if session.is_empty() {
            return "No messages yet.".to_string();
        }
        session
            .turns()
            .iter()
            .map(|t| format!("{}: {}", t.role().label(), t.content()))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
