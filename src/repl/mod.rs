//! Interactive terminal front-end
//!
//! Readline loop over one `ConversationSession`. Slash commands switch
//! persona, show the bound model or retry a failed binding; everything
//! else is sent to the active persona.

pub mod colors;

use anyhow::Result;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::config_dir;
use crate::persona::{PersonaCatalog, PersonaKey};
use crate::session::{ConversationSession, Message, Role, SessionState};

/// Parsed input line
#[derive(Debug, PartialEq, Eq)]
pub enum Command<'a> {
    Help,
    Personas,
    Persona(&'a str),
    Model,
    History,
    Retry,
    Quit,
    Unknown(&'a str),
    Say(&'a str),
}

impl<'a> Command<'a> {
    pub fn parse(line: &'a str) -> Self {
        let trimmed = line.trim();
        if !trimmed.starts_with('/') {
            return Command::Say(trimmed);
        }

        let (cmd, arg) = match trimmed.split_once(char::is_whitespace) {
            Some((cmd, arg)) => (cmd, arg.trim()),
            None => (trimmed, ""),
        };

        match cmd {
            "/help" => Command::Help,
            "/personas" => Command::Personas,
            "/persona" if arg.is_empty() => Command::Personas,
            "/persona" => Command::Persona(arg),
            "/model" => Command::Model,
            "/history" => Command::History,
            "/retry" => Command::Retry,
            "/quit" | "/exit" => Command::Quit,
            _ => Command::Unknown(trimmed),
        }
    }
}

/// REPL state
pub struct Repl {
    /// Readline editor with history
    editor: DefaultEditor,
    session: ConversationSession,
    catalog: Arc<PersonaCatalog>,
    /// History file path
    history_path: PathBuf,
}

impl Repl {
    pub fn new(session: ConversationSession, catalog: Arc<PersonaCatalog>) -> Result<Self> {
        Ok(Self {
            editor: DefaultEditor::new()?,
            session,
            catalog,
            history_path: config_dir().join("history"),
        })
    }

    fn load_history(&mut self) {
        if self.history_path.exists() {
            let _ = self.editor.load_history(&self.history_path);
        }
    }

    fn save_history(&mut self) {
        if let Some(parent) = self.history_path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let _ = self.editor.save_history(&self.history_path);
    }

    /// Run the REPL loop, starting with `persona`
    pub async fn run(&mut self, persona: PersonaKey) -> Result<()> {
        self.load_history();

        self.switch(persona).await;
        println!(
            "{}",
            colors::status("Type your message (Ctrl+D to exit, /help for commands)")
        );
        println!();

        loop {
            let name = self
                .session
                .persona()
                .map(|key| self.catalog.get(key).name)
                .unwrap_or("?");

            match self.editor.readline(&colors::prompt(name)) {
                Ok(line) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    self.editor.add_history_entry(line.as_str())?;

                    match Command::parse(&line) {
                        Command::Help => print_help(),
                        Command::Personas => self.print_personas(),
                        Command::Persona(label) => match label.parse::<PersonaKey>() {
                            Ok(key) => self.switch(key).await,
                            Err(e) => println!("{}", colors::error(&e.to_string())),
                        },
                        Command::Model => self.print_model(),
                        Command::History => self.print_transcript(),
                        Command::Retry => self.retry().await,
                        Command::Quit => break,
                        Command::Unknown(cmd) => {
                            println!("{}", colors::warning(&format!("Unknown command: {}", cmd)));
                        }
                        Command::Say(text) => self.say(text).await,
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => break,
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        println!("안녕히 가세요!");
        self.save_history();
        Ok(())
    }

    async fn switch(&mut self, key: PersonaKey) {
        let persona = self.catalog.get(key);
        let result = self.session.select_persona(key).await;

        println!();
        println!("{}", colors::header(&persona.title()));
        println!("{}", colors::separator(40));
        match result {
            Ok(()) => {
                if let Some(model) = self.session.model() {
                    println!("{}", colors::banner_line("Model", &colors::success(model.as_str())));
                }
                self.print_transcript();
            }
            Err(e) => {
                println!("{}", colors::error(&format!("사용 가능한 모델을 못 찾았습니다: {}", e)));
                println!("{}", colors::status("/retry to try again"));
            }
        }
    }

    async fn retry(&mut self) {
        if self.session.state() == SessionState::Active {
            println!("{}", colors::status("Already connected."));
            return;
        }
        match self.session.retry().await {
            Ok(()) => {
                println!("{}", colors::success("Connected."));
                self.print_transcript();
            }
            Err(e) => println!("{}", colors::error(&e.to_string())),
        }
    }

    async fn say(&mut self, text: &str) {
        let name = self
            .session
            .persona()
            .map(|key| self.catalog.get(key).name)
            .unwrap_or("assistant");

        match self.session.send_message(text).await {
            Ok(reply) => {
                println!();
                println!("{} {}", colors::speaker(name, false), reply.content);
                println!();
            }
            Err(e) => println!("{}", colors::error(&format!("응답 오류: {}", e))),
        }
    }

    fn print_personas(&self) {
        for persona in self.catalog.iter() {
            let marker = if self.session.persona() == Some(persona.key) { "*" } else { " " };
            println!("{} {:<8} {}", marker, persona.key, persona.label);
        }
    }

    fn print_model(&self) {
        match (self.session.model(), self.session.failure_reason()) {
            (Some(model), _) => println!("{}", colors::banner_line("Model", model.as_str())),
            (None, Some(reason)) => println!("{}", colors::error(reason)),
            (None, None) => println!("{}", colors::status("No model bound.")),
        }
    }

    fn print_transcript(&self) {
        let name = self
            .session
            .persona()
            .map(|key| self.catalog.get(key).name)
            .unwrap_or("assistant");
        for message in self.session.transcript() {
            println!("{}", format_message(message, name));
        }
        println!();
    }
}

fn format_message(message: &Message, persona_name: &str) -> String {
    match message.role {
        Role::User => format!("{} {}", colors::speaker("나", true), message.content),
        Role::Assistant => format!("{} {}", colors::speaker(persona_name, false), message.content),
    }
}

fn print_help() {
    println!("Commands:");
    println!("  /help              - Show this help");
    println!("  /personas          - List family members");
    println!("  /persona <who>     - Switch persona (clears the conversation)");
    println!("  /model             - Show the connected model");
    println!("  /history           - Show the conversation so far");
    println!("  /retry             - Retry connecting after a failure");
    println!("  /quit              - Exit");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("/help"), Command::Help);
        assert_eq!(Command::parse("  /persona  어머니 (김영숙) "), Command::Persona("어머니 (김영숙)"));
        assert_eq!(Command::parse("/persona"), Command::Personas);
        assert_eq!(Command::parse("/exit"), Command::Quit);
        assert_eq!(Command::parse("/dance"), Command::Unknown("/dance"));
        assert_eq!(Command::parse(" 안녕 "), Command::Say("안녕"));
    }

    #[test]
    fn test_format_message_speaker() {
        let line = format_message(&Message::assistant("반가워요"), "김영숙");
        assert!(line.contains("김영숙"));
        assert!(line.contains("반가워요"));
    }
}
