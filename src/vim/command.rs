use thiserror::Error;

use crate::request::StepId;

/// Commands accepted on the `:` line
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Next,
    Prev,
    Jump(StepId),
    Submit,
    Photo(String),
    Date(Option<String>),
    Notes(Option<String>),
    Cancel,
    Help,
    Quit,
}

#[derive(Error, Debug, PartialEq)]
pub enum CommandError {
    #[error("Unknown command: {0}")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Unknown step: {0}")]
    UnknownStep(String),
}

pub fn parse_command(input: &str) -> Result<Command, CommandError> {
    let input = input.trim();
    let mut parts = input.splitn(2, ' ');
    let cmd = parts.next().unwrap_or("");
    let arg = parts.next().map(|s| s.trim().to_string()).filter(|s| !s.is_empty());

    match cmd {
        "next" | "n" => Ok(Command::Next),
        "prev" | "previous" | "back" | "p" => Ok(Command::Prev),
        "jump" | "j" | "step" => {
            let name = arg.ok_or(CommandError::Usage("jump <step|1-5>"))?;
            StepId::from_name(&name)
                .map(Command::Jump)
                .ok_or(CommandError::UnknownStep(name))
        }
        "submit" | "send" => Ok(Command::Submit),
        "photo" | "attach" => arg.map(Command::Photo).ok_or(CommandError::Usage("photo <reference>")),
        "date" => Ok(Command::Date(arg)),
        "notes" | "note" => Ok(Command::Notes(arg)),
        "cancel" | "c" => Ok(Command::Cancel),
        "help" | "h" | "?" => Ok(Command::Help),
        "q" | "quit" | "exit" => Ok(Command::Quit),
        "" => Err(CommandError::Unknown("empty command".to_string())),
        other => Err(CommandError::Unknown(other.to_string())),
    }
}
