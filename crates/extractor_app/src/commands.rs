use extractor_core::{ExportFormat, Msg, RunConfiguration};
use thiserror::Error;

pub const HELP: &str = "\
Commands:
  add <urls>          queue URLs (newline, comma or semicolon separated)
  search <query>      look up candidate company URLs and queue them
  start               extract every pending item
  stop                stop after the item in progress
  clear               remove every item
  list                show every item
  stats               show totals
  config              show the run configuration
  set <key> <value>   change one setting (max_retries, timeout_seconds,
                      requests_per_second, social, address, description)
  export csv|json     write the successful items to the output directory
  help                show this text
  quit                leave";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Send(Msg),
    Set { key: String, value: String },
    List,
    Stats,
    ShowConfig,
    Help,
    Quit,
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command `{0}`; type `help` for a list")]
    Unknown(String),
    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),
    #[error("unknown export format `{0}`; use csv or json")]
    ExportFormat(String),
    #[error("unknown setting `{0}`")]
    UnknownSetting(String),
    #[error("invalid value `{value}` for {key}")]
    InvalidValue { key: String, value: String },
}

pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Command::Empty);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "add" => Command::Send(Msg::UrlsSubmitted(required(rest, "add")?.to_string())),
        "search" => Command::Send(Msg::SearchSubmitted(required(rest, "search")?.to_string())),
        "start" => Command::Send(Msg::StartClicked),
        "stop" => Command::Send(Msg::StopClicked),
        "clear" => Command::Send(Msg::ClearClicked),
        "export" => {
            let format = match required(rest, "export")?.to_ascii_lowercase().as_str() {
                "csv" => ExportFormat::Csv,
                "json" => ExportFormat::Json,
                other => return Err(CommandError::ExportFormat(other.to_string())),
            };
            Command::Send(Msg::ExportClicked(format))
        }
        "set" => {
            let (key, value) = required(rest, "set")?
                .split_once(char::is_whitespace)
                .ok_or(CommandError::MissingArgument("set"))?;
            Command::Set {
                key: key.to_string(),
                value: value.trim().to_string(),
            }
        }
        "list" | "ls" => Command::List,
        "stats" => Command::Stats,
        "config" => Command::ShowConfig,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(command)
}

/// Returns a copy of `config` with one field replaced. Range checks are left
/// to the core so they are reported the same way as any other change.
pub fn apply_setting(
    config: &RunConfiguration,
    key: &str,
    value: &str,
) -> Result<RunConfiguration, CommandError> {
    let invalid = || CommandError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    };
    let mut next = config.clone();
    match key {
        "max_retries" => next.max_retries = value.parse().map_err(|_| invalid())?,
        "timeout_seconds" | "timeout" => {
            next.timeout_seconds = value.parse().map_err(|_| invalid())?
        }
        "requests_per_second" | "rate" => {
            next.requests_per_second = value.parse().map_err(|_| invalid())?
        }
        "social" | "extract_social_media" => next.extract_social_media = parse_flag(value).ok_or_else(invalid)?,
        "address" | "extract_address" => next.extract_address = parse_flag(value).ok_or_else(invalid)?,
        "description" | "extract_description" => {
            next.extract_description = parse_flag(value).ok_or_else(invalid)?
        }
        other => return Err(CommandError::UnknownSetting(other.to_string())),
    }
    Ok(next)
}

fn required<'a>(rest: &'a str, command: &'static str) -> Result<&'a str, CommandError> {
    if rest.is_empty() {
        Err(CommandError::MissingArgument(command))
    } else {
        Ok(rest)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Some(true),
        "off" | "false" | "no" | "0" => Some(false),
        _ => None,
    }
}
