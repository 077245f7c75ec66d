//! Command surface of the console
//!
//! This module handles:
//! - Splitting an input line into command name and parameter string
//! - Mapping names (and their synonyms) to registry entries
//! - The handlers that execute each command

pub mod handlers;

/// Version banner, baked in at build time
pub const VERSION_BANNER: &str = concat!(
    env!("CARGO_PKG_NAME"),
    " ver. ",
    env!("CARGO_PKG_VERSION")
);

/// A tokenized input line; created per line, never persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// First token, lower-cased
    pub name: String,
    /// Remaining tokens rejoined with single spaces
    pub params: String,
}

/// Split a line on whitespace into command name and parameter string.
/// Returns `None` for a blank line.
pub fn tokenize(line: &str) -> Option<Command> {
    let mut parts = line.split_whitespace();
    let name = parts.next()?.to_lowercase();
    let params = parts.collect::<Vec<_>>().join(" ");
    Some(Command { name, params })
}

/// Registry of named operations, including control-flow keywords
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    If,
    Elif,
    Else,
    EndIf,
    ForEach,
    EndFor,
    Help,
    Quit,
    Clear,
    Delay,
    List,
    Info,
    Connect,
    ConnectPc,
    Disconnect,
    Set,
    Unknown,
}

impl CommandKind {
    /// Look up a lower-cased command name
    pub fn parse(name: &str) -> CommandKind {
        match name {
            "if" => CommandKind::If,
            "elif" => CommandKind::Elif,
            "else" => CommandKind::Else,
            "endif" => CommandKind::EndIf,
            "foreach" => CommandKind::ForEach,
            "endfor" => CommandKind::EndFor,
            "help" | "?" => CommandKind::Help,
            "quit" | "q" | "exit" => CommandKind::Quit,
            "clear" | "cls" | "clr" => CommandKind::Clear,
            "delay" => CommandKind::Delay,
            "list" | "ls" => CommandKind::List,
            "info" | "i" => CommandKind::Info,
            "connect" | "o" | "open" | "pair" => CommandKind::Connect,
            "connectpc" | "opc" | "openpc" | "pairpc" => CommandKind::ConnectPc,
            "disconnect" | "c" | "close" | "unpair" => CommandKind::Disconnect,
            "set" => CommandKind::Set,
            _ => CommandKind::Unknown,
        }
    }
}
