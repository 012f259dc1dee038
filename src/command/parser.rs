// ABOUTME: Tokenizer and command grammar for the line-oriented tweak console
// ABOUTME: Handles quoted arguments, escapes inside quotes and per-command usage errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TweakKit Contributors

use crate::constants::console::DEFAULT_HISTORY_LINES;
use std::mem;
use thiserror::Error;

/// Splits console lines into tokens
pub struct CommandParser;

impl CommandParser {
    /// Split on whitespace outside double quotes.
    ///
    /// Quotes group text and are not part of the token. Inside quotes a
    /// backslash makes the next character literal. An unterminated quote
    /// keeps what was collected; `""` on its own yields no token.
    #[must_use]
    pub fn tokenize(line: &str) -> Vec<String> {
        let mut tokens = Vec::new();
        let mut current = String::new();
        let mut in_quotes = false;
        let mut escaping = false;

        for ch in line.chars() {
            if escaping {
                current.push(ch);
                escaping = false;
                continue;
            }
            match ch {
                '\\' if in_quotes => escaping = true,
                '"' => in_quotes = !in_quotes,
                c if c.is_whitespace() && !in_quotes => {
                    if !current.is_empty() {
                        tokens.push(mem::take(&mut current));
                    }
                }
                c => current.push(c),
            }
        }

        if !current.is_empty() {
            tokens.push(current);
        }
        tokens
    }
}

/// Problems detected before a command touches the registry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// A required argument is missing
    #[error("{0}")]
    Usage(&'static str),
    /// The command word is not recognized
    #[error("Unknown command: {0}")]
    Unknown(String),
}

/// A parsed console command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `help`
    Help,
    /// `list [filter]`
    List {
        /// Case-insensitive key substring
        filter: Option<String>,
    },
    /// `get <key>`
    Get {
        /// Tweak key
        key: String,
    },
    /// `set <key> <value>`
    Set {
        /// Tweak key
        key: String,
        /// Unparsed value text
        value: String,
    },
    /// `reset <key>`
    Reset {
        /// Tweak key
        key: String,
    },
    /// `reset-all`
    ResetAll,
    /// `last`
    Last,
    /// `history [n]`
    History {
        /// Number of most recent events to show, at least 1
        limit: usize,
    },
    /// `watch [key]`
    Watch {
        /// Only report this key, when given
        key: Option<String>,
    },
    /// `watch off`
    Unwatch,
}

impl Command {
    /// Tokenize and parse a console line. Blank lines parse to `None`.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::Usage`] for missing arguments and
    /// [`CommandError::Unknown`] for an unrecognized command word.
    pub fn from_line(line: &str) -> Result<Option<Self>, CommandError> {
        Self::parse(&CommandParser::tokenize(line))
    }

    /// Parse tokens; the first token is the case-insensitive command word.
    ///
    /// # Errors
    ///
    /// See [`Command::from_line`].
    pub fn parse(tokens: &[String]) -> Result<Option<Self>, CommandError> {
        let Some((word, args)) = tokens.split_first() else {
            return Ok(None);
        };
        let first = args.first().cloned();

        let command = match word.to_lowercase().as_str() {
            "help" => Self::Help,
            "list" => Self::List { filter: first },
            "get" => Self::Get {
                key: first.ok_or(CommandError::Usage("usage: get <key>"))?,
            },
            "set" => match args {
                [key, value, ..] => Self::Set {
                    key: key.clone(),
                    value: value.clone(),
                },
                _ => return Err(CommandError::Usage("usage: set <key> <value>")),
            },
            "reset" => Self::Reset {
                key: first.ok_or(CommandError::Usage("usage: reset <key>"))?,
            },
            "reset-all" => Self::ResetAll,
            "last" => Self::Last,
            "history" => Self::History {
                limit: history_limit(first.as_deref()),
            },
            "watch" => match first {
                Some(arg) if arg.eq_ignore_ascii_case("off") => Self::Unwatch,
                key => Self::Watch { key },
            },
            other => return Err(CommandError::Unknown(other.to_owned())),
        };
        Ok(Some(command))
    }
}

/// `max(1, n)`, where a missing or non-numeric `n` means the default
fn history_limit(arg: Option<&str>) -> usize {
    arg.and_then(|text| text.parse::<i64>().ok())
        .map_or(DEFAULT_HISTORY_LINES, |n| {
            usize::try_from(n.max(1)).unwrap_or(usize::MAX)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_limit_clamps_and_defaults() {
        assert_eq!(history_limit(None), 10);
        assert_eq!(history_limit(Some("abc")), 10);
        assert_eq!(history_limit(Some("0")), 1);
        assert_eq!(history_limit(Some("-4")), 1);
        assert_eq!(history_limit(Some("25")), 25);
    }

    #[test]
    fn test_escape_outside_quotes_is_literal() {
        assert_eq!(CommandParser::tokenize(r"a\b"), vec![r"a\b"]);
    }
}
