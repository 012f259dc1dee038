// ABOUTME: Unit tests for console tokenizing and command parsing
// ABOUTME: Validates quoting, escapes, case-insensitive command words and usage errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TweakKit Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use tweakkit::command::{Command, CommandError, CommandParser};

fn tokens(line: &str) -> Vec<String> {
    CommandParser::tokenize(line)
}

#[test]
fn test_quoted_argument_keeps_whitespace() {
    assert_eq!(
        tokens(r#"set greeting "hello world""#),
        vec!["set", "greeting", "hello world"]
    );
}

#[test]
fn test_runs_of_whitespace_collapse() {
    assert_eq!(tokens("  list \t  physics  "), vec!["list", "physics"]);
    assert!(tokens("   ").is_empty());
}

#[test]
fn test_escape_inside_quotes() {
    assert_eq!(
        tokens(r#"set title "say \"hi\" \\ bye""#),
        vec!["set", "title", r#"say "hi" \ bye"#]
    );
}

#[test]
fn test_quotes_join_adjacent_text() {
    assert_eq!(tokens(r#"set k pre"fix suf"fix"#), vec!["set", "k", "prefix suffix"]);
}

#[test]
fn test_unterminated_quote_keeps_collected_text() {
    assert_eq!(tokens(r#"set k "open ended"#), vec!["set", "k", "open ended"]);
}

#[test]
fn test_empty_quotes_yield_no_token() {
    assert_eq!(tokens(r#"set k """#), vec!["set", "k"]);
}

#[test]
fn test_command_word_is_case_insensitive() {
    assert_eq!(Command::from_line("HeLp").unwrap(), Some(Command::Help));
    assert_eq!(Command::from_line("RESET-ALL").unwrap(), Some(Command::ResetAll));
}

#[test]
fn test_blank_line_is_no_command() {
    assert_eq!(Command::from_line("").unwrap(), None);
    assert_eq!(Command::from_line(" \t ").unwrap(), None);
}

#[test]
fn test_usage_errors() {
    assert_eq!(
        Command::from_line("get").unwrap_err(),
        CommandError::Usage("usage: get <key>")
    );
    assert_eq!(
        Command::from_line("set only-key").unwrap_err(),
        CommandError::Usage("usage: set <key> <value>")
    );
    assert_eq!(
        Command::from_line("reset").unwrap_err(),
        CommandError::Usage("usage: reset <key>")
    );
}

#[test]
fn test_unknown_command_is_lowercased() {
    let err = Command::from_line("Frobnicate now").unwrap_err();
    assert_eq!(err.to_string(), "Unknown command: frobnicate");
}

#[test]
fn test_set_ignores_extra_arguments() {
    assert_eq!(
        Command::from_line("set a 1 2 3").unwrap(),
        Some(Command::Set {
            key: "a".into(),
            value: "1".into()
        })
    );
}

#[test]
fn test_watch_variants() {
    assert_eq!(
        Command::from_line("watch").unwrap(),
        Some(Command::Watch { key: None })
    );
    assert_eq!(
        Command::from_line("watch physics.speed").unwrap(),
        Some(Command::Watch {
            key: Some("physics.speed".into())
        })
    );
    assert_eq!(Command::from_line("watch OFF").unwrap(), Some(Command::Unwatch));
}

#[test]
fn test_history_limit_parsing() {
    assert_eq!(
        Command::from_line("history").unwrap(),
        Some(Command::History { limit: 10 })
    );
    assert_eq!(
        Command::from_line("history 0").unwrap(),
        Some(Command::History { limit: 1 })
    );
    assert_eq!(
        Command::from_line("history lots").unwrap(),
        Some(Command::History { limit: 10 })
    );
    assert_eq!(
        Command::from_line("history 3").unwrap(),
        Some(Command::History { limit: 3 })
    );
}
