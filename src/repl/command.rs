//! Pager command parsing

use crate::error::{CommandError, Result};

/// A command typed at the pager prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PagerCommand {
    Next,
    Previous,
    First,
    Last,

    /// Go to a page, numbered from 1 as shown in page headers.
    Page(i64),

    /// Re-run the current page against the current data.
    Refresh,

    /// Re-open the input and start again from the first page.
    Reload,

    /// Change the page size; 0 shows everything on one page.
    Rows(usize),

    Help,
    Quit,
}

/// Command words with their aliases, in help order.
pub const COMMANDS: &[(&str, &[&str], &str)] = &[
    ("next", &["n"], "show the next page"),
    ("prev", &["p"], "show the previous page"),
    ("first", &["f"], "jump to the first page"),
    ("last", &["l"], "jump to the last page"),
    ("page N", &["g N"], "go to page N"),
    ("refresh", &[], "recompute the current page"),
    ("reload", &[], "re-read the input file"),
    ("rows N", &[], "set rows per page (0 = all)"),
    ("help", &["?"], "show this help"),
    ("quit", &["exit", "q"], "leave the pager"),
];

/// Parse one input line.
///
/// Returns `Ok(None)` for blank input.
pub fn parse_command(input: &str) -> Result<Option<PagerCommand>> {
    let mut words = input.split_whitespace();
    let Some(word) = words.next() else {
        return Ok(None);
    };
    let argument = words.next();

    let command = match word.to_ascii_lowercase().as_str() {
        "next" | "n" => PagerCommand::Next,
        "prev" | "previous" | "p" => PagerCommand::Previous,
        "first" | "f" => PagerCommand::First,
        "last" | "l" => PagerCommand::Last,
        "page" | "g" => PagerCommand::Page(number("page", argument)?),
        "refresh" => PagerCommand::Refresh,
        "reload" => PagerCommand::Reload,
        "rows" => PagerCommand::Rows(number("rows", argument)?),
        "help" | "?" => PagerCommand::Help,
        "quit" | "exit" | "q" => PagerCommand::Quit,
        _ => return Err(CommandError::Unknown(word.to_string()).into()),
    };
    Ok(Some(command))
}

fn number<N: std::str::FromStr>(command: &'static str, argument: Option<&str>) -> Result<N> {
    let value = argument.ok_or(CommandError::MissingArgument(command))?;
    value.parse().map_err(|_| {
        CommandError::InvalidArgument {
            command,
            value: value.to_string(),
        }
        .into()
    })
}

/// Help text listing every command.
pub fn help_text() -> String {
    COMMANDS
        .iter()
        .map(|(name, aliases, about)| {
            let name = if aliases.is_empty() {
                name.to_string()
            } else {
                format!("{name} ({})", aliases.join(", "))
            };
            format!("  {name:<22} {about}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PagerError;

    #[test]
    fn test_navigation_words_and_aliases() {
        assert_eq!(parse_command("next").unwrap(), Some(PagerCommand::Next));
        assert_eq!(parse_command(" N ").unwrap(), Some(PagerCommand::Next));
        assert_eq!(parse_command("p").unwrap(), Some(PagerCommand::Previous));
        assert_eq!(parse_command("first").unwrap(), Some(PagerCommand::First));
        assert_eq!(parse_command("l").unwrap(), Some(PagerCommand::Last));
        assert_eq!(parse_command("exit").unwrap(), Some(PagerCommand::Quit));
        assert_eq!(parse_command("?").unwrap(), Some(PagerCommand::Help));
    }

    #[test]
    fn test_blank_input() {
        assert_eq!(parse_command("").unwrap(), None);
        assert_eq!(parse_command("   \t").unwrap(), None);
    }

    #[test]
    fn test_commands_with_arguments() {
        assert_eq!(parse_command("page 3").unwrap(), Some(PagerCommand::Page(3)));
        assert_eq!(parse_command("g -1").unwrap(), Some(PagerCommand::Page(-1)));
        assert_eq!(parse_command("rows 0").unwrap(), Some(PagerCommand::Rows(0)));
    }

    #[test]
    fn test_missing_argument() {
        let err = parse_command("page").unwrap_err();
        assert!(matches!(
            err,
            PagerError::Command(CommandError::MissingArgument("page"))
        ));
    }

    #[test]
    fn test_invalid_argument() {
        let err = parse_command("rows -4").unwrap_err();
        assert_eq!(err.to_string(), "Invalid argument '-4' for 'rows'");
    }

    #[test]
    fn test_unknown_command() {
        assert!(matches!(
            parse_command("jump 4"),
            Err(PagerError::Command(CommandError::Unknown(w))) if w == "jump"
        ));
    }

    #[test]
    fn test_help_lists_every_command() {
        let help = help_text();
        assert_eq!(help.lines().count(), COMMANDS.len());
        assert!(help.contains("quit (exit, q)"));
    }
}
