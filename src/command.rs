//! Chat input parsing.
//!
//! Lines starting with `/` are commands; anything else is chat text, which
//! may carry several messages separated by `|` or a literal `\n`.

use crate::ascii::{WidthSpec, MAX_WIDTH, MIN_WIDTH};
use crate::render::RenderRequest;

/// Help text shown for `/help`, one line per entry.
pub const HELP_LINES: &[&str] = &[
    "* Commands: /help /list /nick <name> /ascii <path|url> [--w=80] [--color] [--invert] [--fit] [--charset=\"@%#*+=-:. \"] /quit",
    "* Tip: Use `|` between phrases to send multiple lines at once.",
];

pub const NICK_USAGE: &str = "* usage: /nick <newname>";
pub const ASCII_USAGE: &str =
    "* usage: /ascii <path-or-url> [--w=80] [--color] [--invert] [--fit] [--charset=...]";
pub const UNKNOWN_HINT: &str = "* Unknown command. Try /help";

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Blank line.
    Empty,
    /// Chat messages, in order, none empty.
    Chat(Vec<String>),
    Command(Command),
}

/// A slash command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    List,
    /// `None` when no name was given.
    Nick(Option<String>),
    /// `None` when no source was given.
    Ascii(Option<RenderRequest>),
    Quit,
    Unknown(String),
}

/// Parse one line of user input.
pub fn parse_input(line: &str) -> Input {
    let line = line.trim();
    if line.is_empty() {
        return Input::Empty;
    }
    if line.starts_with('/') {
        return Input::Command(parse_command(line));
    }

    let parts = split_lines(line);
    if parts.is_empty() {
        Input::Empty
    } else {
        Input::Chat(parts)
    }
}

fn parse_command(line: &str) -> Command {
    let args = split_args(line);
    let Some(name) = args.first() else {
        return Command::Unknown(String::new());
    };

    match name.to_lowercase().as_str() {
        "/help" => Command::Help,
        "/list" => Command::List,
        "/nick" => Command::Nick(
            args.get(1)
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
        ),
        "/ascii" => Command::Ascii(parse_ascii(&args[1..])),
        "/quit" | "/exit" => Command::Quit,
        other => Command::Unknown(other.to_string()),
    }
}

/// Options for `/ascii`. Unrecognized flags and out-of-range widths are
/// ignored; the first bare argument is the source.
fn parse_ascii(args: &[String]) -> Option<RenderRequest> {
    let mut source = None;
    let mut width = None;
    let mut fit = false;
    let mut request = RenderRequest::new(String::new());

    for arg in args {
        if let Some(value) = arg.strip_prefix("--w=") {
            if let Ok(w) = value.parse::<u32>() {
                if (MIN_WIDTH..=MAX_WIDTH).contains(&w) {
                    width = Some(w);
                }
            }
        } else if let Some(value) = arg.strip_prefix("--charset=") {
            let value = value.trim_matches('"');
            if !value.is_empty() {
                request.charset = Some(value.to_string());
            }
        } else {
            match arg.as_str() {
                "--color" => request.colorize = true,
                "--invert" => request.invert = true,
                "--fit" => fit = true,
                flag if flag.starts_with("--") => {}
                bare => {
                    if source.is_none() {
                        source = Some(bare.to_string());
                    }
                }
            }
        }
    }

    request.source = source?;
    request.width = match (fit, width) {
        (true, _) => WidthSpec::Fit,
        (false, Some(w)) => WidthSpec::Columns(w),
        (false, None) => WidthSpec::Default,
    };
    Some(request)
}

/// Split a command line into arguments.
///
/// Spaces and tabs separate arguments except inside double quotes. Quotes
/// themselves are dropped and may start mid-argument, so `--charset="@ ."`
/// yields `--charset=@ .`. Inside quotes `\"` is a literal quote; any other
/// backslash is kept as written.
///
/// ```
/// use trashgang::command::split_args;
///
/// assert_eq!(split_args(r#"/ascii "my cat.png" --w=40"#), ["/ascii", "my cat.png", "--w=40"]);
/// ```
pub fn split_args(line: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut escaped = false;

    for c in line.chars() {
        if in_quotes && escaped {
            if c != '"' {
                current.push('\\');
            }
            current.push(c);
            escaped = false;
        } else if in_quotes && c == '\\' {
            escaped = true;
        } else if c == '"' {
            in_quotes = !in_quotes;
        } else if !in_quotes && (c == ' ' || c == '\t') {
            if !current.is_empty() {
                args.push(std::mem::take(&mut current));
            }
        } else {
            current.push(c);
        }
    }
    if escaped {
        current.push('\\');
    }
    if !current.is_empty() {
        args.push(current);
    }
    args
}

/// Split chat text on `|` and literal `\n`, trimming each part and
/// skipping empty ones.
pub fn split_lines(text: &str) -> Vec<String> {
    text.replace("\\n", "|")
        .split('|')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}
