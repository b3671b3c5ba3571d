//! `name=value` argument parsing and the help listing

use metfrag_exporter::parameters::{ArgumentError, ExportSettings, PARAMETER_NAMES};

#[cfg(feature = "colorized_output")]
use console::style;

/// Tokens that print the help listing
pub const HELP_TOKENS: [&str; 3] = ["help", "-help", "--help"];

const USAGE: &str = "metfrag-exporter [-v|-vv] [--config <FILE>] InputFile=<path> \
                     OutputFolder=<path>|OutputFile=<path> [name=value]...";

/// Outcome of parsing the command-line tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedArguments {
    /// All tokens applied, go on with the export
    Run,
    /// A help token was given
    Help,
}

/// Normalize raw arguments into `name=value` tokens.
///
/// An escaped `\=` becomes `|`, whitespace around `=` is dropped and any other
/// run of whitespace separates tokens, so `"a = b"` and `"a=b"` are the same.
pub fn normalize<S: AsRef<str>>(args: &[S]) -> Vec<String> {
    let joined = args
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(" ")
        .replace("\\=", "|");

    let mut tokens: Vec<String> = Vec::new();
    for piece in joined.split_whitespace() {
        match tokens.last_mut() {
            Some(last) if last.ends_with('=') || piece.starts_with('=') => last.push_str(piece),
            _ => tokens.push(piece.to_string()),
        }
    }
    tokens
}

/// Split a token on `=`, dropping empty trailing pieces
fn split_token(token: &str) -> Vec<&str> {
    let mut pieces: Vec<&str> = token.split('=').collect();
    while pieces.last().is_some_and(|p| p.is_empty()) {
        pieces.pop();
    }
    pieces
}

pub fn is_help_token(token: &str) -> bool {
    HELP_TOKENS.contains(&token)
}

/// Apply normalized tokens to `settings` in order.
///
/// Stops at the first help token. Tokens before it have already been applied.
pub fn parse_arguments(
    tokens: &[String],
    settings: &mut ExportSettings,
) -> Result<ParsedArguments, ArgumentError> {
    for token in tokens {
        match split_token(token).as_slice() {
            [name, value] => settings.apply(name, value)?,
            _ if is_help_token(token) => return Ok(ParsedArguments::Help),
            _ => return Err(ArgumentError::Malformed(token.clone())),
        }
    }
    Ok(ParsedArguments::Run)
}

/// Plain-text help listing
#[cfg_attr(feature = "colorized_output", allow(dead_code))]
pub fn help_text() -> String {
    let mut text = format!("usage: {}\n\nparameters:\n", USAGE);
    for name in PARAMETER_NAMES {
        text.push_str(&format!("\t{}=...\n", name));
    }
    text.push_str(&format!("\nhelp: {}\n", HELP_TOKENS.join(" | ")));
    text
}

pub fn print_help() {
    #[cfg(feature = "colorized_output")]
    {
        println!("{} {}\n", style("usage:").bold(), USAGE);
        println!("{}", style("parameters:").bold());
        for name in PARAMETER_NAMES {
            println!("\t{}=...", style(name).cyan());
        }
        println!("\n{} {}", style("help:").bold(), HELP_TOKENS.join(" | "));
    }

    #[cfg(not(feature = "colorized_output"))]
    {
        print!("{}", help_text());
    }
}
