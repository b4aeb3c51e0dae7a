//! Parsing of `export`/`unset` shell scripts into a [`ParsedConfig`].
//!
//! Only three kinds of lines are understood: `# comment`, `export KEY=VALUE`
//! and `unset KEY`. Everything else is skipped. Values are taken verbatim:
//! no quote stripping, no variable expansion.

use crate::{Error, ParsedConfig};
use std::path::{Path, PathBuf};

/// Classification of one trimmed script line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptLine<'a> {
    Comment,
    Export { key: &'a str, value: &'a str },
    Unset { key: &'a str },
    Ignored,
}

/// Classify a single line. `line_number` is only used for error reporting.
pub fn classify_line(line: &str, line_number: usize) -> Result<ScriptLine<'_>, Error> {
    let line = line.trim();

    if line.starts_with('#') {
        return Ok(ScriptLine::Comment);
    }

    if let Some(rest) = keyword_rest(line, "export") {
        let Some((lhs, value)) = rest.split_once('=') else {
            return Err(Error::malformed_assignment(line_number, line));
        };
        let Some(key) = lhs.split_whitespace().next() else {
            return Err(Error::malformed_assignment(line_number, line));
        };
        return Ok(ScriptLine::Export { key, value });
    }

    if let Some(rest) = keyword_rest(line, "unset") {
        return Ok(match rest.split_whitespace().next() {
            Some(key) => ScriptLine::Unset { key },
            None => ScriptLine::Ignored,
        });
    }

    Ok(ScriptLine::Ignored)
}

/// Returns what follows `keyword` when the line starts with it as a whole word.
fn keyword_rest<'a>(line: &'a str, keyword: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(keyword)?;
    if rest.is_empty() || rest.starts_with(char::is_whitespace) {
        Some(rest)
    } else {
        None
    }
}

/// Parse script text.
pub fn parse_str(text: &str) -> Result<ParsedConfig, Error> {
    let mut config = ParsedConfig::new();

    for (index, line) in text.lines().enumerate() {
        match classify_line(line, index + 1)? {
            ScriptLine::Export { key, value } => {
                config.insert(key, value);
            }
            ScriptLine::Unset { key } => config.push_unset(key),
            ScriptLine::Comment | ScriptLine::Ignored => {}
        }
    }

    tracing::debug!(
        entries = config.len(),
        unset = config.unset().len(),
        "Parsed export script"
    );

    Ok(config)
}

/// Read and parse a script file. A leading `~` is expanded to the home directory.
pub fn parse_file(path: impl AsRef<Path>) -> Result<ParsedConfig, Error> {
    let path = expand_home(path.as_ref());
    if !path.exists() {
        return Err(Error::FileNotFound(path));
    }
    let text = std::fs::read_to_string(&path)?;
    parse_str(&text)
}

/// Expand `~` and `~/...` using the current user's home directory.
///
/// Paths of the form `~user/...` are returned unchanged.
pub fn expand_home(path: &Path) -> PathBuf {
    let Some(raw) = path.to_str() else {
        return path.to_path_buf();
    };
    let rest = if raw == "~" {
        ""
    } else if let Some(rest) = raw.strip_prefix("~/") {
        rest
    } else {
        return path.to_path_buf();
    };
    match dirs::home_dir() {
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}
