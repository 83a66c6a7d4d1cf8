use std::fmt::{self, Display, Formatter};

use serde::Serialize;

/// Marker for the timestamp banner IOS prints at the top of `show running-config`.
const LAST_CHANGE_BANNER: &str = "Last configuration change";

const COMMENT_MARKER: char = '!';

const TERMINATOR: &str = "end";

/// One surviving line of a normalized configuration dump.
///
/// Never empty, never a `!` comment, never the bare `end` terminator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ConfigLine(String);

impl ConfigLine {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ConfigLine {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ConfigLine {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Strip run-to-run noise from raw device output.
///
/// Accepts `\n`, `\r\n`, and bare `\r` line endings. Relative order of the
/// surviving lines is preserved.
pub fn normalize(raw: &str) -> Vec<ConfigLine> {
    raw.split(['\r', '\n'])
        .map(str::trim_end)
        .filter(|line| keep_line(line))
        .map(|line| ConfigLine(line.to_string()))
        .collect()
}

fn keep_line(line: &str) -> bool {
    !line.is_empty()
        && !line.starts_with(COMMENT_MARKER)
        && line != TERMINATOR
        && !line.contains(LAST_CHANGE_BANNER)
}
