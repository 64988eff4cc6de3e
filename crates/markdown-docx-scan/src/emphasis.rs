use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

static BOLD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").unwrap());

/// Removes every `**...**` pair, keeping the enclosed text. Unpaired
/// delimiters stay as literal characters.
pub fn strip_emphasis(text: &str) -> Cow<'_, str> {
    if !text.contains("**") {
        return Cow::Borrowed(text);
    }
    BOLD.replace_all(text, "${1}")
}
