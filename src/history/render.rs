//! Bot response markup
//!
//! Converts the lightweight markdown the backend emits into the markup
//! stored in transcript messages. Three passes run in a fixed order:
//!
//! 1. bullet headings (`- **Label**:`) become `<h4>Label</h4>`
//! 2. remaining `**bold**` spans become `<strong>bold</strong>`
//! 3. newlines become `<br>`
//!
//! Headings must be extracted first, otherwise the emphasis pass would
//! wrap the label before the heading pass sees it.

use regex::Regex;
use std::sync::OnceLock;

/// Opening/closing heading marker
pub const HEADING_OPEN: &str = "<h4>";
/// Closing heading marker
pub const HEADING_CLOSE: &str = "</h4>";
/// Opening emphasis marker
pub const STRONG_OPEN: &str = "<strong>";
/// Closing emphasis marker
pub const STRONG_CLOSE: &str = "</strong>";
/// Line break marker
pub const LINE_BREAK: &str = "<br>";

fn heading_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^[ \t]*[-*][ \t]+\*\*(.+?)\*\*:[ \t]*").expect("valid heading regex")
    })
}

fn bold_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\*\*(.+?)\*\*").expect("valid bold regex"))
}

/// Render backend text into transcript markup
///
/// # Examples
///
/// ```
/// use unichat::history::render;
///
/// assert_eq!(
///     render("- **Note**: **important**\nline2"),
///     "<h4>Note</h4><strong>important</strong><br>line2"
/// );
/// ```
pub fn render(text: &str) -> String {
    let normalized = text.replace("\r\n", "\n");
    let with_headings = heading_regex().replace_all(
        &normalized,
        format!("{}$1{}", HEADING_OPEN, HEADING_CLOSE).as_str(),
    );
    let with_bold = bold_regex().replace_all(
        &with_headings,
        format!("{}$1{}", STRONG_OPEN, STRONG_CLOSE).as_str(),
    );
    with_bold.replace('\n', LINE_BREAK)
}
