//! Terminal output styling.
//!
//! Everything here is a pure function of its inputs: a [`Style`] and some text
//! go in, decorated text comes out. Whether colour is emitted at all is decided
//! by `colored` (it honours `NO_COLOR` and non-tty output).
//!
//! ## Example
//!
//! ```rust
//! use harbour::ui::{paint, Style};
//!
//! println!("{}", paint(Style::Success, "Project Created!"));
//! ```

use colored::*;

/// Widest banner rule we print, even on very wide terminals.
const MAX_RULE_WIDTH: usize = 77;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    /// Step headers and progress notes.
    Info,
    Success,
    Warning,
    Error,
    /// Banner rules around step headers.
    Rule,
    /// Paths, commands and other literals inside a message.
    Literal,
}

pub fn paint(style: Style, text: &str) -> ColoredString {
    match style {
        Style::Info => text.yellow(),
        Style::Success => text.green(),
        Style::Warning => text.yellow().bold(),
        Style::Error => text.red(),
        Style::Rule => text.magenta(),
        Style::Literal => text.cyan(),
    }
}

/// A horizontal rule sized to the terminal, capped at `MAX_RULE_WIDTH`.
pub fn rule() -> String {
    let (_rows, cols) = console::Term::stdout().size();
    "=".repeat((cols as usize).clamp(20, MAX_RULE_WIDTH))
}

/// Print `title` between two rules.
pub fn section(title: &str) {
    let line = rule();
    println!("{}", paint(Style::Rule, &line));
    println!("{}", paint(Style::Info, title));
    println!("{}", paint(Style::Rule, &line));
}

pub fn success(msg: &str) {
    println!("{} {}", paint(Style::Success, "✓"), paint(Style::Success, msg));
}

pub fn error(msg: &str) {
    eprintln!("{} {}", paint(Style::Error, "x"), paint(Style::Error, msg));
}

pub fn warn(msg: &str) {
    eprintln!("{} {}", paint(Style::Warning, "!"), msg);
}

/// Print the last `max_lines` lines of a child's captured output, indented.
pub fn print_output_tail(label: &str, output: &str, max_lines: usize) {
    let lines: Vec<&str> = output.lines().collect();
    if lines.is_empty() {
        return;
    }
    let start = lines.len().saturating_sub(max_lines);
    eprintln!("   {} ({}):", paint(Style::Literal, label), lines.len());
    if start > 0 {
        eprintln!("   {}", format!("... {} earlier lines", start).dimmed());
    }
    for line in &lines[start..] {
        eprintln!("   {}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paint_keeps_text() {
        colored::control::set_override(false);
        assert_eq!(paint(Style::Error, "boom").to_string(), "boom");
        assert_eq!(paint(Style::Literal, "cmake").to_string(), "cmake");
        colored::control::unset_override();
    }

    #[test]
    fn test_rule_is_bounded() {
        let r = rule();
        assert!(r.len() >= 20);
        assert!(r.len() <= MAX_RULE_WIDTH);
        assert!(r.chars().all(|c| c == '='));
    }
}
