//! ANSI color helpers for terminal output

/// ANSI escape codes
pub mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";

    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const MAGENTA: &str = "\x1b[35m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";
}

use ansi::*;

/// Format a success message (green)
pub fn success(msg: &str) -> String {
    format!("{}{}{}", GREEN, msg, RESET)
}

/// Format an error message (red)
pub fn error(msg: &str) -> String {
    format!("{}{}{}", RED, msg, RESET)
}

/// Format a warning message (yellow)
pub fn warning(msg: &str) -> String {
    format!("{}{}{}", YELLOW, msg, RESET)
}

/// Format a status/info message (gray)
pub fn status(msg: &str) -> String {
    format!("{}{}{}", GRAY, msg, RESET)
}

/// Format a header (bold)
pub fn header(msg: &str) -> String {
    format!("{}{}{}", BOLD, msg, RESET)
}

/// Speaker tag shown before each transcript line
pub fn speaker(name: &str, is_user: bool) -> String {
    let color = if is_user { CYAN } else { MAGENTA };
    format!("{}{}{}:{}", BOLD, color, name, RESET)
}

/// Input prompt carrying the persona's name
pub fn prompt(name: &str) -> String {
    format!("{}{}{} >>> {}", BOLD, MAGENTA, name, RESET)
}

/// Format a horizontal separator
pub fn separator(width: usize) -> String {
    format!("{}{}{}", DIM, "─".repeat(width), RESET)
}

/// Format startup banner line
pub fn banner_line(label: &str, value: &str) -> String {
    format!("{}{:<10}{} {}", DIM, label, RESET, value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapping_resets() {
        for s in [success("ok"), error("no"), warning("hm"), status("..."), header("H")] {
            assert!(s.ends_with(RESET));
        }
        assert!(prompt("손기혁").contains("손기혁"));
        assert_eq!(separator(3).matches('─').count(), 3);
    }
}
