//! ANSI control sequences and terminal detection.

use console::Term;

/// Hides the terminal cursor.
pub const HIDE_CURSOR: &str = "\x1b[?25l";

/// Shows the terminal cursor.
pub const SHOW_CURSOR: &str = "\x1b[?25h";

/// Returns the cursor to column zero and clears the whole line.
pub const ERASE_LINE: &str = "\r\x1b[2K";

/// Whether stderr is attached to an interactive terminal.
pub fn is_interactive() -> bool {
    Term::stderr().is_term()
}
