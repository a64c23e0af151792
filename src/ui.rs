//! Console status and error output.
//!
//! This module handles:
//! - thread-safe, prefix-tagged status lines
//! - the colored `error:` prefix, with plain text fallback

use std::io::Write;
use std::sync::Mutex;

use lazy_static::lazy_static;

lazy_static! {
    static ref CONSOLE: Mutex<()> = Mutex::new(());
}

/// Print a status line with the "kalu: " prefix (thread-safe).
pub fn status(s: &str) {
    let _guard = CONSOLE.lock();
    println!("kalu: {}", s);
}

/// Print an error message with a colored "error" prefix.
pub fn print_error(msg: &str) {
    let _guard = CONSOLE.lock();
    println!();
    if !print_colored("error", term::color::BRIGHT_RED) {
        print!("error");
    }
    println!(": {}", msg);
    println!();
}

/// Write `s` bold and colored to stdout. Returns false when the terminal
/// does not support color, so the caller can fall back to plain text.
fn print_colored(s: &str, fg: term::color::Color) -> bool {
    if let Some(ref mut t) = term::stdout() {
        if t.fg(fg).is_err() {
            return false;
        }
        let _ = t.attr(term::Attr::Bold);
        if write!(t, "{}", s).is_err() {
            return false;
        }
        let _ = t.reset();
        return true;
    }
    false
}
