//! Status message functions for terminal output.

use console::style;

use super::is_quiet;

/// Print a success message to stderr.
pub fn success(message: &str) {
    if is_quiet() {
        return;
    }
    eprintln!("{} {}", style("✓").green().bold().for_stderr(), message);
}

/// Print an info message to stderr.
pub fn info(message: &str) {
    if is_quiet() {
        return;
    }
    eprintln!("{} {}", style("ℹ").blue().bold().for_stderr(), message);
}

/// Print a warning message to stderr.
pub fn warning(message: &str) {
    if is_quiet() {
        return;
    }
    eprintln!(
        "{} {}",
        style("⚠").yellow().bold().for_stderr(),
        style(message).yellow().for_stderr()
    );
}

/// Print an error message to stderr, even when quiet.
pub fn error(message: &str) {
    eprintln!(
        "{} {}",
        style("✗").red().bold().for_stderr(),
        style(message).red().for_stderr()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_messages() {
        success("Success message");
        info("Info message");
        warning("Warning message");
        error("Error message");
    }
}
