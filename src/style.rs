use colored::Colorize;

const EXIT_NOTICE: &str = "commit-msg hook is exiting with exit code 0 to not block the commit.";

/// `WARNING: <message>`, highlighted.
pub fn warning(message: &str) -> String {
  format!("WARNING: {message}").yellow().to_string()
}

/// Prints the warning followed by the notice that the commit goes ahead anyway.
pub fn print_hook_warning(message: &str) {
  eprintln!("{}", warning(message));
  eprintln!("{}", EXIT_NOTICE.yellow());
}
