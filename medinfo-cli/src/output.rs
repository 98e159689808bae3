// medinfo-cli/src/output.rs
//
// Terminal output helpers shared by the commands. Colors are dropped when
// NO_COLOR is set or stdout is not a terminal.

use console::style;
use owo_colors::OwoColorize;
use std::fmt::Display;

fn should_use_color() -> bool {
    std::env::var_os("NO_COLOR").is_none() && console::Term::stdout().is_term()
}

/// Print a heading with clear separation
pub fn print_heading(text: &str) {
    let line = "=".repeat(50);
    if should_use_color() {
        println!("{}", line.bright_blue());
        println!(" {}", style(text).bold());
        println!("{}", line.bright_blue());
    } else {
        println!("{}", line);
        println!(" {}", text);
        println!("{}", line);
    }
}

/// Print a section heading (smaller than main heading)
pub fn print_section(text: &str) {
    if should_use_color() {
        println!("{}", format!("-- {} --", text).cyan().bold());
    } else {
        println!("-- {} --", text);
    }
}

/// Print an info line with label and value, with the label colored
pub fn print_info<T: Display>(label: &str, value: T) {
    if should_use_color() {
        println!("  {}: {}", label.bright_cyan(), value);
    } else {
        println!("  {}: {}", label, value);
    }
}

/// Print a success line
pub fn print_success(text: &str) {
    if should_use_color() {
        println!("{}", text.green());
    } else {
        println!("{}", text);
    }
}

/// Print an error line on stderr
pub fn print_error(text: &str) {
    if std::env::var_os("NO_COLOR").is_none() && console::Term::stderr().is_term() {
        eprintln!("{}", text.bright_red().bold());
    } else {
        eprintln!("{}", text);
    }
}
