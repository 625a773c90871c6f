//! Terminal output helpers.
//!
//! Every console line cforge prints goes through here, so the glyphs and
//! colors stay consistent:
//!
//! ```text
//! 🔥 RELEASE BUILD
//!    ⚙ Compiling src/main.cpp...
//!      g++ -c src/main.cpp -O2 -o obj/main.o
//! ✓ Compilation succeeded.
//! ```

use colored::*;
use std::ffi::OsStr;

pub fn banner(debug: bool) {
    if debug {
        println!("{} {}\n", "🐞".yellow(), "DEBUG BUILD".yellow().bold());
    } else {
        println!("{} {}\n", "🔥".green(), "RELEASE BUILD".green().bold());
    }
}

pub fn step(message: &str) {
    println!("   {} {}", "⚙".blue(), message);
}

/// Echoes a toolchain command line, dimmed.
pub fn command<S: AsRef<OsStr>>(argv: &[S]) {
    println!("     {}", format_command(argv).dimmed());
}

pub fn info(message: &str) {
    println!("{} {}", "i".cyan(), message);
}

pub fn success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

pub fn warn(message: &str) {
    println!("{} {}", "!".yellow(), message);
}

pub fn error(message: &str) {
    eprintln!("{} {}", "x".red(), message.red());
}

/// Joins `argv` for display, quoting arguments that contain whitespace or are empty.
/// Non-UTF-8 bytes are shown as U+FFFD; the real argv is never altered.
pub fn format_command<S: AsRef<OsStr>>(argv: &[S]) -> String {
    argv.iter()
        .map(|arg| {
            let arg = arg.as_ref().to_string_lossy();
            if arg.is_empty() || arg.chars().any(char::is_whitespace) {
                format!("\"{}\"", arg.replace('"', "\\\""))
            } else {
                arg.into_owned()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_format_plain_command() {
        assert_eq!(
            format_command(&argv(&["g++", "-c", "main.cpp", "-O2"])),
            "g++ -c main.cpp -O2"
        );
    }

    #[test]
    fn test_format_quotes_spaces() {
        assert_eq!(
            format_command(&argv(&["g++", "-I", "/My Projects/include", ""])),
            "g++ -I \"/My Projects/include\" \"\""
        );
    }
}
