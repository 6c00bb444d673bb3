//! Colored output helpers for the CLI.
//!
//! Everything the user sees goes through here so the `--no-color` path
//! stays consistent.

use owo_colors::OwoColorize;

use crate::types::{Case, ChatMessage, MessageRole};

/// Output style configuration.
pub struct Output {
    /// Whether ANSI styling is applied.
    pub colored: bool,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    /// Colors enabled.
    pub fn new() -> Self {
        Self { colored: true }
    }

    /// Colors disabled.
    pub fn no_color() -> Self {
        Self { colored: false }
    }

    /// Print a success message.
    pub fn success(&self, message: &str) {
        if self.colored {
            println!("{} {}", "✓".green().bold(), message.green());
        } else {
            println!("[OK] {}", message);
        }
    }

    /// Print an info line.
    pub fn info(&self, message: &str) {
        if self.colored {
            println!("{} {}", "•".blue(), message);
        } else {
            println!("[INFO] {}", message);
        }
    }

    /// Print an error message to stderr.
    pub fn error(&self, message: &str) {
        if self.colored {
            eprintln!("{} {}", "✗".red().bold(), message.red());
        } else {
            eprintln!("[ERROR] {}", message);
        }
    }

    /// Print a field-scoped validation error next to its form field.
    pub fn field_error(&self, field: &str, message: &str) {
        if self.colored {
            eprintln!("  {} {}", format!("{}:", field).yellow().bold(), message);
        } else {
            eprintln!("  {}: {}", field, message);
        }
    }

    /// Print one row of the case list. Status comes straight from the
    /// server, untransformed.
    pub fn case_row(&self, case: &Case) {
        if self.colored {
            println!(
                "{}  {}  {}",
                case.id.dimmed(),
                case.filename.bright_white(),
                case.status.cyan()
            );
        } else {
            println!("{}  {}  {}", case.id, case.filename, case.status);
        }
    }

    /// Print a numbered topic option.
    pub fn topic_option(&self, index: usize, topic: &str) {
        if self.colored {
            println!("  {} {}", format!("[{}]", index).dimmed(), topic);
        } else {
            println!("  [{}] {}", index, topic);
        }
    }

    /// Print one transcript entry.
    pub fn chat_message(&self, message: &ChatMessage) {
        let label = match message.role {
            MessageRole::User => "you",
            MessageRole::Assistant => "papi",
        };
        if self.colored {
            match message.role {
                MessageRole::User => {
                    println!("{} {}", format!("{}>", label).green().bold(), message.content)
                }
                MessageRole::Assistant => {
                    println!("{} {}", format!("{}>", label).cyan().bold(), message.content)
                }
            }
        } else {
            println!("{}> {}", label, message.content);
        }
    }
}
