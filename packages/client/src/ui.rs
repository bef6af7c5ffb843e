//! UI utilities for the client.

use std::io::Write;

/// Redisplay the prompt after receiving a message
pub fn redisplay_prompt(name: &str) {
    print!("{}> ", name);
    std::io::stdout().flush().ok();
}

/// Print a line above the prompt
pub fn print_above_prompt(line: &str, name: &str) {
    print!("\r{}\n", line);
    redisplay_prompt(name);
}
