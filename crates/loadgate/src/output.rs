//! Terminal output utilities

use std::io::{self, Write};

use console::style;

/// Write a success message
pub fn write_success<W: Write>(out: &mut W, msg: &str) -> io::Result<()> {
    writeln!(out, "{} {}", style("✓").green().bold(), msg)
}

/// Write a key-value pair
pub fn write_kv<W: Write>(out: &mut W, key: &str, value: &str) -> io::Result<()> {
    writeln!(out, "  {}: {}", style(key).dim(), value)
}
