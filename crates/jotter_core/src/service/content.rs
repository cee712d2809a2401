//! Multi-line content accumulation.
//!
//! Content is entered line by line and ends at the first empty line.
//! The joined text is trimmed of leading/trailing whitespace.

use std::io::{self, BufRead};

/// Joins `lines` up to (not including) the first empty line.
pub fn accumulate_lines<I, S>(lines: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut joined = String::new();
    for line in lines {
        let line = line.as_ref();
        if line.is_empty() {
            break;
        }
        joined.push_str(line);
        joined.push('\n');
    }
    joined.trim().to_string()
}

/// Reads content lines from `reader` until an empty line or EOF.
///
/// Line terminators (`\n` or `\r\n`) are stripped before the emptiness check,
/// so a line holding only spaces does not end input.
pub fn read_multiline<R: BufRead>(reader: &mut R) -> io::Result<String> {
    let mut lines = Vec::new();
    let mut buf = String::new();
    loop {
        buf.clear();
        if reader.read_line(&mut buf)? == 0 {
            break;
        }
        let line = buf.trim_end_matches(['\n', '\r']);
        if line.is_empty() {
            break;
        }
        lines.push(line.to_string());
    }
    Ok(accumulate_lines(lines))
}
