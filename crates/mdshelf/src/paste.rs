//! Turns a bracketed-paste payload into file paths.
//!
//! Dragging files onto a terminal pastes their paths: one per line, sometimes
//! quoted, sometimes with backslash-escaped spaces, sometimes several on one
//! line. This parser accepts all three shapes.

use std::path::PathBuf;

pub fn parse_dropped_paths(pasted: &str) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for ch in pasted.chars() {
        if escaped {
            current.push(ch);
            escaped = false;
            continue;
        }
        match ch {
            '\\' if quote != Some('\'') => escaped = true,
            '\'' | '"' => match quote {
                Some(q) if q == ch => quote = None,
                Some(_) => current.push(ch),
                None => quote = Some(ch),
            },
            c if c.is_whitespace() && quote.is_none() => {
                if !current.is_empty() {
                    paths.push(PathBuf::from(std::mem::take(&mut current)));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        paths.push(PathBuf::from(current));
    }
    paths
}
