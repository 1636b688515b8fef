//! Tokenizing and escaping of ignore lines
//!
//! A line is a dot separated list of segments. `\.` is a literal dot and
//! `\\` a literal backslash; runs of `*` collapse to a single `*`.

/// Split an ignore line into unescaped segments
///
/// A `.` separates segments unless it is preceded by an odd number of
/// backslashes. A backslash not followed by `\` or `.` is dropped. A trailing
/// separator does not produce an empty last segment.
pub fn read_line(line: &str) -> Vec<String> {
    let line = collapse_wildcards(line);
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let Some(&next) = chars.peek().filter(|n| is_escapable(**n)) {
                    current.push(next);
                    chars.next();
                }
            }
            '.' => segments.push(std::mem::take(&mut current)),
            other => current.push(other),
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }
    segments
}

/// Escape a value so that [`read_line`] reads it back as one segment
pub fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if is_escapable(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Reverse [`escape`]: `\\` becomes `\`, `\.` becomes `.`
pub fn unescape(value: &str) -> String {
    let mut unescaped = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(&next) = chars.peek().filter(|n| is_escapable(**n)) {
                unescaped.push(next);
                chars.next();
            }
            continue;
        }
        unescaped.push(c);
    }
    unescaped
}

fn is_escapable(c: char) -> bool {
    matches!(c, '\\' | '.')
}

fn collapse_wildcards(line: &str) -> String {
    let mut collapsed = String::with_capacity(line.len());
    for c in line.chars() {
        if c == '*' && collapsed.ends_with('*') {
            continue;
        }
        collapsed.push(c);
    }
    collapsed
}
