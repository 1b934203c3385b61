//! Shell quoting helpers for `export` output.

/// Wraps a string in single quotes, writing embedded `'` as `'"'"'`.
pub fn quote(s: &str) -> String {
    let mut quoted = String::with_capacity(s.len() + 2);
    quoted.push('\'');
    for ch in s.chars() {
        if ch == '\'' {
            quoted.push_str("'\"'\"'");
        } else {
            quoted.push(ch);
        }
    }
    quoted.push('\'');
    quoted
}

/// Joins export items with a cycling field separator.
///
/// The n-th joint uses separator character `(n - 1) % len`. Quote characters
/// and spaces are escaped so the whole list stays one shell word.
pub struct FieldJoiner {
    separator: Vec<char>,
    count: usize,
}

impl FieldJoiner {
    pub fn new(separator: &str) -> Self {
        Self {
            separator: separator.chars().collect(),
            count: 0,
        }
    }

    /// Returns the text to emit before the next item.
    pub fn next_separator(&mut self) -> String {
        let joint = if self.count == 0 || self.separator.is_empty() {
            String::new()
        } else {
            match self.separator[(self.count - 1) % self.separator.len()] {
                '"' => "'\"'".to_string(),
                '\'' => "\"'\"".to_string(),
                ' ' => "\\ ".to_string(),
                other => other.to_string(),
            }
        };
        self.count += 1;
        joint
    }
}
