use crate::keys::KeyStrategy;

/// Splits string keys such as `"usr/local/bin"` or `"app.db.pool"` on a delimiter.
///
/// By default empty segments are dropped, so `"/a//b/"` and `"a/b"` name the same node and
/// `""` names the root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DelimitedKeys {
    delimiter: char,
    keep_empty: bool,
}

impl DelimitedKeys {
    pub fn new(delimiter: char) -> Self {
        Self {
            delimiter,
            keep_empty: false,
        }
    }

    /// Slash-delimited paths.
    pub fn slash() -> Self {
        Self::new('/')
    }

    /// Dotted names.
    pub fn dotted() -> Self {
        Self::new('.')
    }

    /// Keep empty segments instead of skipping them. With this set, `"a//b"` has three
    /// parts and `""` has one (empty) part.
    pub fn keep_empty_segments(mut self, keep: bool) -> Self {
        self.keep_empty = keep;
        self
    }

    pub fn delimiter(&self) -> char {
        self.delimiter
    }
}

impl Default for DelimitedKeys {
    fn default() -> Self {
        Self::slash()
    }
}

impl KeyStrategy for DelimitedKeys {
    type Key = String;
    type Part = String;

    fn to_parts(&self, key: &String) -> Vec<String> {
        key.split(self.delimiter)
            .filter(|segment| self.keep_empty || !segment.is_empty())
            .map(str::to_owned)
            .collect()
    }

    fn to_key(&self, parts: &[String]) -> String {
        let mut key = String::new();
        for (i, part) in parts.iter().enumerate() {
            if i > 0 {
                key.push(self.delimiter);
            }
            key.push_str(part);
        }
        key
    }
}
