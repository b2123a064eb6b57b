//! Query compilation

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

/// How the user's query text is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    /// Treat the query as a regular expression instead of literal text
    pub regex: bool,
    pub case_sensitive: bool,
    /// Only match at word boundaries
    pub whole_word: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            regex: false,
            case_sensitive: true,
            whole_word: false,
        }
    }
}

/// A compiled query
#[derive(Debug, Clone)]
pub struct Pattern {
    query: String,
    regex: Regex,
}

impl Pattern {
    /// Compile `query` under `options`.
    ///
    /// Returns `None` for an empty query or an invalid regular expression;
    /// a session with no pattern simply has no matches.
    pub fn compile(query: &str, options: SearchOptions) -> Option<Self> {
        if query.is_empty() {
            return None;
        }

        let mut source = if options.regex {
            query.to_string()
        } else {
            regex::escape(query)
        };
        if options.whole_word {
            source = format!(r"\b(?:{})\b", source);
        }

        match RegexBuilder::new(&source)
            .case_insensitive(!options.case_sensitive)
            .build()
        {
            Ok(regex) => Some(Self {
                query: query.to_string(),
                regex,
            }),
            Err(e) => {
                tracing::warn!(query, error = %e, "Rejected search pattern");
                None
            }
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Matched substrings of `text`, in order
    pub fn find_all<'a>(&'a self, text: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.regex.find_iter(text).map(|m| m.as_str())
    }

    /// Replace only the `nth` match in `text` with `replacement`, taken
    /// literally.
    ///
    /// Returns the new text, how many matches the text held, and whether the
    /// `nth` match existed.
    pub fn replace_nth(&self, text: &str, nth: usize, replacement: &str) -> (String, usize, bool) {
        let mut out = String::with_capacity(text.len() + replacement.len());
        let mut last = 0;
        let mut count = 0;
        let mut replaced = false;

        for (i, m) in self.regex.find_iter(text).enumerate() {
            count += 1;
            if i == nth {
                out.push_str(&text[last..m.start()]);
                out.push_str(replacement);
                last = m.end();
                replaced = true;
            }
        }
        out.push_str(&text[last..]);
        (out, count, replaced)
    }
}
