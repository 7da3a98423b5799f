// Match entries and output-line rendering.

use std::fmt;

/// Separator between the analysis and the surface form in an output line.
pub const LINE_SEPARATOR: char = ':';

/// One resolved transducer path: an analysis string paired with its surface form.
///
/// Entries are created fresh for every query and rendered to output lines
/// as `analysis:surface`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MatchEntry {
    /// Lemma followed by the ordered concrete tags, e.g. `ab<n><def>`.
    pub analysis: String,
    /// The inflected form, e.g. `abc`.
    pub surface: String,
}

impl MatchEntry {
    pub fn new(analysis: impl Into<String>, surface: impl Into<String>) -> Self {
        Self {
            analysis: analysis.into(),
            surface: surface.into(),
        }
    }

    /// Render the entry as an output line (`analysis:surface`).
    pub fn to_line(&self) -> String {
        let mut line = String::with_capacity(self.analysis.len() + self.surface.len() + 1);
        line.push_str(&self.analysis);
        line.push(LINE_SEPARATOR);
        line.push_str(&self.surface);
        line
    }

    /// Iterate over the tag tokens of the analysis string.
    pub fn analysis_tags(&self) -> TagTokens<'_> {
        tag_tokens(&self.analysis)
    }

    /// Whether the analysis contains `tag` (a bracketed token such as `<ind>`).
    pub fn has_tag(&self, tag: &str) -> bool {
        self.analysis_tags().any(|t| t == tag)
    }
}

impl fmt::Display for MatchEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.analysis, LINE_SEPARATOR, self.surface)
    }
}

/// Iterator over the `<...>` tokens of a string, brackets included.
///
/// An unterminated `<` ends the iteration.
#[derive(Debug, Clone)]
pub struct TagTokens<'a> {
    rest: &'a str,
}

impl<'a> Iterator for TagTokens<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let open = self.rest.find('<')?;
        let close = match self.rest[open..].find('>') {
            Some(rel) => open + rel,
            None => {
                self.rest = "";
                return None;
            }
        };
        let token = &self.rest[open..=close];
        self.rest = &self.rest[close + 1..];
        Some(token)
    }
}

/// Scan `text` for tag tokens.
pub fn tag_tokens(text: &str) -> TagTokens<'_> {
    TagTokens { rest: text }
}

/// Normalize a tag name to its bracketed form: `ind` and `<ind>` both give `<ind>`.
pub fn normalize_tag(tag: &str) -> String {
    let tag = tag.trim();
    if tag.starts_with('<') && tag.ends_with('>') && tag.len() >= 2 {
        tag.to_string()
    } else {
        format!("<{tag}>")
    }
}
