// Query pattern parsing.
//
// Grammar: a lemma segment (characters, `*` for any run of characters)
// followed by zero or more `<...>` tag segments, where `<*>` is a tag
// wildcard. A backslash makes the next lemma character literal.

use std::fmt;
use std::str::FromStr;

/// Error type for malformed query text.
///
/// Pattern errors are local to one query; the session continues with the
/// next line. Positions are character offsets into the query.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    #[error("empty pattern")]
    Empty,
    #[error("unterminated tag starting at position {position}")]
    UnterminatedTag { position: usize },
    #[error("empty tag at position {position}")]
    EmptyTag { position: usize },
    #[error("unexpected '>' at position {position}")]
    UnexpectedTagClose { position: usize },
    #[error("lemma character after tags at position {position}")]
    TextAfterTags { position: usize },
    #[error("pattern ends with a lone backslash")]
    DanglingEscape,
}

/// One element of a lemma pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LemmaSymbol {
    Char(char),
    /// `*`: any run of lexical characters, including none.
    AnyRun,
}

/// Lemma part of a query: a literal string, the wildcard `*`, or a glob
/// mixing both.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct LemmaPattern {
    symbols: Vec<LemmaSymbol>,
}

impl LemmaPattern {
    pub fn literal(text: &str) -> Self {
        Self {
            symbols: text.chars().map(LemmaSymbol::Char).collect(),
        }
    }

    /// The lemma wildcard: matches any lemma.
    pub fn wildcard() -> Self {
        Self {
            symbols: vec![LemmaSymbol::AnyRun],
        }
    }

    /// Build from symbols; consecutive `AnyRun`s collapse into one.
    pub fn from_symbols(symbols: impl IntoIterator<Item = LemmaSymbol>) -> Self {
        let mut collapsed: Vec<LemmaSymbol> = Vec::new();
        for s in symbols {
            if s == LemmaSymbol::AnyRun && collapsed.last() == Some(&LemmaSymbol::AnyRun) {
                continue;
            }
            collapsed.push(s);
        }
        Self { symbols: collapsed }
    }

    pub fn symbols(&self) -> &[LemmaSymbol] {
        &self.symbols
    }

    pub fn is_wildcard(&self) -> bool {
        self.symbols == [LemmaSymbol::AnyRun]
    }

    pub fn is_literal(&self) -> bool {
        self.symbols.iter().all(|s| matches!(s, LemmaSymbol::Char(_)))
    }
}

/// One tag position of a query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TagPattern {
    /// A concrete tag, brackets included (`<n>`).
    Literal(String),
    /// `<*>`: exactly one tag of any name; in last position it also absorbs
    /// any tags that follow.
    Wildcard,
}

impl TagPattern {
    /// Literal tag from a bare or bracketed name.
    pub fn literal(tag: &str) -> Self {
        TagPattern::Literal(lttb_core::normalize_tag(tag))
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, TagPattern::Wildcard)
    }
}

/// A parsed paradigm query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryPattern {
    pub lemma: LemmaPattern,
    pub tags: Vec<TagPattern>,
}

impl QueryPattern {
    pub fn new(lemma: LemmaPattern, tags: Vec<TagPattern>) -> Self {
        Self { lemma, tags }
    }

    pub fn parse(text: &str) -> Result<Self, PatternError> {
        parse(text)
    }

    /// Whether the last tag position is a wildcard.
    pub fn has_trailing_wildcard(&self) -> bool {
        self.tags.last().is_some_and(TagPattern::is_wildcard)
    }
}

impl FromStr for QueryPattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

impl fmt::Display for QueryPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for s in self.lemma.symbols() {
            match *s {
                LemmaSymbol::AnyRun => f.write_str("*")?,
                LemmaSymbol::Char(c @ ('*' | '<' | '>' | '\\')) => write!(f, "\\{c}")?,
                LemmaSymbol::Char(c) => write!(f, "{c}")?,
            }
        }
        for tag in &self.tags {
            match tag {
                TagPattern::Literal(t) => f.write_str(t)?,
                TagPattern::Wildcard => f.write_str("<*>")?,
            }
        }
        Ok(())
    }
}

/// Parse query text into a [`QueryPattern`].
///
/// Trailing line terminators are ignored. Purely lexical: tags are not
/// checked against any transducer.
pub fn parse(text: &str) -> Result<QueryPattern, PatternError> {
    let text = text.trim_end_matches(['\n', '\r']);
    if text.is_empty() {
        return Err(PatternError::Empty);
    }

    let mut lemma = Vec::new();
    let mut tags = Vec::new();
    let mut chars = text.chars().enumerate();

    while let Some((position, c)) = chars.next() {
        match c {
            '<' => {
                let mut body = String::new();
                let mut closed = false;
                for (_, c) in chars.by_ref() {
                    match c {
                        '>' => {
                            closed = true;
                            break;
                        }
                        '<' => return Err(PatternError::UnterminatedTag { position }),
                        c => body.push(c),
                    }
                }
                if !closed {
                    return Err(PatternError::UnterminatedTag { position });
                }
                if body.is_empty() {
                    return Err(PatternError::EmptyTag { position });
                }
                tags.push(if body == "*" {
                    TagPattern::Wildcard
                } else {
                    TagPattern::Literal(format!("<{body}>"))
                });
            }
            '>' => return Err(PatternError::UnexpectedTagClose { position }),
            _ if !tags.is_empty() => return Err(PatternError::TextAfterTags { position }),
            '\\' => {
                let (_, escaped) = chars.next().ok_or(PatternError::DanglingEscape)?;
                lemma.push(LemmaSymbol::Char(escaped));
            }
            '*' => lemma.push(LemmaSymbol::AnyRun),
            c => lemma.push(LemmaSymbol::Char(c)),
        }
    }

    Ok(QueryPattern {
        lemma: LemmaPattern::from_symbols(lemma),
        tags,
    })
}
