// A loaded transducer bound to query options.

use std::path::Path;
use std::sync::Arc;

use lttb_core::{Direction, MatchEntry};
use lttb_fst::{LoadError, Transducer};

use crate::matcher::Matcher;
use crate::pattern::{PatternError, QueryPattern, parse};
use crate::postprocess::PostProcessor;

/// Error type for session setup and line queries.
#[derive(Debug, thiserror::Error)]
pub enum ParadigmError {
    #[error("failed to load transducer: {0}")]
    Load(#[from] LoadError),
    #[error("invalid pattern: {0}")]
    Pattern(#[from] PatternError),
}

/// Options for a paradigm session.
///
/// Defaults: generation direction, no exclusions, emission order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParadigmOptions {
    pub direction: Direction,
    pub exclude_tags: Vec<String>,
    pub sort: bool,
}

impl ParadigmOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Add one tag to exclude; brackets are optional.
    pub fn exclude(mut self, tag: impl Into<String>) -> Self {
        self.exclude_tags.push(tag.into());
        self
    }

    pub fn with_sort(mut self, sort: bool) -> Self {
        self.sort = sort;
        self
    }
}

/// Paradigm session over a shared, read-only transducer.
///
/// Queries take `&self` and keep their traversal state on the stack, so
/// one session can serve several threads.
#[derive(Debug, Clone)]
pub struct ParadigmSession {
    transducer: Arc<Transducer>,
    direction: Direction,
    post: PostProcessor,
}

impl ParadigmSession {
    pub fn new(transducer: Arc<Transducer>, options: ParadigmOptions) -> Self {
        Self {
            transducer,
            direction: options.direction,
            post: PostProcessor::new(&options.exclude_tags, options.sort),
        }
    }

    /// Load a compiled transducer file and start a session on it.
    pub fn open(path: impl AsRef<Path>, options: ParadigmOptions) -> Result<Self, ParadigmError> {
        let transducer = Transducer::load(path)?;
        Ok(Self::new(Arc::new(transducer), options))
    }

    pub fn transducer(&self) -> &Arc<Transducer> {
        &self.transducer
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn post_processor(&self) -> &PostProcessor {
        &self.post
    }

    /// Parse one query line and return its output lines.
    pub fn query(&self, line: &str) -> Result<Vec<String>, PatternError> {
        let pattern = parse(line)?;
        Ok(self.query_pattern(&pattern))
    }

    pub fn query_pattern(&self, pattern: &QueryPattern) -> Vec<String> {
        let matches = self.matches(pattern);
        let found = matches.len();
        let lines = self.post.process(matches);
        log::trace!("query {pattern}: {found} matches, {} lines", lines.len());
        lines
    }

    /// Raw matcher output for `pattern`, before post-processing.
    pub fn matches(&self, pattern: &QueryPattern) -> Vec<MatchEntry> {
        Matcher::new().run(&self.transducer, pattern, self.direction)
    }
}
