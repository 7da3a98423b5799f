// Result post-processing: tag exclusion, deduplication and ordering.

use hashbrown::HashSet;
use lttb_core::{MatchEntry, normalize_tag, tag_tokens};

/// Exclusion and ordering settings applied to every query of a session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostProcessor {
    /// Bracketed tags (`<ind>`).
    exclude_tags: HashSet<String>,
    sort: bool,
}

impl PostProcessor {
    /// Exclusion tags may be given with or without angle brackets.
    pub fn new<I, S>(exclude_tags: I, sort: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            exclude_tags: exclude_tags
                .into_iter()
                .map(|t| normalize_tag(t.as_ref()))
                .collect(),
            sort,
        }
    }

    pub fn exclude_tags(&self) -> impl Iterator<Item = &str> {
        self.exclude_tags.iter().map(String::as_str)
    }

    pub fn sorts(&self) -> bool {
        self.sort
    }

    pub fn is_excluded(&self, entry: &MatchEntry) -> bool {
        self.excludes_analysis(&entry.analysis)
    }

    fn excludes_analysis(&self, analysis: &str) -> bool {
        !self.exclude_tags.is_empty() && tag_tokens(analysis).any(|t| self.exclude_tags.contains(t))
    }

    /// Filter, deduplicate and (optionally) sort matcher output.
    pub fn process(&self, matches: impl IntoIterator<Item = MatchEntry>) -> Vec<String> {
        self.finish(
            matches
                .into_iter()
                .filter(|e| !self.is_excluded(e))
                .map(|e| e.to_line()),
        )
    }

    /// Deduplicate and (optionally) sort lines that already went through
    /// [`PostProcessor::process`].
    ///
    /// Exclusion is not applied again: a rendered line cannot be split back
    /// into its analysis and surface sides when either contains a separator
    /// or tag-like text.
    pub fn process_lines(&self, lines: impl IntoIterator<Item = String>) -> Vec<String> {
        self.finish(lines.into_iter())
    }

    fn finish(&self, lines: impl Iterator<Item = String>) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for line in lines {
            if seen.insert(line.clone()) {
                out.push(line);
            }
        }
        if self.sort {
            out.sort_unstable();
        }
        out
    }
}

/// One-shot form of [`PostProcessor::process`].
pub fn process<I, S>(
    matches: impl IntoIterator<Item = MatchEntry>,
    exclude_tags: I,
    sort: bool,
) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    PostProcessor::new(exclude_tags, sort).process(matches)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries() -> Vec<MatchEntry> {
        vec![
            MatchEntry::new("y<n><ind>", "y"),
            MatchEntry::new("ab<n><ind>", "ab"),
            MatchEntry::new("ab<n><def>", "abc"),
            MatchEntry::new("ab<n><ind>", "ab"),
            MatchEntry::new("n<n><ind>", "n"),
        ]
    }

    const NONE: [&str; 0] = [];

    #[test]
    fn dedup_keeps_first_occurrence_order() {
        assert_eq!(
            process(entries(), NONE, false),
            vec!["y<n><ind>:y", "ab<n><ind>:ab", "ab<n><def>:abc", "n<n><ind>:n"]
        );
    }

    #[test]
    fn sort_is_bytewise() {
        assert_eq!(
            process(entries(), NONE, true),
            vec!["ab<n><def>:abc", "ab<n><ind>:ab", "n<n><ind>:n", "y<n><ind>:y"]
        );
        let upper = process(
            vec![MatchEntry::new("b<n>", "b"), MatchEntry::new("B<n>", "B")],
            NONE,
            true,
        );
        assert_eq!(upper, vec!["B<n>:B", "b<n>:b"]);
    }

    #[test]
    fn exclusion_by_tag() {
        assert_eq!(process(entries(), ["<ind>"], false), vec!["ab<n><def>:abc"]);
        // bare names are accepted
        assert_eq!(process(entries(), ["ind"], false), vec!["ab<n><def>:abc"]);
        assert!(process(entries(), ["n"], true).is_empty());
        assert_eq!(process(entries(), ["vblex"], false).len(), 4);
    }

    #[test]
    fn exclusion_ignores_surface() {
        let e = vec![MatchEntry::new("x<n>", "<ind>")];
        assert_eq!(process(e, ["ind"], false), vec!["x<n>:<ind>"]);
    }

    #[test]
    fn exclusion_does_not_match_substrings() {
        let e = vec![MatchEntry::new("x<indef>", "x")];
        assert_eq!(process(e, ["ind"], false).len(), 1);
    }

    #[test]
    fn processing_lines_is_idempotent() {
        let post = PostProcessor::new(["def"], true);
        let once = post.process(entries());
        assert_eq!(post.process_lines(once.clone()), once);
    }

    #[test]
    fn reprocessing_keeps_tag_text_in_surface() {
        let post = PostProcessor::new(["ind"], false);
        let once = post.process(vec![
            MatchEntry::new("x<n>", "<ind>"),
            MatchEntry::new("y<n>", "a:b<ind>"),
        ]);
        assert_eq!(once, vec!["x<n>:<ind>", "y<n>:a:b<ind>"]);
        assert_eq!(post.process_lines(once.clone()), once);
    }

    #[test]
    fn accessors() {
        let post = PostProcessor::new(["ind", "<def>"], true);
        let mut tags: Vec<&str> = post.exclude_tags().collect();
        tags.sort();
        assert_eq!(tags, vec!["<def>", "<ind>"]);
        assert!(post.sorts());
        assert!(post.is_excluded(&MatchEntry::new("a<ind>", "a")));
        assert!(!PostProcessor::default().is_excluded(&MatchEntry::new("a<ind>", "a")));
    }
}
