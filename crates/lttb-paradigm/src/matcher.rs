// Paradigm matching: pattern-constrained traversal of a transducer.
//
// The pattern runs as a small NFA over the analysis-side symbols of each
// path. A branch carries the set of pattern positions it can still be at
// and dies as soon as that set is empty.
//
// On cyclic graphs a branch may pass through the same (state, cursor set)
// configuration twice, so every loop is taken at least once; a third
// visit is pruned.

use lttb_core::{Direction, MatchEntry};
use lttb_fst::{Symbol, TagId, Transducer};

use crate::frontier::{CursorSet, Frontier, FrontierItem};
use crate::pattern::{LemmaSymbol, QueryPattern, TagPattern};

/// Times a (state, cursor set) pair may already occur on a path before a
/// branch reaching it again is pruned.
const MAX_REVISITS: usize = 2;

/// Pattern element resolved against one alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Element {
    Char(char),
    AnyChars,
    /// `None` when the tag is not in the alphabet.
    Tag(Option<TagId>),
    AnyTag,
}

/// A query pattern resolved against a transducer's tag table.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    elements: Vec<Element>,
    trailing_wildcard: bool,
}

impl CompiledPattern {
    pub fn new(pattern: &QueryPattern, transducer: &Transducer) -> Self {
        let alphabet = transducer.alphabet();
        let mut elements = Vec::with_capacity(pattern.lemma.symbols().len() + pattern.tags.len());
        for s in pattern.lemma.symbols() {
            elements.push(match *s {
                LemmaSymbol::Char(c) => Element::Char(c),
                LemmaSymbol::AnyRun => Element::AnyChars,
            });
        }
        for tag in &pattern.tags {
            elements.push(match tag {
                TagPattern::Literal(name) => Element::Tag(alphabet.tag_id(name)),
                TagPattern::Wildcard => Element::AnyTag,
            });
        }
        Self {
            elements,
            trailing_wildcard: pattern.has_trailing_wildcard(),
        }
    }

    /// Number of pattern elements; the accepting position.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// False when a literal tag is missing from the alphabet.
    pub fn is_satisfiable(&self) -> bool {
        !self.elements.contains(&Element::Tag(None))
    }

    /// Cursor set before any symbol is consumed.
    pub fn initial(&self) -> CursorSet {
        let mut set = Vec::new();
        self.close_into(0, &mut set);
        set
    }

    /// Advance a cursor set over one analysis-side symbol.
    pub fn step(&self, cursors: &[u32], symbol: Symbol) -> CursorSet {
        if symbol.is_epsilon() {
            return cursors.to_vec();
        }
        let mut next = Vec::with_capacity(cursors.len());
        for &pos in cursors {
            let i = pos as usize;
            match (self.elements.get(i), symbol) {
                (Some(Element::AnyChars), Symbol::Char(_)) => self.close_into(i, &mut next),
                (Some(&Element::Char(c)), Symbol::Char(s)) if c == s => {
                    self.close_into(i + 1, &mut next)
                }
                (Some(&Element::Tag(Some(id))), Symbol::Tag(t)) if id == t => {
                    self.close_into(i + 1, &mut next)
                }
                (Some(Element::AnyTag), Symbol::Tag(_)) => self.close_into(i + 1, &mut next),
                (None, Symbol::Tag(_)) if self.trailing_wildcard => next.push(pos),
                _ => {}
            }
        }
        next.sort_unstable();
        next.dedup();
        next
    }

    pub fn accepts(&self, cursors: &[u32]) -> bool {
        cursors.binary_search(&(self.len() as u32)).is_ok()
    }

    /// Add `pos` and, when it is a lemma run, the position after it.
    /// Runs never follow each other, so one level is enough.
    fn close_into(&self, pos: usize, out: &mut CursorSet) {
        out.push(pos as u32);
        if self.elements.get(pos) == Some(&Element::AnyChars) {
            out.push(pos as u32 + 1);
        }
    }
}

/// Runs paradigm queries, reusing its buffers between calls.
#[derive(Debug, Default)]
pub struct Matcher {
    frontier: Frontier,
    analysis: Vec<Symbol>,
    surface: Vec<Symbol>,
}

impl Matcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// All entries of `transducer` whose analysis side matches `pattern`.
    pub fn run(
        &mut self,
        transducer: &Transducer,
        pattern: &QueryPattern,
        direction: Direction,
    ) -> Vec<MatchEntry> {
        let compiled = CompiledPattern::new(pattern, transducer);
        self.run_compiled(transducer, &compiled, direction)
    }

    pub fn run_compiled(
        &mut self,
        transducer: &Transducer,
        pattern: &CompiledPattern,
        direction: Direction,
    ) -> Vec<MatchEntry> {
        self.frontier.reset();
        let mut entries = Vec::new();
        if !pattern.is_satisfiable() {
            return entries;
        }

        self.frontier.push(FrontierItem {
            state: transducer.start_state(),
            cursors: pattern.initial(),
            step: None,
        });

        while let Some(item) = self.frontier.pop() {
            if let Some(suffix) = transducer.final_suffix(item.state) {
                if let Some(entry) = self.accept(transducer, pattern, &item, suffix, direction) {
                    entries.push(entry);
                }
            }

            // Reverse so that branches pop in stored transition order.
            for edge in transducer.transitions(item.state).iter().rev() {
                let analysis = edge.analysis_symbol(direction);
                let cursors = pattern.step(&item.cursors, analysis);
                if cursors.is_empty()
                    || self.frontier.occurrences_on_path(
                        item.step,
                        edge.target,
                        &cursors,
                        MAX_REVISITS,
                    ) >= MAX_REVISITS
                {
                    continue;
                }
                let step = self.frontier.record(
                    item.step,
                    edge.target,
                    cursors.clone(),
                    analysis,
                    edge.surface_symbol(direction),
                );
                self.frontier.push(FrontierItem {
                    state: edge.target,
                    cursors,
                    step: Some(step),
                });
            }
        }

        log::trace!(
            "matched {} entries ({} steps, max depth {})",
            entries.len(),
            self.frontier.step_count(),
            self.frontier.max_depth()
        );
        entries
    }

    /// Check acceptance at a final state and render the entry.
    ///
    /// The default suffix sits on the transducer's output side.
    fn accept(
        &mut self,
        transducer: &Transducer,
        pattern: &CompiledPattern,
        item: &FrontierItem,
        suffix: &[Symbol],
        direction: Direction,
    ) -> Option<MatchEntry> {
        let mut cursors = item.cursors.clone();
        for &sym in suffix {
            cursors = pattern.step(&cursors, direction.analysis_side(Symbol::Epsilon, sym));
            if cursors.is_empty() {
                return None;
            }
        }
        if !pattern.accepts(&cursors) {
            return None;
        }

        self.frontier
            .collect_path(item.step, &mut self.analysis, &mut self.surface);
        for &sym in suffix {
            self.analysis.push(direction.analysis_side(Symbol::Epsilon, sym));
            self.surface.push(direction.surface_side(Symbol::Epsilon, sym));
        }
        let alphabet = transducer.alphabet();
        Some(MatchEntry::new(
            alphabet.render_all(&self.analysis),
            alphabet.render_all(&self.surface),
        ))
    }
}

/// One-shot form of [`Matcher::run`].
pub fn match_paradigm(
    transducer: &Transducer,
    pattern: &QueryPattern,
    direction: Direction,
) -> Vec<MatchEntry> {
    Matcher::new().run(transducer, pattern, direction)
}
