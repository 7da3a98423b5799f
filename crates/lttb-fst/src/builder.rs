// Fixture writer: serialize explicit graphs and prefix-tree dictionaries.
//
// This is not a dictionary compiler. Entries are inserted into a plain
// prefix tree, one state per distinct pair prefix, with no determinization
// or minimization. It exists so tests and benchmarks can produce real
// compiled files.

use std::collections::{BTreeMap, BTreeSet};
use std::io::{self, Write};

use hashbrown::HashMap;

use crate::compression::{write_multibyte, write_string};
use crate::format::{FEATURE_FINAL_SUFFIXES, write_header};
use crate::transducer::Transducer;
use crate::transition::StateId;
use crate::LoadError;

/// Error type for the fixture writer.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("invalid symbol text '{0}'")]
    InvalidSymbol(String),
    #[error("state {state} does not exist in section '{section}'")]
    UnknownState { section: String, state: StateId },
    #[error("failed to encode transducer: {0}")]
    Encode(#[from] io::Error),
    #[error(transparent)]
    Load(#[from] LoadError),
}

/// Handle to a section created by [`TransducerBuilder::section`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionId(usize);

struct SectionBuilder {
    name: String,
    /// Per state: `(pair index, target)` edges in insertion order.
    states: Vec<Vec<(u32, StateId)>>,
    /// Final states and their default suffix (raw symbols).
    finals: BTreeMap<StateId, Vec<i64>>,
}

/// Builds compiled transducer files in memory.
///
/// Symbol text is `""` for epsilon, a single character, or a bracketed tag
/// such as `<n>`. Entry strings are sequences of those; a backslash makes
/// the next character literal. State ids are local to their section, with
/// state 0 as the section's initial state.
pub struct TransducerBuilder {
    letters: BTreeSet<char>,
    tags: Vec<String>,
    tag_index: HashMap<String, usize>,
    pairs: Vec<(i64, i64)>,
    pair_index: HashMap<(i64, i64), u32>,
    sections: Vec<SectionBuilder>,
}

impl Default for TransducerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TransducerBuilder {
    pub fn new() -> Self {
        let mut builder = Self {
            letters: BTreeSet::new(),
            tags: Vec::new(),
            tag_index: HashMap::new(),
            pairs: Vec::new(),
            pair_index: HashMap::new(),
            sections: Vec::new(),
        };
        // The epsilon pair always takes index 0.
        builder.intern_pair(0, 0);
        builder
    }

    /// Add a new section with a single (initial) state.
    pub fn section(&mut self, name: &str) -> SectionId {
        self.sections.push(SectionBuilder {
            name: name.to_string(),
            states: vec![Vec::new()],
            finals: BTreeMap::new(),
        });
        SectionId(self.sections.len() - 1)
    }

    /// Initial state of every section.
    pub fn initial_state(&self) -> StateId {
        0
    }

    pub fn add_state(&mut self, section: SectionId) -> StateId {
        let states = &mut self.sections[section.0].states;
        states.push(Vec::new());
        (states.len() - 1) as StateId
    }

    /// Add one edge. `input` and `output` each hold at most one symbol.
    pub fn add_transition(
        &mut self,
        section: SectionId,
        from: StateId,
        input: &str,
        output: &str,
        to: StateId,
    ) -> Result<(), BuildError> {
        let input = self.single_symbol(input)?;
        let output = self.single_symbol(output)?;
        self.check_state(section, from)?;
        self.check_state(section, to)?;
        let pair = self.intern_pair(input, output);
        self.sections[section.0].states[from as usize].push((pair, to));
        Ok(())
    }

    /// Mark `state` final with a default output suffix (`""` for none).
    pub fn set_final(
        &mut self,
        section: SectionId,
        state: StateId,
        suffix: &str,
    ) -> Result<(), BuildError> {
        self.check_state(section, state)?;
        let suffix = self.tokenize(suffix)?;
        self.sections[section.0].finals.insert(state, suffix);
        Ok(())
    }

    /// Insert an `input -> output` entry into the section's prefix tree.
    ///
    /// The two symbol sequences are paired position by position, padding the
    /// shorter one with epsilon. Returns the final state of the entry.
    pub fn add_entry(
        &mut self,
        section: SectionId,
        input: &str,
        output: &str,
    ) -> Result<StateId, BuildError> {
        let input = self.tokenize(input)?;
        let output = self.tokenize(output)?;
        let len = input.len().max(output.len());

        let mut state: StateId = 0;
        for k in 0..len {
            let pair = self.intern_pair(
                input.get(k).copied().unwrap_or(0),
                output.get(k).copied().unwrap_or(0),
            );
            let existing = self.sections[section.0].states[state as usize]
                .iter()
                .find(|&&(p, _)| p == pair)
                .map(|&(_, target)| target);
            state = match existing {
                Some(target) => target,
                None => {
                    let target = self.add_state(section);
                    self.sections[section.0].states[state as usize].push((pair, target));
                    target
                }
            };
        }
        self.sections[section.0].finals.entry(state).or_default();
        Ok(state)
    }

    /// Serialize to the compiled binary layout.
    pub fn to_bytes(&self) -> Result<Vec<u8>, BuildError> {
        let mut out = Vec::new();
        self.encode(&mut out)?;
        Ok(out)
    }

    pub fn write_to<W: Write>(&self, mut out: W) -> Result<(), BuildError> {
        out.write_all(&self.to_bytes()?)?;
        out.flush()?;
        Ok(())
    }

    /// Serialize and load the result.
    pub fn build(&self) -> Result<Transducer, BuildError> {
        Ok(Transducer::from_bytes(&self.to_bytes()?)?)
    }

    fn encode(&self, out: &mut Vec<u8>) -> io::Result<()> {
        let with_suffixes = self
            .sections
            .iter()
            .any(|s| s.finals.values().any(|suffix| !suffix.is_empty()));
        let bias = self.tags.len() as i64;
        let biased = |raw: i64| -> io::Result<u32> {
            u32::try_from(raw + bias)
                .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "symbol out of range"))
        };

        write_header(out, if with_suffixes { FEATURE_FINAL_SUFFIXES } else { 0 })?;
        let letters: String = self.letters.iter().collect();
        write_string(out, &letters)?;

        write_multibyte(out, self.tags.len() as u32)?;
        for tag in &self.tags {
            write_string(out, &tag[1..tag.len() - 1])?;
        }
        write_multibyte(out, self.pairs.len() as u32)?;
        for &(left, right) in &self.pairs {
            write_multibyte(out, biased(left)?)?;
            write_multibyte(out, biased(right)?)?;
        }

        write_multibyte(out, self.sections.len() as u32)?;
        for section in &self.sections {
            write_string(out, &section.name)?;
            write_multibyte(out, 0)?;

            write_multibyte(out, section.finals.len() as u32)?;
            let mut previous = 0;
            for (&state, suffix) in &section.finals {
                write_multibyte(out, state - previous)?;
                previous = state;
                if with_suffixes {
                    write_multibyte(out, suffix.len() as u32)?;
                    for &raw in suffix {
                        write_multibyte(out, biased(raw)?)?;
                    }
                }
            }

            let n = section.states.len() as u64;
            write_multibyte(out, n as u32)?;
            for (source, edges) in section.states.iter().enumerate() {
                let mut edges = edges.clone();
                edges.sort_unstable();
                write_multibyte(out, edges.len() as u32)?;
                let mut previous_pair = 0;
                for (pair, target) in edges {
                    write_multibyte(out, pair - previous_pair)?;
                    previous_pair = pair;
                    let delta = (u64::from(target) + n - source as u64) % n;
                    write_multibyte(out, delta as u32)?;
                }
            }
        }
        Ok(())
    }

    fn check_state(&self, section: SectionId, state: StateId) -> Result<(), BuildError> {
        let s = &self.sections[section.0];
        if (state as usize) < s.states.len() {
            Ok(())
        } else {
            Err(BuildError::UnknownState {
                section: s.name.clone(),
                state,
            })
        }
    }

    fn intern_pair(&mut self, input: i64, output: i64) -> u32 {
        if let Some(&index) = self.pair_index.get(&(input, output)) {
            return index;
        }
        let index = self.pairs.len() as u32;
        self.pairs.push((input, output));
        self.pair_index.insert((input, output), index);
        index
    }

    fn intern_tag(&mut self, tag: &str) -> i64 {
        let index = match self.tag_index.get(tag) {
            Some(&index) => index,
            None => {
                self.tags.push(tag.to_string());
                self.tag_index.insert(tag.to_string(), self.tags.len() - 1);
                self.tags.len() - 1
            }
        };
        -(index as i64) - 1
    }

    fn single_symbol(&mut self, text: &str) -> Result<i64, BuildError> {
        let symbols = self.tokenize(text)?;
        match symbols.as_slice() {
            [] => Ok(0),
            [one] => Ok(*one),
            _ => Err(BuildError::InvalidSymbol(text.to_string())),
        }
    }

    /// Split symbol text into raw symbols, interning tags and letters.
    fn tokenize(&mut self, text: &str) -> Result<Vec<i64>, BuildError> {
        let mut symbols = Vec::new();
        let mut chars = text.char_indices();
        while let Some((start, c)) = chars.next() {
            match c {
                '<' => {
                    let end = text[start..]
                        .find('>')
                        .map(|rel| start + rel)
                        .ok_or_else(|| BuildError::InvalidSymbol(text.to_string()))?;
                    if end == start + 1 {
                        return Err(BuildError::InvalidSymbol(text.to_string()));
                    }
                    symbols.push(self.intern_tag(&text[start..=end]));
                    // skip the tag body
                    while let Some((i, _)) = chars.next() {
                        if i == end {
                            break;
                        }
                    }
                }
                '\\' => {
                    let (_, escaped) = chars
                        .next()
                        .ok_or_else(|| BuildError::InvalidSymbol(text.to_string()))?;
                    symbols.push(self.intern_char(escaped));
                }
                c => symbols.push(self.intern_char(c)),
            }
        }
        Ok(symbols)
    }

    fn intern_char(&mut self, c: char) -> i64 {
        if c.is_alphabetic() {
            self.letters.insert(c);
        }
        i64::from(c as u32)
    }
}
