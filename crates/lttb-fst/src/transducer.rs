// Transducer loading, section merging and the read-only graph API.

use std::path::Path;

use hashbrown::HashMap;

use crate::compression::ByteReader;
use crate::format::{self, HEADER_SIZE};
use crate::symbols::{Alphabet, Symbol};
use crate::transition::{StateId, Transition};
use crate::LoadError;

/// The synthetic root state. It has one epsilon transition to the entry
/// state of every section.
pub const START_STATE: StateId = 0;

/// One named sub-transducer of a compiled file, after merging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub name: String,
    /// Entry state in the merged graph.
    pub initial: StateId,
    pub state_count: u32,
}

/// Compiled letter transducer, loaded into memory.
///
/// All sections of the file are merged into a single graph behind
/// [`START_STATE`]. Transitions are stored in one contiguous table indexed
/// by per-state offsets. The value is immutable after loading and can be
/// shared across threads (`Arc<Transducer>`).
pub struct Transducer {
    alphabet: Alphabet,
    /// `state_offsets[s]..state_offsets[s + 1]` are the transitions of `s`.
    state_offsets: Vec<u32>,
    transitions: Vec<Transition>,
    /// Final states with their default output suffix (possibly empty).
    finals: HashMap<StateId, Box<[Symbol]>>,
    sections: Vec<Section>,
}

impl std::fmt::Debug for Transducer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transducer")
            .field("state_count", &self.state_count())
            .field("transition_count", &self.transitions.len())
            .field("final_count", &self.finals.len())
            .field("tag_count", &self.alphabet.tag_count())
            .field("sections", &self.sections.len())
            .finish()
    }
}

/// A section as read from disk, before its states are shifted into the
/// merged numbering.
struct RawSection {
    name: String,
    initial: u32,
    finals: Vec<(u32, Box<[Symbol]>)>,
    offsets: Vec<u32>,
    transitions: Vec<Transition>,
}

impl Transducer {
    /// Load a compiled transducer from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let transducer = Self::from_bytes(&data)?;
        log::debug!(
            "loaded {}: {} states, {} transitions, {} tags, {} sections",
            path.display(),
            transducer.state_count(),
            transducer.transition_count(),
            transducer.alphabet.tag_count(),
            transducer.sections.len()
        );
        Ok(transducer)
    }

    /// Load a compiled transducer from its raw bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self, LoadError> {
        let header = format::parse_header(data)?;
        let mut reader = ByteReader::new(data, HEADER_SIZE);

        let letters = reader.read_string("letters")?;
        let alphabet = Alphabet::read(&mut reader, letters)?;

        let section_count = reader.read_count("section count")?;
        let mut raw_sections = Vec::with_capacity(section_count);
        for _ in 0..section_count {
            raw_sections.push(read_section(
                &mut reader,
                &alphabet,
                header.has_final_suffixes(),
            )?);
        }

        Ok(Self::merge(alphabet, raw_sections))
    }

    /// Renumber section states behind a shared root and flatten the
    /// transition tables.
    fn merge(alphabet: Alphabet, raw_sections: Vec<RawSection>) -> Self {
        let total_states: usize = 1 + raw_sections
            .iter()
            .map(|s| s.offsets.len() - 1)
            .sum::<usize>();
        let total_transitions: usize = raw_sections.len()
            + raw_sections
                .iter()
                .map(|s| s.transitions.len())
                .sum::<usize>();

        let mut state_offsets = Vec::with_capacity(total_states + 1);
        let mut transitions = Vec::with_capacity(total_transitions);
        let mut finals = HashMap::new();
        let mut sections = Vec::with_capacity(raw_sections.len());

        // Root: one epsilon edge per section entry.
        state_offsets.push(0);
        let mut base: u32 = 1;
        for raw in &raw_sections {
            let initial = base + raw.initial;
            transitions.push(Transition::new(Symbol::Epsilon, Symbol::Epsilon, initial));
            let state_count = (raw.offsets.len() - 1) as u32;
            sections.push(Section {
                name: raw.name.clone(),
                initial,
                state_count,
            });
            base += state_count;
        }

        let mut base: u32 = 1;
        for raw in raw_sections {
            let state_count = (raw.offsets.len() - 1) as u32;
            let shift = transitions.len() as u32;
            for &offset in &raw.offsets[..raw.offsets.len() - 1] {
                state_offsets.push(shift + offset);
            }
            transitions.extend(raw.transitions.into_iter().map(|mut t| {
                t.target += base;
                t
            }));
            for (state, suffix) in raw.finals {
                finals.insert(base + state, suffix);
            }
            base += state_count;
        }
        state_offsets.push(transitions.len() as u32);

        Self {
            alphabet,
            state_offsets,
            transitions,
            finals,
            sections,
        }
    }

    /// The state every traversal starts from.
    #[inline]
    pub fn start_state(&self) -> StateId {
        START_STATE
    }

    /// Outgoing transitions of `state`, in file order. Unknown states have none.
    #[inline]
    pub fn transitions(&self, state: StateId) -> &[Transition] {
        let s = state as usize;
        match (self.state_offsets.get(s), self.state_offsets.get(s + 1)) {
            (Some(&start), Some(&end)) => &self.transitions[start as usize..end as usize],
            _ => &[],
        }
    }

    #[inline]
    pub fn is_final(&self, state: StateId) -> bool {
        self.finals.contains_key(&state)
    }

    /// Default output suffix of a final state; `None` if the state is not final.
    #[inline]
    pub fn final_suffix(&self, state: StateId) -> Option<&[Symbol]> {
        self.finals.get(&state).map(|s| &s[..])
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Number of states, the synthetic root included.
    pub fn state_count(&self) -> usize {
        self.state_offsets.len() - 1
    }

    pub fn transition_count(&self) -> usize {
        self.transitions.len()
    }
}

fn read_section(
    reader: &mut ByteReader<'_>,
    alphabet: &Alphabet,
    with_suffixes: bool,
) -> Result<RawSection, LoadError> {
    let name = reader.read_string("section name")?;
    let initial = reader.read_multibyte("initial state")?;

    let final_count = reader.read_count("final count")?;
    let mut finals = Vec::with_capacity(final_count);
    let mut previous: u32 = 0;
    for _ in 0..final_count {
        let delta = reader.read_multibyte("final state")?;
        let state = previous
            .checked_add(delta)
            .ok_or_else(|| LoadError::Malformed(format!("final state overflow in section '{name}'")))?;
        previous = state;
        let suffix: Box<[Symbol]> = if with_suffixes {
            let len = reader.read_count("final suffix")?;
            let mut suffix = Vec::with_capacity(len);
            for _ in 0..len {
                suffix.push(alphabet.decode_biased(reader.read_multibyte("final suffix")?)?);
            }
            suffix.into_boxed_slice()
        } else {
            Box::default()
        };
        finals.push((state, suffix));
    }

    let state_count = reader.read_count("state count")?;
    if state_count == 0 {
        return Err(LoadError::Malformed(format!("section '{name}' has no states")));
    }
    if initial as usize >= state_count {
        return Err(LoadError::Malformed(format!(
            "initial state {initial} out of range in section '{name}'"
        )));
    }
    if let Some((state, _)) = finals.iter().find(|(s, _)| *s as usize >= state_count) {
        return Err(LoadError::Malformed(format!(
            "final state {state} out of range in section '{name}'"
        )));
    }

    let n = state_count as u64;
    let mut offsets = Vec::with_capacity(state_count + 1);
    let mut transitions = Vec::new();
    for source in 0..state_count {
        offsets.push(transitions.len() as u32);
        let count = reader.read_count("transition count")?;
        let mut pair_index: usize = 0;
        for _ in 0..count {
            pair_index += reader.read_multibyte("transition symbol")? as usize;
            let (input, output) = alphabet.pair(pair_index).ok_or_else(|| {
                LoadError::Malformed(format!("pair index {pair_index} out of range"))
            })?;
            let delta = u64::from(reader.read_multibyte("transition target")?);
            if delta >= n {
                return Err(LoadError::Malformed(format!(
                    "transition target out of range in section '{name}'"
                )));
            }
            let target = ((source as u64 + delta) % n) as u32;
            transitions.push(Transition::new(input, output, target));
        }
    }
    offsets.push(transitions.len() as u32);

    Ok(RawSection {
        name,
        initial,
        finals,
        offsets,
        transitions,
    })
}
