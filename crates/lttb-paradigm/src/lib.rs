//! Paradigm queries over compiled letter transducers.
//!
//! A query such as `ab<n><*>` names a lemma pattern and a sequence of tag
//! patterns. The engine walks the transducer under that pattern and lists
//! every matching `analysis:surface` pair.
//!
//! - [`pattern`] -- Query text parsing
//! - [`frontier`] -- Explicit worklist and path arena used by the matcher
//! - [`matcher`] -- Pattern-constrained traversal
//! - [`postprocess`] -- Tag exclusion, deduplication and ordering
//! - [`session`] -- A loaded transducer bound to query options

pub mod frontier;
pub mod matcher;
pub mod pattern;
pub mod postprocess;
pub mod session;

pub use matcher::{CompiledPattern, Matcher, match_paradigm};
pub use pattern::{LemmaPattern, LemmaSymbol, PatternError, QueryPattern, TagPattern, parse};
pub use postprocess::{PostProcessor, process};
pub use session::{ParadigmError, ParadigmOptions, ParadigmSession};
