//! Shared types for paradigm queries over compiled letter transducers.
//!
//! - [`direction`] -- which transducer side carries the analysis string
//! - [`entry`] -- match entries, output-line rendering and tag-token scanning

pub mod direction;
pub mod entry;

pub use direction::{Direction, ParseDirectionError};
pub use entry::{LINE_SEPARATOR, MatchEntry, TagTokens, normalize_tag, tag_tokens};
