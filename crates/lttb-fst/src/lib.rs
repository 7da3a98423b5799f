//! LTTB compiled letter transducer store.
//!
//! This crate loads a compiled dictionary (the `LTTB` binary layout) into an
//! immutable state/transition graph that can be shared across threads and
//! walked by query engines.
//!
//! # Architecture
//!
//! - [`compression`] -- Multibyte integer coding and a bounds-checked byte reader
//! - [`format`] -- Header parsing and feature bits
//! - [`symbols`] -- Symbols, tags and the pair alphabet
//! - [`transition`] -- Transition struct and direction-aware accessors
//! - [`transducer`] -- Section merging, validation and the graph API
//! - `builder` -- Fixture writer (feature `builder`)

use std::path::PathBuf;

#[cfg(any(test, feature = "builder"))]
pub mod builder;
pub mod compression;
pub mod format;
pub mod symbols;
pub mod transducer;
pub mod transition;

pub use symbols::{Alphabet, Symbol, TagId};
pub use transducer::{Section, START_STATE, Transducer};
pub use transition::{StateId, Transition};

/// Error type for loading compiled transducers.
///
/// Any load failure is fatal: no partially loaded transducer is ever returned.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("cannot read transducer file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid magic number in transducer header")]
    InvalidMagic,
    #[error("unsupported header feature bits {0:#x}")]
    UnsupportedFeatures(u64),
    #[error("file truncated at byte {offset} while reading {what}")]
    Truncated { offset: usize, what: &'static str },
    #[error("malformed transducer: {0}")]
    Malformed(String),
}
