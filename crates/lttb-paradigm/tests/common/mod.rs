// Shared fixture: a small mono-lingual dictionary compiled both ways.

#![allow(dead_code)]

use std::sync::Arc;

use lttb_core::Direction;
use lttb_fst::Transducer;
use lttb_fst::builder::TransducerBuilder;

/// `(analysis, surface)` entries. The verb and adjective entries are
/// distractors that no noun query may return.
pub const MINIMAL_MONO: &[(&str, &str)] = &[
    ("ab<n><def>", "abc"),
    ("ab<n><ind>", "ab"),
    ("n<n><ind>", "n"),
    ("y<n><ind>", "y"),
    ("ab<vblex><inf>", "abe"),
    ("be<vblex><pri><p3>", "is"),
    ("n<adj>", "nn"),
];

/// Compile `entries` for `direction`: generators read analyses, analysers
/// read surface forms.
pub fn compile(entries: &[(&str, &str)], direction: Direction) -> Transducer {
    let mut b = TransducerBuilder::new();
    let main = b.section("main");
    for &(analysis, surface) in entries {
        let (input, output) = match direction {
            Direction::Generation => (analysis, surface),
            Direction::Analysis => (surface, analysis),
        };
        b.add_entry(main, input, output)
            .unwrap_or_else(|e| panic!("bad fixture entry {analysis}:{surface}: {e}"));
    }
    b.build()
        .unwrap_or_else(|e| panic!("failed to compile fixture: {e}"))
}

pub fn minimal_mono(direction: Direction) -> Arc<Transducer> {
    Arc::new(compile(MINIMAL_MONO, direction))
}
