// Transition struct and direction-aware accessors.

use lttb_core::Direction;

use crate::symbols::Symbol;

/// Index of a state in the merged transducer graph.
pub type StateId = u32;

/// One labeled edge of the transducer graph.
///
/// A transition consumes one input symbol and emits zero or one output
/// symbol; an epsilon output emits nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Transition {
    pub input: Symbol,
    pub output: Symbol,
    pub target: StateId,
}

impl Transition {
    pub fn new(input: Symbol, output: Symbol, target: StateId) -> Self {
        Self {
            input,
            output,
            target,
        }
    }

    /// Output symbols emitted by this transition (empty for an epsilon output).
    #[inline]
    pub fn outputs(&self) -> &[Symbol] {
        if self.output.is_epsilon() {
            &[]
        } else {
            std::slice::from_ref(&self.output)
        }
    }

    /// Whether both sides are epsilon.
    #[inline]
    pub fn is_epsilon(&self) -> bool {
        self.input.is_epsilon() && self.output.is_epsilon()
    }

    /// The symbol on the analysis side for `direction`.
    #[inline]
    pub fn analysis_symbol(&self, direction: Direction) -> Symbol {
        direction.analysis_side(self.input, self.output)
    }

    /// The symbol on the surface side for `direction`.
    #[inline]
    pub fn surface_symbol(&self, direction: Direction) -> Symbol {
        direction.surface_side(self.input, self.output)
    }
}
