// Query direction: which side of the transducer carries the analysis.

use std::fmt;
use std::str::FromStr;

/// Error returned when a direction name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown direction '{0}' (expected 'analysis' or 'generation')")]
pub struct ParseDirectionError(pub String);

/// Which side of a compiled transducer carries the analysis string.
///
/// Paradigm patterns always constrain the analysis side. A generator
/// (compiled right-to-left) reads analyses on its input side; an analyser
/// (compiled left-to-right) reads them on its output side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    /// Surface to analysis: the analysis is the transducer output.
    Analysis,
    /// Analysis to surface: the analysis is the transducer input.
    #[default]
    Generation,
}

impl Direction {
    /// Select the analysis-side value of an `(input, output)` pair.
    #[inline]
    pub fn analysis_side<T>(self, input: T, output: T) -> T {
        match self {
            Direction::Generation => input,
            Direction::Analysis => output,
        }
    }

    /// Select the surface-side value of an `(input, output)` pair.
    #[inline]
    pub fn surface_side<T>(self, input: T, output: T) -> T {
        match self {
            Direction::Generation => output,
            Direction::Analysis => input,
        }
    }

    /// Whether the transducer's output side holds the analysis.
    #[inline]
    pub fn analysis_on_output(self) -> bool {
        self == Direction::Analysis
    }

    pub fn inverse(self) -> Self {
        match self {
            Direction::Generation => Direction::Analysis,
            Direction::Analysis => Direction::Generation,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Analysis => "analysis",
            Direction::Generation => "generation",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = ParseDirectionError;

    /// Accepts the mode names and the compile-direction shorthands
    /// (`lr` builds an analyser, `rl` a generator).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "analysis" | "analyser" | "analyzer" | "lr" => Ok(Direction::Analysis),
            "generation" | "generator" | "rl" => Ok(Direction::Generation),
            other => Err(ParseDirectionError(other.to_string())),
        }
    }
}
