// Per-query traversal state: an explicit DFS worklist plus a path arena.
//
// Paths are never copied while the search runs. Every taken transition
// appends one step to the arena with a link to its parent step, so a
// branch is just an index. Strings are rebuilt only for accepted paths.

use lttb_fst::{StateId, Symbol};

/// Pattern positions still alive on a branch, sorted and deduplicated.
pub type CursorSet = Vec<u32>;

/// Index of a step in the path arena.
pub type StepId = u32;

/// One taken transition.
#[derive(Debug, Clone)]
pub struct PathStep {
    pub parent: Option<StepId>,
    /// State reached by this step.
    pub state: StateId,
    /// Cursor set after this step.
    pub cursors: CursorSet,
    pub analysis: Symbol,
    pub surface: Symbol,
}

/// A branch waiting to be expanded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierItem {
    pub state: StateId,
    pub cursors: CursorSet,
    /// Last step of the branch; `None` at the start state.
    pub step: Option<StepId>,
}

/// Worklist and arena for one query.
///
/// A `Frontier` can be reused across queries: [`Frontier::reset`] drops the
/// contents but keeps the allocations.
#[derive(Debug, Default)]
pub struct Frontier {
    stack: Vec<FrontierItem>,
    steps: Vec<PathStep>,
    max_depth: usize,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.stack.clear();
        self.steps.clear();
        self.max_depth = 0;
    }

    pub fn push(&mut self, item: FrontierItem) {
        self.stack.push(item);
        self.max_depth = self.max_depth.max(self.stack.len());
    }

    pub fn pop(&mut self) -> Option<FrontierItem> {
        self.stack.pop()
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Number of steps recorded since the last reset.
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Largest worklist size since the last reset.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Append a step to the arena and return its id.
    pub fn record(
        &mut self,
        parent: Option<StepId>,
        state: StateId,
        cursors: CursorSet,
        analysis: Symbol,
        surface: Symbol,
    ) -> StepId {
        self.steps.push(PathStep {
            parent,
            state,
            cursors,
            analysis,
            surface,
        });
        (self.steps.len() - 1) as StepId
    }

    pub fn step(&self, id: StepId) -> Option<&PathStep> {
        self.steps.get(id as usize)
    }

    /// How often `(state, cursors)` occurs on the path ending at `step`,
    /// counting at most `limit` occurrences.
    pub fn occurrences_on_path(
        &self,
        step: Option<StepId>,
        state: StateId,
        cursors: &[u32],
        limit: usize,
    ) -> usize {
        let mut count = 0;
        let mut current = step;
        while let Some(s) = current.and_then(|id| self.step(id)) {
            if s.state == state && s.cursors == cursors {
                count += 1;
                if count >= limit {
                    break;
                }
            }
            current = s.parent;
        }
        count
    }

    /// Write the symbols of the path ending at `step` into the two buffers,
    /// in traversal order.
    pub fn collect_path(
        &self,
        step: Option<StepId>,
        analysis: &mut Vec<Symbol>,
        surface: &mut Vec<Symbol>,
    ) {
        analysis.clear();
        surface.clear();
        let mut current = step;
        while let Some(s) = current.and_then(|id| self.step(id)) {
            analysis.push(s.analysis);
            surface.push(s.surface);
            current = s.parent;
        }
        analysis.reverse();
        surface.reverse();
    }
}
