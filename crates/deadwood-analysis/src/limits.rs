//! Bounds on the possible-value analysis.

/// Largest cross product of possible values the analyzer will enumerate, and
/// the largest value set it keeps for one variable.
pub const MAX_COMBINATION_COUNT: usize = 32;

/// Deepest symbolic unrolling of a `while` loop.
pub const MAX_DEPTH: usize = 32;

/// Limits applied by [`PossibleValueAnalyzer`](crate::PossibleValueAnalyzer).
///
/// Hitting a limit is not an error: the affected value set becomes
/// unconstrained and the analysis carries on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisLimits {
    pub max_combinations: usize,
    pub max_depth: usize,
}

impl Default for AnalysisLimits {
    fn default() -> Self {
        Self {
            max_combinations: MAX_COMBINATION_COUNT,
            max_depth: MAX_DEPTH,
        }
    }
}

impl AnalysisLimits {
    pub fn with_max_combinations(mut self, max_combinations: usize) -> Self {
        self.max_combinations = max_combinations;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
