//! Per-task progress as a fraction of items handled.

/// Which download task a progress report belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPhase {
    Sprites,
    Assets,
}

impl std::fmt::Display for FetchPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchPhase::Sprites => write!(f, "sprites"),
            FetchPhase::Assets => write!(f, "assets"),
        }
    }
}

/// Counts handled items out of a fixed total. Skipped items count too, so
/// the last report is exactly 1.0.
#[derive(Debug, Clone)]
pub struct ItemProgress {
    done: usize,
    total: usize,
}

impl ItemProgress {
    pub fn new(total: usize) -> Self {
        Self { done: 0, total }
    }

    /// Marks one more item handled and returns the new fraction.
    pub fn advance(&mut self) -> f64 {
        self.done = (self.done + 1).min(self.total);
        self.fraction()
    }

    /// Fraction complete in [0.0, 1.0].
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        self.done as f64 / self.total as f64
    }
}
